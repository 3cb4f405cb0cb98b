use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for ordo loaders and the CLI.
#[derive(Debug, Error, Diagnostic)]
pub enum OrdoError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed configuration file (e.g. Ordo.toml).
    #[error("Config error: {message}")]
    #[diagnostic(help("Check your Ordo.toml for syntax errors"))]
    Config { message: String },

    /// Invalid or malformed package catalog.
    #[error("Catalog error: {message}")]
    #[diagnostic(help("Every [[package]] entry needs an `id` and a `version`"))]
    Catalog { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
