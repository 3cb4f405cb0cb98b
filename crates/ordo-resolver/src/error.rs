//! Resolution failures.

use miette::Diagnostic;
use thiserror::Error;

use crate::solver::SolverError;

/// Why a resolve call produced no install set. Every variant is terminal for
/// the call; no partial solution is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// A target or installed package has no entry in the available packages.
    #[error("no candidate information for `{package}` in the available packages")]
    #[diagnostic(
        code(ordo::resolve::missing_candidate),
        help("Add the package to the catalog or drop it from the targets")
    )]
    MissingCandidateInfo { package: String },

    /// The caller broke the input contract (e.g. an installed package not passed as a target).
    #[error("invalid resolver input: {message}")]
    #[diagnostic(code(ordo::resolve::invalid_input))]
    InvalidInput { message: String },

    /// The search exhausted every assignment.
    #[error("unable to find a set of versions satisfying every dependency of {targets}")]
    #[diagnostic(
        code(ordo::resolve::no_solution),
        help("Try another dependency behavior or relax the requested versions")
    )]
    NoSolution { targets: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Search(#[from] SolverError),
}
