//! Command dispatch and handler modules.

mod check;
mod resolve;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            catalog,
            targets,
            installed,
            behavior,
            config,
            tree,
            json,
        } => {
            let format = if json {
                resolve::OutputFormat::Json
            } else if tree {
                resolve::OutputFormat::Tree
            } else {
                resolve::OutputFormat::List
            };
            let opts = resolve::ResolveOptions {
                catalog,
                targets,
                installed,
                behavior,
                config,
                format,
            };
            resolve::exec(&opts, cli.verbose)
        }
        Command::Check { catalog } => check::exec(&catalog, cli.verbose),
    }
}
