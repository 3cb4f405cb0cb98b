//! CLI argument definitions for Ordo.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ordo_core::behavior::DependencyBehavior;
use ordo_core::identity::{PackageIdentity, PackageTarget};

#[derive(Parser, Debug)]
#[command(
    name = "ordo",
    version,
    about = "Resolve package versions against a catalog",
    long_about = "Ordo picks one version of every package a set of targets needs, honoring \
                  declared version ranges and a version-selection policy, and prints them \
                  in install order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve targets and print the packages to install, dependencies first
    Resolve {
        /// Catalog file listing every available package version
        #[arg(short, long)]
        catalog: PathBuf,
        /// Package to install: `Id` or `Id@version` (repeatable)
        #[arg(short, long = "target", value_name = "ID[@VERSION]", required = true)]
        targets: Vec<PackageTarget>,
        /// Already installed package: `Id@version` (repeatable, must also be a target)
        #[arg(short, long = "installed", value_name = "ID@VERSION")]
        installed: Vec<PackageIdentity>,
        /// Version-selection policy: ignore, lowest, highest-patch, highest-minor, highest
        #[arg(short, long, env = "ORDO_DEPENDENCY_BEHAVIOR")]
        behavior: Option<DependencyBehavior>,
        /// Config file (defaults to the nearest Ordo.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the dependency tree of each target
        #[arg(long, conflicts_with = "json")]
        tree: bool,
        /// Print the install order as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a catalog file
    Check {
        /// Catalog file to validate
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
