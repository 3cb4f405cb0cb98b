//! Handler for `ordo resolve`.

use std::path::PathBuf;

use miette::Result;

use ordo_core::behavior::DependencyBehavior;
use ordo_core::catalog;
use ordo_core::config::OrdoConfig;
use ordo_core::identity::{PackageId, PackageIdentity, PackageTarget};
use ordo_resolver::resolver::PackageResolver;
use ordo_util::errors::OrdoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `Id version` line per package, in install order.
    List,
    Tree,
    Json,
}

pub struct ResolveOptions {
    pub catalog: PathBuf,
    pub targets: Vec<PackageTarget>,
    pub installed: Vec<PackageIdentity>,
    /// Overrides `dependency-behavior` from the config file.
    pub behavior: Option<DependencyBehavior>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

pub fn exec(opts: &ResolveOptions, verbose: bool) -> Result<()> {
    let config = match &opts.config {
        Some(path) => OrdoConfig::from_path(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(OrdoError::Io)?;
            OrdoConfig::discover(&cwd)?
        }
    };
    let mut settings = config.resolver;
    if let Some(behavior) = opts.behavior {
        settings.dependency_behavior = behavior;
    }

    let available = catalog::load_catalog(&opts.catalog)?;
    if verbose {
        ordo_util::progress::status(
            "Loaded",
            &format!("{} packages from {}", available.len(), opts.catalog.display()),
        );
    }

    let target_names: Vec<String> = opts.targets.iter().map(ToString::to_string).collect();
    ordo_util::progress::status(
        "Resolving",
        &format!(
            "{} ({})",
            target_names.join(", "),
            settings.dependency_behavior
        ),
    );

    let resolver = PackageResolver::from_config(&settings);
    let graph = resolver.resolve_graph(&opts.targets, &available, &opts.installed)?;
    let order = graph.install_order();

    match opts.format {
        OutputFormat::List => {
            for package in &order {
                println!("{package}");
            }
        }
        OutputFormat::Tree => {
            let roots: Vec<PackageId> = opts.targets.iter().map(|t| t.id.clone()).collect();
            print!("{}", graph.render_tree(&roots));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&order).map_err(|e| OrdoError::Generic {
                message: format!("Failed to serialize resolution: {e}"),
            })?;
            println!("{json}");
        }
    }

    ordo_util::progress::status("Resolved", &format!("{} packages", order.len()));
    Ok(())
}
