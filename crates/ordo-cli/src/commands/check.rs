//! Handler for `ordo check`.

use std::collections::HashSet;
use std::path::Path;

use miette::Result;

use ordo_core::catalog;

/// Load a catalog and report what a resolve against it would trip over.
pub fn exec(path: &Path, verbose: bool) -> Result<()> {
    let packages = catalog::load_catalog(path)?;

    let ids: HashSet<_> = packages.iter().map(|p| &p.id).collect();
    let mut seen = HashSet::new();
    for package in &packages {
        if !seen.insert(package.identity()) {
            ordo_util::progress::status_warn(
                "Duplicate",
                &format!(
                    "{} is listed more than once; the first entry wins",
                    package.identity()
                ),
            );
        }
    }

    let missing = catalog::undefined_dependencies(&packages);
    for id in &missing {
        ordo_util::progress::status_warn(
            "Missing",
            &format!("`{id}` is required but has no candidates"),
        );
    }

    if verbose {
        for package in &packages {
            let deps: Vec<String> = package
                .dependencies
                .iter()
                .map(|d| match &d.range {
                    Some(range) => format!("{} {range}", d.id),
                    None => d.id.to_string(),
                })
                .collect();
            println!("{} -> [{}]", package.identity(), deps.join(", "));
        }
    }

    ordo_util::progress::status(
        "Checked",
        &format!(
            "{} packages ({} ids), {} missing dependencies",
            packages.len(),
            ids.len(),
            missing.len()
        ),
    );
    Ok(())
}
