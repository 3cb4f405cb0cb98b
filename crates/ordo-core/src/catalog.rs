//! The flat package catalog the resolver works from, and its TOML file form.
//!
//! ```toml
//! [[package]]
//! id = "A"
//! version = "1.0.0"
//! dependencies = [
//!     { id = "B", range = "[1.0,2.0)" },
//!     { id = "C" },
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ordo_util::errors::OrdoError;

use crate::identity::{PackageId, PackageIdentity};
use crate::version::{parse_version, Version, VersionRange};

/// A dependency edge declared by a package version. `range: None` means any
/// version satisfies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    pub id: PackageId,
    pub range: Option<VersionRange>,
}

impl PackageDependency {
    pub fn new(id: impl Into<PackageId>, range: Option<VersionRange>) -> Self {
        Self {
            id: id.into(),
            range,
        }
    }
}

/// One installable package version and its declared edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPackage {
    pub id: PackageId,
    pub version: Version,
    pub dependencies: Vec<PackageDependency>,
}

impl CatalogPackage {
    pub fn new(id: impl Into<PackageId>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            dependencies: Vec::new(),
        }
    }

    /// Builder-style helper for declaring an edge.
    pub fn with_dependency(mut self, id: impl Into<PackageId>, range: Option<VersionRange>) -> Self {
        self.dependencies.push(PackageDependency::new(id, range));
        self
    }

    pub fn identity(&self) -> PackageIdentity {
        PackageIdentity::new(self.id.clone(), self.version.clone())
    }
}

/// Dependency ids referenced by some package but never defined in the catalog,
/// in first-reference order.
pub fn undefined_dependencies(packages: &[CatalogPackage]) -> Vec<PackageId> {
    let defined: HashSet<&PackageId> = packages.iter().map(|p| &p.id).collect();
    let mut seen = HashSet::new();
    packages
        .iter()
        .flat_map(|p| &p.dependencies)
        .filter(|d| !defined.contains(&d.id) && seen.insert(d.id.clone()))
        .map(|d| d.id.clone())
        .collect()
}

/// Catalog file as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub package: Vec<CatalogEntry>,
}

/// A `[[package]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
}

/// An entry in a package's `dependencies` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub id: String,
    #[serde(default)]
    pub range: Option<String>,
}

impl CatalogFile {
    /// Parse a catalog from a TOML string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            OrdoError::Catalog {
                message: format!("Failed to parse catalog: {e}"),
            }
            .into()
        })
    }

    /// Load and parse a catalog file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = ordo_util::fs::read_text(path, "catalog")?;
        Self::parse_toml(&content)
    }

    /// Convert the raw entries, parsing every version and range.
    pub fn into_packages(self) -> Result<Vec<CatalogPackage>, OrdoError> {
        self.package
            .into_iter()
            .map(|entry| {
                let version = parse_version(&entry.version).map_err(|e| OrdoError::Catalog {
                    message: format!("package `{}`: {e}", entry.id),
                })?;
                let dependencies = entry
                    .dependencies
                    .into_iter()
                    .map(|dep| {
                        let range = match dep.range.as_deref().map(str::trim) {
                            None | Some("") => None,
                            Some(spec) => {
                                Some(VersionRange::parse(spec).map_err(|e| OrdoError::Catalog {
                                    message: format!(
                                        "package `{} {version}` dependency `{}`: {e}",
                                        entry.id, dep.id
                                    ),
                                })?)
                            }
                        };
                        Ok(PackageDependency::new(dep.id, range))
                    })
                    .collect::<Result<Vec<_>, OrdoError>>()?;
                Ok(CatalogPackage {
                    id: PackageId::new(entry.id),
                    version,
                    dependencies,
                })
            })
            .collect()
    }
}

/// Load a catalog file straight into resolver input.
pub fn load_catalog(path: &Path) -> miette::Result<Vec<CatalogPackage>> {
    let file = CatalogFile::from_path(path)?;
    let packages = file.into_packages()?;
    tracing::debug!("Loaded {} catalog entries from {}", packages.len(), path.display());
    Ok(packages)
}
