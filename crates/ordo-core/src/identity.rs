//! Package ids, identities, and resolve targets.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::{parse_version, Version, VersionError};

/// A package id. Compared, hashed and ordered case-insensitively, displayed
/// with its original spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageId {
    name: String,
    key: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = name.to_lowercase();
        Self { name, key }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<String> for PackageId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for PackageId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.name
    }
}

/// Failure to parse an `Id` or `Id@version` string.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IdentityError {
    #[error("package id is empty in `{input}`")]
    EmptyId { input: String },

    #[error("`{input}` has no version")]
    #[diagnostic(help("Write installed packages as `Id@1.2.3`"))]
    MissingVersion { input: String },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// A concrete package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub id: PackageId,
    pub version: Version,
}

impl PackageIdentity {
    pub fn new(id: impl Into<PackageId>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

impl FromStr for PackageIdentity {
    type Err = IdentityError;

    /// Parse `Id@1.2.3`. The version is required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = PackageTarget::from_str(s)?;
        match target.version {
            Some(version) => Ok(Self {
                id: target.id,
                version,
            }),
            None => Err(IdentityError::MissingVersion {
                input: s.to_string(),
            }),
        }
    }
}

/// A package the caller wants installed. Without a version the resolver
/// picks one; with a version the id is pinned to exactly that version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageTarget {
    pub id: PackageId,
    pub version: Option<Version>,
}

impl PackageTarget {
    pub fn any(id: impl Into<PackageId>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }

    pub fn pinned(id: impl Into<PackageId>, version: Version) -> Self {
        Self {
            id: id.into(),
            version: Some(version),
        }
    }
}

impl From<PackageIdentity> for PackageTarget {
    fn from(identity: PackageIdentity) -> Self {
        Self::pinned(identity.id, identity.version)
    }
}

impl fmt::Display for PackageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for PackageTarget {
    type Err = IdentityError;

    /// Parse `Id` or `Id@1.2.3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = match s.split_once('@') {
            Some((id, version)) => (id.trim(), Some(parse_version(version)?)),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err(IdentityError::EmptyId {
                input: s.to_string(),
            });
        }
        Ok(Self {
            id: PackageId::new(id),
            version,
        })
    }
}
