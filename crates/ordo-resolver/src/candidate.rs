//! Resolver candidates: one real version of a package id, or the absent
//! pseudo-version meaning "this id is not part of the solution".

use std::borrow::Cow;
use std::fmt;

use ordo_core::catalog::{CatalogPackage, PackageDependency};
use ordo_core::identity::{PackageId, PackageIdentity};
use ordo_core::version::{Version, VersionRange};

#[derive(Debug, Clone)]
pub enum CandidateKind {
    Present {
        version: Version,
        dependencies: Vec<PackageDependency>,
    },
    Absent,
}

/// A candidate assignment for one package id.
#[derive(Debug, Clone)]
pub struct ResolverPackage {
    id: PackageId,
    kind: CandidateKind,
}

impl ResolverPackage {
    pub fn present(
        id: impl Into<PackageId>,
        version: Version,
        dependencies: Vec<PackageDependency>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CandidateKind::Present {
                version,
                dependencies,
            },
        }
    }

    pub fn absent(id: impl Into<PackageId>) -> Self {
        Self {
            id: id.into(),
            kind: CandidateKind::Absent,
        }
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn kind(&self) -> &CandidateKind {
        &self.kind
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.kind, CandidateKind::Absent)
    }

    pub fn version(&self) -> Option<&Version> {
        match &self.kind {
            CandidateKind::Present { version, .. } => Some(version),
            CandidateKind::Absent => None,
        }
    }

    /// Declared edges, in declaration order. Always empty for absent candidates.
    pub fn dependencies(&self) -> &[PackageDependency] {
        match &self.kind {
            CandidateKind::Present { dependencies, .. } => dependencies,
            CandidateKind::Absent => &[],
        }
    }

    pub fn identity(&self) -> Option<PackageIdentity> {
        self.version()
            .map(|version| PackageIdentity::new(self.id.clone(), version.clone()))
    }

    /// The same candidate with every dependency edge dropped.
    pub fn without_dependencies(self) -> Self {
        match self.kind {
            CandidateKind::Present { version, .. } => Self::present(self.id, version, Vec::new()),
            CandidateKind::Absent => self,
        }
    }

    /// The range this candidate requires for `target`.
    ///
    /// An edge declared without a range yields [`VersionRange::all`]; `None`
    /// means there is no edge to `target` at all.
    pub fn find_dependency_range(&self, target: &PackageId) -> Option<Cow<'_, VersionRange>> {
        self.dependencies()
            .iter()
            .find(|dep| &dep.id == target)
            .map(|dep| match &dep.range {
                Some(range) => Cow::Borrowed(range),
                None => Cow::Owned(VersionRange::all()),
            })
    }
}

impl PartialEq for ResolverPackage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.version() == other.version()
    }
}

impl Eq for ResolverPackage {}

impl From<&CatalogPackage> for ResolverPackage {
    fn from(package: &CatalogPackage) -> Self {
        Self::present(
            package.id.clone(),
            package.version.clone(),
            package.dependencies.clone(),
        )
    }
}

impl fmt::Display for ResolverPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CandidateKind::Present { version, .. } => write!(f, "{} {version}", self.id),
            CandidateKind::Absent => write!(f, "{} (absent)", self.id),
        }
    }
}
