//! Package resolution: validation, candidate groups, version-selection policy,
//! dependency-range rejection, and install ordering of the solver's answer.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use indexmap::IndexMap;

use ordo_core::behavior::DependencyBehavior;
use ordo_core::catalog::CatalogPackage;
use ordo_core::config::ResolverConfig;
use ordo_core::identity::{PackageId, PackageIdentity, PackageTarget};
use ordo_core::version::Version;

use crate::candidate::ResolverPackage;
use crate::compare::CompareWrapper;
use crate::error::ResolveError;
use crate::graph::InstallGraph;
use crate::solver::CombinationSolver;

/// Requested ids, each optionally pinned to one version, in request order.
type TargetSet = IndexMap<PackageId, Option<Version>>;

/// Resolves targets against a catalog. Holds configuration only, so one
/// resolver can serve any number of calls, concurrently or not.
#[derive(Debug, Clone, Default)]
pub struct PackageResolver {
    behavior: DependencyBehavior,
    solver: CombinationSolver,
}

impl PackageResolver {
    pub fn new(behavior: DependencyBehavior) -> Self {
        Self {
            behavior,
            solver: CombinationSolver::new(),
        }
    }

    /// Build a resolver from the `[resolver]` section of `Ordo.toml`.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let mut resolver = Self::new(config.dependency_behavior);
        if let Some(limit) = config.max_steps {
            resolver.solver = resolver.solver.with_max_steps(limit);
        }
        resolver
    }

    pub fn with_max_steps(mut self, limit: u64) -> Self {
        self.solver = self.solver.with_max_steps(limit);
        self
    }

    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.solver = self.solver.with_cancellation(flag);
        self
    }

    pub fn behavior(&self) -> DependencyBehavior {
        self.behavior
    }

    /// Resolve `targets` and return the packages to install, every
    /// dependency before its dependents.
    ///
    /// Installed packages bias selection toward the versions already present
    /// and must also be passed as targets.
    pub fn resolve(
        &self,
        targets: &[PackageTarget],
        available: &[CatalogPackage],
        installed: &[PackageIdentity],
    ) -> Result<Vec<PackageIdentity>, ResolveError> {
        let graph = self.resolve_graph(targets, available, installed)?;
        Ok(graph.install_order())
    }

    /// Like [`resolve`](Self::resolve), but returns the install graph of the
    /// chosen packages.
    pub fn resolve_graph(
        &self,
        targets: &[PackageTarget],
        available: &[CatalogPackage],
        installed: &[PackageIdentity],
    ) -> Result<InstallGraph, ResolveError> {
        let wanted = validate(targets, available, installed)?;
        let context = ResolutionContext::new(self.behavior, &wanted, installed);

        let groups = build_groups(&wanted, available, self.behavior);
        tracing::debug!(
            "Built {} candidate groups with {} candidates",
            groups.len(),
            groups.iter().map(Vec::len).sum::<usize>()
        );

        let priority = CompareWrapper::new(|x: &ResolverPackage, y: &ResolverPackage| {
            context.compare(x, y)
        });
        let Some(solution) = self.solver.find_solution(groups, &priority, reject_pair)? else {
            let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
            return Err(ResolveError::NoSolution {
                targets: names.join(", "),
            });
        };

        let graph = InstallGraph::from_candidates(&solution);
        tracing::info!(
            "Resolved {} packages for {} targets ({})",
            graph.len(),
            wanted.len(),
            self.behavior
        );
        Ok(graph)
    }
}

/// Per-call state the priority comparator needs.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub behavior: DependencyBehavior,
    /// Installed version of each installed id.
    pub installed: HashMap<PackageId, Version>,
    /// Target ids with nothing installed yet. These always prefer the highest version.
    pub new_ids: HashSet<PackageId>,
}

impl ResolutionContext {
    fn new(behavior: DependencyBehavior, targets: &TargetSet, installed: &[PackageIdentity]) -> Self {
        let installed: HashMap<PackageId, Version> = installed
            .iter()
            .map(|p| (p.id.clone(), p.version.clone()))
            .collect();
        let new_ids = targets
            .keys()
            .filter(|id| !installed.contains_key(*id))
            .cloned()
            .collect();
        Self {
            behavior,
            installed,
            new_ids,
        }
    }

    /// Priority of two candidates of one id: `Less` means `x` is tried first.
    pub fn compare(&self, x: &ResolverPackage, y: &ResolverPackage) -> Ordering {
        let (vx, vy) = match (x.version(), y.version()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(vx), Some(vy)) => (vx, vy),
        };

        if let Some(current) = self.installed.get(x.id()) {
            match (vx == current, vy == current) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        let behavior = if self.new_ids.contains(x.id()) {
            DependencyBehavior::Highest
        } else {
            self.behavior
        };
        compare_versions(behavior, vx, vy)
    }
}

/// Order two versions of one id under `behavior`, preferred first.
///
/// `HighestMinor` and `HighestPatch` compare pairwise: `x` goes first unless
/// its key sorts strictly after `y`'s. Distinct versions with the same
/// major.minor.patch therefore compare `Less` both ways.
pub fn compare_versions(behavior: DependencyBehavior, x: &Version, y: &Version) -> Ordering {
    match behavior {
        DependencyBehavior::Lowest => x.cmp(y),
        DependencyBehavior::Highest | DependencyBehavior::Ignore => y.cmp(x),
        DependencyBehavior::HighestMinor | DependencyBehavior::HighestPatch => {
            if x == y {
                return Ordering::Equal;
            }
            let key = if behavior == DependencyBehavior::HighestMinor {
                x.major
                    .cmp(&y.major)
                    .then(y.minor.cmp(&x.minor))
                    .then(y.patch.cmp(&x.patch))
            } else {
                x.major
                    .cmp(&y.major)
                    .then(x.minor.cmp(&y.minor))
                    .then(y.patch.cmp(&x.patch))
            };
            if key == Ordering::Greater {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
    }
}

/// True when `x` and `y` cannot both be in a solution.
///
/// `x`'s edge to `y` decides when it exists; `y`'s edge to `x` is only
/// consulted otherwise. The solver asks both argument orders, so a pair that
/// breaks either edge is ruled out.
pub fn reject_pair(x: &ResolverPackage, y: &ResolverPackage) -> bool {
    if let Some(range) = x.find_dependency_range(y.id()) {
        return match y.version() {
            Some(version) => !range.contains(version),
            None => true,
        };
    }
    if let Some(range) = y.find_dependency_range(x.id()) {
        return match x.version() {
            Some(version) => !range.contains(version),
            None => true,
        };
    }
    false
}

fn validate(
    targets: &[PackageTarget],
    available: &[CatalogPackage],
    installed: &[PackageIdentity],
) -> Result<TargetSet, ResolveError> {
    let known: HashSet<&PackageId> = available.iter().map(|p| &p.id).collect();

    let mut wanted = TargetSet::new();
    for target in targets {
        if !known.contains(&target.id) {
            return Err(ResolveError::MissingCandidateInfo {
                package: target.id.to_string(),
            });
        }
        if let Some(version) = &target.version {
            if !available
                .iter()
                .any(|p| p.id == target.id && &p.version == version)
            {
                return Err(ResolveError::MissingCandidateInfo {
                    package: format!("{} {version}", target.id),
                });
            }
        }

        let pinned = wanted.get(&target.id).cloned().flatten();
        match (&pinned, &target.version) {
            (Some(a), Some(b)) if a != b => {
                return Err(ResolveError::InvalidInput {
                    message: format!("`{}` is pinned to both {a} and {b}", target.id),
                });
            }
            (Some(_), _) => {}
            _ => {
                wanted.insert(target.id.clone(), target.version.clone());
            }
        }
    }

    for package in installed {
        if !known.contains(&package.id) {
            return Err(ResolveError::MissingCandidateInfo {
                package: package.id.to_string(),
            });
        }
        if !wanted.contains_key(&package.id) {
            return Err(ResolveError::InvalidInput {
                message: format!("installed package `{package}` must also be passed as a target"),
            });
        }
    }

    Ok(wanted)
}

/// One group of candidates per id, in catalog order. Ids referenced by an
/// edge but missing from the catalog follow with an absent-only group.
fn build_groups(
    targets: &TargetSet,
    available: &[CatalogPackage],
    behavior: DependencyBehavior,
) -> Vec<Vec<ResolverPackage>> {
    let mut groups: IndexMap<PackageId, Vec<ResolverPackage>> = IndexMap::new();

    for package in available {
        if let Some(Some(pinned)) = targets.get(&package.id) {
            if &package.version != pinned {
                continue;
            }
        }
        let mut candidate = ResolverPackage::from(package);
        if behavior == DependencyBehavior::Ignore {
            candidate = candidate.without_dependencies();
        }
        let group = groups.entry(package.id.clone()).or_default();
        if !group.contains(&candidate) {
            group.push(candidate);
        }
    }

    let missing: Vec<PackageId> = groups
        .values()
        .flatten()
        .flat_map(|c| c.dependencies().iter().map(|d| d.id.clone()))
        .filter(|id| !groups.contains_key(id))
        .collect();
    for id in missing {
        tracing::debug!("`{id}` is required but has no candidates");
        groups.entry(id).or_default();
    }

    for (id, group) in &mut groups {
        if !targets.contains_key(id) {
            group.push(ResolverPackage::absent(id.clone()));
        }
    }

    groups.into_values().collect()
}
