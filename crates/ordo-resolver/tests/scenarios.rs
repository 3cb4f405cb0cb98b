use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use ordo_core::behavior::DependencyBehavior;
use ordo_core::catalog::CatalogPackage;
use ordo_core::identity::{PackageIdentity, PackageTarget};
use ordo_core::version::{parse_version, Version, VersionRange};
use ordo_resolver::error::ResolveError;
use ordo_resolver::resolver::PackageResolver;
use ordo_resolver::solver::SolverError;

fn v(s: &str) -> Version {
    parse_version(s).unwrap()
}

fn package(id: &str, version: &str, deps: &[(&str, &str)]) -> CatalogPackage {
    deps.iter().fold(CatalogPackage::new(id, v(version)), |p, (dep, range)| {
        let range = if range.is_empty() {
            None
        } else {
            Some(VersionRange::parse(range).unwrap())
        };
        p.with_dependency(*dep, range)
    })
}

fn targets(ids: &[&str]) -> Vec<PackageTarget> {
    ids.iter().map(|id| id.parse().unwrap()).collect()
}

fn render(solution: &[PackageIdentity]) -> Vec<String> {
    solution.iter().map(ToString::to_string).collect()
}

fn resolve(
    behavior: DependencyBehavior,
    wanted: &[&str],
    catalog: &[CatalogPackage],
    installed: &[PackageIdentity],
) -> Result<Vec<String>, ResolveError> {
    PackageResolver::new(behavior)
        .resolve(&targets(wanted), catalog, installed)
        .map(|solution| render(&solution))
}

fn diamond() -> Vec<CatalogPackage> {
    vec![
        package("A", "1.0", &[("B", ""), ("C", "")]),
        package("B", "1.0", &[("D", "")]),
        package("C", "1.0", &[("D", "")]),
        package("D", "1.0", &[]),
    ]
}

#[test]
fn diamond_resolves_every_package_once() {
    let solution = resolve(DependencyBehavior::Lowest, &["A"], &diamond(), &[]).unwrap();
    assert_eq!(solution, ["D 1.0.0", "B 1.0.0", "C 1.0.0", "A 1.0.0"]);
}

#[test]
fn diamond_with_version_spread_takes_stricter_edges() {
    let catalog = vec![
        package("A", "1.0", &[("B", ""), ("C", "")]),
        package("B", "1.0", &[("D", "1.0"), ("E", "2.0")]),
        package("C", "1.0", &[("D", "2.0"), ("E", "1.0")]),
        package("D", "1.0", &[]),
        package("D", "2.0", &[]),
        package("E", "1.0", &[]),
        package("E", "2.0", &[]),
    ];
    let solution = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap();
    assert_eq!(
        solution,
        ["D 2.0.0", "E 2.0.0", "B 1.0.0", "C 1.0.0", "A 1.0.0"]
    );
}

#[test]
fn installed_versions_are_kept() {
    let catalog = vec![
        package("A", "1.0", &[("B", "1.0"), ("C", "1.0")]),
        package("B", "1.0", &[]),
        package("B", "1.1", &[]),
        package("C", "1.0", &[]),
        package("C", "2.0", &[]),
    ];
    let installed = [
        PackageIdentity::new("B", v("1.0")),
        PackageIdentity::new("C", v("1.0")),
    ];
    let solution = resolve(
        DependencyBehavior::HighestMinor,
        &["A", "B", "C"],
        &catalog,
        &installed,
    )
    .unwrap();
    assert_eq!(solution, ["B 1.0.0", "C 1.0.0", "A 1.0.0"]);
}

#[test]
fn dependency_without_candidates_is_unsatisfiable() {
    let catalog = vec![package("A", "1.0", &[("B", "")])];
    let err = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap_err();
    assert!(matches!(err, ResolveError::NoSolution { ref targets } if targets == "A"));
}

#[test]
fn ignore_resolves_only_targets() {
    let solution = resolve(DependencyBehavior::Ignore, &["A"], &diamond(), &[]).unwrap();
    assert_eq!(solution, ["A 1.0.0"]);

    let solution = resolve(DependencyBehavior::Ignore, &["C", "A"], &diamond(), &[]).unwrap();
    assert_eq!(solution, ["A 1.0.0", "C 1.0.0"]);
}

fn spread() -> Vec<CatalogPackage> {
    vec![
        package("App", "1.0", &[("Lib", "1.0")]),
        package("Lib", "1.0", &[]),
        package("Lib", "1.2", &[]),
        package("Lib", "1.2.7", &[]),
        package("Lib", "2.0", &[]),
    ]
}

#[test]
fn policy_picks_version_extremes() {
    let lowest = resolve(DependencyBehavior::Lowest, &["App"], &spread(), &[]).unwrap();
    assert_eq!(lowest[0], "Lib 1.0.0");

    let highest = resolve(DependencyBehavior::Highest, &["App"], &spread(), &[]).unwrap();
    assert_eq!(highest[0], "Lib 2.0.0");

    let minor = resolve(DependencyBehavior::HighestMinor, &["App"], &spread(), &[]).unwrap();
    assert_eq!(minor[0], "Lib 1.2.7");

    let patch = resolve(DependencyBehavior::HighestPatch, &["App"], &spread(), &[]).unwrap();
    assert_eq!(patch[0], "Lib 1.0.0");
}

#[test]
fn new_targets_always_take_highest() {
    let solution = resolve(DependencyBehavior::Lowest, &["Lib"], &spread(), &[]).unwrap();
    assert_eq!(solution, ["Lib 2.0.0"]);
}

#[test]
fn pinned_target_is_honored() {
    let solution = resolve(DependencyBehavior::Highest, &["App", "Lib@1.2"], &spread(), &[]).unwrap();
    assert_eq!(solution, ["Lib 1.2.0", "App 1.0.0"]);
}

#[test]
fn ids_are_case_insensitive() {
    let catalog = vec![
        package("Newtonsoft.Json", "13.0", &[("system.memory", "")]),
        package("System.Memory", "4.5", &[]),
    ];
    let solution = resolve(DependencyBehavior::Lowest, &["newtonsoft.json"], &catalog, &[]).unwrap();
    assert_eq!(solution, ["System.Memory 4.5.0", "Newtonsoft.Json 13.0.0"]);
}

#[test]
fn backtracks_out_of_preferred_version() {
    let catalog = vec![
        package("A", "1.0", &[("B", "[1.0,2.0)"), ("C", "")]),
        package("B", "1.0", &[]),
        package("B", "2.0", &[]),
        package("C", "1.0", &[("B", "[1.0]")]),
        package("C", "2.0", &[("B", "[2.0]")]),
    ];
    let solution = resolve(DependencyBehavior::Highest, &["A"], &catalog, &[]).unwrap();
    assert_eq!(solution, ["B 1.0.0", "C 1.0.0", "A 1.0.0"]);
}

#[test]
fn conflicting_ranges_have_no_solution() {
    let catalog = vec![
        package("A", "1.0", &[("B", "[1.0]"), ("C", "")]),
        package("B", "1.0", &[]),
        package("B", "2.0", &[]),
        package("C", "1.0", &[("B", "[2.0]")]),
    ];
    let err = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap_err();
    assert!(matches!(err, ResolveError::NoSolution { .. }));
}

#[test]
fn unused_packages_stay_out() {
    let mut catalog = diamond();
    catalog.push(package("Unrelated", "1.0", &[("D", "")]));
    let solution = resolve(DependencyBehavior::Highest, &["B"], &catalog, &[]).unwrap();
    assert_eq!(solution, ["D 1.0.0", "B 1.0.0"]);
}

#[test]
fn dependency_cycles_still_resolve() {
    let catalog = vec![
        package("A", "1.0", &[("B", "")]),
        package("B", "1.0", &[("A", "")]),
    ];
    let solution = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap();
    assert_eq!(solution, ["A 1.0.0", "B 1.0.0"]);
}

#[test]
fn mutual_edges_are_checked_both_ways() {
    // B 1.0 is the lowest B, but its edge back to A wants A >= 2.0.
    let catalog = vec![
        package("A", "1.0", &[("B", "")]),
        package("B", "1.0", &[("A", "2.0")]),
        package("B", "2.0", &[("A", "")]),
    ];
    let solution = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap();
    assert_eq!(solution, ["A 1.0.0", "B 2.0.0"]);
}

#[test]
fn back_edge_alone_can_make_a_pair_unsolvable() {
    let catalog = vec![
        package("A", "1.0", &[("B", "")]),
        package("B", "1.0", &[("A", "[2.0,)")]),
    ];
    let err = resolve(DependencyBehavior::Lowest, &["A"], &catalog, &[]).unwrap_err();
    assert!(matches!(err, ResolveError::NoSolution { .. }), "{err:?}");
}

#[test]
fn unknown_target_is_missing_candidate_info() {
    let err = resolve(DependencyBehavior::Lowest, &["Nope"], &diamond(), &[]).unwrap_err();
    assert!(matches!(err, ResolveError::MissingCandidateInfo { ref package } if package == "Nope"));
}

#[test]
fn installed_package_must_be_a_target() {
    let installed = [PackageIdentity::new("D", v("1.0"))];
    let err = resolve(DependencyBehavior::Lowest, &["A"], &diamond(), &installed).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidInput { .. }));
}

#[test]
fn cancelled_search_fails() {
    let flag = Arc::new(AtomicBool::new(true));
    let resolver = PackageResolver::new(DependencyBehavior::Lowest).with_cancellation(flag);
    let err = resolver
        .resolve(&targets(&["A"]), &diamond(), &[])
        .unwrap_err();
    assert!(matches!(err, ResolveError::Search(SolverError::Cancelled)));
}

#[test]
fn step_limit_is_enforced() {
    let resolver = PackageResolver::new(DependencyBehavior::Lowest).with_max_steps(2);
    let err = resolver
        .resolve(&targets(&["A"]), &diamond(), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Search(SolverError::StepLimitExceeded { limit: 2 })
    ));
}

#[test]
fn graph_renders_from_targets() {
    let graph = PackageResolver::new(DependencyBehavior::Lowest)
        .resolve_graph(&targets(&["A"]), &diamond(), &[])
        .unwrap();
    let tree = graph.render_tree(&[ordo_core::identity::PackageId::new("A")]);
    assert_eq!(
        tree,
        "A 1.0.0\n├── B 1.0.0\n│   └── D 1.0.0\n└── C 1.0.0\n    └── D 1.0.0\n"
    );
}

#[test]
fn resolver_is_shareable_across_threads() {
    let resolver = Arc::new(PackageResolver::new(DependencyBehavior::Lowest));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                let solution = resolver.resolve(&targets(&["A"]), &diamond(), &[]).unwrap();
                render(&solution)
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            ["D 1.0.0", "B 1.0.0", "C 1.0.0", "A 1.0.0"]
        );
    }
}
