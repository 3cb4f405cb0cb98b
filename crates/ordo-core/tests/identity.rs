use std::collections::HashSet;

use ordo_core::identity::{IdentityError, PackageId, PackageIdentity, PackageTarget};
use ordo_core::version::parse_version;

#[test]
fn ids_compare_case_insensitively() {
    assert_eq!(PackageId::new("Newtonsoft.Json"), PackageId::new("newtonsoft.json"));
    let set: HashSet<PackageId> = ["A", "a", "B"].into_iter().map(PackageId::from).collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn ids_keep_original_spelling() {
    let id = PackageId::new("Serilog.Sinks");
    assert_eq!(id.to_string(), "Serilog.Sinks");
    assert_eq!(id.as_str(), "Serilog.Sinks");
}

#[test]
fn target_without_version() {
    let target: PackageTarget = "A".parse().unwrap();
    assert_eq!(target, PackageTarget::any("A"));
    assert_eq!(target.to_string(), "A");
}

#[test]
fn target_with_version() {
    let target: PackageTarget = "A@1.2".parse().unwrap();
    assert_eq!(target.version, Some(parse_version("1.2.0").unwrap()));
    assert_eq!(target.to_string(), "A@1.2.0");
}

#[test]
fn target_empty_id_fails() {
    let err = "@1.0".parse::<PackageTarget>().unwrap_err();
    assert!(matches!(err, IdentityError::EmptyId { .. }));
}

#[test]
fn identity_requires_version() {
    let err = "A".parse::<PackageIdentity>().unwrap_err();
    assert!(matches!(err, IdentityError::MissingVersion { .. }));

    let identity: PackageIdentity = "B@1.0".parse().unwrap();
    assert_eq!(identity.to_string(), "B 1.0.0");
}

#[test]
fn identity_bad_version_fails() {
    let err = "B@one".parse::<PackageIdentity>().unwrap_err();
    assert!(matches!(err, IdentityError::Version(_)));
}
