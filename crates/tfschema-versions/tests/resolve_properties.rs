//! Property tests for version resolution against the shipped tables.

use proptest::prelude::*;
use tfschema_versions::semver::Version;
use tfschema_versions::{resolve_version, Constraints, SchemaFamily};

fn family() -> impl Strategy<Value = SchemaFamily> {
    prop::sample::select(SchemaFamily::ALL.to_vec())
}

fn version() -> impl Strategy<Value = Version> {
    (0u64..3, 0u64..20, 0u64..40).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
}

proptest! {
    /// Without constraints, resolution is a clamp into the table's bounds.
    #[test]
    fn unconstrained_resolution_clamps(family in family(), v in version()) {
        let table = family.table();
        let got = resolve_version(table, Some(&v), None).unwrap();
        let expected = v.clone().max(table.oldest().clone()).min(table.newest().clone());
        prop_assert_eq!(got, expected);
    }

    /// Every resolved version has a baseline.
    #[test]
    fn resolved_versions_have_baselines(
        family in family(),
        v in prop::option::of(version()),
        floor in version(),
    ) {
        let constraint = Constraints::parse(&format!(">= {floor}")).unwrap();
        if let Ok(got) = resolve_version(family.table(), v.as_ref(), Some(&constraint)) {
            prop_assert!(family.schema(&got).is_ok());
            prop_assert!(&got >= family.table().oldest());
            prop_assert!(&got <= family.table().newest());
        }
    }

    /// A requested version that satisfies the constraint after clamping is
    /// returned unchanged.
    #[test]
    fn satisfying_version_is_kept(family in family(), v in version()) {
        let table = family.table();
        let clamped = v.clone().max(table.oldest().clone()).min(table.newest().clone());
        let constraint = Constraints::parse(&format!("= {clamped}")).unwrap();
        let got = resolve_version(table, Some(&v), Some(&constraint)).unwrap();
        prop_assert_eq!(got, clamped);
    }
}

#[test]
fn prerelease_suffix_is_stripped() {
    let v = Version::parse("1.7.0-alpha20231025").unwrap();
    let got = resolve_version(SchemaFamily::Core.table(), Some(&v), None).unwrap();
    assert_eq!(got, Version::new(1, 7, 0));
}
