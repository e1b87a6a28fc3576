//! # Version Resolution
//!
//! Maps an optional requested version and an optional constraint set onto a
//! version that is guaranteed to have a table entry.
//!
//! 1. Only the numeric core of the requested version matters.
//! 2. The core is clamped into `[oldest, newest]`.
//! 3. If it satisfies the constraints (or there are none) it is the answer.
//! 4. Otherwise ascending candidates are scanned: every table entry plus the
//!    lower bound of every constraint comparator. The first candidate inside
//!    the bounds that satisfies the constraints wins.
//! 5. Constraints that only match below the floor resolve to the floor.
//! 6. Failing that, constraints that only match above the ceiling resolve
//!    to the newest instead of failing.
//! 7. With neither input, the newest version is returned.

use semver::Version;

use crate::constraint::{core_of, Constraints};
use crate::error::VersionError;
use crate::table::VersionedTable;

/// Resolve a version against `table`.
///
/// # Errors
///
/// Returns `VersionError::NoCompatibleSchema` when the constraints are
/// satisfied by no candidate at all.
pub fn resolve_version<T>(
    table: &VersionedTable<T>,
    version: Option<&Version>,
    constraints: Option<&Constraints>,
) -> Result<Version, VersionError>
where
    T: Clone + Default + Send + Sync + 'static,
{
    let oldest = table.oldest();
    let newest = table.newest();

    if let Some(requested) = version {
        let clamped = clamp(core_of(requested), oldest, newest);
        match constraints {
            Some(c) if !c.matches(&clamped) => {
                tracing::debug!(
                    table = table.name(),
                    %requested,
                    %clamped,
                    constraint = %c,
                    "requested version does not satisfy constraint, scanning candidates"
                );
            }
            _ => return Ok(clamped),
        }
    }

    let Some(constraints) = constraints else {
        return Ok(newest.clone());
    };

    let mut candidates: Vec<Version> = table
        .versions()
        .cloned()
        .chain(constraints.lower_bounds())
        .collect();
    candidates.sort();
    candidates.dedup();

    let matching: Vec<&Version> = candidates.iter().filter(|v| constraints.matches(v)).collect();

    if let Some(found) = matching.iter().find(|v| **v >= oldest && **v <= newest) {
        tracing::debug!(table = table.name(), version = %found, constraint = %constraints, "resolved from constraint");
        return Ok((*found).clone());
    }
    if matching.iter().any(|v| *v < oldest) {
        return Ok(oldest.clone());
    }
    if matching.iter().any(|v| *v > newest) {
        return Ok(newest.clone());
    }

    Err(VersionError::NoCompatibleSchema {
        family: table.name().to_string(),
        version: version.map(ToString::to_string),
        constraint: Some(constraints.to_string()),
    })
}

fn clamp(version: Version, oldest: &Version, newest: &Version) -> Version {
    if &version < oldest {
        oldest.clone()
    } else if &version > newest {
        newest.clone()
    } else {
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableEntry;

    fn noop(_: &mut u8) {}

    static ENTRIES: [TableEntry<u8>; 4] = [
        TableEntry::patch(Version::new(0, 12, 0), noop),
        TableEntry::patch(Version::new(0, 13, 0), noop),
        TableEntry::patch(Version::new(1, 2, 0), noop),
        TableEntry::patch(Version::new(1, 5, 0), noop),
    ];
    static TABLE: VersionedTable<u8> = VersionedTable::new("test", &ENTRIES);

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn c(s: &str) -> Constraints {
        Constraints::parse(s).unwrap()
    }

    #[test]
    fn no_inputs_is_newest() {
        assert_eq!(resolve_version(&TABLE, None, None).unwrap(), v("1.5.0"));
    }

    #[test]
    fn clamps_into_bounds() {
        assert_eq!(resolve_version(&TABLE, Some(&v("0.11.14")), None).unwrap(), v("0.12.0"));
        assert_eq!(resolve_version(&TABLE, Some(&v("2.3.0")), None).unwrap(), v("1.5.0"));
        assert_eq!(resolve_version(&TABLE, Some(&v("1.3.7")), None).unwrap(), v("1.3.7"));
    }

    #[test]
    fn strips_prerelease() {
        let got = resolve_version(&TABLE, Some(&v("1.3.0-rc1")), None).unwrap();
        assert_eq!(got, v("1.3.0"));
    }

    #[test]
    fn satisfied_version_is_kept() {
        let got = resolve_version(&TABLE, Some(&v("1.3.0")), Some(&c("~> 1.2"))).unwrap();
        assert_eq!(got, v("1.3.0"));
    }

    #[test]
    fn unsatisfied_version_scans_candidates() {
        let got = resolve_version(&TABLE, Some(&v("0.13.0")), Some(&c(">= 1.1"))).unwrap();
        assert_eq!(got, v("1.1.0"));
        let got = resolve_version(&TABLE, None, Some(&c(">= 1.2.3"))).unwrap();
        assert_eq!(got, v("1.2.3"));
    }

    #[test]
    fn constraint_below_floor_is_floor() {
        let got = resolve_version(&TABLE, None, Some(&c("< 0.10"))).unwrap();
        assert_eq!(got, v("0.12.0"));
    }

    #[test]
    fn constraint_above_ceiling_is_newest() {
        let got = resolve_version(&TABLE, None, Some(&c(">= 3.0"))).unwrap();
        assert_eq!(got, v("1.5.0"));
    }

    #[test]
    fn contradictory_constraint_fails() {
        let err = resolve_version(&TABLE, Some(&v("1.0.0")), Some(&c(">= 1.4, < 1.3"))).unwrap_err();
        match err {
            VersionError::NoCompatibleSchema { version, constraint, .. } => {
                assert_eq!(version.as_deref(), Some("1.0.0"));
                assert_eq!(constraint.as_deref(), Some(">= 1.4, < 1.3"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
