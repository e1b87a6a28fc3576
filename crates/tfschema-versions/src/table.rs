//! # Versioned Tables
//!
//! A [`VersionedTable`] is an ascending list of `(minimum version, build
//! step)` entries. The first entry is built from scratch; every later entry
//! clones the previous entry's value and applies a small named patch. Each
//! built value is memoised in a per-entry [`OnceLock`], so a table is built
//! at most once per process and handed out as `&'static` afterwards.
//!
//! Tables are `static` items. Nothing in them is ever mutated after
//! initialisation; callers that need to attach content clone first.

use std::fmt;
use std::sync::OnceLock;

use semver::Version;

use crate::constraint::core_of;
use crate::error::VersionError;

/// How one entry's value is produced.
pub enum Build<T: 'static> {
    /// Construct the value from nothing.
    Base(fn() -> T),
    /// Clone the previous entry's value and modify it. A leading patch
    /// starts from `T::default()`.
    Patch(fn(&mut T)),
}

/// One row of a [`VersionedTable`].
pub struct TableEntry<T: 'static> {
    min_version: Version,
    build: Build<T>,
    cell: OnceLock<T>,
}

impl<T: 'static> TableEntry<T> {
    /// The first entry of a table.
    pub const fn base(min_version: Version, build: fn() -> T) -> Self {
        Self {
            min_version,
            build: Build::Base(build),
            cell: OnceLock::new(),
        }
    }

    /// A patch applied on top of the previous entry.
    pub const fn patch(min_version: Version, patch: fn(&mut T)) -> Self {
        Self {
            min_version,
            build: Build::Patch(patch),
            cell: OnceLock::new(),
        }
    }

    /// Minimum language version this entry applies to.
    pub fn min_version(&self) -> &Version {
        &self.min_version
    }
}

/// An ascending, memoised base-then-patch table.
pub struct VersionedTable<T: 'static> {
    name: &'static str,
    entries: &'static [TableEntry<T>],
}

impl<T: 'static> VersionedTable<T> {
    /// Wrap a static entry list. `entries` must be non-empty and ascending.
    pub const fn new(name: &'static str, entries: &'static [TableEntry<T>]) -> Self {
        Self { name, entries }
    }
}

impl<T: 'static> fmt::Debug for VersionedTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedTable")
            .field("name", &self.name)
            .field(
                "versions",
                &self.entries.iter().map(|e| e.min_version.to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T: Clone + Default + Send + Sync + 'static> VersionedTable<T> {
    /// Table name used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The oldest supported version.
    pub fn oldest(&self) -> &Version {
        &self.entries[0].min_version
    }

    /// The newest supported version.
    pub fn newest(&self) -> &Version {
        &self.entries[self.entries.len() - 1].min_version
    }

    /// Every entry's minimum version, ascending.
    pub fn versions(&self) -> impl Iterator<Item = &Version> + '_ {
        self.entries.iter().map(|e| &e.min_version)
    }

    /// The value for `version`: the newest entry whose minimum version is
    /// not greater than the numeric core of `version`.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::NoCompatibleSchema` for versions older than
    /// the oldest entry.
    pub fn get(&self, version: &Version) -> Result<&'static T, VersionError> {
        let core = core_of(version);
        let index = self
            .entries
            .iter()
            .rposition(|e| e.min_version <= core)
            .ok_or_else(|| VersionError::NoCompatibleSchema {
                family: self.name.to_string(),
                version: Some(version.to_string()),
                constraint: None,
            })?;
        Ok(self.value_at(index))
    }

    /// The value of the newest entry.
    pub fn latest(&self) -> &'static T {
        self.value_at(self.entries.len() - 1)
    }

    fn value_at(&self, index: usize) -> &'static T {
        let entries: &'static [TableEntry<T>] = self.entries;
        let entry = &entries[index];
        entry.cell.get_or_init(|| match entry.build {
            Build::Base(base) => base(),
            Build::Patch(patch) => {
                let mut value = match index.checked_sub(1) {
                    Some(prev) => self.value_at(prev).clone(),
                    None => T::default(),
                };
                patch(&mut value);
                tracing::debug!(table = self.name, version = %entry.min_version, "built versioned table entry");
                value
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<&'static str> {
        vec!["a"]
    }
    fn add_b(v: &mut Vec<&'static str>) {
        v.push("b");
    }
    fn add_c(v: &mut Vec<&'static str>) {
        v.push("c");
    }

    static ENTRIES: [TableEntry<Vec<&'static str>>; 3] = [
        TableEntry::base(Version::new(1, 0, 0), base),
        TableEntry::patch(Version::new(1, 2, 0), add_b),
        TableEntry::patch(Version::new(2, 0, 0), add_c),
    ];
    static TABLE: VersionedTable<Vec<&'static str>> = VersionedTable::new("letters", &ENTRIES);

    #[test]
    fn patches_accumulate() {
        assert_eq!(TABLE.get(&Version::new(1, 0, 0)).unwrap(), &vec!["a"]);
        assert_eq!(TABLE.get(&Version::new(1, 5, 3)).unwrap(), &vec!["a", "b"]);
        assert_eq!(TABLE.latest(), &vec!["a", "b", "c"]);
    }

    #[test]
    fn memoised_once() {
        let first = TABLE.get(&Version::new(1, 2, 0)).unwrap();
        let second = TABLE.get(&Version::new(1, 3, 0)).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn prerelease_uses_core() {
        let v = Version::parse("1.2.0-beta1").unwrap();
        assert_eq!(TABLE.get(&v).unwrap(), &vec!["a", "b"]);
    }

    #[test]
    fn below_oldest_is_an_error() {
        assert!(matches!(
            TABLE.get(&Version::new(0, 9, 0)),
            Err(VersionError::NoCompatibleSchema { .. })
        ));
    }

    #[test]
    fn bounds() {
        assert_eq!(TABLE.oldest(), &Version::new(1, 0, 0));
        assert_eq!(TABLE.newest(), &Version::new(2, 0, 0));
        assert_eq!(TABLE.versions().count(), 3);
    }
}
