//! # Versions and Version Constraints
//!
//! Requested versions arrive as free-form strings (`1.5`, `v1.6.0-beta1`).
//! [`parse_version`] reads them leniently into a [`semver::Version`].
//!
//! Constraints use the configuration language's syntax rather than Cargo's:
//!
//! | clause       | meaning                      |
//! |--------------|------------------------------|
//! | `1.2.3`      | exactly 1.2.3                |
//! | `= 1.2`      | exactly 1.2.0                |
//! | `!= 1.2.3`   | anything but 1.2.3           |
//! | `> 1.2`      | strictly greater than 1.2.0  |
//! | `~> 1.2`     | `>= 1.2.0, < 2.0.0`          |
//! | `~> 1.2.3`   | `>= 1.2.3, < 1.3.0`          |
//!
//! Missing components are zero-padded before translation, so `> 1.2` keeps
//! its literal meaning instead of Cargo's partial-version semantics.

use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// Parse a version leniently.
///
/// A leading `v` is ignored, missing minor/patch components are zero, and a
/// pre-release or build suffix is kept (callers strip it with [`core_of`]).
///
/// # Errors
///
/// Returns `VersionError::InvalidVersion` if the numeric core is malformed.
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    let invalid = || VersionError::InvalidVersion(input.to_string());
    let text = input.trim();
    let text = text.strip_prefix('v').unwrap_or(text);

    let (core, suffix) = match text.find(['-', '+']) {
        Some(at) => text.split_at(at),
        None => (text, ""),
    };
    let parts = numeric_parts(core).ok_or_else(invalid)?;
    let padded = format!(
        "{}.{}.{}{suffix}",
        parts[0],
        parts.get(1).copied().unwrap_or(0),
        parts.get(2).copied().unwrap_or(0),
    );
    Version::parse(&padded).map_err(|_| invalid())
}

/// The numeric core of a version, without pre-release or build metadata.
pub fn core_of(version: &Version) -> Version {
    Version {
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
        ..version.clone()
    }
}

/// Split `1.2.3` into one to three numeric components.
fn numeric_parts(core: &str) -> Option<Vec<u64>> {
    let parts = core
        .split('.')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (1..=3).contains(&parts.len()).then_some(parts)
}

/// A parsed, comma-separated set of version constraint clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    raw: String,
    require: VersionReq,
    exclude: Vec<Version>,
}

impl Constraints {
    /// Parse a constraint string.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::InvalidConstraint` for an empty clause, an
    /// unknown operator or a malformed version.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let invalid = |reason: &str| VersionError::InvalidConstraint {
            constraint: input.to_string(),
            reason: reason.to_string(),
        };

        let mut comparators = Vec::new();
        let mut exclude = Vec::new();
        for clause in input.split(',') {
            let clause = clause.trim();
            if clause.is_empty() {
                return Err(invalid("empty clause"));
            }
            let (op, rest) = split_operator(clause);
            let rest = rest.trim();
            let rest = rest.strip_prefix('v').unwrap_or(rest);
            let core = rest.split(['-', '+']).next().unwrap_or_default();
            let parts = numeric_parts(core)
                .ok_or_else(|| invalid(&format!("malformed version {rest:?}")))?;
            let [major, minor, patch] = [
                parts[0],
                parts.get(1).copied().unwrap_or(0),
                parts.get(2).copied().unwrap_or(0),
            ];

            match op {
                "!=" => exclude.push(Version::new(major, minor, patch)),
                "~>" => {
                    comparators.push(exact_comparator(Op::GreaterEq, major, minor, patch));
                    let upper = if parts.len() == 3 {
                        minor.checked_add(1).map(|next| exact_comparator(Op::Less, major, next, 0))
                    } else {
                        major.checked_add(1).map(|next| exact_comparator(Op::Less, next, 0, 0))
                    };
                    comparators.push(upper.ok_or_else(|| invalid("version component out of range"))?);
                }
                "" | "=" => comparators.push(exact_comparator(Op::Exact, major, minor, patch)),
                ">" => comparators.push(exact_comparator(Op::Greater, major, minor, patch)),
                ">=" => comparators.push(exact_comparator(Op::GreaterEq, major, minor, patch)),
                "<" => comparators.push(exact_comparator(Op::Less, major, minor, patch)),
                "<=" => comparators.push(exact_comparator(Op::LessEq, major, minor, patch)),
                other => return Err(invalid(&format!("unknown operator {other:?}"))),
            }
        }

        Ok(Self {
            raw: input.trim().to_string(),
            require: VersionReq { comparators },
            exclude,
        })
    }

    /// Whether `version` satisfies every clause.
    ///
    /// Only the numeric core of `version` is considered.
    pub fn matches(&self, version: &Version) -> bool {
        let version = core_of(version);
        self.require.matches(&version) && !self.exclude.contains(&version)
    }

    /// The smallest version each lower-bounding clause admits.
    ///
    /// Used as extra resolution candidates: a constraint such as `>= 1.6.2`
    /// may be satisfiable only at a version that is not a table entry.
    /// `0.0.0` is always included so that constraints matching only ancient
    /// versions are recognised.
    pub fn lower_bounds(&self) -> Vec<Version> {
        let mut bounds = vec![Version::new(0, 0, 0)];
        for c in &self.require.comparators {
            let minor = c.minor.unwrap_or(0);
            let patch = c.patch.unwrap_or(0);
            match c.op {
                Op::Greater => {
                    if let Some(next) = patch.checked_add(1) {
                        bounds.push(Version::new(c.major, minor, next));
                    }
                }
                Op::Less | Op::LessEq => {}
                _ => bounds.push(Version::new(c.major, minor, patch)),
            }
        }
        bounds
    }

    /// The constraint text as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Constraints {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Constraints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Constraints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn split_operator(clause: &str) -> (&str, &str) {
    // Two-character operators first so `>=` is not read as `>`.
    for op in ["~>", ">=", "<=", "!=", ">", "<", "="] {
        if let Some(rest) = clause.strip_prefix(op) {
            return (op, rest);
        }
    }
    let end = clause
        .find(|c: char| c.is_ascii_digit() || c == 'v')
        .unwrap_or(clause.len());
    clause.split_at(end)
}

fn exact_comparator(op: Op, major: u64, minor: u64, patch: u64) -> Comparator {
    Comparator {
        op,
        major,
        minor: Some(minor),
        patch: Some(patch),
        pre: Prerelease::EMPTY,
    }
}
