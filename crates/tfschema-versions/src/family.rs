//! # Schema Families
//!
//! Each kind of configuration file has its own baseline table with its own
//! supported version range. The family is chosen by the caller from the
//! file kind; version resolution then runs against that family's table.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use tfschema_core::BodySchema;

use crate::constraint::{parse_version, Constraints};
use crate::error::VersionError;
use crate::module::CORE_SCHEMAS;
use crate::policy::{POLICY_SCHEMAS, POLICY_TEST_SCHEMAS};
use crate::resolve::resolve_version;
use crate::stack::STACK_SCHEMAS;
use crate::table::VersionedTable;
use crate::test_file::TEST_SCHEMAS;

/// A kind of configuration file with its own baseline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFamily {
    /// Module files.
    Core,
    /// Test files.
    Test,
    /// Stack files.
    Stack,
    /// Policy files.
    Policy,
    /// Policy test files.
    PolicyTest,
}

impl SchemaFamily {
    /// All families.
    pub const ALL: [SchemaFamily; 5] = [
        Self::Core,
        Self::Test,
        Self::Stack,
        Self::Policy,
        Self::PolicyTest,
    ];

    /// The family's name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Test => "test",
            Self::Stack => "stack",
            Self::Policy => "policy",
            Self::PolicyTest => "policy-test",
        }
    }

    /// The family's baseline table.
    pub fn table(&self) -> &'static VersionedTable<BodySchema> {
        match self {
            Self::Core => &CORE_SCHEMAS,
            Self::Test => &TEST_SCHEMAS,
            Self::Stack => &STACK_SCHEMAS,
            Self::Policy => &POLICY_SCHEMAS,
            Self::PolicyTest => &POLICY_TEST_SCHEMAS,
        }
    }

    /// Resolve free-form version and constraint strings to a supported version.
    ///
    /// # Errors
    ///
    /// Returns `VersionError` if either string is malformed or no supported
    /// version satisfies the constraint.
    pub fn resolve(
        &self,
        version: Option<&str>,
        constraint: Option<&str>,
    ) -> Result<Version, VersionError> {
        let version = version.map(parse_version).transpose()?;
        let constraints = constraint.map(Constraints::parse).transpose()?;
        resolve_version(self.table(), version.as_ref(), constraints.as_ref())
    }

    /// The baseline schema for a resolved version.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::NoCompatibleSchema` for versions older than the
    /// family supports.
    pub fn schema(&self, version: &Version) -> Result<&'static BodySchema, VersionError> {
        self.table().get(version)
    }
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaFamily {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" | "module" => Ok(Self::Core),
            "test" => Ok(Self::Test),
            "stack" => Ok(Self::Stack),
            "policy" => Ok(Self::Policy),
            "policy-test" => Ok(Self::PolicyTest),
            other => Err(VersionError::UnknownFamily(other.to_string())),
        }
    }
}
