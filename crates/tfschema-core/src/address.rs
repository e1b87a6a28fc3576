//! # Addresses
//!
//! A dot/index path such as `module.network.subnets[0]` or `aws.west`.
//! Addresses name reference targets and are the value of address-typed
//! schema key conditions (`provider = aws.west`).
//!
//! Ordering is step-wise: a root sorts before attribute steps, attribute
//! steps before index steps, and numeric indexes compare numerically, so
//! `x[2]` sorts before `x[10]`.

use std::fmt;

use serde::{Serialize, Serializer};

/// Key of an index step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Position in a list or tuple.
    Number(u64),
    /// Key in a map or object accessed by index syntax.
    String(String),
}

/// One step of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// The first step, e.g. `module` or `var`.
    Root(String),
    /// `.name`
    Attr(String),
    /// `[0]` or `["key"]`
    Index(IndexKey),
}

/// A traversal path made of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Vec<Step>);

impl Address {
    /// Start an address at a root name.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![Step::Root(name.into())])
    }

    /// Extend with an attribute step.
    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.0.push(Step::Attr(name.into()));
        self
    }

    /// Extend with an index step.
    pub fn index(mut self, key: IndexKey) -> Self {
        self.0.push(Step::Index(key));
        self
    }

    /// Address of `self` followed by one more step.
    pub fn with_step(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// The steps of this address.
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                Step::Root(name) => write!(f, "{name}")?,
                Step::Attr(name) if i == 0 => write!(f, "{name}")?,
                Step::Attr(name) => write!(f, ".{name}")?,
                Step::Index(IndexKey::Number(n)) => write!(f, "[{n}]")?,
                Step::Index(IndexKey::String(key)) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
