//! # Plugins — Addresses, Local References and Converted Schemas
//!
//! A configuration unit refers to plugins by *local name* (`aws`), optionally
//! qualified by an alias (`aws.west`). Each local name maps to a canonical
//! [`PluginAddr`] (`registry.terraform.io/hashicorp/aws`). Several local
//! references may map to the same canonical plugin.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Address;
use crate::error::AddressError;
use crate::function::FunctionSignature;
use crate::schema::BodySchema;

/// Canonical address of a plugin: registry host, namespace and type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginAddr {
    /// Registry host, e.g. `registry.terraform.io`.
    pub hostname: String,
    /// Namespace, e.g. `hashicorp`.
    pub namespace: String,
    /// Plugin type, e.g. `aws`.
    pub type_name: String,
}

impl PluginAddr {
    /// Host assumed when an address omits it.
    pub const DEFAULT_HOST: &'static str = "registry.terraform.io";
    /// Namespace assumed when an address only names a type.
    pub const DEFAULT_NAMESPACE: &'static str = "hashicorp";
    /// Host of plugins compiled into the language runtime.
    pub const BUILTIN_HOST: &'static str = "terraform.io";
    /// Namespace of plugins compiled into the language runtime.
    pub const BUILTIN_NAMESPACE: &'static str = "builtin";

    /// Address of a plugin in the default registry.
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            hostname: Self::DEFAULT_HOST.to_string(),
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    /// Address of a built-in plugin.
    pub fn builtin(type_name: impl Into<String>) -> Self {
        Self {
            hostname: Self::BUILTIN_HOST.to_string(),
            namespace: Self::BUILTIN_NAMESPACE.to_string(),
            type_name: type_name.into(),
        }
    }

    /// Parse `type`, `namespace/type` or `host/namespace/type`.
    ///
    /// # Errors
    ///
    /// Returns `AddressError` for the wrong number of segments or an invalid
    /// segment.
    pub fn parse(addr: &str) -> Result<Self, AddressError> {
        let parts: Vec<&str> = addr.split('/').collect();
        let (hostname, namespace, type_name) = match parts.as_slice() {
            [type_name] => (Self::DEFAULT_HOST, Self::DEFAULT_NAMESPACE, *type_name),
            [namespace, type_name] => (Self::DEFAULT_HOST, *namespace, *type_name),
            [hostname, namespace, type_name] => (*hostname, *namespace, *type_name),
            _ => return Err(AddressError::InvalidFormat(addr.to_string())),
        };
        for segment in [hostname, namespace, type_name] {
            let valid = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
            if !valid {
                return Err(AddressError::InvalidSegment {
                    address: addr.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self {
            hostname: hostname.to_ascii_lowercase(),
            namespace: namespace.to_ascii_lowercase(),
            type_name: type_name.to_ascii_lowercase(),
        })
    }

    /// Returns true for plugins compiled into the language runtime.
    pub fn is_builtin(&self) -> bool {
        self.hostname == Self::BUILTIN_HOST && self.namespace == Self::BUILTIN_NAMESPACE
    }

    /// Short form for display: the default host is omitted.
    pub fn for_display(&self) -> String {
        if self.hostname == Self::DEFAULT_HOST {
            format!("{}/{}", self.namespace, self.type_name)
        } else {
            self.to_string()
        }
    }

    fn docs_base(&self) -> Option<String> {
        (self.hostname == Self::DEFAULT_HOST).then(|| {
            format!(
                "https://registry.terraform.io/providers/{}/{}/latest/docs",
                self.namespace, self.type_name
            )
        })
    }
}

impl fmt::Display for PluginAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.hostname, self.namespace, self.type_name)
    }
}

impl FromStr for PluginAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PluginAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PluginAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A local reference to a plugin: `name` or `name.alias`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginRef {
    /// Local name used inside the unit.
    pub local_name: String,
    /// Alias distinguishing several configurations of one plugin.
    pub alias: Option<String>,
}

impl PluginRef {
    /// An unaliased reference.
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            alias: None,
        }
    }

    /// An aliased reference.
    pub fn aliased(local_name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            alias: Some(alias.into()),
        }
    }

    /// The reference address, as written in a `provider = ...` attribute.
    pub fn address(&self) -> Address {
        let addr = Address::root(self.local_name.clone());
        match &self.alias {
            Some(alias) => addr.attr(alias.clone()),
            None => addr,
        }
    }

    /// Whether a resource/data type name implicitly belongs to this
    /// reference: it equals the local name or is prefixed by `<name>_`.
    pub fn owns_type_name(&self, type_name: &str) -> bool {
        type_name == self.local_name
            || type_name
                .strip_prefix(self.local_name.as_str())
                .is_some_and(|rest| rest.starts_with('_'))
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{alias}", self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

impl FromStr for PluginRef {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let local_name = parts.next().unwrap_or_default();
        let alias = parts.next();
        if local_name.is_empty() || parts.next().is_some() || alias.is_some_and(str::is_empty) {
            return Err(AddressError::InvalidReference(s.to_string()));
        }
        Ok(Self {
            local_name: local_name.to_string(),
            alias: alias.map(str::to_string),
        })
    }
}

impl Serialize for PluginRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PluginRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converted shapes contributed by one plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSchema {
    /// Configuration shape of the plugin itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<BodySchema>,
    /// Resource type name to resource shape.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, BodySchema>,
    /// Data-lookup type name to data shape.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data_sources: BTreeMap<String, BodySchema>,
    /// Ephemeral resource type name to shape.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub ephemeral_resources: BTreeMap<String, BodySchema>,
    /// Function name to signature.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, FunctionSignature>,
}

impl PluginSchema {
    /// Stamp every shape with the contributing plugin.
    ///
    /// Sets `detail` to the plugin's display address and, for plugins in the
    /// default registry, `docs_link` to the registry documentation page.
    pub fn annotate(&mut self, addr: &PluginAddr) {
        let detail = addr.for_display();
        let docs = addr.docs_base();

        if let Some(provider) = self.provider.as_mut() {
            provider.detail = detail.clone();
            provider.docs_link = docs.clone();
        }
        let kinds = [
            (&mut self.resources, "resources"),
            (&mut self.data_sources, "data-sources"),
            (&mut self.ephemeral_resources, "ephemeral-resources"),
        ];
        for (shapes, section) in kinds {
            for (name, body) in shapes.iter_mut() {
                body.detail = detail.clone();
                body.docs_link = docs.as_ref().map(|base| {
                    let page = name
                        .strip_prefix(addr.type_name.as_str())
                        .and_then(|rest| rest.strip_prefix('_'))
                        .unwrap_or(name.as_str());
                    format!("{base}/{section}/{page}")
                });
            }
        }
        for function in self.functions.values_mut() {
            function.detail = detail.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_forms() {
        let aws = PluginAddr::parse("aws").unwrap();
        assert_eq!(aws.to_string(), "registry.terraform.io/hashicorp/aws");
        let random = PluginAddr::parse("hashicorp/random").unwrap();
        assert_eq!(random, PluginAddr::new("hashicorp", "random"));
        let custom = PluginAddr::parse("example.com/Acme/Widget").unwrap();
        assert_eq!(custom.for_display(), "example.com/acme/widget");
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(
            PluginAddr::parse("a/b/c/d"),
            Err(AddressError::InvalidFormat(_))
        ));
        assert!(matches!(
            PluginAddr::parse("hashicorp/"),
            Err(AddressError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn builtin_address() {
        let tf = PluginAddr::builtin("terraform");
        assert!(tf.is_builtin());
        assert_eq!(tf.to_string(), "terraform.io/builtin/terraform");
    }

    #[test]
    fn reference_address_includes_alias() {
        assert_eq!(PluginRef::new("aws").address().to_string(), "aws");
        assert_eq!(PluginRef::aliased("aws", "west").address().to_string(), "aws.west");
        assert_eq!("aws.west".parse::<PluginRef>().unwrap(), PluginRef::aliased("aws", "west"));
        assert!("aws.".parse::<PluginRef>().is_err());
        assert!("a.b.c".parse::<PluginRef>().is_err());
    }

    #[test]
    fn type_name_ownership() {
        let random = PluginRef::new("random");
        assert!(random.owns_type_name("random_pet"));
        assert!(random.owns_type_name("random"));
        assert!(!random.owns_type_name("randomizer_x"));
        assert!(!random.owns_type_name("aws_instance"));
    }

    #[test]
    fn annotate_sets_detail_and_docs() {
        let mut schema = PluginSchema::default();
        schema.resources.insert("random_pet".into(), BodySchema::default());
        schema.provider = Some(BodySchema::default());
        schema.annotate(&PluginAddr::new("hashicorp", "random"));

        let pet = &schema.resources["random_pet"];
        assert_eq!(pet.detail, "hashicorp/random");
        assert_eq!(
            pet.docs_link.as_deref(),
            Some("https://registry.terraform.io/providers/hashicorp/random/latest/docs/resources/pet")
        );
    }

    #[test]
    fn annotate_skips_docs_outside_registry() {
        let mut schema = PluginSchema::default();
        schema.data_sources.insert("terraform_remote_state".into(), BodySchema::default());
        schema.annotate(&PluginAddr::builtin("terraform"));
        let ds = &schema.data_sources["terraform_remote_state"];
        assert_eq!(ds.detail, "terraform.io/builtin/terraform");
        assert!(ds.docs_link.is_none());
    }
}
