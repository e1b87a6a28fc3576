//! # Remote State Backends
//!
//! Configuration shapes of the state-storage backends known to each language
//! version. The module merger narrows `terraform_remote_state.config` to one
//! of these shapes per backend type.

use std::collections::BTreeMap;

use semver::Version;
use tfschema_core::{AttributeSchema, BodySchema, Type};

use crate::builder::{body, optional, required, typed, AttributeExt, BodyExt};
use crate::table::{TableEntry, VersionedTable};

/// Backend type name to its configuration shape.
pub type BackendCatalog = BTreeMap<String, BodySchema>;

static ENTRIES: [TableEntry<BackendCatalog>; 3] = [
    TableEntry::base(Version::new(0, 12, 0), base_0_12),
    TableEntry::patch(Version::new(0, 13, 0), patch_0_13),
    TableEntry::patch(Version::new(1, 3, 0), patch_1_3),
];

/// Backend catalogs by language version.
pub static BACKENDS: VersionedTable<BackendCatalog> = VersionedTable::new("backends", &ENTRIES);

fn string(description: &str) -> AttributeSchema {
    optional(typed(Type::String), description)
}

fn secret(description: &str) -> AttributeSchema {
    optional(typed(Type::String), description).sensitive()
}

fn base_0_12() -> BackendCatalog {
    let mut catalog = BackendCatalog::new();
    catalog.insert(
        "local".into(),
        body()
            .attr("path", string("Path to the state file"))
            .attr("workspace_dir", string("Directory holding non-default workspaces")),
    );
    catalog.insert(
        "remote".into(),
        body()
            .attr("hostname", string("Remote backend hostname"))
            .attr("organization", required(typed(Type::String), "Organization containing the workspaces"))
            .attr("token", secret("Authentication token"))
            .attr("workspaces", optional(typed(Type::object([("name", Type::String), ("prefix", Type::String)])), "Workspaces to use")),
    );
    catalog.insert(
        "s3".into(),
        body()
            .attr("bucket", required(typed(Type::String), "Name of the S3 bucket"))
            .attr("key", required(typed(Type::String), "Path to the state file inside the bucket"))
            .attr("region", string("AWS region of the bucket"))
            .attr("encrypt", optional(typed(Type::Bool), "Whether to enable server side encryption"))
            .attr("dynamodb_table", string("DynamoDB table used for locking"))
            .attr("access_key", secret("AWS access key"))
            .attr("secret_key", secret("AWS secret key"))
            .attr("profile", string("AWS profile name")),
    );
    catalog.insert(
        "gcs".into(),
        body()
            .attr("bucket", required(typed(Type::String), "Name of the Google Cloud Storage bucket"))
            .attr("prefix", string("Directory inside the bucket"))
            .attr("credentials", secret("Service account credentials"))
            .attr("encryption_key", secret("Customer-supplied encryption key")),
    );
    catalog.insert(
        "azurerm".into(),
        body()
            .attr("storage_account_name", required(typed(Type::String), "Name of the storage account"))
            .attr("container_name", required(typed(Type::String), "Name of the storage container"))
            .attr("key", required(typed(Type::String), "Name of the blob holding the state"))
            .attr("resource_group_name", string("Resource group of the storage account"))
            .attr("access_key", secret("Storage account access key"))
            .attr("sas_token", secret("Shared access signature token")),
    );
    catalog.insert(
        "consul".into(),
        body()
            .attr("path", required(typed(Type::String), "Path in the Consul KV store"))
            .attr("address", string("Consul agent address"))
            .attr("scheme", string("Scheme used to talk to Consul"))
            .attr("access_token", secret("Consul access token"))
            .attr("gzip", optional(typed(Type::Bool), "Whether to compress the state")),
    );
    catalog.insert(
        "http".into(),
        body()
            .attr("address", required(typed(Type::String), "REST endpoint"))
            .attr("update_method", string("HTTP method used to update state"))
            .attr("lock_address", string("Lock endpoint"))
            .attr("username", string("Basic auth username"))
            .attr("password", secret("Basic auth password")),
    );
    catalog.insert(
        "pg".into(),
        body()
            .attr("conn_str", required(typed(Type::String), "Postgres connection string").sensitive())
            .attr("schema_name", string("Schema holding the state table"))
            .attr("skip_schema_creation", optional(typed(Type::Bool), "Whether to skip creating the schema")),
    );
    catalog.insert(
        "etcdv3".into(),
        body()
            .attr("endpoints", required(typed(Type::list(Type::String)), "etcd endpoints"))
            .attr("prefix", string("Key prefix"))
            .attr("username", string("Username"))
            .attr("password", secret("Password")),
    );
    catalog.insert(
        "manta".into(),
        body()
            .attr("account", required(typed(Type::String), "Manta account"))
            .attr("key_id", required(typed(Type::String), "Key fingerprint"))
            .attr("path", string("Path relative to the private storage directory")),
    );
    catalog.insert(
        "swift".into(),
        body()
            .attr("container", required(typed(Type::String), "Swift container name"))
            .attr("auth_url", string("Identity endpoint"))
            .attr("password", secret("Password")),
    );
    catalog.insert(
        "artifactory".into(),
        body()
            .attr("url", required(typed(Type::String), "Artifactory URL"))
            .attr("repo", required(typed(Type::String), "Repository name"))
            .attr("subpath", required(typed(Type::String), "Path inside the repository"))
            .attr("username", string("Username"))
            .attr("password", secret("Password")),
    );
    catalog
}

fn patch_0_13(catalog: &mut BackendCatalog) {
    catalog.insert(
        "kubernetes".into(),
        body()
            .attr("secret_suffix", required(typed(Type::String), "Suffix of the state secret name"))
            .attr("namespace", string("Namespace of the state secret"))
            .attr("config_path", string("Path to the kube config file"))
            .attr("in_cluster_config", optional(typed(Type::Bool), "Whether to use the in-cluster service account")),
    );
}

fn patch_1_3(catalog: &mut BackendCatalog) {
    for removed in ["artifactory", "etcdv3", "manta", "swift"] {
        catalog.remove(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(version: Version) -> Vec<String> {
        BACKENDS.get(&version).unwrap().keys().cloned().collect()
    }

    #[test]
    fn catalog_changes_across_versions() {
        let old = names(Version::new(0, 12, 31));
        assert!(old.contains(&"artifactory".to_string()));
        assert!(!old.contains(&"kubernetes".to_string()));

        let mid = names(Version::new(1, 2, 9));
        assert!(mid.contains(&"kubernetes".to_string()));
        assert!(mid.contains(&"swift".to_string()));

        let new = names(Version::new(1, 10, 0));
        assert!(!new.contains(&"swift".to_string()));
        assert_eq!(new.len(), 9);
    }
}
