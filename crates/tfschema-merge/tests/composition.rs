//! End-to-end composition against the shipped baselines.

use proptest::prelude::*;
use tfschema_core::{
    AttributeSchema, BodySchema, Constraint, DependencyKeys, ExpressionValue, PluginAddr,
    PluginRef, PluginSchema, SchemaKey, Type,
};
use tfschema_merge::{
    FunctionsMerger, MemoryStateReader, ModuleSchemaMerger, PolicySchemaMerger, StackSchemaMerger,
    TestKind, TestSchemaMerger, UnitMeta, PLUGIN_FUNCTIONS_SINCE,
};
use tfschema_versions::semver::Version;
use tfschema_versions::{SchemaFamily, BACKENDS, FUNCTIONS, REMOTE_STATE_DATA_SOURCE};

const UNIT_YAML: &str = r#"
path:
  path: ./app
  language_id: terraform
filenames: [main.tf, variables.tf]
plugin_references:
  random: registry.terraform.io/hashicorp/random
plugin_requirements:
  registry.terraform.io/hashicorp/random: "~> 3.5"
variables:
  foo:
    default: bar
  count:
    type: number
outputs:
  pet:
    value: { name: rex }
calls:
  net:
    source: ./net
"#;

const NET_YAML: &str = r#"
path:
  path: ./net
  language_id: terraform
filenames: [main.tf]
variables:
  cidr:
    type: string
outputs:
  vpc_id:
    type: string
"#;

fn random_addr() -> PluginAddr {
    PluginAddr::new("hashicorp", "random")
}

fn random_plugin() -> PluginSchema {
    let mut pet = BodySchema::default();
    for (name, ty) in [
        ("id", Type::String),
        ("keepers", Type::map(Type::String)),
        ("length", Type::Number),
        ("prefix", Type::String),
        ("separator", Type::String),
    ] {
        pet.attributes.insert(
            name.into(),
            AttributeSchema {
                is_optional: name != "id",
                is_computed: name == "id",
                constraint: Constraint::for_type(&ty),
                ..AttributeSchema::default()
            },
        );
    }
    let mut schema = PluginSchema {
        provider: Some(BodySchema::default()),
        ..PluginSchema::default()
    };
    schema.resources.insert("random_pet".into(), pet);
    schema.annotate(&random_addr());
    schema
}

fn unit() -> UnitMeta {
    serde_yaml::from_str(UNIT_YAML).unwrap()
}

fn reader() -> MemoryStateReader {
    MemoryStateReader::new()
        .with_plugin(random_addr(), random_plugin())
        .with_unit(serde_yaml::from_str(NET_YAML).unwrap())
}

fn label0(value: &str) -> SchemaKey {
    SchemaKey::new(&DependencyKeys::default().with_label(0, value)).unwrap()
}

fn merge_module(meta: &UnitMeta, version: &Version) -> BodySchema {
    let core = SchemaFamily::Core.schema(version).unwrap();
    ModuleSchemaMerger::new(&reader())
        .with_core_schema(core, version.clone())
        .schema_for_unit(meta)
        .unwrap()
}

#[test]
fn unaliased_plugin_resource_resolves_by_type() {
    let merged = merge_module(&unit(), &Version::new(1, 5, 0));
    let resource = &merged.blocks["resource"];

    let pet = resource.dependent_body(&label0("random_pet")).unwrap();
    let names: Vec<&str> = pet.attributes.keys().map(String::as_str).collect();
    assert_eq!(names, ["id", "keepers", "length", "prefix", "separator"]);
    assert_eq!(pet.detail, "hashicorp/random");

    assert!(resource.dependent_body(&label0("random_string")).is_none());
    // The baseline meta-arguments are untouched.
    assert!(resource.body.attributes.contains_key("count"));
}

#[test]
fn variable_default_makes_input_optional() {
    let mut meta = unit();
    meta.calls.clear();
    let parent = UnitMeta {
        calls: [(
            "app".to_string(),
            tfschema_merge::UnitCall {
                source: "./app".into(),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect(),
        ..UnitMeta::default()
    };
    let reader = reader().with_unit(meta);
    let version = Version::new(1, 5, 0);
    let merged = ModuleSchemaMerger::new(&reader)
        .with_core_schema(SchemaFamily::Core.schema(&version).unwrap(), version)
        .schema_for_unit(&parent)
        .unwrap();

    let key = SchemaKey::new(
        &DependencyKeys::default()
            .with_label(0, "app")
            .with_attribute("source", ExpressionValue::static_string("./app")),
    )
    .unwrap();
    let call = merged.blocks["module"].dependent_body(&key).unwrap();
    let foo = &call.attributes["foo"];
    assert!(foo.is_optional);
    assert!(!foo.is_required);
    assert_eq!(foo.constraint, Constraint::for_type(&Type::String));
    assert!(call.attributes["count"].is_required);
    assert_eq!(call.targetable_as[0].address.to_string(), "module.app");
}

#[test]
fn module_calls_expose_child_targets() {
    let merged = merge_module(&unit(), &Version::new(1, 5, 0));
    let key = SchemaKey::new(
        &DependencyKeys::default()
            .with_label(0, "net")
            .with_attribute("source", ExpressionValue::static_string("./net")),
    )
    .unwrap();
    let net = merged.blocks["module"].dependent_body(&key).unwrap();
    assert!(net.attributes["cidr"].is_required);
    let outputs: Vec<String> = net.targetable_as[0]
        .nested_targetables
        .iter()
        .map(|t| t.address.to_string())
        .collect();
    assert_eq!(outputs, ["module.net.vpc_id"]);
    assert_eq!(net.targets.as_ref().unwrap().range.filename, "main.tf");
}

#[test]
fn remote_state_has_a_body_per_backend() {
    let version = Version::new(1, 3, 0);
    let merged = merge_module(&unit().with_builtin_reference(), &version);
    let data = &merged.blocks["data"];
    for backend in BACKENDS.get(&version).unwrap().keys() {
        let key = SchemaKey::new(
            &DependencyKeys::default()
                .with_label(0, REMOTE_STATE_DATA_SOURCE)
                .with_attribute("backend", ExpressionValue::static_string(backend.clone())),
        )
        .unwrap();
        assert!(data.dependent_body(&key).is_some(), "missing backend {backend}");
    }
}

#[test]
fn zero_references_leave_every_baseline_intact() {
    let reader = MemoryStateReader::new();
    let meta = UnitMeta::default();

    for family in SchemaFamily::ALL {
        let core = family.table().latest();
        let merged = match family {
            SchemaFamily::Core => ModuleSchemaMerger::new(&reader)
                .with_core_schema(core, family.table().newest().clone())
                .schema_for_unit(&meta),
            SchemaFamily::Test => TestSchemaMerger::new(&reader, TestKind::Test)
                .with_core_schema(core)
                .schema_for_test(&meta),
            SchemaFamily::PolicyTest => TestSchemaMerger::new(&reader, TestKind::PolicyTest)
                .with_core_schema(core)
                .schema_for_test(&meta),
            SchemaFamily::Stack => StackSchemaMerger::new(&reader)
                .with_core_schema(core)
                .schema_for_stack(&meta),
            SchemaFamily::Policy => PolicySchemaMerger::new(&reader)
                .with_core_schema(core)
                .schema_for_policy(&meta),
        }
        .unwrap();
        assert_eq!(&merged, core, "{family} baseline changed");
    }
}

#[test]
fn plugin_functions_follow_the_version_gate() {
    let mut plugin = random_plugin();
    plugin.functions.insert(
        "shuffle".into(),
        tfschema_core::FunctionSignature::new("Shuffles a list", Vec::new(), Type::list(Type::String)),
    );
    let reader = MemoryStateReader::new().with_plugin(random_addr(), plugin);

    let before = Version::new(1, 7, 0);
    let core = FUNCTIONS.get(&before).unwrap();
    let merged = FunctionsMerger::new(&reader)
        .with_core_functions(core, before)
        .functions_for_unit(&unit())
        .unwrap();
    assert!(!merged.contains_key("provider::random::shuffle"));

    let core = FUNCTIONS.get(&PLUGIN_FUNCTIONS_SINCE).unwrap();
    let merged = FunctionsMerger::new(&reader)
        .with_core_functions(core, PLUGIN_FUNCTIONS_SINCE)
        .functions_for_unit(&unit())
        .unwrap();
    assert!(merged.contains_key("provider::random::shuffle"));
}

fn core_version() -> impl Strategy<Value = Version> {
    let versions: Vec<Version> = SchemaFamily::Core.table().versions().cloned().collect();
    prop::sample::select(versions)
}

proptest! {
    /// Merging twice yields equal schemas and leaves the shared baseline as it was.
    #[test]
    fn merging_is_idempotent(version in core_version()) {
        let core = SchemaFamily::Core.schema(&version).unwrap();
        let snapshot = core.clone();
        let meta = unit().with_builtin_reference();
        let reader = reader();

        let first = ModuleSchemaMerger::new(&reader)
            .with_core_schema(core, version.clone())
            .schema_for_unit(&meta)
            .unwrap();
        let second = ModuleSchemaMerger::new(&reader)
            .with_core_schema(core, version)
            .schema_for_unit(&meta)
            .unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(core, &snapshot);
    }

    /// Without plugin references the merged schema equals the baseline.
    #[test]
    fn unreferenced_merge_equals_baseline(version in core_version()) {
        let core = SchemaFamily::Core.schema(&version).unwrap();
        let merged = ModuleSchemaMerger::new(&MemoryStateReader::new())
            .with_core_schema(core, version)
            .schema_for_unit(&UnitMeta::default())
            .unwrap();
        prop_assert_eq!(&merged, core);
    }
}
