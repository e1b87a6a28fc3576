//! Property tests: schema keys are independent of condition order.
//!
//! Dependent bodies are looked up by the exact combination of syntactic
//! facts present at a call site, so the key built by a merger and the key
//! built by a lookup must agree no matter how each side enumerated the facts.

use proptest::prelude::*;
use tfschema_core::{Address, DependencyKeys, ExpressionValue, SchemaKey};

#[derive(Debug, Clone)]
enum Condition {
    Label(usize, String),
    Addr(String, Vec<String>),
    Static(String, String),
}

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (0usize..3, "[a-z_]{1,12}").prop_map(|(i, v)| Condition::Label(i, v)),
        ("[a-z]{1,8}", prop::collection::vec("[a-z]{1,6}", 1..3))
            .prop_map(|(n, steps)| Condition::Addr(n, steps)),
        ("[a-z]{1,8}", "[a-z0-9]{0,8}").prop_map(|(n, v)| Condition::Static(n, v)),
    ]
}

fn build(conditions: &[Condition]) -> DependencyKeys {
    conditions
        .iter()
        .fold(DependencyKeys::default(), |keys, c| match c {
            Condition::Label(i, v) => keys.with_label(*i, v.clone()),
            Condition::Addr(name, steps) => {
                let mut addr = Address::root(steps[0].clone());
                for step in &steps[1..] {
                    addr = addr.attr(step.clone());
                }
                keys.with_attribute(name.clone(), ExpressionValue::Address(addr))
            }
            Condition::Static(name, v) => {
                keys.with_attribute(name.clone(), ExpressionValue::static_string(v.clone()))
            }
        })
}

proptest! {
    /// Any permutation of the same conditions yields the same key.
    #[test]
    fn key_is_order_independent(
        conditions in prop::collection::vec(condition(), 0..6),
        seed in any::<u64>(),
    ) {
        let mut shuffled = conditions.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }
        let a = SchemaKey::new(&build(&conditions)).unwrap();
        let b = SchemaKey::new(&build(&shuffled)).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Repeating a condition does not change the key.
    #[test]
    fn key_ignores_duplicates(conditions in prop::collection::vec(condition(), 1..5)) {
        let mut doubled = conditions.clone();
        doubled.extend(conditions.iter().cloned());
        let a = SchemaKey::new(&build(&conditions)).unwrap();
        let b = SchemaKey::new(&build(&doubled)).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Keys are valid JSON.
    #[test]
    fn key_is_json(conditions in prop::collection::vec(condition(), 0..5)) {
        let key = SchemaKey::new(&build(&conditions)).unwrap();
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(key.as_str());
        prop_assert!(parsed.is_ok());
    }
}
