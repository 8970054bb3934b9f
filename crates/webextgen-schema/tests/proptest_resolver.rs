//! Property-based tests for resolution and overload expansion
//!
//! Tests that synthesized type names never collide, that expansion yields
//! the product of the choice-set sizes, and that leaves survive resolution
//! untouched.

use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;
use webextgen_schema::{
    Function, Parameter, ResolveMode, Resolver, TypeOrigin, TypeRegistry, TypeTag, expand,
    resolve_api,
};

// Strategy: parameter names drawn from a small pool so collisions are common
fn arb_slot_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("details".to_string()),
        Just("options".to_string()),
        Just("info".to_string()),
        "[a-z]{1,6}",
    ]
}

fn arb_primitive() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        Just(TypeTag::String),
        Just(TypeTag::Integer),
        Just(TypeTag::Number),
        Just(TypeTag::Boolean),
        Just(TypeTag::Any),
    ]
}

fn inline_object(field: &str) -> Parameter {
    serde_json::from_value(json!({
        "type": "object",
        "properties": {field: {"type": "string"}}
    }))
    .unwrap()
}

proptest! {
    /// Property: every synthesized type id is unique, and every site points at its own type
    #[test]
    fn proptest_synthesized_names_are_unique(names in prop::collection::vec(arb_slot_name(), 1..40)) {
        let mut registry = TypeRegistry::new();
        let mut references = Vec::new();
        {
            let mut resolver = Resolver::new(&mut registry, "example");
            for (position, name) in names.iter().enumerate() {
                let resolved = resolver.resolve(name, inline_object(&format!("f{position}")), ResolveMode::NESTED);
                references.push(resolved.reference.unwrap());
            }
        }

        let distinct: BTreeSet<_> = references.iter().collect();
        prop_assert_eq!(distinct.len(), names.len());
        prop_assert_eq!(registry.len(), names.len());
        prop_assert!(registry.iter().all(|(_, entry)| entry.origin == TypeOrigin::Synthesized));
    }

    /// Property: signatures = product of choice-set sizes (async slot excluded)
    #[test]
    fn proptest_expansion_cardinality(sizes in prop::collection::vec(1usize..4, 0..5), with_callback in any::<bool>()) {
        let mut parameters: Vec<serde_json::Value> = sizes
            .iter()
            .enumerate()
            .map(|(position, &size)| {
                if size == 1 {
                    json!({"name": format!("p{position}"), "type": "string"})
                } else {
                    let choices: Vec<_> = (0..size).map(|_| json!({"type": "integer"})).collect();
                    json!({"name": format!("p{position}"), "choices": choices})
                }
            })
            .collect();
        let mut function = json!({"name": "call"});
        if with_callback {
            parameters.push(json!({
                "name": "callback",
                "type": "function",
                "parameters": [{"name": "result", "type": "string"}]
            }));
            function["async"] = json!("callback");
        }
        function["parameters"] = json!(parameters);
        let function: Function = serde_json::from_value(function).unwrap();

        let signatures = expand(&function).unwrap();

        let expected: usize = sizes.iter().product();
        prop_assert_eq!(signatures.len(), expected);
        for signature in &signatures {
            prop_assert_eq!(signature.parameters.len(), sizes.len());
            prop_assert!(signature.parameters.iter().all(|p| p.name.as_deref() != Some("callback")));
        }
    }

    /// Property: resolving a primitive leaf is the identity
    #[test]
    fn proptest_primitive_resolution_is_identity(
        name in arb_slot_name(),
        kind in arb_primitive(),
        optional in any::<bool>(),
        concrete in any::<bool>()
    ) {
        let mut registry = TypeRegistry::new();
        let leaf = Parameter { name: Some(name.clone()), optional, ..Parameter::of(kind) };
        let mode = ResolveMode { concrete, async_slot: false };

        let resolved = Resolver::new(&mut registry, "ns").resolve(&name, leaf.clone(), mode);

        prop_assert_eq!(resolved, leaf);
        prop_assert!(registry.is_empty());
    }

    /// Property: the same function split over N fragments still expands once
    #[test]
    fn proptest_repeated_fragments_merge_to_one_function(copies in 1usize..6) {
        let fragment = json!({
            "namespace": "example",
            "functions": [{"name": "foo", "parameters": [
                {"name": "options", "type": "object", "properties": {"title": {"type": "string"}}}
            ]}]
        });
        let fragments = serde_json::from_value(json!(vec![fragment; copies])).unwrap();

        let api = resolve_api(fragments).unwrap();

        prop_assert_eq!(api.namespaces.len(), 1);
        prop_assert_eq!(api.namespaces[0].functions.len(), 1);
        prop_assert_eq!(api.registry.len(), 1);
    }
}
