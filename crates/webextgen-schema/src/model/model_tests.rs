#![allow(non_snake_case)]

use super::*;
use serde_json::json;
use test_case::test_case;

fn parameter(value: serde_json::Value) -> Parameter {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Lenient scalar encodings
// ============================================================================

#[test_case(json!(true), true)]
#[test_case(json!(false), false)]
#[test_case(json!("true"), true)]
#[test_case(json!("omit-key-if-missing"), true)]
#[test_case(json!("false"), false)]
fn Parameter___optional_encoding___parses_flag(optional: serde_json::Value, expected: bool) {
    let parsed = parameter(json!({"name": "x", "type": "string", "optional": optional}));

    assert_eq!(parsed.optional, expected);
}

#[test_case(json!(true), Some(DEFAULT_DEPRECATION))]
#[test_case(json!(false), None)]
#[test_case(json!("Use tabs.query instead."), Some("Use tabs.query instead."))]
fn Function___deprecated_encoding___parses_message(
    deprecated: serde_json::Value,
    expected: Option<&str>,
) {
    let function: Function =
        serde_json::from_value(json!({"name": "getSelected", "deprecated": deprecated})).unwrap();

    assert_eq!(function.deprecated.as_deref(), expected);
}

#[test]
fn Function___async_true___is_unspecified() {
    let function: Function = serde_json::from_value(json!({"name": "clear", "async": true})).unwrap();

    assert_eq!(function.async_mode, Some(AsyncMode::Unspecified));
    assert_eq!(function.callback_slot(), None);
}

#[test]
fn Function___async_string___names_callback_slot() {
    let function: Function =
        serde_json::from_value(json!({"name": "get", "async": "callback"})).unwrap();

    assert_eq!(function.callback_slot(), Some("callback"));
}

#[test]
fn Function___async_absent___is_synchronous() {
    let function: Function = serde_json::from_value(json!({"name": "getURL"})).unwrap();

    assert!(function.async_mode.is_none());
}

#[test]
fn Parameter___additional_properties_true___is_open_map_of_any() {
    let parsed = parameter(json!({"type": "object", "additionalProperties": true}));

    assert_eq!(
        parsed.additional_properties.as_deref(),
        Some(&Parameter::of(TypeTag::Any))
    );
}

#[test]
fn Parameter___additional_properties_false___is_absent() {
    let parsed = parameter(json!({"type": "object", "additionalProperties": false}));

    assert!(parsed.additional_properties.is_none());
}

#[test]
fn Parameter___additional_properties_schema___is_kept() {
    let parsed = parameter(json!({"type": "object", "additionalProperties": {"$ref": "Value"}}));

    assert_eq!(
        parsed.additional_properties.as_deref(),
        Some(&Parameter::reference("Value"))
    );
}

#[test]
fn EnumValue___mixed_encodings___expose_names() {
    let parsed = parameter(json!({
        "type": "string",
        "enum": ["normal", {"name": "popup", "description": "A popup window."}]
    }));

    let names: Vec<&str> = parsed
        .enumeration
        .as_ref()
        .unwrap()
        .iter()
        .map(EnumValue::name)
        .collect();

    assert_eq!(names, vec!["normal", "popup"]);
}

#[test]
fn Parameter___unknown_type_tag___fails_to_parse() {
    let result = serde_json::from_value::<Parameter>(json!({"type": "binary"}));

    assert!(result.is_err());
}

#[test]
fn TypeDef___extend_fragment___has_extend_group_key() {
    let fragment: TypeDef = serde_json::from_value(json!({
        "$extend": "WebExtensionManifest",
        "properties": {"sidebar_action": {"type": "object", "optional": true}}
    }))
    .unwrap();

    assert!(fragment.id.is_none());
    assert_eq!(fragment.group_key(), Some("WebExtensionManifest"));
    assert!(fragment.shape.properties.unwrap().contains_key("sidebar_action"));
}

#[test]
fn TypeDef___flattened_shape___reads_structural_keys() {
    let declared: TypeDef = serde_json::from_value(json!({
        "id": "Alarm",
        "type": "object",
        "description": "Details about an alarm.",
        "properties": {"name": {"type": "string"}}
    }))
    .unwrap();

    assert_eq!(declared.group_key(), Some("Alarm"));
    assert_eq!(declared.shape.kind, Some(TypeTag::Object));
    assert_eq!(declared.shape.description.as_deref(), Some("Details about an alarm."));
}

// ============================================================================
// Shape classification
// ============================================================================

#[test_case(json!({"type": "string"}), Primitive::String)]
#[test_case(json!({"type": "integer"}), Primitive::Integer)]
#[test_case(json!({"type": "number"}), Primitive::Number)]
#[test_case(json!({"type": "boolean"}), Primitive::Boolean)]
#[test_case(json!({"type": "object"}), Primitive::Object)]
#[test_case(json!({"type": "null"}), Primitive::Null)]
#[test_case(json!({"type": "any"}), Primitive::Any)]
#[test_case(json!({"description": "untyped"}), Primitive::Any)]
fn Parameter___shape___classifies_primitives(value: serde_json::Value, expected: Primitive) {
    assert_eq!(parameter(value).shape(), Shape::Primitive(expected));
}

#[test]
fn Parameter___shape___reference_wins_over_structure() {
    let parsed = parameter(json!({"$ref": "Tab", "properties": {}}));

    assert_eq!(parsed.shape(), Shape::Reference("Tab"));
}

#[test]
fn Parameter___shape___items_without_tag_is_array() {
    let parsed = parameter(json!({"items": {"type": "string"}}));

    assert!(matches!(parsed.shape(), Shape::Array(Some(_))));
}

#[test]
fn Parameter___shape___function_exposes_nested_parameters() {
    let parsed = parameter(json!({
        "type": "function",
        "parameters": [{"name": "tab", "$ref": "Tab"}]
    }));

    match parsed.shape() {
        Shape::Function { parameters, returns } => {
            assert_eq!(parameters.len(), 1);
            assert!(returns.is_none());
        }
        other => panic!("expected function shape, got {other:?}"),
    }
}

#[test_case(json!({"choices": [{"type": "string"}]}))]
#[test_case(json!({"type": "string", "choices": []}))]
fn Parameter___shape___choices_is_choice(value: serde_json::Value) {
    assert!(matches!(parameter(value).shape(), Shape::Choice(_)));
}

#[test_case(json!({"type": "object", "properties": {}}))]
#[test_case(json!({"type": "object", "additionalProperties": {"type": "string"}}))]
#[test_case(json!({"type": "object", "patternProperties": {"^\\d+$": {"type": "string"}}}))]
fn Parameter___shape___structured_object_is_object(value: serde_json::Value) {
    assert_eq!(parameter(value).shape(), Shape::Object);
}

// ============================================================================
// Unsupported pruning
// ============================================================================

#[test]
fn Namespace___retain_supported___drops_unsupported_members_at_depth() {
    let mut namespace: Namespace = serde_json::from_value(json!({
        "namespace": "tabs",
        "types": [{
            "id": "Tab",
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "openerTabId": {"type": "integer", "unsupported": true}
            }
        }],
        "properties": {"TAB_ID_NONE": {"value": -1}, "LEGACY": {"value": 1, "unsupported": true}},
        "functions": [
            {"name": "query", "parameters": [
                {"name": "queryInfo", "type": "object", "properties": {
                    "active": {"type": "boolean", "optional": true},
                    "hidden": {"type": "boolean", "unsupported": true}
                }},
                {"name": "legacy", "type": "string", "unsupported": true}
            ]},
            {"name": "getSelected", "unsupported": true}
        ],
        "events": [{"name": "onSelectionChanged", "unsupported": true}, {"name": "onCreated"}]
    }))
    .unwrap();

    namespace.retain_supported();

    let tab = &namespace.types.as_ref().unwrap()[0];
    assert!(!tab.shape.properties.as_ref().unwrap().contains_key("openerTabId"));
    assert!(!namespace.properties.contains_key("LEGACY"));
    assert_eq!(namespace.functions.len(), 1);
    assert_eq!(namespace.functions[0].parameters.len(), 1);
    let query_info = namespace.functions[0].parameters[0].properties.as_ref().unwrap();
    assert!(query_info.contains_key("active"));
    assert!(!query_info.contains_key("hidden"));
    assert_eq!(namespace.events.len(), 1);
    assert_eq!(namespace.events[0].name, "onCreated");
}

#[test_case("devtools.panels", "devtools")]
#[test_case("alarms", "alarms")]
fn Namespace___top_level___returns_first_segment(name: &str, expected: &str) {
    let namespace = Namespace {
        name: name.to_string(),
        ..Namespace::default()
    };

    assert_eq!(namespace.top_level(), expected);
}
