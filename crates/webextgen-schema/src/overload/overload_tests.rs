#![allow(non_snake_case)]

use super::*;
use crate::model::TypeTag;
use serde_json::json;

fn function(value: serde_json::Value) -> Function {
    serde_json::from_value(value).unwrap()
}

#[test]
fn expand___choice_sizes_2_1_3___yields_six_signatures() {
    let update = function(json!({
        "name": "update",
        "parameters": [
            {"name": "target", "choices": [{"type": "integer"}, {"type": "string"}]},
            {"name": "flag", "type": "boolean"},
            {"name": "value", "choices": [{"type": "integer"}, {"type": "string"}, {"type": "boolean"}]}
        ]
    }));

    let signatures = expand(&update).unwrap();

    assert_eq!(signatures.len(), 6);
    assert!(signatures.iter().all(|s| s.parameters.len() == 3));
    assert_eq!(signatures[0].parameters[0].kind, Some(TypeTag::Integer));
    assert_eq!(signatures[0].parameters[2].kind, Some(TypeTag::Integer));
    assert_eq!(signatures[1].parameters[2].kind, Some(TypeTag::String));
    assert_eq!(signatures[3].parameters[0].kind, Some(TypeTag::String));
}

#[test]
fn expand___no_parameters___yields_one_empty_signature() {
    let clear_all = function(json!({"name": "clearAll", "async": true}));

    let signatures = expand(&clear_all).unwrap();

    assert_eq!(signatures.len(), 1);
    assert!(signatures[0].parameters.is_empty());
    assert_eq!(signatures[0].returns, ReturnType::Deferred(None));
}

#[test]
fn expand___only_callback_parameter___yields_one_empty_signature() {
    let get_all = function(json!({
        "name": "getAll",
        "async": "callback",
        "parameters": [{"name": "callback", "type": "function", "parameters": []}]
    }));

    let signatures = expand(&get_all).unwrap();

    assert_eq!(signatures.len(), 1);
    assert!(signatures[0].parameters.is_empty());
    assert_eq!(signatures[0].returns, ReturnType::Deferred(None));
}

#[test]
fn expand___async_callback___derives_deferred_result_and_drops_slot() {
    let get = function(json!({
        "name": "get",
        "async": "callback",
        "parameters": [
            {"name": "key", "type": "string"},
            {"name": "callback", "type": "function", "parameters": [{"name": "result", "type": "string"}]}
        ]
    }));

    let signatures = expand(&get).unwrap();

    assert_eq!(signatures.len(), 1);
    let names: Vec<_> = signatures[0]
        .parameters
        .iter()
        .map(|p| p.name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["key"]);
    match &signatures[0].returns {
        ReturnType::Deferred(Some(result)) => assert_eq!(result.kind, Some(TypeTag::String)),
        other => panic!("expected deferred string, got {other:?}"),
    }
}

#[test]
fn expand___unknown_callback_slot___is_unspecified_deferred() {
    let get = function(json!({
        "name": "get",
        "async": "responseCallback",
        "parameters": [{"name": "key", "type": "string"}]
    }));

    let signatures = expand(&get).unwrap();

    assert_eq!(signatures[0].parameters.len(), 1);
    assert_eq!(signatures[0].returns, ReturnType::Deferred(None));
}

#[test]
fn expand___sync_function___uses_returns() {
    let get_url = function(json!({
        "name": "getURL",
        "parameters": [{"name": "path", "type": "string"}],
        "returns": {"type": "string"}
    }));

    let signatures = expand(&get_url).unwrap();

    assert_eq!(signatures[0].returns, ReturnType::Value(Parameter::of(TypeTag::String)));
}

#[test]
fn expand___sync_function_without_returns___is_void() {
    let reload = function(json!({"name": "reload"}));

    assert_eq!(expand(&reload).unwrap()[0].returns, ReturnType::Void);
}

#[test]
fn expand___empty_choices___is_an_error() {
    let broken = function(json!({
        "name": "create",
        "parameters": [{"name": "details", "choices": []}]
    }));

    let result = expand(&broken);

    assert!(matches!(
        result,
        Err(SchemaError::EmptyChoices { function, parameter })
            if function == "create" && parameter == "details"
    ));
}

#[test]
fn expand___alternatives___inherit_slot_name_optionality_and_description() {
    let set_icon = function(json!({
        "name": "setIcon",
        "parameters": [{
            "name": "path",
            "optional": true,
            "description": "Icon path.",
            "choices": [{"type": "string"}, {"type": "object", "description": "Size map."}]
        }]
    }));

    let signatures = expand(&set_icon).unwrap();

    let first = &signatures[0].parameters[0];
    let second = &signatures[1].parameters[0];
    assert_eq!(first.name.as_deref(), Some("path"));
    assert!(first.optional && second.optional);
    assert_eq!(first.description.as_deref(), Some("Icon path."));
    assert_eq!(second.description.as_deref(), Some("Size map."));
}

#[test]
fn expand___signatures___share_name_and_deprecation() {
    let get_selected = function(json!({
        "name": "getSelected",
        "deprecated": "Use tabs.query.",
        "parameters": [{"name": "windowId", "choices": [{"type": "integer"}, {"type": "null"}]}]
    }));

    let signatures = expand(&get_selected).unwrap();

    assert_eq!(signatures.len(), 2);
    for signature in &signatures {
        assert_eq!(signature.name, "getSelected");
        assert_eq!(signature.deprecated.as_deref(), Some("Use tabs.query."));
    }
}
