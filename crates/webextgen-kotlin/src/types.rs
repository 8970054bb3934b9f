//! Kotlin type mappings for resolved schema parameters.
//!
//! # Type Mappings
//!
//! | Schema | Kotlin |
//! |--------|--------|
//! | `string` | `String` |
//! | `integer` | `Int` |
//! | `number` | `Double` |
//! | `boolean` | `Boolean` |
//! | `any` / untyped | `Any?` |
//! | `null` | `Nothing?` |
//! | `object` (no structure) | `Any` |
//! | `array` of `T` | `Array<T>` |
//! | `function` | `(a: A) -> R` |
//! | `$ref: ns.Type` | `Type` |
//! | inline object | `Json` |
//! | choices | `Any?` |
//!
//! Inline objects and choices only survive resolution in async results and
//! in unsplit choice alternatives; everywhere else the resolver has already
//! replaced them with references.

use crate::keywords::escape_identifier;
use crate::printer::TypeName;
use serde_json::Value;
use webextgen_schema::naming::simple_name;
use webextgen_schema::{Parameter, Primitive, Shape};

/// Map a parameter's shape to a Kotlin type, ignoring optionality.
pub fn kotlin_type(parameter: &Parameter) -> TypeName {
    match parameter.shape() {
        Shape::Reference(target) => type_reference(target),
        Shape::Primitive(primitive) => primitive_type(primitive),
        Shape::Array(items) => TypeName::generic(
            "Array",
            vec![items.map_or_else(TypeName::any, kotlin_type)],
        ),
        Shape::Function { parameters, returns } => TypeName::Lambda {
            parameters: parameters
                .iter()
                .enumerate()
                .map(|(position, argument)| {
                    let name = argument
                        .name
                        .as_deref()
                        .map_or_else(|| format!("arg{position}"), escape_identifier);
                    (name, field_type(argument))
                })
                .collect(),
            returns: Box::new(returns.map_or_else(TypeName::unit, field_type)),
        },
        Shape::Choice(_) => TypeName::any(),
        Shape::Object => TypeName::simple("Json"),
    }
}

/// Map a parameter to a Kotlin type, nullable when the parameter is optional.
pub fn field_type(parameter: &Parameter) -> TypeName {
    let ty = kotlin_type(parameter);
    if parameter.optional {
        ty.nullable()
    } else {
        ty
    }
}

/// The Kotlin name a registered type id is emitted under.
pub fn type_reference(id: &str) -> TypeName {
    TypeName::simple(escape_identifier(simple_name(id)))
}

pub fn primitive_type(primitive: Primitive) -> TypeName {
    match primitive {
        Primitive::String => TypeName::simple("String"),
        Primitive::Integer => TypeName::simple("Int"),
        Primitive::Number => TypeName::simple("Double"),
        Primitive::Boolean => TypeName::simple("Boolean"),
        Primitive::Object => TypeName::simple("Any"),
        Primitive::Any => TypeName::any(),
        Primitive::Null => TypeName::simple("Nothing").nullable(),
    }
}

/// Type of a namespace constant, inferred from its value when untyped.
pub fn constant_type(parameter: &Parameter) -> TypeName {
    if parameter.kind.is_some() || parameter.reference.is_some() {
        return field_type(parameter);
    }

    match &parameter.value {
        Some(Value::Bool(_)) => TypeName::simple("Boolean"),
        Some(Value::Number(number)) if number.is_i64() || number.is_u64() => TypeName::simple("Int"),
        Some(Value::Number(_)) => TypeName::simple("Double"),
        Some(Value::String(_)) => TypeName::simple("String"),
        Some(Value::Array(_)) => TypeName::generic("Array", vec![TypeName::any()]),
        Some(Value::Object(_)) => TypeName::simple("Json"),
        Some(Value::Null) | None => field_type(parameter),
    }
}
