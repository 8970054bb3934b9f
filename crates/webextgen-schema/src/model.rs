//! Schema model for extension API namespace documents.
//!
//! These types mirror the shape of the JSON namespace-schema documents one to
//! one. A document is a list of [`Namespace`] records; the same namespace (or
//! the same type id) may be described by several fragments spread over
//! several documents, which [`crate::merge`] folds back together.
//!
//! # Structure
//!
//! - [`Namespace`]: a dotted API surface (`devtools.panels`)
//! - [`TypeDef`]: a named (or `$extend`-ing) reusable shape
//! - [`Function`] / [`Event`]: callable members and listener signatures
//! - [`Parameter`]: the single recursive unit every shape is built from
//!
//! [`Parameter::shape`] turns the loosely-typed `type` tag plus the presence
//! of structural keys into the closed [`Shape`] sum type that the resolver
//! and the emitters match on exhaustively.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Message used when a schema marks a member `"deprecated": true`.
pub const DEFAULT_DEPRECATION: &str = "Deprecated";

/// A namespace fragment as found in a schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Dotted namespace path.
    #[serde(rename = "namespace")]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Type fragments scoped to this namespace.
    ///
    /// After merging, `None` marks a namespace none of whose fragments
    /// declared any type.
    #[serde(default)]
    pub types: Option<Vec<TypeDef>>,

    /// Namespace-level properties (constants and object accessors).
    #[serde(default)]
    pub properties: BTreeMap<String, Parameter>,

    #[serde(default)]
    pub functions: Vec<Function>,

    #[serde(default)]
    pub events: Vec<Event>,
}

/// A named reusable shape, or an extension fragment of one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(default)]
    pub id: Option<String>,

    /// Id of the type this fragment contributes members to.
    #[serde(rename = "$extend", default)]
    pub extend: Option<String>,

    /// Structural part of the type (`type`, `properties`, `choices`, ...).
    #[serde(flatten)]
    pub shape: Parameter,

    /// Methods callable on instances of the type.
    #[serde(default)]
    pub functions: Vec<Function>,

    #[serde(default)]
    pub events: Vec<Event>,
}

/// A function exposed by a namespace or a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,

    /// Schema artifact; always `function` when present.
    #[serde(rename = "type", default)]
    pub kind: Option<TypeTag>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "async", default, deserialize_with = "deserialize_async")]
    pub async_mode: Option<AsyncMode>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default, deserialize_with = "deserialize_deprecation")]
    pub deprecated: Option<String>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub unsupported: bool,

    /// Synchronous return value.
    #[serde(default)]
    pub returns: Option<Parameter>,
}

/// An event exposed by a namespace or a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: Option<TypeTag>,

    #[serde(default)]
    pub description: Option<String>,

    /// Arguments passed to the listener callback.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default, deserialize_with = "deserialize_deprecation")]
    pub deprecated: Option<String>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub unsupported: bool,
}

/// How an asynchronous function reports completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsyncMode {
    /// `"async": true`; the success value is not described by the schema.
    Unspecified,

    /// `"async": "<name>"`; the named parameter is the success callback.
    Callback(String),
}

/// The closed set of `type` tags a schema may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    Any,
    Null,
}

/// Leaf shapes that carry no nested structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    /// `type: object` with no properties or index signature.
    Object,
    Any,
    Null,
}

/// What a [`Parameter`] denotes, derived from its tag and structural keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// `$ref` to a named type.
    Reference(&'a str),
    Primitive(Primitive),
    Array(Option<&'a Parameter>),
    Function {
        parameters: &'a [Parameter],
        returns: Option<&'a Parameter>,
    },
    /// Union of alternative shapes for one slot.
    Choice(&'a [Parameter]),
    /// Inline object with properties and/or an index signature.
    Object,
}

/// An `enum` entry, either a bare string or a described name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Name(String),
    Described {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl EnumValue {
    /// The literal value, regardless of encoding.
    pub fn name(&self) -> &str {
        match self {
            EnumValue::Name(name) => name,
            EnumValue::Described { name, .. } => name,
        }
    }
}

/// The recursive unit describing parameters, properties, items and shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<TypeTag>,

    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub optional: bool,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub unsupported: bool,

    #[serde(default, deserialize_with = "deserialize_deprecation")]
    pub deprecated: Option<String>,

    #[serde(default)]
    pub properties: Option<BTreeMap<String, Parameter>>,

    #[serde(default)]
    pub choices: Option<Vec<Parameter>>,

    #[serde(default)]
    pub items: Option<Box<Parameter>>,

    /// Arguments of a function-typed parameter.
    #[serde(default)]
    pub parameters: Option<Vec<Parameter>>,

    #[serde(default)]
    pub returns: Option<Box<Parameter>>,

    #[serde(default, deserialize_with = "deserialize_additional_properties")]
    pub additional_properties: Option<Box<Parameter>>,

    #[serde(default)]
    pub pattern_properties: Option<BTreeMap<String, Parameter>>,

    #[serde(rename = "enum", default)]
    pub enumeration: Option<Vec<EnumValue>>,

    /// Constant value of a namespace property.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl Parameter {
    /// A bare parameter of the given type tag.
    pub fn of(kind: TypeTag) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A pure `$ref` to a named type.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// Classify this parameter into a [`Shape`].
    pub fn shape(&self) -> Shape<'_> {
        if let Some(target) = &self.reference {
            return Shape::Reference(target);
        }

        let primitive = match self.kind {
            Some(TypeTag::Function) => {
                return Shape::Function {
                    parameters: self.parameters.as_deref().unwrap_or(&[]),
                    returns: self.returns.as_deref(),
                };
            }
            Some(TypeTag::Array) => return Shape::Array(self.items.as_deref()),
            Some(TypeTag::String) => Primitive::String,
            Some(TypeTag::Integer) => Primitive::Integer,
            Some(TypeTag::Number) => Primitive::Number,
            Some(TypeTag::Boolean) => Primitive::Boolean,
            Some(TypeTag::Object) => Primitive::Object,
            Some(TypeTag::Null) => Primitive::Null,
            Some(TypeTag::Any) | None => Primitive::Any,
        };

        if self.items.is_some() {
            return Shape::Array(self.items.as_deref());
        }
        if let Some(choices) = &self.choices {
            return Shape::Choice(choices);
        }
        if self.has_object_structure() {
            return Shape::Object;
        }

        Shape::Primitive(primitive)
    }

    /// Whether this parameter declares properties or an index signature.
    pub fn has_object_structure(&self) -> bool {
        self.properties.is_some()
            || self.additional_properties.is_some()
            || self.pattern_properties.is_some()
    }

    /// Remove unsupported members at every depth.
    pub fn retain_supported(&mut self) {
        if let Some(properties) = &mut self.properties {
            properties.retain(|_, property| !property.unsupported);
            properties.values_mut().for_each(Parameter::retain_supported);
        }
        if let Some(patterns) = &mut self.pattern_properties {
            patterns.retain(|_, property| !property.unsupported);
            patterns.values_mut().for_each(Parameter::retain_supported);
        }
        if let Some(choices) = &mut self.choices {
            choices.retain(|choice| !choice.unsupported);
            choices.iter_mut().for_each(Parameter::retain_supported);
        }
        if let Some(parameters) = &mut self.parameters {
            retain_supported_parameters(parameters);
        }
        for nested in [&mut self.items, &mut self.returns, &mut self.additional_properties]
            .into_iter()
            .flatten()
        {
            nested.retain_supported();
        }
    }
}

impl TypeDef {
    /// The key this fragment is grouped under: its id, else its extend target.
    pub fn group_key(&self) -> Option<&str> {
        self.id.as_deref().or(self.extend.as_deref())
    }

    pub fn retain_supported(&mut self) {
        self.shape.retain_supported();
        self.functions.retain(|function| !function.unsupported);
        self.functions.iter_mut().for_each(Function::retain_supported);
        self.events.retain(|event| !event.unsupported);
        self.events.iter_mut().for_each(Event::retain_supported);
    }
}

impl Function {
    /// Name of the success-callback parameter, if the function declares one.
    pub fn callback_slot(&self) -> Option<&str> {
        match &self.async_mode {
            Some(AsyncMode::Callback(name)) => Some(name),
            _ => None,
        }
    }

    pub fn retain_supported(&mut self) {
        retain_supported_parameters(&mut self.parameters);
        if let Some(returns) = &mut self.returns {
            returns.retain_supported();
        }
    }
}

impl Event {
    pub fn retain_supported(&mut self) {
        retain_supported_parameters(&mut self.parameters);
    }
}

impl Namespace {
    /// Drop every member flagged `unsupported`, at any depth.
    pub fn retain_supported(&mut self) {
        if let Some(types) = &mut self.types {
            types.iter_mut().for_each(TypeDef::retain_supported);
        }
        self.properties.retain(|_, property| !property.unsupported);
        self.properties
            .values_mut()
            .for_each(Parameter::retain_supported);
        self.functions.retain(|function| !function.unsupported);
        self.functions
            .iter_mut()
            .for_each(Function::retain_supported);
        self.events.retain(|event| !event.unsupported);
        self.events.iter_mut().for_each(Event::retain_supported);
    }

    /// First segment of the dotted namespace path.
    pub fn top_level(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

fn retain_supported_parameters(parameters: &mut Vec<Parameter>) {
    parameters.retain(|parameter| !parameter.unsupported);
    parameters
        .iter_mut()
        .for_each(Parameter::retain_supported);
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Flag(bool),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AdditionalPropertiesRepr {
    Flag(bool),
    Schema(Box<Parameter>),
}

/// `true`/`false`, or a string where anything but `"false"` means set.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        None => false,
        Some(FlagRepr::Flag(flag)) => flag,
        Some(FlagRepr::Text(text)) => text != "false",
    })
}

fn deserialize_deprecation<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        None | Some(FlagRepr::Flag(false)) => None,
        Some(FlagRepr::Flag(true)) => Some(DEFAULT_DEPRECATION.to_string()),
        Some(FlagRepr::Text(message)) => Some(message),
    })
}

fn deserialize_async<'de, D>(deserializer: D) -> Result<Option<AsyncMode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        None | Some(FlagRepr::Flag(false)) => None,
        Some(FlagRepr::Flag(true)) => Some(AsyncMode::Unspecified),
        Some(FlagRepr::Text(slot)) => Some(AsyncMode::Callback(slot)),
    })
}

/// A schema, `true` (open map of anything) or `false` (closed).
fn deserialize_additional_properties<'de, D>(
    deserializer: D,
) -> Result<Option<Box<Parameter>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<AdditionalPropertiesRepr>::deserialize(deserializer)? {
            None | Some(AdditionalPropertiesRepr::Flag(false)) => None,
            Some(AdditionalPropertiesRepr::Flag(true)) => Some(Box::new(Parameter::of(TypeTag::Any))),
            Some(AdditionalPropertiesRepr::Schema(schema)) => Some(schema),
        },
    )
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;
