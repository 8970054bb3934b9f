//! Expansion of functions with choice parameters into concrete overloads.
//!
//! Each parameter position contributes its alternatives (the entries of its
//! `choices`, or the parameter itself). The signatures of a function are the
//! Cartesian product of those sets, left to right. The async callback is
//! removed from the positional list first; it becomes the derived
//! [`ReturnType::Deferred`] instead.

use crate::error::{SchemaError, SchemaResult};
use crate::model::{AsyncMode, Function, Parameter, Shape};

/// One concrete signature of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub returns: ReturnType,
    pub deprecated: Option<String>,
}

/// What calling a signature produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    /// Synchronous, no value.
    Void,
    /// Synchronous value described by `returns`.
    Value(Parameter),
    /// A promise; `None` when the schema does not describe the success value.
    Deferred(Option<Parameter>),
}

/// Expand `function` into its concrete signatures.
///
/// A function without parameters yields exactly one signature. An empty
/// `choices` list at any position is an error.
pub fn expand(function: &Function) -> SchemaResult<Vec<Signature>> {
    let callback = function.callback_slot();

    let positions = function
        .parameters
        .iter()
        .filter(|parameter| callback.is_none() || parameter.name.as_deref() != callback)
        .map(|parameter| alternatives(function, parameter))
        .collect::<SchemaResult<Vec<_>>>()?;

    let returns = derive_return_type(function);

    Ok(cartesian_product(&positions)
        .into_iter()
        .map(|parameters| Signature {
            name: function.name.clone(),
            description: function.description.clone(),
            parameters,
            returns: returns.clone(),
            deprecated: function.deprecated.clone(),
        })
        .collect())
}

/// The return type every signature of `function` shares.
pub fn derive_return_type(function: &Function) -> ReturnType {
    match &function.async_mode {
        None => function
            .returns
            .clone()
            .map_or(ReturnType::Void, ReturnType::Value),
        Some(AsyncMode::Unspecified) => ReturnType::Deferred(None),
        Some(AsyncMode::Callback(slot)) => {
            let Some(callback) = function
                .parameters
                .iter()
                .find(|parameter| parameter.name.as_deref() == Some(slot.as_str()))
            else {
                tracing::warn!(
                    function = %function.name,
                    slot = %slot,
                    "Async callback parameter not found; result left unspecified"
                );
                return ReturnType::Deferred(None);
            };

            ReturnType::Deferred(
                callback
                    .parameters
                    .as_ref()
                    .and_then(|arguments| arguments.first())
                    .cloned(),
            )
        }
    }
}

fn alternatives(function: &Function, slot: &Parameter) -> SchemaResult<Vec<Parameter>> {
    let Shape::Choice(choices) = slot.shape() else {
        return Ok(vec![slot.clone()]);
    };

    if choices.is_empty() {
        return Err(SchemaError::EmptyChoices {
            function: function.name.clone(),
            parameter: slot.name.clone().unwrap_or_default(),
        });
    }

    Ok(choices
        .iter()
        .map(|choice| {
            let mut alternative = choice.clone();
            alternative.name = slot.name.clone();
            alternative.optional = slot.optional;
            if alternative.description.is_none() {
                alternative.description = slot.description.clone();
            }
            alternative
        })
        .collect())
}

/// Left-to-right product; the product of no sets is one empty tuple.
fn cartesian_product(positions: &[Vec<Parameter>]) -> Vec<Vec<Parameter>> {
    positions.iter().fold(vec![Vec::new()], |prefixes, options| {
        prefixes
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut tuple = prefix.clone();
                    tuple.push(option.clone());
                    tuple
                })
            })
            .collect()
    })
}

#[cfg(test)]
#[path = "overload/overload_tests.rs"]
mod overload_tests;
