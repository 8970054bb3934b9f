//! Parameter resolution: naming inline shapes.
//!
//! The resolver walks parameter trees and decides, per node, whether the node
//! can be emitted where it stands (primitives, references, arrays, function
//! types) or must become a named type. Inline objects and unions are moved
//! into the [`TypeRegistry`] under a capitalized name derived from the slot
//! they appear in, and the slot is rewritten to a plain `$ref`.
//!
//! Members of a registered type are not resolved eagerly. Every registration
//! enqueues the new id, and [`resolve_pending`] drains that queue, resolving
//! each entry's members in turn. Resolution therefore terminates once no
//! entry produces further inline shapes.
//!
//! # Modes
//!
//! | Mode | Used for | Effect on `choices` | Registers? |
//! |------|----------|---------------------|------------|
//! | nested | properties, event and callback arguments, returns | synthesizes a choice type | yes |
//! | concrete | function parameters | alternatives resolved one by one | alternatives only |
//! | async slot | the success value of a callback | resolved inline | no |

use crate::model::{Event, Function, Namespace, Parameter, Shape, TypeDef};
use crate::naming::capitalize;
use crate::registry::TypeRegistry;

/// How a parameter site is treated by [`Resolver::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveMode {
    /// The site is a function parameter position the overload expander splits.
    pub concrete: bool,

    /// The site is the success value of an async callback and must not
    /// register anything.
    pub async_slot: bool,
}

impl ResolveMode {
    pub const NESTED: Self = Self {
        concrete: false,
        async_slot: false,
    };

    pub const CONCRETE: Self = Self {
        concrete: true,
        async_slot: false,
    };

    pub const ASYNC_SLOT: Self = Self {
        concrete: false,
        async_slot: true,
    };

    /// Mode for the members of a site resolved in this mode.
    fn nested(self) -> Self {
        Self {
            concrete: false,
            async_slot: self.async_slot,
        }
    }
}

/// Resolves parameter trees on behalf of one namespace.
///
/// Types synthesized through a resolver are owned by its namespace.
pub struct Resolver<'r> {
    registry: &'r mut TypeRegistry,
    namespace: String,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r mut TypeRegistry, namespace: impl Into<String>) -> Self {
        Self {
            registry,
            namespace: namespace.into(),
        }
    }

    /// Resolve one parameter site named `name`.
    ///
    /// Primitives and references come back unchanged.
    pub fn resolve(&mut self, name: &str, parameter: Parameter, mode: ResolveMode) -> Parameter {
        let synthesize = match parameter.shape() {
            Shape::Reference(_) | Shape::Primitive(_) => return parameter,
            Shape::Array(_) | Shape::Function { .. } => false,
            Shape::Choice(_) => !mode.concrete,
            Shape::Object => true,
        };

        if !synthesize {
            return self.resolve_site(name, parameter, mode);
        }

        if mode.async_slot {
            return self.resolve_members(name, parameter, mode);
        }

        let (site, shape) = split_site(parameter);
        let def = TypeDef {
            shape,
            ..TypeDef::default()
        };
        let type_name = self.registry.synthesize(&capitalize(name), &self.namespace, def);

        Parameter {
            reference: Some(type_name),
            ..site
        }
    }

    /// Resolve the members of a merged namespace.
    pub fn resolve_namespace(&mut self, namespace: Namespace) -> Namespace {
        let Namespace {
            name,
            description,
            types,
            properties,
            functions,
            events,
        } = namespace;

        let properties = properties
            .into_iter()
            .map(|(key, property)| {
                let resolved = self.resolve(&key, property, ResolveMode::NESTED);
                (key, resolved)
            })
            .collect();

        Namespace {
            name,
            description,
            types,
            properties,
            functions: functions
                .into_iter()
                .map(|function| self.resolve_function(function))
                .collect(),
            events: events
                .into_iter()
                .map(|event| self.resolve_event(event))
                .collect(),
        }
    }

    /// Resolve a function's parameters, callback slot and return value.
    pub fn resolve_function(&mut self, mut function: Function) -> Function {
        let callback = function.callback_slot().map(str::to_string);
        let function_name = function.name.clone();

        function.parameters = std::mem::take(&mut function.parameters)
            .into_iter()
            .map(|parameter| {
                let name = parameter
                    .name
                    .clone()
                    .unwrap_or_else(|| function_name.clone());
                if callback.as_deref() == Some(name.as_str()) {
                    self.resolve_callback(&function_name, parameter)
                } else {
                    self.resolve(&name, parameter, ResolveMode::CONCRETE)
                }
            })
            .collect();

        function.returns = function.returns.take().map(|returns| {
            self.resolve(&format!("{function_name}Result"), returns, ResolveMode::NESTED)
        });

        function
    }

    pub fn resolve_event(&mut self, mut event: Event) -> Event {
        let event_name = event.name.clone();
        event.parameters = std::mem::take(&mut event.parameters)
            .into_iter()
            .map(|parameter| {
                let name = parameter.name.clone().unwrap_or_else(|| event_name.clone());
                self.resolve(&name, parameter, ResolveMode::NESTED)
            })
            .collect();
        event
    }

    /// Resolve the members of a registered type, never the type itself.
    pub fn resolve_type_def(&mut self, id: &str, def: TypeDef) -> TypeDef {
        let TypeDef {
            id: own_id,
            extend,
            shape,
            functions,
            events,
        } = def;

        TypeDef {
            id: own_id,
            extend,
            shape: self.resolve_members(id, shape, ResolveMode::NESTED),
            functions: functions
                .into_iter()
                .map(|function| self.resolve_function(function))
                .collect(),
            events: events
                .into_iter()
                .map(|event| self.resolve_event(event))
                .collect(),
        }
    }

    /// The async-callback parameter: its first argument is the success value.
    fn resolve_callback(&mut self, function_name: &str, mut callback: Parameter) -> Parameter {
        if let Some(arguments) = callback.parameters.take() {
            let resolved = arguments
                .into_iter()
                .enumerate()
                .map(|(position, argument)| {
                    let name = argument
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("{function_name}Result"));
                    let mode = if position == 0 {
                        ResolveMode::ASYNC_SLOT
                    } else {
                        ResolveMode::NESTED
                    };
                    self.resolve(&name, argument, mode)
                })
                .collect();
            callback.parameters = Some(resolved);
        }
        callback
    }

    /// A site that keeps its own shape: concrete choices, arrays, function types.
    fn resolve_site(&mut self, name: &str, mut parameter: Parameter, mode: ResolveMode) -> Parameter {
        if mode.concrete
            && let Some(choices) = parameter.choices.take()
        {
            parameter.choices = Some(
                choices
                    .into_iter()
                    .map(|choice| {
                        let choice_name = choice.name.clone().unwrap_or_else(|| name.to_string());
                        self.resolve(&choice_name, choice, mode.nested())
                    })
                    .collect(),
            );
            return parameter;
        }

        self.resolve_members(name, parameter, mode)
    }

    /// Resolve every nested slot of `shape`, naming anonymous ones after `owner`.
    fn resolve_members(&mut self, owner: &str, mut shape: Parameter, mode: ResolveMode) -> Parameter {
        let nested = mode.nested();

        if let Some(properties) = shape.properties.take() {
            shape.properties = Some(
                properties
                    .into_iter()
                    .map(|(key, property)| {
                        let resolved = self.resolve(&key, property, nested);
                        (key, resolved)
                    })
                    .collect(),
            );
        }

        if let Some(patterns) = shape.pattern_properties.take() {
            shape.pattern_properties = Some(
                patterns
                    .into_iter()
                    .map(|(pattern, property)| {
                        let resolved = self.resolve(owner, property, nested);
                        (pattern, resolved)
                    })
                    .collect(),
            );
        }

        if let Some(choices) = shape.choices.take() {
            shape.choices = Some(
                choices
                    .into_iter()
                    .map(|choice| self.resolve(owner, choice, nested))
                    .collect(),
            );
        }

        if let Some(parameters) = shape.parameters.take() {
            shape.parameters = Some(
                parameters
                    .into_iter()
                    .map(|parameter| {
                        let name = parameter.name.clone().unwrap_or_else(|| owner.to_string());
                        self.resolve(&name, parameter, nested)
                    })
                    .collect(),
            );
        }

        shape.items = shape
            .items
            .take()
            .map(|items| Box::new(self.resolve(owner, *items, nested)));
        shape.additional_properties = shape
            .additional_properties
            .take()
            .map(|values| Box::new(self.resolve(owner, *values, nested)));
        shape.returns = shape
            .returns
            .take()
            .map(|returns| Box::new(self.resolve(&format!("{owner}Result"), *returns, nested)));

        shape
    }
}

/// Separate a site's identity (name, optionality, docs) from its shape.
fn split_site(parameter: Parameter) -> (Parameter, Parameter) {
    let Parameter {
        name,
        description,
        optional,
        unsupported,
        deprecated,
        ..
    } = &parameter;

    let site = Parameter {
        name: name.clone(),
        description: description.clone(),
        optional: *optional,
        unsupported: *unsupported,
        deprecated: deprecated.clone(),
        ..Parameter::default()
    };

    let shape = Parameter {
        name: None,
        optional: false,
        unsupported: false,
        deprecated: None,
        ..parameter
    };

    (site, shape)
}

/// Resolve the members of every queued registry entry until the queue is empty.
///
/// Returns the number of entries processed.
pub fn resolve_pending(registry: &mut TypeRegistry) -> usize {
    let mut processed = 0;

    while let Some(name) = registry.next_pending() {
        let Some((def, namespace)) = registry.checkout(&name) else {
            continue;
        };

        tracing::trace!(name = %name, namespace = %namespace, "Resolving type members");

        let resolved = Resolver::new(registry, namespace).resolve_type_def(&name, def);
        registry.checkin(&name, resolved);
        processed += 1;
    }

    processed
}
