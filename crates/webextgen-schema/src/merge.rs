//! Folding of namespace and type fragments into canonical definitions.
//!
//! Schema documents describe one namespace, or one type, in several partial
//! fragments. This module combines them:
//!
//! - [`merge_namespaces`] groups fragments by dotted name. Descriptions are
//!   first-wins; properties are unioned; functions and events sharing a name
//!   are merged member-wise so that a function declared by two fragments is
//!   emitted once.
//! - [`merge_types`] groups every type fragment of every namespace by id, or
//!   by `$extend` target for extension fragments, and folds each group left to
//!   right. Scalar fields keep the first value seen; member collections are
//!   unioned.
//!
//! Parameters merged member-wise use last-fragment-wins for scalar fields
//! (so a later fragment may relax `optional`), with recursive union for
//! nested properties.

use crate::error::{SchemaError, SchemaResult};
use crate::model::{Event, Function, Namespace, Parameter, TypeDef};
use std::collections::{BTreeMap, HashMap};
use std::collections::btree_map::Entry;

/// A canonical type produced by [`merge_types`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedType {
    /// Namespace of the first fragment declaring the id.
    pub namespace: String,
    pub def: TypeDef,
}

/// Merge namespace fragments sharing a dotted name, preserving first-seen order.
///
/// A merged namespace whose fragments declared no types carries `types: None`.
pub fn merge_namespaces(fragments: Vec<Namespace>) -> Vec<Namespace> {
    let mut merged: Vec<Namespace> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fragment in fragments {
        match index.get(&fragment.name) {
            Some(&position) => merge_namespace_into(&mut merged[position], fragment),
            None => {
                index.insert(fragment.name.clone(), merged.len());
                let mut first = Namespace {
                    name: fragment.name.clone(),
                    ..Namespace::default()
                };
                merge_namespace_into(&mut first, fragment);
                merged.push(first);
            }
        }
    }

    for namespace in &mut merged {
        if namespace.types.as_ref().is_some_and(Vec::is_empty) {
            namespace.types = None;
        }
    }

    merged
}

fn merge_namespace_into(target: &mut Namespace, fragment: Namespace) {
    let Namespace {
        name: _,
        description,
        types,
        properties,
        functions,
        events,
    } = fragment;

    if target.description.is_none() {
        target.description = description;
    }

    if let Some(types) = types {
        target.types.get_or_insert_with(Vec::new).extend(types);
    }

    union_properties(&mut target.properties, properties);

    for function in functions {
        match target.functions.iter_mut().find(|f| f.name == function.name) {
            Some(existing) => merge_function(existing, function),
            None => target.functions.push(function),
        }
    }

    for event in events {
        match target.events.iter_mut().find(|e| e.name == event.name) {
            Some(existing) => merge_event(existing, event),
            None => target.events.push(event),
        }
    }
}

/// Merge two declarations of the same function.
pub fn merge_function(base: &mut Function, overlay: Function) {
    let Function {
        name: _,
        kind,
        description,
        async_mode,
        parameters,
        deprecated,
        unsupported,
        returns,
    } = overlay;

    base.kind = base.kind.or(kind);
    if base.description.is_none() {
        base.description = description;
    }
    if async_mode.is_some() {
        base.async_mode = async_mode;
    }
    if deprecated.is_some() {
        base.deprecated = deprecated;
    }
    base.unsupported |= unsupported;

    match (base.returns.as_mut(), returns) {
        (Some(existing), Some(incoming)) => merge_parameter(existing, incoming),
        (None, incoming) => base.returns = incoming,
        (Some(_), None) => {}
    }

    merge_parameter_list(&mut base.parameters, parameters);
}

fn merge_event(base: &mut Event, overlay: Event) {
    let Event {
        name: _,
        kind,
        description,
        parameters,
        deprecated,
        unsupported,
    } = overlay;

    base.kind = base.kind.or(kind);
    if base.description.is_none() {
        base.description = description;
    }
    if deprecated.is_some() {
        base.deprecated = deprecated;
    }
    base.unsupported |= unsupported;

    merge_parameter_list(&mut base.parameters, parameters);
}

/// Merge two descriptions of the same parameter slot.
///
/// Scalars present in `overlay` replace those of `base`; `optional` always
/// takes the overlay's value. Properties are unioned recursively, choices
/// concatenated.
pub fn merge_parameter(base: &mut Parameter, overlay: Parameter) {
    let Parameter {
        name,
        kind,
        reference,
        description,
        optional,
        unsupported,
        deprecated,
        properties,
        choices,
        items,
        parameters,
        returns,
        additional_properties,
        pattern_properties,
        enumeration,
        value,
    } = overlay;

    replace_if_some(&mut base.name, name);
    replace_if_some(&mut base.kind, kind);
    replace_if_some(&mut base.reference, reference);
    replace_if_some(&mut base.description, description);
    replace_if_some(&mut base.deprecated, deprecated);
    replace_if_some(&mut base.enumeration, enumeration);
    replace_if_some(&mut base.value, value);
    base.optional = optional;
    base.unsupported |= unsupported;

    union_optional_properties(&mut base.properties, properties);
    union_optional_properties(&mut base.pattern_properties, pattern_properties);

    if let Some(choices) = choices {
        base.choices.get_or_insert_with(Vec::new).extend(choices);
    }

    merge_boxed(&mut base.items, items);
    merge_boxed(&mut base.returns, returns);
    merge_boxed(&mut base.additional_properties, additional_properties);

    if let Some(parameters) = parameters {
        merge_parameter_list(base.parameters.get_or_insert_with(Vec::new), parameters);
    }
}

/// Match parameters by name (unnamed ones by position) and merge them.
fn merge_parameter_list(base: &mut Vec<Parameter>, overlay: Vec<Parameter>) {
    for (position, parameter) in overlay.into_iter().enumerate() {
        let target = match &parameter.name {
            Some(name) => base
                .iter()
                .position(|existing| existing.name.as_deref() == Some(name.as_str())),
            None => base
                .get(position)
                .filter(|existing| existing.name.is_none())
                .map(|_| position),
        };

        match target {
            Some(index) => merge_parameter(&mut base[index], parameter),
            None => base.push(parameter),
        }
    }
}

fn merge_boxed(base: &mut Option<Box<Parameter>>, overlay: Option<Box<Parameter>>) {
    match (base.as_mut(), overlay) {
        (Some(existing), Some(incoming)) => merge_parameter(existing, *incoming),
        (None, Some(incoming)) => *base = Some(incoming),
        (_, None) => {}
    }
}

fn replace_if_some<T>(base: &mut Option<T>, overlay: Option<T>) {
    if overlay.is_some() {
        *base = overlay;
    }
}

fn union_properties(base: &mut BTreeMap<String, Parameter>, overlay: BTreeMap<String, Parameter>) {
    for (key, property) in overlay {
        match base.entry(key) {
            Entry::Occupied(mut existing) => merge_parameter(existing.get_mut(), property),
            Entry::Vacant(slot) => {
                slot.insert(property);
            }
        }
    }
}

fn union_optional_properties(
    base: &mut Option<BTreeMap<String, Parameter>>,
    overlay: Option<BTreeMap<String, Parameter>>,
) {
    if let Some(overlay) = overlay {
        union_properties(base.get_or_insert_with(BTreeMap::new), overlay);
    }
}

/// Merge every type fragment, grouped by id or `$extend` target.
///
/// `fragments` pairs each fragment with the namespace it was declared in.
/// The result preserves the first-seen order of group keys. A group that no
/// fragment declares by id is a dangling extension and aborts the merge.
pub fn merge_types(fragments: Vec<(String, TypeDef)>) -> SchemaResult<Vec<MergedType>> {
    struct Group {
        key: String,
        namespace: Option<String>,
        def: TypeDef,
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (namespace, fragment) in fragments {
        let Some(key) = fragment.group_key().map(str::to_string) else {
            tracing::warn!(namespace = %namespace, "Skipping type fragment without id or $extend");
            continue;
        };

        let position = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                namespace: None,
                def: TypeDef::default(),
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        if fragment.id.is_some() && group.namespace.is_none() {
            group.namespace = Some(namespace);
        }
        fold_type(&mut group.def, fragment);
    }

    groups
        .into_iter()
        .map(|group| {
            let Some(namespace) = group.namespace else {
                return Err(SchemaError::DanglingExtend { target: group.key });
            };

            let mut def = group.def;
            def.id = Some(group.key);
            def.extend = None;
            Ok(MergedType { namespace, def })
        })
        .collect()
}

/// Fold one fragment into the accumulated type.
fn fold_type(base: &mut TypeDef, fragment: TypeDef) {
    let TypeDef {
        id: _,
        extend: _,
        shape,
        functions,
        events,
    } = fragment;

    let Parameter {
        name: _,
        kind,
        reference,
        description,
        optional: _,
        unsupported: _,
        deprecated,
        properties,
        choices,
        items,
        parameters,
        returns,
        additional_properties,
        pattern_properties,
        enumeration,
        value,
    } = shape;

    let target = &mut base.shape;
    target.kind = target.kind.or(kind);
    keep_first(&mut target.reference, reference);
    keep_first(&mut target.description, description);
    keep_first(&mut target.deprecated, deprecated);
    keep_first(&mut target.items, items);
    keep_first(&mut target.additional_properties, additional_properties);
    keep_first(&mut target.enumeration, enumeration);
    keep_first(&mut target.value, value);
    keep_first(&mut target.parameters, parameters);
    keep_first(&mut target.returns, returns);

    union_optional_properties(&mut target.properties, properties);
    union_optional_properties(&mut target.pattern_properties, pattern_properties);
    if let Some(choices) = choices {
        target.choices.get_or_insert_with(Vec::new).extend(choices);
    }

    base.functions.extend(functions);
    base.events.extend(events);
}

fn keep_first<T>(base: &mut Option<T>, candidate: Option<T>) {
    if base.is_none() {
        *base = candidate;
    }
}
