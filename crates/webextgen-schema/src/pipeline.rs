//! The merge-and-resolve pipeline from raw fragments to a resolved API.

use crate::error::SchemaResult;
use crate::merge::{MergedType, merge_namespaces, merge_types};
use crate::model::{Function, Namespace, TypeDef};
use crate::overload::expand;
use crate::registry::TypeRegistry;
use crate::resolve::{Resolver, resolve_pending};
use std::collections::BTreeSet;

/// A fully merged and resolved API surface, ready for emission.
///
/// Every named type lives in [`ResolvedApi::registry`]; the `types` field of
/// each namespace is emptied once its fragments have been registered.
#[derive(Debug)]
pub struct ResolvedApi {
    pub namespaces: Vec<Namespace>,
    pub registry: TypeRegistry,
}

impl ResolvedApi {
    /// Distinct top-level namespace segments, sorted.
    pub fn top_level_groups(&self) -> Vec<&str> {
        self.namespaces
            .iter()
            .map(Namespace::top_level)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Namespaces belonging to one top-level group, in merge order.
    pub fn namespaces_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Namespace> + 'a {
        self.namespaces
            .iter()
            .filter(move |namespace| namespace.top_level() == group)
    }
}

/// Merge and resolve every fragment of a generation run.
///
/// Unsupported members are pruned first. The run fails as a whole on a
/// dangling extension, a duplicate type id or an empty choice list; nothing
/// partial is returned.
pub fn resolve_api(fragments: Vec<Namespace>) -> SchemaResult<ResolvedApi> {
    let fragment_count = fragments.len();

    let fragments = fragments
        .into_iter()
        .map(|mut fragment| {
            fragment.retain_supported();
            fragment
        })
        .collect();

    let mut namespaces = merge_namespaces(fragments);
    tracing::debug!(
        fragments = fragment_count,
        namespaces = namespaces.len(),
        "Merged namespace fragments"
    );

    let type_fragments: Vec<(String, TypeDef)> = namespaces
        .iter_mut()
        .flat_map(|namespace| {
            let owner = namespace.name.clone();
            namespace
                .types
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(move |def| (owner.clone(), def))
        })
        .collect();

    let mut registry = TypeRegistry::new();
    for MergedType { namespace, def } in merge_types(type_fragments)? {
        let id = def.id.clone().unwrap_or_default();
        registry.declare(id, namespace, def)?;
    }
    let declared = registry.len();

    let namespaces: Vec<Namespace> = namespaces
        .into_iter()
        .map(|namespace| {
            let name = namespace.name.clone();
            Resolver::new(&mut registry, name).resolve_namespace(namespace)
        })
        .collect();

    let processed = resolve_pending(&mut registry);

    validate_overloads(&namespaces, &registry)?;

    tracing::info!(
        namespaces = namespaces.len(),
        declared_types = declared,
        synthesized_types = registry.len() - declared,
        resolved = processed,
        "Resolved API"
    );

    Ok(ResolvedApi {
        namespaces,
        registry,
    })
}

/// Reject functions whose overloads cannot be expanded, before any output.
fn validate_overloads(namespaces: &[Namespace], registry: &TypeRegistry) -> SchemaResult<()> {
    let namespace_functions = namespaces.iter().flat_map(|namespace| namespace.functions.iter());
    let type_functions = registry.iter().flat_map(|(_, entry)| entry.def.functions.iter());

    namespace_functions
        .chain(type_functions)
        .try_for_each(|function: &Function| expand(function).map(drop))
}
