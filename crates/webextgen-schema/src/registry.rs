//! The shared type registry threaded through merging and resolution.
//!
//! The registry owns every named type of a generation run, declared or
//! synthesized, keyed by id. It doubles as the resolver's worklist: every
//! insertion enqueues the new key, and the resolver pops keys until the queue
//! is empty. Names stay reserved while their entry is being resolved, so a
//! type synthesized from inside another type can never take its name.

use crate::error::{SchemaError, SchemaResult};
use crate::model::TypeDef;
use std::collections::{BTreeMap, VecDeque};

/// Where a registered type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOrigin {
    /// Declared by id in a schema document (possibly merged from fragments).
    Declared,
    /// Created by the resolver for an inline object or choice.
    Synthesized,
}

/// A type held by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredType {
    pub def: TypeDef,

    /// Namespace whose declaration file the type is emitted into.
    pub namespace: String,

    pub origin: TypeOrigin,
}

/// Id-keyed store of every named type, plus the pending-resolution queue.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: BTreeMap<String, RegisteredType>,
    pending: VecDeque<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a merged schema type under its id.
    ///
    /// Fails if the id is already taken; an existing entry is never
    /// overwritten.
    pub fn declare(
        &mut self,
        id: impl Into<String>,
        namespace: impl Into<String>,
        mut def: TypeDef,
    ) -> SchemaResult<()> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(SchemaError::DuplicateTypeId { id });
        }

        def.id = Some(id.clone());
        def.extend = None;
        self.entries.insert(
            id.clone(),
            RegisteredType {
                def,
                namespace: namespace.into(),
                origin: TypeOrigin::Declared,
            },
        );
        self.pending.push_back(id);
        Ok(())
    }

    /// Register a synthesized type under the first free variant of `base`.
    ///
    /// Returns the name actually used.
    pub fn synthesize(&mut self, base: &str, namespace: &str, mut def: TypeDef) -> String {
        let name = self.unique_name(base);

        tracing::debug!(name = %name, namespace, "Synthesized type");

        def.id = Some(name.clone());
        def.extend = None;
        self.entries.insert(
            name.clone(),
            RegisteredType {
                def,
                namespace: namespace.to_string(),
                origin: TypeOrigin::Synthesized,
            },
        );
        self.pending.push_back(name.clone());
        name
    }

    /// `base` if free, else `base2`, `base3`, ... whichever is free first.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.entries.contains_key(base) {
            return base.to_string();
        }

        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.entries.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredType> {
        self.entries.get(name)
    }

    /// All entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredType)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Entries owned by one namespace, in id order.
    pub fn types_in<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a RegisteredType)> + 'a {
        self.iter()
            .filter(move |(_, entry)| entry.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries still waiting for member resolution.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn next_pending(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Move an entry's definition out for resolution, keeping its name reserved.
    pub(crate) fn checkout(&mut self, name: &str) -> Option<(TypeDef, String)> {
        self.entries
            .get_mut(name)
            .map(|entry| (std::mem::take(&mut entry.def), entry.namespace.clone()))
    }

    /// Put a definition taken with [`TypeRegistry::checkout`] back.
    pub(crate) fn checkin(&mut self, name: &str, def: TypeDef) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.def = def;
        }
    }
}
