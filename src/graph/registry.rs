//! Insertion-ordered registry of declared resources.
//!
//! The table pairs a hash map (identity lookup) with a declaration-order
//! vector, because every consumer that walks the registry (serialization,
//! merging, resolution tie-breaks) must see resources in the order they were
//! declared, never in map enumeration order.

use std::collections::HashMap;

use crate::core::{ResourceId, ResourceSpec};

/// Outcome of inserting a declaration into a [`SpecTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The identity was new and the spec was stored.
    Inserted,
    /// The identity was already present with a structurally equal spec.
    Identical,
    /// The identity was already present with a different spec; the table was
    /// left unchanged. The caller applies its duplicate or merge policy.
    Conflict,
}

/// Declared resource identities and their specs, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecTable {
    specs: HashMap<ResourceId, ResourceSpec>,
    order: Vec<ResourceId>,
}

impl SpecTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, reporting what happened.
    ///
    /// On [`InsertOutcome::Conflict`] the existing spec is kept untouched;
    /// callers that want other behavior follow up with [`replace`].
    ///
    /// [`replace`]: SpecTable::replace
    pub fn insert(&mut self, id: ResourceId, spec: ResourceSpec) -> InsertOutcome {
        match self.specs.get(&id) {
            Some(existing) if *existing == spec => InsertOutcome::Identical,
            Some(_) => InsertOutcome::Conflict,
            None => {
                self.order.push(id.clone());
                self.specs.insert(id, spec);
                InsertOutcome::Inserted
            }
        }
    }

    /// Replace the spec for an identity, keeping its declaration-order slot.
    ///
    /// Returns the previous spec. An absent identity is appended, making this
    /// equivalent to [`insert`] for new ids.
    ///
    /// [`insert`]: SpecTable::insert
    pub fn replace(&mut self, id: &ResourceId, spec: ResourceSpec) -> Option<ResourceSpec> {
        if !self.specs.contains_key(id) {
            self.order.push(id.clone());
        }
        self.specs.insert(id.clone(), spec)
    }

    /// Look up the spec for an identity.
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&ResourceSpec> {
        self.specs.get(id)
    }

    /// Whether the identity has been declared.
    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.specs.contains_key(id)
    }

    /// Number of declared resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Declared identities in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.order.iter()
    }

    /// `(identity, spec)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &ResourceSpec)> {
        self.order.iter().map(|id| (id, &self.specs[id]))
    }
}
