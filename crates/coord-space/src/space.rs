//! The coordination space: type → scope → value
//!
//! Each per-type table sits behind an `Arc`, so cloning a space is shallow
//! and a write copies only the table it touches. Untouched tables stay
//! shared between the old and the new space.

use crate::constants::{META_COORDINATION_SCOPES, META_COORDINATION_SCOPES_BY};
use crate::error::{Error, Result};
use crate::scope::{CoordinationScopes, CoordinationScopesBy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Scope name → value for a single coordination type.
pub type ScopeValues = BTreeMap<String, Value>;

/// The full mapping from coordination type to scope to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinationSpace(BTreeMap<String, Arc<ScopeValues>>);

impl CoordinationSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scope table for a coordination type.
    pub fn scopes(&self, coordination_type: &str) -> Option<&ScopeValues> {
        self.0.get(coordination_type).map(Arc::as_ref)
    }

    /// The shared handle to a scope table, for identity comparisons.
    pub fn table(&self, coordination_type: &str) -> Option<&Arc<ScopeValues>> {
        self.0.get(coordination_type)
    }

    /// The value held by one scope, `None` when type or scope is absent.
    pub fn value(&self, coordination_type: &str, scope: &str) -> Option<&Value> {
        self.scopes(coordination_type)?.get(scope)
    }

    pub fn contains_scope(&self, coordination_type: &str, scope: &str) -> bool {
        self.value(coordination_type, scope).is_some()
    }

    /// Names already taken for a type; empty when the type is absent.
    pub fn scope_names(&self, coordination_type: &str) -> HashSet<String> {
        self.scopes(coordination_type)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScopeValues)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or overwrite a cell, creating the type table if needed.
    ///
    /// This is the construction-time primitive; runtime writes go through
    /// [`CoordinationSpace::with_value`], which refuses to mint scopes.
    pub fn insert(&mut self, coordination_type: impl Into<String>, scope: impl Into<String>, value: Value) {
        let table = self.0.entry(coordination_type.into()).or_default();
        Arc::make_mut(table).insert(scope.into(), value);
    }

    /// Replace a whole type table.
    pub fn insert_table(&mut self, coordination_type: impl Into<String>, table: ScopeValues) {
        self.0.insert(coordination_type.into(), Arc::new(table));
    }

    /// Return a new space with one existing cell replaced.
    ///
    /// Only the target type's table is copied; every other table is shared
    /// with `self`.
    pub fn with_value(&self, coordination_type: &str, scope: &str, value: Value) -> Result<Self> {
        if !self.contains_scope(coordination_type, scope) {
            return Err(Error::scope_not_found(coordination_type, scope));
        }
        let mut next = self.clone();
        if let Some(table) = next.0.get_mut(coordination_type) {
            Arc::make_mut(table).insert(scope.to_string(), value);
        }
        Ok(next)
    }

    /// The `metaCoordinationScopes` table, if present.
    pub fn meta_scopes_table(&self) -> Option<&ScopeValues> {
        self.scopes(META_COORDINATION_SCOPES)
    }

    /// The `metaCoordinationScopesBy` table, if present.
    pub fn meta_scopes_by_table(&self) -> Option<&ScopeValues> {
        self.scopes(META_COORDINATION_SCOPES_BY)
    }

    /// Parsed entry of the meta table for one meta scope.
    pub fn meta_scopes(&self, meta_scope: &str) -> Option<CoordinationScopes> {
        self.meta_scopes_table()
            .and_then(|table| table.get(meta_scope))
            .and_then(CoordinationScopes::from_value)
    }

    /// Parsed entry of the meta-by table for one meta scope.
    pub fn meta_scopes_by(&self, meta_scope: &str) -> Option<CoordinationScopesBy> {
        self.meta_scopes_by_table()
            .and_then(|table| table.get(meta_scope))
            .and_then(CoordinationScopesBy::from_value)
    }
}

impl FromIterator<(String, ScopeValues)> for CoordinationSpace {
    fn from_iter<I: IntoIterator<Item = (String, ScopeValues)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, Arc::new(v))).collect())
    }
}

impl TryFrom<Value> for CoordinationSpace {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
