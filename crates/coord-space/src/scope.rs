//! Per-view scope mappings
//!
//! Views never hold values. They hold pointers (scope names) into the
//! coordination space, either one scope per type or, for fan-out, a list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One scope name or a list of scope names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeRef {
    One(String),
    Many(Vec<String>),
}

impl ScopeRef {
    /// The scope names as a slice-like list; a single name becomes a singleton.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ScopeRef::One(scope) => vec![scope.clone()],
            ScopeRef::Many(scopes) => scopes.clone(),
        }
    }

    /// Iterate over the scope names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            ScopeRef::One(scope) => std::slice::from_ref(scope),
            ScopeRef::Many(scopes) => scopes.as_slice(),
        };
        names.iter().map(String::as_str)
    }

    /// The single scope name, or `None` when this is a list.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ScopeRef::One(scope) => Some(scope),
            ScopeRef::Many(_) => None,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, ScopeRef::Many(_))
    }

    /// Parse from a JSON string or array of strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ScopeRef::One(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(ScopeRef::Many),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ScopeRef::One(scope) => Value::String(scope.clone()),
            ScopeRef::Many(scopes) => {
                Value::Array(scopes.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for ScopeRef {
    fn from(scope: &str) -> Self {
        ScopeRef::One(scope.to_string())
    }
}

impl From<String> for ScopeRef {
    fn from(scope: String) -> Self {
        ScopeRef::One(scope)
    }
}

impl From<Vec<String>> for ScopeRef {
    fn from(scopes: Vec<String>) -> Self {
        ScopeRef::Many(scopes)
    }
}

impl From<Vec<&str>> for ScopeRef {
    fn from(scopes: Vec<&str>) -> Self {
        ScopeRef::Many(scopes.into_iter().map(str::to_string).collect())
    }
}

/// Mapping from coordination type to scope(s): a view's `coordinationScopes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinationScopes(BTreeMap<String, ScopeRef>);

impl CoordinationScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coordination_type: &str) -> Option<&ScopeRef> {
        self.0.get(coordination_type)
    }

    pub fn insert(&mut self, coordination_type: impl Into<String>, scope: impl Into<ScopeRef>) {
        self.0.insert(coordination_type.into(), scope.into());
    }

    pub fn remove(&mut self, coordination_type: &str) -> Option<ScopeRef> {
        self.0.remove(coordination_type)
    }

    pub fn contains(&self, coordination_type: &str) -> bool {
        self.0.contains_key(coordination_type)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScopeRef)> {
        self.0.iter()
    }

    /// Shallow merge: every entry of `other` overwrites the same key here.
    pub fn extend_from(&mut self, other: &CoordinationScopes) {
        for (coordination_type, scope) in other.iter() {
            self.0.insert(coordination_type.clone(), scope.clone());
        }
    }

    /// Parse a meta table entry. Entries whose values are neither a string
    /// nor a list of strings are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut scopes = Self::new();
        for (coordination_type, scope) in map {
            match ScopeRef::from_value(scope) {
                Some(scope) => scopes.insert(coordination_type.clone(), scope),
                None => tracing::debug!(
                    coordination_type = %coordination_type,
                    "Dropping malformed scope reference"
                ),
            }
        }
        Some(scopes)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ScopeRef>> FromIterator<(K, V)> for CoordinationScopes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Primary scope name to secondary scope(s).
pub type ScopesByLeaf = BTreeMap<String, ScopeRef>;

/// Primary type → secondary type → primary scope → secondary scope(s):
/// a view's `coordinationScopesBy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinationScopesBy(BTreeMap<String, BTreeMap<String, ScopesByLeaf>>);

impl CoordinationScopesBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the secondary scope(s) for one instance of the primary type.
    pub fn get(&self, by_type: &str, coordination_type: &str, by_scope: &str) -> Option<&ScopeRef> {
        self.0.get(by_type)?.get(coordination_type)?.get(by_scope)
    }

    /// All primary-scope entries for one (primary, secondary) type pair.
    pub fn leaf(&self, by_type: &str, coordination_type: &str) -> Option<&ScopesByLeaf> {
        self.0.get(by_type)?.get(coordination_type)
    }

    pub fn insert(
        &mut self,
        by_type: impl Into<String>,
        coordination_type: impl Into<String>,
        by_scope: impl Into<String>,
        scope: impl Into<ScopeRef>,
    ) {
        self.0
            .entry(by_type.into())
            .or_default()
            .entry(coordination_type.into())
            .or_default()
            .insert(by_scope.into(), scope.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over every `(by_type, coordination_type, by_scope, scope)` entry.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str, &ScopeRef)> {
        self.0.iter().flat_map(|(by_type, types)| {
            types.iter().flat_map(move |(coordination_type, leaf)| {
                leaf.iter().map(move |(by_scope, scope)| {
                    (
                        by_type.as_str(),
                        coordination_type.as_str(),
                        by_scope.as_str(),
                        scope,
                    )
                })
            })
        })
    }

    /// Three-level merge: each leaf entry of `other` overwrites the same
    /// leaf here, siblings are kept.
    pub fn extend_from(&mut self, other: &CoordinationScopesBy) {
        for (by_type, coordination_type, by_scope, scope) in other.entries() {
            self.insert(by_type, coordination_type, by_scope, scope.clone());
        }
    }

    /// Parse a meta-by table entry, dropping malformed leaves.
    pub fn from_value(value: &Value) -> Option<Self> {
        let by_types = value.as_object()?;
        let mut result = Self::new();
        for (by_type, types) in by_types {
            let Some(types) = types.as_object() else {
                tracing::debug!(by_type = %by_type, "Dropping malformed by-type entry");
                continue;
            };
            for (coordination_type, leaf) in types {
                let Some(leaf) = leaf.as_object() else {
                    continue;
                };
                for (by_scope, scope) in leaf {
                    if let Some(scope) = ScopeRef::from_value(scope) {
                        result.insert(by_type.clone(), coordination_type.clone(), by_scope.clone(), scope);
                    }
                }
            }
        }
        Some(result)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
