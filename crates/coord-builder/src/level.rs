//! Declarative coordination input and its generated scope tree
//!
//! Declarative input is a tree keyed by coordination type. A leaf is an
//! initial value or an existing scope; an interior node is a coordination
//! level, stored in an arena and referred to by [`LevelId`]. Referring to
//! the same `LevelId` from several places (for example when linking two
//! groups of views against one shared fragment) yields the same generated
//! scopes every time: each level is expanded once and then served from
//! the arena's cache.

use crate::handle::CoordinationScope;
use coord_space::{CoordinationScopes, CoordinationScopesBy, ScopeRef};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a coordination level in a builder's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelId(pub(crate) usize);

/// One entry of declarative input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// Initial value for a freshly minted scope
    Value(Value),
    /// Reuse an existing scope instead of minting one
    Scope(CoordinationScope),
    /// Nested level: one scope per element, each with its own children
    Level(LevelId),
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        InputValue::Value(value)
    }
}

impl From<CoordinationScope> for InputValue {
    fn from(scope: CoordinationScope) -> Self {
        InputValue::Scope(scope)
    }
}

impl From<&CoordinationScope> for InputValue {
    fn from(scope: &CoordinationScope) -> Self {
        InputValue::Scope(scope.clone())
    }
}

impl From<LevelId> for InputValue {
    fn from(level: LevelId) -> Self {
        InputValue::Level(level)
    }
}

/// Declarative input object: coordination type → entry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinationObject {
    entries: Vec<(String, InputValue)>,
}

impl CoordinationObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A repeated type replaces the earlier entry in place.
    pub fn with(mut self, coordination_type: impl Into<String>, value: impl Into<InputValue>) -> Self {
        let coordination_type = coordination_type.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == coordination_type) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((coordination_type, value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LevelNode {
    Single(CoordinationObject),
    Many(Vec<CoordinationObject>),
}

/// Arena of level nodes plus the cache of their expansions.
///
/// Each cached expansion remembers the coordination type it was minted
/// under, which holds even when the level has no elements.
#[derive(Debug, Clone, Default)]
pub(crate) struct LevelArena {
    nodes: Vec<LevelNode>,
    expanded: HashMap<LevelId, (String, ScopeLevel)>,
    expanding: HashSet<LevelId>,
}

impl LevelArena {
    pub(crate) fn insert(&mut self, node: LevelNode) -> LevelId {
        self.nodes.push(node);
        LevelId(self.nodes.len() - 1)
    }

    pub(crate) fn node(&self, id: LevelId) -> Option<&LevelNode> {
        self.nodes.get(id.0)
    }

    /// Cached expansion and the type it is bound to.
    pub(crate) fn cached(&self, id: LevelId) -> Option<(&str, &ScopeLevel)> {
        self.expanded
            .get(&id)
            .map(|(bound, level)| (bound.as_str(), level))
    }

    pub(crate) fn cache(&mut self, id: LevelId, coordination_type: &str, level: ScopeLevel) {
        self.expanding.remove(&id);
        self.expanded.insert(id, (coordination_type.to_string(), level));
    }

    /// Mark a level as being expanded. Returns false if it already is.
    pub(crate) fn begin(&mut self, id: LevelId) -> bool {
        self.expanding.insert(id)
    }
}

/// A generated scope and the scopes generated beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeNode {
    pub scope: CoordinationScope,
    pub children: ScopeTree,
}

/// One generated scope, or one per element of a level array.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeLevel {
    One(ScopeNode),
    Many(Vec<ScopeNode>),
}

impl ScopeLevel {
    pub fn nodes(&self) -> &[ScopeNode] {
        match self {
            ScopeLevel::One(node) => std::slice::from_ref(node),
            ScopeLevel::Many(nodes) => nodes,
        }
    }

    fn scope_ref(&self) -> ScopeRef {
        match self {
            ScopeLevel::One(node) => ScopeRef::One(node.scope.scope.clone()),
            ScopeLevel::Many(nodes) => {
                ScopeRef::Many(nodes.iter().map(|n| n.scope.scope.clone()).collect())
            }
        }
    }
}

/// Mirror of declarative input with every entry replaced by its scope(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeTree(Vec<(String, ScopeLevel)>);

impl ScopeTree {
    pub(crate) fn push(&mut self, coordination_type: impl Into<String>, level: ScopeLevel) {
        self.0.push((coordination_type.into(), level));
    }

    pub fn get(&self, coordination_type: &str) -> Option<&ScopeLevel> {
        self.0
            .iter()
            .find(|(t, _)| t == coordination_type)
            .map(|(_, level)| level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScopeLevel)> {
        self.0.iter().map(|(t, level)| (t.as_str(), level))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write this tree into a scope mapping and by-mapping.
    ///
    /// Top-level entries go to `scopes`; every nested entry goes to
    /// `scopes_by` under its parent's type and scope.
    pub fn apply_to(&self, scopes: &mut CoordinationScopes, scopes_by: &mut CoordinationScopesBy) {
        for (coordination_type, level) in self.iter() {
            apply_level(scopes, scopes_by, None, coordination_type, level);
        }
    }
}

fn apply_level(
    scopes: &mut CoordinationScopes,
    scopes_by: &mut CoordinationScopesBy,
    parent: Option<(&str, &str)>,
    coordination_type: &str,
    level: &ScopeLevel,
) {
    match parent {
        None => scopes.insert(coordination_type, level.scope_ref()),
        Some((parent_type, parent_scope)) => {
            scopes_by.insert(parent_type, coordination_type, parent_scope, level.scope_ref())
        }
    }
    for node in level.nodes() {
        for (child_type, child_level) in node.children.iter() {
            apply_level(
                scopes,
                scopes_by,
                Some((coordination_type, &node.scope.scope)),
                child_type,
                child_level,
            );
        }
    }
}

/// Location inside declarative input, for error reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InputPath(String);

impl InputPath {
    pub(crate) fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }
}

impl fmt::Display for InputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}
