//! The view config builder
//!
//! Two ways to populate a config:
//!
//! - Imperative: mint scopes with [`ViewConfigBuilder::add_coordination`],
//!   set their values, then point views (or meta scopes) at them.
//! - Declarative: describe a whole tree of coordination with
//!   [`CoordinationObject`]s and levels, expand it once with
//!   [`ViewConfigBuilder::add_coordination_by_object`], and attach the
//!   resulting [`ScopeTree`] to any number of views.
//!
//! Handles are names only. The builder owns the config; everything is
//! read and written through it.

use crate::error::{Error, Result};
use crate::handle::{CoordinationScope, LinkTarget, MetaCoordination, ViewHandle};
use crate::level::{
    CoordinationObject, InputPath, InputValue, LevelArena, LevelId, LevelNode, ScopeLevel,
    ScopeNode, ScopeTree,
};
use coord_space::{
    CoordinationScopes, CoordinationScopesBy, LEVEL_PLACEHOLDER, META_COORDINATION_SCOPES,
    META_COORDINATION_SCOPES_BY, ScopeNamer, ScopeRef, View, ViewConfig, next_alphabetic_name,
};
use serde_json::Value;
use std::collections::HashSet;

/// Options for [`ViewConfigBuilder::link_views_by_object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Route the links through one shared meta scope pair instead of
    /// writing the mapping into each view.
    pub meta: bool,

    /// Name the scopes minted by this call `prefix0`, `prefix1`, ...
    pub scope_prefix: Option<String>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            meta: true,
            scope_prefix: None,
        }
    }
}

impl LinkOptions {
    pub fn direct() -> Self {
        Self {
            meta: false,
            scope_prefix: None,
        }
    }

    pub fn with_scope_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scope_prefix = Some(prefix.into());
        self
    }
}

/// Builds a [`ViewConfig`] through scope and view handles.
#[derive(Debug, Clone, Default)]
pub struct ViewConfigBuilder {
    config: ViewConfig,
    namer: ScopeNamer,
    levels: LevelArena,
}

impl ViewConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(ViewConfig::new(name))
    }

    /// Continue building on an existing config.
    pub fn from_config(config: ViewConfig) -> Self {
        Self {
            config,
            namer: ScopeNamer::default(),
            levels: LevelArena::default(),
        }
    }

    pub fn from_json(value: Value) -> Result<Self> {
        Ok(Self::from_config(serde_json::from_value(value)?))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(Self::from_config(ViewConfig::from_json_str(content)?))
    }

    /// Use a different strategy for every scope minted from now on.
    pub fn with_namer(mut self, namer: ScopeNamer) -> Self {
        self.namer = namer;
        self
    }

    pub fn namer(&self) -> &ScopeNamer {
        &self.namer
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn to_config(&self) -> ViewConfig {
        self.config.clone()
    }

    pub fn into_config(self) -> ViewConfig {
        self.config
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(self.config.to_json()?)
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Append a view with the next free alphabetic uid.
    pub fn add_view(&mut self, component: impl Into<String>) -> ViewHandle {
        let used: HashSet<String> = self.config.layout.iter().map(|v| v.uid.clone()).collect();
        let uid = next_alphabetic_name(&used);
        self.config.layout.push(View::new(uid.clone(), component));
        ViewHandle { uid }
    }

    pub fn add_view_with_uid(&mut self, uid: impl Into<String>, component: impl Into<String>) -> Result<ViewHandle> {
        let uid = uid.into();
        if self.config.view(&uid).is_some() {
            return Err(Error::DuplicateView { uid });
        }
        self.config.layout.push(View::new(uid.clone(), component));
        Ok(ViewHandle { uid })
    }

    /// Handle for an existing view.
    pub fn view(&self, uid: &str) -> Result<ViewHandle> {
        self.config
            .view(uid)
            .map(|view| ViewHandle {
                uid: view.uid.clone(),
            })
            .ok_or_else(|| Error::UnknownView {
                uid: uid.to_string(),
            })
    }

    fn view_mut(&mut self, uid: &str) -> Result<&mut View> {
        self.config.view_mut(uid).ok_or_else(|| Error::UnknownView {
            uid: uid.to_string(),
        })
    }

    // ---------------------------------------------------------------------
    // Scopes
    // ---------------------------------------------------------------------

    /// Mint one fresh scope per type, each holding `null`.
    pub fn add_coordination(&mut self, types: &[&str]) -> Vec<CoordinationScope> {
        types
            .iter()
            .map(|coordination_type| self.mint_scope(coordination_type, Value::Null))
            .collect()
    }

    fn mint_scope(&mut self, coordination_type: &str, value: Value) -> CoordinationScope {
        let used = self.config.coordination_space.scope_names(coordination_type);
        let scope = self.namer.next_name(&used);
        tracing::debug!(coordination_type = %coordination_type, scope = %scope, "Minted coordination scope");
        self.config
            .coordination_space
            .insert(coordination_type, scope.clone(), value);
        CoordinationScope::new(coordination_type, scope)
    }

    /// Replace the value held by an existing scope.
    pub fn set_value(&mut self, scope: &CoordinationScope, value: Value) -> Result<()> {
        self.config.coordination_space =
            self.config
                .coordination_space
                .with_value(&scope.coordination_type, &scope.scope, value)?;
        Ok(())
    }

    pub fn value(&self, scope: &CoordinationScope) -> Option<&Value> {
        self.config
            .coordination_space
            .value(&scope.coordination_type, &scope.scope)
    }

    /// Allocate one scope in each meta table, both holding `{}`.
    pub fn add_meta_coordination(&mut self) -> MetaCoordination {
        let empty = || Value::Object(serde_json::Map::new());
        let meta_scope = self.mint_scope(META_COORDINATION_SCOPES, empty()).scope;
        let meta_by_scope = self.mint_scope(META_COORDINATION_SCOPES_BY, empty()).scope;
        MetaCoordination {
            meta_scope,
            meta_by_scope,
        }
    }

    // ---------------------------------------------------------------------
    // Linking
    // ---------------------------------------------------------------------

    /// Point a view or meta scope at the given scopes.
    pub fn use_coordination<'a>(&mut self, target: impl Into<LinkTarget>, scopes: impl IntoIterator<Item = &'a CoordinationScope>) -> Result<()> {
        let scopes: Vec<&CoordinationScope> = scopes.into_iter().collect();
        self.with_target_mappings(target.into(), |mapping, _| {
            for scope in scopes {
                mapping.insert(scope.coordination_type.clone(), scope.scope.as_str());
            }
        })
    }

    /// Point a view or meta scope at a generated scope tree.
    pub fn use_coordination_by_object(&mut self, target: impl Into<LinkTarget>, tree: &ScopeTree) -> Result<()> {
        self.with_target_mappings(target.into(), |mapping, mapping_by| {
            tree.apply_to(mapping, mapping_by);
        })
    }

    /// Append a meta scope pair to a view's meta lists.
    ///
    /// Lists grow rather than being overwritten; a meta pair added later
    /// takes precedence over earlier ones during resolution.
    pub fn use_meta_coordination(&mut self, view: &ViewHandle, meta: &MetaCoordination) -> Result<()> {
        let space = &self.config.coordination_space;
        if !space.contains_scope(META_COORDINATION_SCOPES, &meta.meta_scope) {
            return Err(coord_space::Error::scope_not_found(META_COORDINATION_SCOPES, &meta.meta_scope).into());
        }
        if !space.contains_scope(META_COORDINATION_SCOPES_BY, &meta.meta_by_scope) {
            return Err(
                coord_space::Error::scope_not_found(META_COORDINATION_SCOPES_BY, &meta.meta_by_scope).into(),
            );
        }
        let view = self.view_mut(&view.uid)?;
        append_scope(&mut view.coordination_scopes, META_COORDINATION_SCOPES, &meta.meta_scope);
        append_scope(&mut view.coordination_scopes, META_COORDINATION_SCOPES_BY, &meta.meta_by_scope);
        Ok(())
    }

    /// Run `update` against the scope mapping and by-mapping owned by a
    /// target, writing meta entries back into the space afterwards.
    fn with_target_mappings<F>(&mut self, target: LinkTarget, update: F) -> Result<()>
    where
        F: FnOnce(&mut CoordinationScopes, &mut CoordinationScopesBy),
    {
        match target {
            LinkTarget::View(handle) => {
                let view = self.view_mut(&handle.uid)?;
                update(&mut view.coordination_scopes, &mut view.coordination_scopes_by);
                Ok(())
            }
            LinkTarget::Meta(meta) => {
                let mut scopes = self.meta_entry(META_COORDINATION_SCOPES, &meta.meta_scope, CoordinationScopes::from_value)?;
                let mut scopes_by =
                    self.meta_entry(META_COORDINATION_SCOPES_BY, &meta.meta_by_scope, CoordinationScopesBy::from_value)?;
                update(&mut scopes, &mut scopes_by);
                let space = &mut self.config.coordination_space;
                space.insert(META_COORDINATION_SCOPES, meta.meta_scope, scopes.to_value());
                space.insert(META_COORDINATION_SCOPES_BY, meta.meta_by_scope, scopes_by.to_value());
                Ok(())
            }
        }
    }

    fn meta_entry<T>(&self, table: &str, meta_scope: &str, parse: fn(&Value) -> Option<T>) -> Result<T> {
        let value = self
            .config
            .coordination_space
            .value(table, meta_scope)
            .ok_or_else(|| coord_space::Error::scope_not_found(table, meta_scope))?;
        parse(value).ok_or_else(|| {
            coord_space::Error::InvalidScopeMapping {
                key: format!("{table}.{meta_scope}"),
                message: "expected an object of scope mappings".to_string(),
            }
            .into()
        })
    }

    /// Mint one scope per type and point every view at all of them.
    ///
    /// With `values`, the i-th scope starts out holding the i-th value.
    pub fn link_views(
        &mut self,
        views: &[ViewHandle],
        types: &[&str],
        values: Option<Vec<Value>>,
    ) -> Result<Vec<CoordinationScope>> {
        if let Some(values) = &values {
            if values.len() != types.len() {
                return Err(Error::ValueCountMismatch {
                    expected: types.len(),
                    found: values.len(),
                });
            }
        }
        for view in views {
            self.view(&view.uid)?;
        }
        let scopes = self.add_coordination(types);
        if let Some(values) = values {
            for (scope, value) in scopes.iter().zip(values) {
                self.set_value(scope, value)?;
            }
        }
        for view in views {
            self.use_coordination(view, &scopes)?;
        }
        Ok(scopes)
    }

    // ---------------------------------------------------------------------
    // Declarative input
    // ---------------------------------------------------------------------

    /// Register a level whose key gets one scope with `object` beneath it.
    pub fn coordination_level(&mut self, object: CoordinationObject) -> LevelId {
        self.levels.insert(LevelNode::Single(object))
    }

    /// Register a level whose key gets one scope per element of `objects`.
    pub fn coordination_levels(&mut self, objects: Vec<CoordinationObject>) -> LevelId {
        self.levels.insert(LevelNode::Many(objects))
    }

    /// Expand declarative input into scopes.
    ///
    /// Value leaves mint a scope holding the value; scope leaves reuse the
    /// scope; levels mint scopes holding a placeholder and recurse. A level
    /// is expanded the first time it is reached and every later reference
    /// returns the same scopes. On error the builder is left as it was.
    pub fn add_coordination_by_object(&mut self, input: &CoordinationObject) -> Result<ScopeTree> {
        let space = self.config.coordination_space.clone();
        let levels = self.levels.clone();
        let result = self.expand_object(input, &InputPath::default());
        if result.is_err() {
            self.config.coordination_space = space;
            self.levels = levels;
        }
        result
    }

    fn expand_object(&mut self, object: &CoordinationObject, path: &InputPath) -> Result<ScopeTree> {
        let mut tree = ScopeTree::default();
        for (coordination_type, input) in object.iter() {
            let here = path.key(coordination_type);
            if coordination_type == META_COORDINATION_SCOPES || coordination_type == META_COORDINATION_SCOPES_BY {
                return Err(Error::ReservedType {
                    path: here.to_string(),
                    coordination_type: coordination_type.to_string(),
                });
            }
            let level = match input {
                InputValue::Value(value) => ScopeLevel::One(ScopeNode {
                    scope: self.mint_scope(coordination_type, value.clone()),
                    children: ScopeTree::default(),
                }),
                InputValue::Scope(scope) => {
                    self.check_scope(coordination_type, scope, &here)?;
                    ScopeLevel::One(ScopeNode {
                        scope: scope.clone(),
                        children: ScopeTree::default(),
                    })
                }
                InputValue::Level(id) => self.expand_level(*id, coordination_type, &here)?,
            };
            tree.push(coordination_type, level);
        }
        Ok(tree)
    }

    fn expand_level(&mut self, id: LevelId, coordination_type: &str, path: &InputPath) -> Result<ScopeLevel> {
        if let Some((bound_type, cached)) = self.levels.cached(id) {
            if bound_type != coordination_type {
                return Err(Error::ScopeTypeMismatch {
                    path: path.to_string(),
                    expected: coordination_type.to_string(),
                    found: bound_type.to_string(),
                });
            }
            tracing::trace!(coordination_type = %coordination_type, "Reusing expanded coordination level");
            return Ok(cached.clone());
        }

        let node = self
            .levels
            .node(id)
            .cloned()
            .ok_or_else(|| Error::UnknownLevel {
                path: path.to_string(),
            })?;
        if !self.levels.begin(id) {
            return Err(Error::LevelCycle {
                path: path.to_string(),
            });
        }

        let level = match node {
            LevelNode::Single(object) => {
                let scope = self.mint_scope(coordination_type, Value::from(LEVEL_PLACEHOLDER));
                let children = self.expand_object(&object, path)?;
                ScopeLevel::One(ScopeNode { scope, children })
            }
            LevelNode::Many(objects) => {
                let mut nodes = Vec::with_capacity(objects.len());
                for (index, object) in objects.iter().enumerate() {
                    let scope = self.mint_scope(coordination_type, Value::from(LEVEL_PLACEHOLDER));
                    let children = self.expand_object(object, &path.index(index))?;
                    nodes.push(ScopeNode { scope, children });
                }
                ScopeLevel::Many(nodes)
            }
        };
        self.levels.cache(id, coordination_type, level.clone());
        Ok(level)
    }

    fn check_scope(&self, coordination_type: &str, scope: &CoordinationScope, path: &InputPath) -> Result<()> {
        if scope.coordination_type != coordination_type {
            return Err(Error::ScopeTypeMismatch {
                path: path.to_string(),
                expected: coordination_type.to_string(),
                found: scope.coordination_type.clone(),
            });
        }
        if !self
            .config
            .coordination_space
            .contains_scope(&scope.coordination_type, &scope.scope)
        {
            return Err(Error::UnknownScope {
                path: path.to_string(),
                coordination_type: scope.coordination_type.clone(),
                scope: scope.scope.clone(),
            });
        }
        Ok(())
    }

    /// Expand declarative input once and link every view to the result.
    ///
    /// With `scope_prefix`, scopes minted by this call use a prefixed
    /// numeric namer; the previous namer is restored afterwards, including
    /// on error. With `meta`, one meta scope pair carries the mapping and
    /// each view references it; otherwise each view gets the mapping
    /// written directly.
    pub fn link_views_by_object(
        &mut self,
        views: &[ViewHandle],
        input: &CoordinationObject,
        options: LinkOptions,
    ) -> Result<ScopeTree> {
        for view in views {
            self.view(&view.uid)?;
        }

        let previous = match &options.scope_prefix {
            Some(prefix) => Some(std::mem::replace(
                &mut self.namer,
                ScopeNamer::PrefixedNumeric(prefix.clone()),
            )),
            None => None,
        };
        let linked = self.link_tree(views, input, options.meta);
        if let Some(previous) = previous {
            self.namer = previous;
        }
        linked
    }

    fn link_tree(&mut self, views: &[ViewHandle], input: &CoordinationObject, meta: bool) -> Result<ScopeTree> {
        let tree = self.add_coordination_by_object(input)?;
        if meta {
            let handle = self.add_meta_coordination();
            self.use_coordination_by_object(&handle, &tree)?;
            for view in views {
                self.use_meta_coordination(view, &handle)?;
            }
        } else {
            for view in views {
                self.use_coordination_by_object(view, &tree)?;
            }
        }
        Ok(tree)
    }
}

fn append_scope(mapping: &mut CoordinationScopes, coordination_type: &str, scope: &str) {
    let mut scopes = mapping
        .get(coordination_type)
        .map(ScopeRef::to_vec)
        .unwrap_or_default();
    scopes.push(scope.to_string());
    mapping.insert(coordination_type, scopes);
}
