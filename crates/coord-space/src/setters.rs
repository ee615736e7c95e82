//! Setters paired with each resolver
//!
//! A setter targets the exact scope its resolver read from, using the same
//! by-mapping-then-view fallback. Setters are only produced for types that
//! resolve to a single existing scope, so applying one never mints a scope.

use crate::error::Result;
use crate::mutation::Action;
use crate::scope::{CoordinationScopes, CoordinationScopesBy, ScopeRef};
use crate::space::CoordinationSpace;
use crate::values::{parameter_scope, parameter_scope_by, secondary_scopes_by_primary, flatten_unique};
use serde_json::Value;
use std::collections::BTreeMap;

/// Setter name → setter for one resolution site.
pub type Setters = BTreeMap<String, Setter>;

/// A write handle for one `(type, scope)` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setter {
    /// `set` followed by the capitalized coordination type
    pub name: String,
    pub coordination_type: String,
    pub scope: String,
}

impl Setter {
    fn new(coordination_type: &str, scope: &str) -> Self {
        Self {
            name: setter_name(coordination_type),
            coordination_type: coordination_type.to_string(),
            scope: scope.to_string(),
        }
    }

    /// Return a new space with this setter's cell replaced.
    pub fn apply(&self, space: &CoordinationSpace, value: Value) -> Result<CoordinationSpace> {
        space.with_value(&self.coordination_type, &self.scope, value)
    }

    /// The store action equivalent to [`Setter::apply`].
    pub fn action(&self, value: Value) -> Action {
        Action::SetValue {
            coordination_type: self.coordination_type.clone(),
            scope: self.scope.clone(),
            value,
        }
    }
}

/// `spatialZoom` → `setSpatialZoom`
pub fn setter_name(coordination_type: &str) -> String {
    let mut chars = coordination_type.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

fn setter_for(space: &CoordinationSpace, coordination_type: &str, scope: Option<&ScopeRef>) -> Option<Setter> {
    let scope = scope?.as_single()?;
    if !space.contains_scope(coordination_type, scope) {
        tracing::trace!(coordination_type = %coordination_type, scope = %scope, "No setter for absent scope");
        return None;
    }
    Some(Setter::new(coordination_type, scope))
}

/// Setters mirroring [`crate::resolve_values`].
pub fn setters(space: &CoordinationSpace, effective: &CoordinationScopes, types: &[&str]) -> Setters {
    types
        .iter()
        .filter_map(|t| setter_for(space, t, parameter_scope(effective, t)))
        .map(|setter| (setter.name.clone(), setter))
        .collect()
}

/// Setters mirroring [`crate::resolve_values_by_type`].
pub fn setters_by_type(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    by_type: &str,
    types: &[&str],
) -> BTreeMap<String, Setters> {
    let by_scopes = parameter_scope(effective, by_type)
        .map(ScopeRef::to_vec)
        .unwrap_or_default();

    by_scopes
        .into_iter()
        .map(|by_scope| {
            let setters = types
                .iter()
                .filter_map(|t| {
                    setter_for(space, t, parameter_scope_by(effective, effective_by, by_type, &by_scope, t))
                })
                .map(|setter| (setter.name.clone(), setter))
                .collect();
            (by_scope, setters)
        })
        .collect()
}

/// Setters mirroring [`crate::resolve_values_l2`].
pub fn setters_l2(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    primary_type: &str,
    secondary_type: &str,
    types: &[&str],
) -> BTreeMap<String, BTreeMap<String, Setters>> {
    let nested = secondary_scopes_by_primary(effective, effective_by, primary_type, secondary_type);

    let mut flat_scopes = effective.clone();
    flat_scopes.insert(secondary_type, ScopeRef::Many(flatten_unique(&nested)));
    let flat = setters_by_type(space, &flat_scopes, effective_by, secondary_type, types);

    nested
        .into_iter()
        .map(|(primary_scope, secondary_scopes)| {
            let inner = secondary_scopes
                .into_iter()
                .filter_map(|scope| flat.get(&scope).map(|s| (scope, s.clone())))
                .collect();
            (primary_scope, inner)
        })
        .collect()
}
