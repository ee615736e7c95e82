//! Value projection from effective mappings
//!
//! Three granularities share one lookup rule: a per-instance by-mapping
//! entry wins, otherwise the view-level scope applies.
//!
//! - flat: one scope per type
//! - L1: one scope per type per scope of a primary type
//! - L2: one scope per type per secondary scope per primary scope

use crate::scope::{CoordinationScopes, CoordinationScopesBy, ScopeRef};
use crate::space::CoordinationSpace;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Resolved values keyed by coordination type; `None` when unresolvable.
pub type CoordinationValues = BTreeMap<String, Option<Value>>;

/// L1 values: primary scope → type → value.
pub type ValuesByScope = BTreeMap<String, CoordinationValues>;

/// L2 values: primary scope → secondary scope → type → value.
pub type ValuesByScopeL2 = BTreeMap<String, BTreeMap<String, CoordinationValues>>;

/// The view-level scope(s) for a type.
pub fn parameter_scope<'a>(effective: &'a CoordinationScopes, coordination_type: &str) -> Option<&'a ScopeRef> {
    effective.get(coordination_type)
}

/// The scope(s) for a type within one instance of `by_type`.
///
/// Falls back to [`parameter_scope`] when the by-mapping has no entry for
/// this `(by_type, by_scope, coordination_type)`.
pub fn parameter_scope_by<'a>(
    effective: &'a CoordinationScopes,
    effective_by: &'a CoordinationScopesBy,
    by_type: &str,
    by_scope: &str,
    coordination_type: &str,
) -> Option<&'a ScopeRef> {
    effective_by
        .get(by_type, coordination_type, by_scope)
        .or_else(|| parameter_scope(effective, coordination_type))
}

/// Read the value(s) a scope reference points at.
///
/// A list becomes an object of scope → value; missing scopes read as null
/// inside that object.
fn read_scope(space: &CoordinationSpace, coordination_type: &str, scope: &ScopeRef) -> Option<Value> {
    let table = space.scopes(coordination_type)?;
    match scope {
        ScopeRef::One(name) => table.get(name).cloned(),
        ScopeRef::Many(names) => {
            let values: Map<String, Value> = names
                .iter()
                .map(|name| (name.clone(), table.get(name).cloned().unwrap_or(Value::Null)))
                .collect();
            Some(Value::Object(values))
        }
    }
}

/// Flat resolution: one value per requested type.
///
/// Types mapped to a list of scopes resolve to `None`; use the L1 or L2
/// resolvers for fan-out.
pub fn resolve_values(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    types: &[&str],
) -> CoordinationValues {
    types
        .iter()
        .map(|coordination_type| {
            let value = match parameter_scope(effective, coordination_type) {
                Some(ScopeRef::One(scope)) => space.value(coordination_type, scope).cloned(),
                Some(ScopeRef::Many(_)) => {
                    tracing::trace!(
                        coordination_type = %coordination_type,
                        "Multi-scope type is unresolvable at flat level"
                    );
                    None
                }
                None => None,
            };
            (coordination_type.to_string(), value)
        })
        .collect()
}

/// L1 resolution: values per scope of `by_type`.
pub fn resolve_values_by_type(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    by_type: &str,
    types: &[&str],
) -> ValuesByScope {
    let by_scopes = parameter_scope(effective, by_type)
        .map(ScopeRef::to_vec)
        .unwrap_or_default();

    by_scopes
        .into_iter()
        .map(|by_scope| {
            let values = types
                .iter()
                .map(|coordination_type| {
                    let value = parameter_scope_by(effective, effective_by, by_type, &by_scope, coordination_type)
                        .and_then(|scope| read_scope(space, coordination_type, scope));
                    (coordination_type.to_string(), value)
                })
                .collect();
            (by_scope, values)
        })
        .collect()
}

/// Secondary scopes per primary scope, in mapping order.
///
/// Without a by-mapping entry for a primary scope, the view-level scopes of
/// `secondary_type` apply to it.
pub(crate) fn secondary_scopes_by_primary(
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    primary_type: &str,
    secondary_type: &str,
) -> Vec<(String, Vec<String>)> {
    let primary_scopes = parameter_scope(effective, primary_type)
        .map(ScopeRef::to_vec)
        .unwrap_or_default();

    primary_scopes
        .into_iter()
        .map(|primary_scope| {
            let secondary = parameter_scope_by(effective, effective_by, primary_type, &primary_scope, secondary_type)
                .map(ScopeRef::to_vec)
                .unwrap_or_default();
            (primary_scope, secondary)
        })
        .collect()
}

/// Order-preserving dedup of the secondary scopes across all primaries.
pub(crate) fn flatten_unique(nested: &[(String, Vec<String>)]) -> Vec<String> {
    let mut seen = HashSet::new();
    nested
        .iter()
        .flat_map(|(_, scopes)| scopes.iter())
        .filter(|scope| seen.insert(scope.as_str()))
        .cloned()
        .collect()
}

/// L2 resolution: values per secondary scope per primary scope.
///
/// All secondary scopes are resolved in one synthetic L1 pass keyed by
/// `secondary_type`, then re-nested under their primary scopes.
pub fn resolve_values_l2(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    primary_type: &str,
    secondary_type: &str,
    types: &[&str],
) -> ValuesByScopeL2 {
    let nested = secondary_scopes_by_primary(effective, effective_by, primary_type, secondary_type);

    let mut flat_scopes = effective.clone();
    flat_scopes.insert(secondary_type, ScopeRef::Many(flatten_unique(&nested)));
    let flat_values = resolve_values_by_type(space, &flat_scopes, effective_by, secondary_type, types);

    nested
        .into_iter()
        .map(|(primary_scope, secondary_scopes)| {
            let inner = secondary_scopes
                .into_iter()
                .filter_map(|scope| flat_values.get(&scope).map(|values| (scope, values.clone())))
                .collect();
            (primary_scope, inner)
        })
        .collect()
}

fn is_active(space: &CoordinationSpace, coordination_type: &str, scope: &str) -> bool {
    space
        .value(coordination_type, scope)
        .is_some_and(|value| !value.is_null())
}

/// Scopes of a fan-out type whose values are present and non-null.
pub fn multi_scopes_non_null(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    coordination_type: &str,
) -> Vec<String> {
    let scopes = parameter_scope(effective, coordination_type)
        .map(ScopeRef::to_vec)
        .unwrap_or_default();
    let mut seen = HashSet::new();
    scopes
        .into_iter()
        .filter(|scope| seen.insert(scope.clone()))
        .filter(|scope| is_active(space, coordination_type, scope))
        .collect()
}

/// Active secondary scopes of `coordination_type` across every scope of
/// `by_type`, deduplicated in mapping order.
pub fn multi_scopes_secondary_non_null(
    space: &CoordinationSpace,
    effective: &CoordinationScopes,
    effective_by: &CoordinationScopesBy,
    by_type: &str,
    coordination_type: &str,
) -> Vec<String> {
    let nested = secondary_scopes_by_primary(effective, effective_by, by_type, coordination_type);
    flatten_unique(&nested)
        .into_iter()
        .filter(|scope| is_active(space, coordination_type, scope))
        .collect()
}
