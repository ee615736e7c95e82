//! Effective scope resolution through meta-coordination
//!
//! A view's raw mapping may name meta scopes. Each named meta scope carries
//! a partial mapping that is merged over the view's own entries, in list
//! order, so later meta scopes win and any meta scope wins over the raw
//! entry for the same type.
//!
//! # Example
//!
//! ```
//! use coord_space::{CoordinationScopes, CoordinationSpace, resolve_scopes};
//! use serde_json::json;
//!
//! let space = CoordinationSpace::try_from(json!({
//!     "value": {"A": 0.5, "B": 0.75},
//!     "metaCoordinationScopes": {"M": {"value": "B"}},
//! }))
//! .unwrap();
//! let raw: CoordinationScopes = [("metaCoordinationScopes", "M"), ("value", "A")]
//!     .into_iter()
//!     .collect();
//!
//! let effective = resolve_scopes(space.meta_scopes_table(), &raw);
//! assert_eq!(effective.get("value").and_then(|s| s.as_single()), Some("B"));
//! assert!(!effective.contains("metaCoordinationScopes"));
//! ```

use crate::constants::{META_COORDINATION_SCOPES, META_COORDINATION_SCOPES_BY};
use crate::scope::{CoordinationScopes, CoordinationScopesBy};
use crate::space::{CoordinationSpace, ScopeValues};
use crate::view::View;

/// Both effective mappings of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveScopes {
    pub scopes: CoordinationScopes,
    pub scopes_by: CoordinationScopesBy,
}

/// Meta scope names listed under `key` in a raw mapping, in order.
fn meta_scope_list(raw: &CoordinationScopes, key: &str) -> Vec<String> {
    raw.get(key).map(|scope| scope.to_vec()).unwrap_or_default()
}

/// Compute a view's effective scope mapping.
///
/// The meta scope key itself is removed from the result so callers cannot
/// re-resolve it. Meta scope names absent from the table are skipped.
pub fn resolve_scopes(meta_table: Option<&ScopeValues>, raw: &CoordinationScopes) -> CoordinationScopes {
    let mut result = raw.clone();
    let meta_scopes = meta_scope_list(raw, META_COORDINATION_SCOPES);

    if let Some(table) = meta_table {
        for meta_scope in &meta_scopes {
            match table.get(meta_scope).and_then(CoordinationScopes::from_value) {
                Some(entry) => result.extend_from(&entry),
                None => tracing::debug!(meta_scope = %meta_scope, "Skipping unknown meta scope"),
            }
        }
    }

    result.remove(META_COORDINATION_SCOPES);
    result
}

/// Compute a view's effective by-mapping.
///
/// The meta-by scope list is read from the effective mapping. Merging
/// happens at the leaf: a meta entry for `(by_type, type, by_scope)`
/// replaces that leaf wholesale, including one set in the raw by-mapping.
pub fn resolve_scopes_by(
    meta_by_table: Option<&ScopeValues>,
    effective: &CoordinationScopes,
    raw_by: &CoordinationScopesBy,
) -> CoordinationScopesBy {
    let mut result = raw_by.clone();
    let meta_scopes = meta_scope_list(effective, META_COORDINATION_SCOPES_BY);

    if let Some(table) = meta_by_table {
        for meta_scope in &meta_scopes {
            match table.get(meta_scope).and_then(CoordinationScopesBy::from_value) {
                Some(entry) => result.extend_from(&entry),
                None => tracing::debug!(meta_scope = %meta_scope, "Skipping unknown meta-by scope"),
            }
        }
    }

    result
}

/// Resolve both mappings of a view against a space.
pub fn resolve_view(space: &CoordinationSpace, view: &View) -> EffectiveScopes {
    let scopes = resolve_scopes(space.meta_scopes_table(), &view.coordination_scopes);
    let scopes_by = resolve_scopes_by(
        space.meta_scopes_by_table(),
        &scopes,
        &view.coordination_scopes_by,
    );
    EffectiveScopes { scopes, scopes_by }
}

/// Find the meta scope that supplies `coordination_type` for a view.
///
/// Returns the last listed meta scope defining the type, which is the one
/// that takes effect during resolution.
pub fn get_meta_scope(
    space: &CoordinationSpace,
    raw: &CoordinationScopes,
    coordination_type: &str,
) -> Option<String> {
    meta_scope_list(raw, META_COORDINATION_SCOPES)
        .into_iter()
        .filter(|meta_scope| {
            space
                .meta_scopes(meta_scope)
                .is_some_and(|entry| entry.contains(coordination_type))
        })
        .last()
}

/// Find the meta-by scope that supplies `coordination_type` per instance
/// of `by_type` for a view.
///
/// With `by_scope`, only entries for that primary scope count. The meta-by
/// list is read from the effective mapping, so a list supplied through a
/// meta scope is honored.
pub fn get_meta_scope_by(
    space: &CoordinationSpace,
    raw: &CoordinationScopes,
    by_type: &str,
    coordination_type: &str,
    by_scope: Option<&str>,
) -> Option<String> {
    let effective = resolve_scopes(space.meta_scopes_table(), raw);
    meta_scope_list(&effective, META_COORDINATION_SCOPES_BY)
        .into_iter()
        .filter(|meta_scope| {
            space.meta_scopes_by(meta_scope).is_some_and(|entry| {
                entry
                    .leaf(by_type, coordination_type)
                    .is_some_and(|leaf| match by_scope {
                        Some(by_scope) => leaf.contains_key(by_scope),
                        None => !leaf.is_empty(),
                    })
            })
        })
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeRef;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn space() -> CoordinationSpace {
        CoordinationSpace::try_from(json!({
            "value": {"A": 0.5, "B": 0.75, "C": 0.1},
            "metaCoordinationScopes": {
                "M1": {"value": "B"},
                "M2": {"value": "C"},
            },
            "metaCoordinationScopesBy": {
                "MB1": {"layer": {"opacity": {"L0": "X"}}},
                "MB2": {"layer": {"opacity": {"L0": "Y", "L1": "Z"}}},
            },
        }))
        .unwrap()
    }

    fn raw(entries: &[(&str, ScopeRef)]) -> CoordinationScopes {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_no_meta_key_returns_raw() {
        let raw = raw(&[("value", "A".into())]);
        assert_eq!(resolve_scopes(space().meta_scopes_table(), &raw), raw);
    }

    #[test]
    fn test_later_meta_scope_wins() {
        let raw = raw(&[(META_COORDINATION_SCOPES, vec!["M1", "M2"].into())]);
        let effective = resolve_scopes(space().meta_scopes_table(), &raw);
        assert_eq!(effective.get("value"), Some(&ScopeRef::from("C")));
        assert!(!effective.contains(META_COORDINATION_SCOPES));
    }

    #[test]
    fn test_unknown_meta_scope_skipped() {
        let raw = raw(&[
            (META_COORDINATION_SCOPES, vec!["M1", "GONE"].into()),
            ("value", "A".into()),
        ]);
        let effective = resolve_scopes(space().meta_scopes_table(), &raw);
        assert_eq!(effective.get("value"), Some(&ScopeRef::from("B")));
    }

    #[test]
    fn test_scopes_by_leaf_merge() {
        let effective = raw(&[(META_COORDINATION_SCOPES_BY, vec!["MB1", "MB2"].into())]);
        let mut raw_by = CoordinationScopesBy::new();
        raw_by.insert("layer", "opacity", "L0", "RAW");
        raw_by.insert("layer", "opacity", "L2", "KEEP");

        let resolved = resolve_scopes_by(space().meta_scopes_by_table(), &effective, &raw_by);
        assert_eq!(resolved.get("layer", "opacity", "L0"), Some(&ScopeRef::from("Y")));
        assert_eq!(resolved.get("layer", "opacity", "L1"), Some(&ScopeRef::from("Z")));
        assert_eq!(resolved.get("layer", "opacity", "L2"), Some(&ScopeRef::from("KEEP")));
    }

    #[test]
    fn test_get_meta_scope_returns_last_definer() {
        let raw = raw(&[(META_COORDINATION_SCOPES, vec!["M1", "M2", "GONE"].into())]);
        assert_eq!(get_meta_scope(&space(), &raw, "value"), Some("M2".to_string()));
        assert_eq!(get_meta_scope(&space(), &raw, "zoom"), None);
    }

    #[test]
    fn test_get_meta_scope_by_with_filter() {
        let raw = raw(&[(META_COORDINATION_SCOPES_BY, vec!["MB2", "MB1"].into())]);
        assert_eq!(
            get_meta_scope_by(&space(), &raw, "layer", "opacity", None),
            Some("MB1".to_string())
        );
        assert_eq!(
            get_meta_scope_by(&space(), &raw, "layer", "opacity", Some("L1")),
            Some("MB2".to_string())
        );
        assert_eq!(
            get_meta_scope_by(&space(), &raw, "layer", "opacity", Some("L9")),
            None
        );
    }

    #[test]
    fn test_get_meta_scope_by_list_from_meta_scope() {
        let space = CoordinationSpace::try_from(json!({
            "metaCoordinationScopes": {"M": {"metaCoordinationScopesBy": ["MB"]}},
            "metaCoordinationScopesBy": {"MB": {"layer": {"opacity": {"L0": "X"}}}},
        }))
        .unwrap();
        let raw = raw(&[(META_COORDINATION_SCOPES, vec!["M"].into())]);

        assert_eq!(
            get_meta_scope_by(&space, &raw, "layer", "opacity", Some("L0")),
            Some("MB".to_string())
        );
    }
}
