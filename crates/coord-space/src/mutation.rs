//! State transitions over the view config
//!
//! Every transition is a pure function from the previous config to a new
//! one. Nothing is edited in place: untouched type tables and views are
//! shared with, or cheaply copied from, the previous state.

use crate::constants::{META_COORDINATION_SCOPES, META_COORDINATION_SCOPES_BY};
use crate::error::{Error, Result};
use crate::scope::{CoordinationScopes, CoordinationScopesBy, ScopeRef};
use crate::space::{CoordinationSpace, ScopeValues};
use crate::values::{parameter_scope, parameter_scope_by};
use crate::view::ViewConfig;
use serde_json::{Map, Value};

/// Per-instance target for a write.
#[derive(Debug, Clone, Copy)]
pub struct ByTarget<'a> {
    pub by_type: &'a str,
    pub by_scope: &'a str,
    pub effective_by: &'a CoordinationScopesBy,
}

/// A single coordination value change, addressed through a view's
/// effective mappings.
#[derive(Debug, Clone)]
pub struct SetCoordinationValue<'a> {
    pub coordination_type: &'a str,
    pub value: Value,
    pub effective: &'a CoordinationScopes,
    pub by: Option<ByTarget<'a>>,
}

impl<'a> SetCoordinationValue<'a> {
    pub fn new(coordination_type: &'a str, value: Value, effective: &'a CoordinationScopes) -> Self {
        Self {
            coordination_type,
            value,
            effective,
            by: None,
        }
    }

    pub fn by(mut self, by_type: &'a str, by_scope: &'a str, effective_by: &'a CoordinationScopesBy) -> Self {
        self.by = Some(ByTarget {
            by_type,
            by_scope,
            effective_by,
        });
        self
    }

    /// The scope a resolver would read this type from.
    pub fn target_scope(&self) -> Result<&'a str> {
        let scope = match self.by {
            Some(by) => parameter_scope_by(
                self.effective,
                by.effective_by,
                by.by_type,
                by.by_scope,
                self.coordination_type,
            ),
            None => parameter_scope(self.effective, self.coordination_type),
        };
        match scope {
            Some(ScopeRef::One(scope)) => Ok(scope),
            Some(ScopeRef::Many(_)) => Err(Error::MultipleScopes {
                coordination_type: self.coordination_type.to_string(),
            }),
            None => Err(Error::Unmapped {
                coordination_type: self.coordination_type.to_string(),
            }),
        }
    }
}

/// Apply one value change, replacing only the targeted cell.
pub fn set_coordination_value(space: &CoordinationSpace, request: &SetCoordinationValue<'_>) -> Result<CoordinationSpace> {
    let scope = request.target_scope()?;
    tracing::debug!(
        coordination_type = %request.coordination_type,
        scope = %scope,
        "Setting coordination value"
    );
    space.with_value(request.coordination_type, scope, request.value.clone())
}

/// Merge `incoming` into `existing`, keeping existing leaves.
///
/// `depth` is how many object levels below the top are merged key by key
/// before existing entries win wholesale.
fn merge_fill(existing: &Value, incoming: &Value, depth: usize) -> Value {
    match (existing, incoming) {
        (Value::Object(existing_map), Value::Object(incoming_map)) if depth > 0 => {
            let mut merged: Map<String, Value> = existing_map.clone();
            for (key, incoming_value) in incoming_map {
                let next = match existing_map.get(key) {
                    Some(existing_value) => merge_fill(existing_value, incoming_value, depth - 1),
                    None => incoming_value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => existing.clone(),
    }
}

fn merge_table(existing: Option<&ScopeValues>, incoming: &ScopeValues, depth: usize) -> ScopeValues {
    let mut merged = existing.cloned().unwrap_or_default();
    for (scope, incoming_value) in incoming {
        let next = match merged.get(scope) {
            Some(existing_value) => merge_fill(existing_value, incoming_value, depth),
            None => incoming_value.clone(),
        };
        merged.insert(scope.clone(), next);
    }
    merged
}

/// Prepend new meta scope names to a view's list, keeping existing ones last.
fn prepend_meta_scopes(scopes: &mut CoordinationScopes, key: &str, new_scopes: Vec<String>) {
    let existing = scopes.get(key).map(ScopeRef::to_vec).unwrap_or_default();
    let mut combined: Vec<String> = new_scopes
        .into_iter()
        .filter(|scope| !existing.contains(scope))
        .collect();
    if combined.is_empty() {
        return;
    }
    combined.extend(existing);
    scopes.insert(key, ScopeRef::Many(combined));
}

fn new_meta_scopes(fragment: &CoordinationSpace, key: &str, scope_prefix: Option<&str>) -> Vec<String> {
    fragment
        .scopes(key)
        .map(|table| {
            table
                .keys()
                .filter(|scope| scope_prefix.is_none_or(|prefix| scope.starts_with(prefix)))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Merge a view-contributed coordination fragment into the config.
///
/// Existing entries always win; the fragment only fills gaps. The meta
/// tables merge one (`metaCoordinationScopes`) and two
/// (`metaCoordinationScopesBy`) levels deeper than ordinary types, so new
/// entries under an existing meta scope keep their siblings. The fragment's
/// meta scopes (those starting with `scope_prefix`, when given) are
/// prepended to the view's meta scope lists, so associations the view
/// already had keep precedence.
pub fn merge_coordination(
    config: &ViewConfig,
    fragment: &CoordinationSpace,
    scope_prefix: Option<&str>,
    view_uid: &str,
) -> Result<ViewConfig> {
    config.require_view(view_uid)?;
    let mut next = config.clone();

    for (coordination_type, incoming) in fragment.iter() {
        let depth = match coordination_type {
            META_COORDINATION_SCOPES => 1,
            META_COORDINATION_SCOPES_BY => 2,
            _ => 0,
        };
        let merged = merge_table(config.coordination_space.scopes(coordination_type), incoming, depth);
        next.coordination_space.insert_table(coordination_type, merged);
    }

    let new_meta = new_meta_scopes(fragment, META_COORDINATION_SCOPES, scope_prefix);
    let new_meta_by = new_meta_scopes(fragment, META_COORDINATION_SCOPES_BY, scope_prefix);
    if let Some(view) = next.view_mut(view_uid) {
        prepend_meta_scopes(&mut view.coordination_scopes, META_COORDINATION_SCOPES, new_meta);
        prepend_meta_scopes(&mut view.coordination_scopes, META_COORDINATION_SCOPES_BY, new_meta_by);
    }

    tracing::debug!(view = %view_uid, types = fragment.iter().count(), "Merged coordination fragment");
    Ok(next)
}

/// A state transition for the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Write a value to an already-resolved scope
    SetValue {
        coordination_type: String,
        scope: String,
        value: Value,
    },
    /// Write a value to whatever scope a view currently resolves for the type
    SetCoordinationValue {
        view_uid: String,
        coordination_type: String,
        value: Value,
        by: Option<(String, String)>,
    },
    /// Merge a coordination fragment contributed by a view
    MergeCoordination {
        fragment: CoordinationSpace,
        scope_prefix: Option<String>,
        view_uid: String,
    },
    /// Swap in a whole new config
    ReplaceConfig(ViewConfig),
}

/// Compute the next config for an action.
pub fn reduce(state: &ViewConfig, action: Action) -> Result<ViewConfig> {
    match action {
        Action::SetValue {
            coordination_type,
            scope,
            value,
        } => {
            let space = state.coordination_space.with_value(&coordination_type, &scope, value)?;
            Ok(ViewConfig {
                coordination_space: space,
                ..state.clone()
            })
        }
        Action::SetCoordinationValue {
            view_uid,
            coordination_type,
            value,
            by,
        } => {
            let view = state.require_view(&view_uid)?;
            let effective = crate::resolve::resolve_view(&state.coordination_space, view);
            let mut request = SetCoordinationValue::new(&coordination_type, value, &effective.scopes);
            if let Some((by_type, by_scope)) = &by {
                request = request.by(by_type, by_scope, &effective.scopes_by);
            }
            let space = set_coordination_value(&state.coordination_space, &request)?;
            Ok(ViewConfig {
                coordination_space: space,
                ..state.clone()
            })
        }
        Action::MergeCoordination {
            fragment,
            scope_prefix,
            view_uid,
        } => merge_coordination(state, &fragment, scope_prefix.as_deref(), &view_uid),
        Action::ReplaceConfig(config) => Ok(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> ViewConfig {
        serde_json::from_value(json!({
            "version": "1.0.16",
            "coordinationSpace": {
                "value": {"A": 0.5, "B": 0.75},
                "metaCoordinationScopes": {"M": {"value": "B"}},
                "metaCoordinationScopesBy": {"MB": {"layer": {"opacity": {"L0": "A"}}}},
            },
            "layout": [
                {"uid": "v1", "component": "slider", "coordinationScopes": {
                    "value": "A",
                    "metaCoordinationScopes": ["M"],
                    "metaCoordinationScopesBy": ["MB"],
                }},
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_target_scope_errors() {
        let effective: CoordinationScopes = [("layer", ScopeRef::from(vec!["L0", "L1"]))].into_iter().collect();
        let multi = SetCoordinationValue::new("layer", json!(1), &effective);
        assert!(matches!(multi.target_scope(), Err(Error::MultipleScopes { .. })));
        let unmapped = SetCoordinationValue::new("zoom", json!(1), &effective);
        assert!(matches!(unmapped.target_scope(), Err(Error::Unmapped { .. })));
    }

    #[test]
    fn test_merge_fill_existing_wins() {
        let existing = json!({"a": {"x": 1}, "b": 2});
        let incoming = json!({"a": {"x": 9, "y": 3}, "c": 4});
        assert_eq!(
            merge_fill(&existing, &incoming, 1),
            json!({"a": {"x": 1}, "b": 2, "c": 4})
        );
        assert_eq!(
            merge_fill(&existing, &incoming, 2),
            json!({"a": {"x": 1, "y": 3}, "b": 2, "c": 4})
        );
    }

    #[test]
    fn test_merge_coordination_fills_gaps_and_prepends_meta() {
        let fragment = CoordinationSpace::try_from(json!({
            "value": {"A": 0.0, "init_v1_0": 0.3},
            "metaCoordinationScopes": {
                "M": {"value": "init_v1_0", "zoom": "init_v1_0"},
                "init_v1_0": {"value": "init_v1_0"},
            },
            "metaCoordinationScopesBy": {
                "MB": {"layer": {"opacity": {"L0": "Z", "L1": "init_v1_0"}}},
            },
        }))
        .unwrap();

        let next = merge_coordination(&config(), &fragment, Some("init_v1_"), "v1").unwrap();
        let space = &next.coordination_space;

        assert_eq!(space.value("value", "A"), Some(&json!(0.5)));
        assert_eq!(space.value("value", "init_v1_0"), Some(&json!(0.3)));
        assert_eq!(
            space.value(META_COORDINATION_SCOPES, "M"),
            Some(&json!({"value": "B", "zoom": "init_v1_0"}))
        );
        assert_eq!(
            space.value(META_COORDINATION_SCOPES_BY, "MB"),
            Some(&json!({"layer": {"opacity": {"L0": "A"}}}))
        );

        let view = next.view("v1").unwrap();
        assert_eq!(
            view.coordination_scopes.get(META_COORDINATION_SCOPES),
            Some(&ScopeRef::from(vec!["init_v1_0", "M"]))
        );
        assert_eq!(
            view.coordination_scopes.get(META_COORDINATION_SCOPES_BY),
            Some(&ScopeRef::from(vec!["MB"]))
        );
    }

    #[test]
    fn test_merge_coordination_unknown_view() {
        let err = merge_coordination(&config(), &CoordinationSpace::new(), None, "nope").unwrap_err();
        assert!(matches!(err, Error::ViewNotFound { .. }));
    }

    #[test]
    fn test_reduce_set_coordination_value_follows_meta() {
        let next = reduce(
            &config(),
            Action::SetCoordinationValue {
                view_uid: "v1".to_string(),
                coordination_type: "value".to_string(),
                value: json!(0.1),
                by: None,
            },
        )
        .unwrap();
        assert_eq!(next.coordination_space.value("value", "B"), Some(&json!(0.1)));
        assert_eq!(next.coordination_space.value("value", "A"), Some(&json!(0.5)));
    }
}
