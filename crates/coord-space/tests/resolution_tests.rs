//! Resolution and mutation scenarios over small hand-written configs

use coord_space::{
    Action, CoordinationScopes, CoordinationStore, ScopeRef, SetCoordinationValue, ViewConfig,
    resolve_scopes, resolve_values, resolve_view, set_coordination_value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn two_slider_config() -> ViewConfig {
    serde_json::from_value(json!({
        "version": "1.0.16",
        "name": "sliders",
        "coordinationSpace": {"value": {"A": 0.5, "B": 0.75}},
        "layout": [
            {"uid": "v1", "component": "slider", "coordinationScopes": {"value": "A"}},
            {"uid": "v2", "component": "slider", "coordinationScopes": {"value": "B"}},
        ]
    }))
    .unwrap()
}

mod flat_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_value_only_affects_linked_view() {
        let config = two_slider_config();
        let space = &config.coordination_space;
        let v1 = resolve_view(space, config.view("v1").unwrap());
        let v2 = resolve_view(space, config.view("v2").unwrap());

        assert_eq!(resolve_values(space, &v1.scopes, &["value"])["value"], Some(json!(0.5)));

        let effective: CoordinationScopes = [("value", "A")].into_iter().collect();
        let next = set_coordination_value(
            space,
            &SetCoordinationValue::new("value", json!(0.9), &effective),
        )
        .unwrap();

        assert_eq!(resolve_values(&next, &v1.scopes, &["value"])["value"], Some(json!(0.9)));
        assert_eq!(resolve_values(&next, &v2.scopes, &["value"])["value"], Some(json!(0.75)));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let config = two_slider_config();
        let space = &config.coordination_space;
        let effective = resolve_view(space, config.view("v1").unwrap());

        let first = resolve_values(space, &effective.scopes, &["value", "other"]);
        let second = resolve_values(space, &effective.scopes, &["value", "other"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_view_coordination_setters_round_trip_through_store() {
        let store = CoordinationStore::new(two_slider_config());
        let coordination = store.get_state().coordination("v2", &["value"]).unwrap();
        let setter = &coordination.setters["setValue"];

        store.dispatch(setter.action(json!(0.1))).unwrap();

        let after = store.get_state().coordination("v2", &["value"]).unwrap();
        assert_eq!(after.values["value"], Some(json!(0.1)));
        let v1 = store.get_state().coordination("v1", &["value"]).unwrap();
        assert_eq!(v1.values["value"], Some(json!(0.5)));
    }
}

mod meta_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meta_overrides_explicit_scope() {
        let config: ViewConfig = serde_json::from_value(json!({
            "version": "1.0.16",
            "coordinationSpace": {
                "value": {"A": 0.5, "B": 0.75},
                "metaCoordinationScopes": {"M": {"value": "B"}},
            },
            "layout": [{
                "uid": "v1",
                "component": "slider",
                "coordinationScopes": {"metaCoordinationScopes": "M", "value": "A"},
            }]
        }))
        .unwrap();

        let raw = &config.view("v1").unwrap().coordination_scopes;
        let effective = resolve_scopes(config.coordination_space.meta_scopes_table(), raw);
        assert_eq!(effective.get("value"), Some(&ScopeRef::from("B")));

        let values = config.coordination("v1", &["value"]).unwrap().values;
        assert_eq!(values["value"], Some(json!(0.75)));
    }

    #[test]
    fn test_shared_meta_scope_links_views() {
        let config: ViewConfig = serde_json::from_value(json!({
            "version": "1.0.16",
            "coordinationSpace": {
                "zoom": {"A": 1, "B": 2},
                "metaCoordinationScopes": {"M": {"zoom": "B"}},
            },
            "layout": [
                {"uid": "v1", "component": "plot", "coordinationScopes": {"metaCoordinationScopes": ["M"]}},
                {"uid": "v2", "component": "plot", "coordinationScopes": {"metaCoordinationScopes": ["M"]}},
                {"uid": "v3", "component": "plot", "coordinationScopes": {"zoom": "A"}},
            ]
        }))
        .unwrap();

        let store = CoordinationStore::new(config);
        store
            .dispatch(Action::SetCoordinationValue {
                view_uid: "v1".to_string(),
                coordination_type: "zoom".to_string(),
                value: json!(7),
                by: None,
            })
            .unwrap();

        let state = store.get_state();
        assert_eq!(state.coordination("v2", &["zoom"]).unwrap().values["zoom"], Some(json!(7)));
        assert_eq!(state.coordination("v3", &["zoom"]).unwrap().values["zoom"], Some(json!(1)));
    }

    #[test]
    fn test_unresolvable_meta_reference_degrades() {
        let config: ViewConfig = serde_json::from_value(json!({
            "version": "1.0.16",
            "coordinationSpace": {"zoom": {"A": 1}},
            "layout": [{
                "uid": "v1",
                "component": "plot",
                "coordinationScopes": {"metaCoordinationScopes": ["GONE"], "zoom": "Q"},
            }]
        }))
        .unwrap();

        let values = config.coordination("v1", &["zoom"]).unwrap();
        assert_eq!(values.values["zoom"], None);
        assert!(values.setters.is_empty());
    }
}

mod by_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layered_config() -> ViewConfig {
        serde_json::from_value(json!({
            "version": "1.0.16",
            "coordinationSpace": {
                "layer": {"L0": "__dummy__", "L1": "__dummy__"},
                "opacity": {"A": 1.0, "B": 0.4},
                "metaCoordinationScopes": {"M": {"layer": ["L0", "L1"], "opacity": "A"}},
                "metaCoordinationScopesBy": {"M": {"layer": {"opacity": {"L1": "B"}}}},
            },
            "layout": [{
                "uid": "spatial",
                "component": "spatial",
                "coordinationScopes": {
                    "metaCoordinationScopes": ["M"],
                    "metaCoordinationScopesBy": ["M"],
                },
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_by_type_values_through_meta() {
        let config = layered_config();
        let by = config.coordination_by_type("spatial", "layer", &["opacity"]).unwrap();
        assert_eq!(by.values["L0"]["opacity"], Some(json!(1.0)));
        assert_eq!(by.values["L1"]["opacity"], Some(json!(0.4)));
    }

    #[test]
    fn test_by_type_setter_writes_override_scope() {
        let store = CoordinationStore::new(layered_config());
        let by = store
            .get_state()
            .coordination_by_type("spatial", "layer", &["opacity"])
            .unwrap();

        store
            .dispatch(by.setters["L1"]["setOpacity"].action(json!(0.0)))
            .unwrap();

        let state = store.get_state();
        assert_eq!(state.coordination_space.value("opacity", "B"), Some(&json!(0.0)));
        assert_eq!(state.coordination_space.value("opacity", "A"), Some(&json!(1.0)));
    }

    #[test]
    fn test_set_coordination_value_by_scope_falls_back() {
        let store = CoordinationStore::new(layered_config());
        store
            .dispatch(Action::SetCoordinationValue {
                view_uid: "spatial".to_string(),
                coordination_type: "opacity".to_string(),
                value: json!(0.25),
                by: Some(("layer".to_string(), "L0".to_string())),
            })
            .unwrap();

        assert_eq!(
            store.get_state().coordination_space.value("opacity", "A"),
            Some(&json!(0.25))
        );
    }
}
