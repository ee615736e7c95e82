//! Scenario tests for coordination behaviour across crates
//!
//! Each test states one observable property of the system and checks it
//! against configs built from fixtures or through the builder.

use coord_builder::{CoordinationObject, LinkOptions, ViewConfigBuilder};
use coord_space::{
    CoordinationStore, ScopeRef, SetCoordinationValue, ViewConfig, get_meta_scope, merge_coordination,
    multi_scopes_non_null, multi_scopes_secondary_non_null, parameter_scope_by, resolve_values, resolve_view,
    set_coordination_value,
};
use coord_test_utils::fixtures;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Flat coordination
// =============================================================================

#[test]
fn scenario_two_sliders_stay_independent() {
    let config = fixtures::two_sliders();
    let space = &config.coordination_space;
    let v1 = resolve_view(space, config.view("v1").unwrap());
    let v2 = resolve_view(space, config.view("v2").unwrap());

    assert_eq!(resolve_values(space, &v1.scopes, &["value"])["value"], Some(json!(0.5)));

    let request = SetCoordinationValue::new("value", json!(0.9), &v1.scopes);
    let next = set_coordination_value(space, &request).unwrap();

    assert_eq!(resolve_values(&next, &v1.scopes, &["value"])["value"], Some(json!(0.9)));
    assert_eq!(resolve_values(&next, &v2.scopes, &["value"])["value"], Some(json!(0.75)));
}

#[test]
fn scenario_repeated_resolution_is_stable() {
    let config = fixtures::layered_spatial();
    let view = config.view("v1").unwrap();
    let first = resolve_view(&config.coordination_space, view);
    let second = resolve_view(&config.coordination_space, view);
    assert_eq!(first, second);
    assert_eq!(
        config.coordination("v1", &["spatialZoom"]).unwrap(),
        config.coordination("v1", &["spatialZoom"]).unwrap()
    );
}

// =============================================================================
// Meta coordination
// =============================================================================

#[test]
fn scenario_meta_overrides_explicit_scope() {
    let config = fixtures::meta_override();
    let view = config.view("v1").unwrap();
    let effective = resolve_view(&config.coordination_space, view);

    assert_eq!(effective.scopes.get("value"), Some(&ScopeRef::from("B")));
    assert_eq!(
        get_meta_scope(&config.coordination_space, &view.coordination_scopes, "value"),
        Some("M".to_string())
    );
}

#[test]
fn scenario_repointing_meta_moves_every_linked_view() {
    let mut builder = ViewConfigBuilder::new("repoint");
    let views = vec![builder.add_view("slider"), builder.add_view("slider")];
    let input = CoordinationObject::new().with("value", json!(1));
    builder
        .link_views_by_object(&views, &input, LinkOptions::default())
        .unwrap();
    let extra = builder.add_coordination(&["value"]).remove(0);
    builder.set_value(&extra, json!(2)).unwrap();

    // Rewrite the meta entry by hand, as an editor would
    let mut config = builder.into_config();
    config
        .coordination_space
        .insert("metaCoordinationScopes", "A", json!({"value": extra.scope}));

    for view in &views {
        let values = config.coordination(&view.uid, &["value"]).unwrap().values;
        assert_eq!(values["value"], Some(json!(2)), "view {}", view.uid);
    }
}

#[test]
fn scenario_merge_keeps_existing_meta_precedence() {
    let config = fixtures::meta_override();
    let fragment = coord_space::CoordinationSpace::try_from(json!({
        "value": {"init_A": 0.1},
        "metaCoordinationScopes": {"init_M": {"value": "init_A"}}
    }))
    .unwrap();

    let merged = merge_coordination(&config, &fragment, Some("init_"), "v1").unwrap();
    let values = merged.coordination("v1", &["value"]).unwrap().values;
    assert_eq!(values["value"], Some(json!(0.75)));

    // Merging the same fragment twice changes nothing further
    let again = merge_coordination(&merged, &fragment, Some("init_"), "v1").unwrap();
    assert_eq!(again, merged);
}

// =============================================================================
// Multi-level coordination
// =============================================================================

#[test]
fn scenario_missing_by_entry_falls_back_to_view_scope() {
    let mut config = fixtures::layered_spatial();
    // Give v1 a view-level target and a layer without per-channel entries
    config.coordination_space.insert("spatialTargetC", "T9", json!(9));
    config
        .view_mut("v1")
        .unwrap()
        .coordination_scopes
        .insert("spatialTargetC", "T9");

    let effective = resolve_view(&config.coordination_space, config.view("v1").unwrap());
    assert_eq!(
        parameter_scope_by(&effective.scopes, &effective.scopes_by, "spatialImageChannel", "C7", "spatialTargetC"),
        Some(&ScopeRef::from("T9"))
    );
    assert_eq!(
        parameter_scope_by(&effective.scopes, &effective.scopes_by, "spatialImageChannel", "C0", "spatialTargetC"),
        Some(&ScopeRef::from("T0"))
    );
}

#[test]
fn scenario_active_channels_skip_nulls() {
    let mut config = fixtures::layered_spatial();
    config.coordination_space.insert("spatialImageChannel", "C1", serde_json::Value::Null);

    let effective = resolve_view(&config.coordination_space, config.view("v2").unwrap());
    let space = &config.coordination_space;
    assert_eq!(multi_scopes_non_null(space, &effective.scopes, "spatialImageLayer"), vec!["L0", "L1"]);
    assert_eq!(
        multi_scopes_secondary_non_null(
            space,
            &effective.scopes,
            &effective.scopes_by,
            "spatialImageLayer",
            "spatialImageChannel"
        ),
        vec!["C0", "C2"]
    );
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn scenario_store_readers_see_whole_configs() {
    let store = CoordinationStore::new(fixtures::two_sliders());
    let snapshot: Arc<std::sync::Mutex<Vec<ViewConfig>>> = Arc::default();
    let sink = Arc::clone(&snapshot);
    store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

    let before = store.get_state();
    let setters = before.coordination("v2", &["value"]).unwrap().setters;
    store.dispatch(setters["setValue"].action(json!(0.0))).unwrap();

    // The old snapshot is untouched; the notified state is the new one
    assert_eq!(before, fixtures::two_sliders());
    let seen = snapshot.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].coordination_space.value("value", "B"), Some(&json!(0.0)));
    assert_eq!(seen[0], store.get_state());
}
