//! End-to-end integration test for the full flow
//!
//! build config -> persist -> reload -> initialize -> resolve -> mutate
//! through the store -> resolve again.

use coord_builder::{ComponentRegistry, CoordinationObject, LinkOptions, ViewConfigBuilder, initialize};
use coord_space::{Action, CoordinationStore, ViewConfig, dangling_references};
use coord_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// A spatial view and a layer controller sharing one layer with two
/// channels, plus an unlinked scatterplot.
fn build_config() -> ViewConfig {
    let mut builder = ViewConfigBuilder::new("end to end");
    let spatial = builder.add_view("spatial");
    let controller = builder.add_view("layerController");
    builder.add_view("scatterplot");

    let channel = |target: i64, color: [u8; 3]| {
        CoordinationObject::new()
            .with("spatialTargetC", json!(target))
            .with("spatialChannelColor", json!(color))
    };
    let channels = builder.coordination_levels(vec![channel(0, [255, 0, 0]), channel(1, [0, 255, 0])]);
    let layers = builder.coordination_levels(vec![
        CoordinationObject::new()
            .with("spatialLayerOpacity", json!(1.0))
            .with("spatialImageChannel", channels),
    ]);
    builder
        .link_views_by_object(
            &[spatial, controller],
            &CoordinationObject::new().with("spatialImageLayer", layers),
            LinkOptions::default().with_scope_prefix("init_"),
        )
        .unwrap();
    builder.into_config()
}

fn registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .with_component("spatial", ["spatialZoom", "spatialImageLayer"])
        .with_component("scatterplot", ["embeddingZoom", "embeddingType"])
        .with_default("spatialZoom", json!(-3))
        .with_default("embeddingType", json!("UMAP"))
}

#[test]
fn test_build_persist_initialize_resolve_mutate() {
    // Build and persist
    let built = build_config();
    assert!(dangling_references(&built).is_empty());
    let ws = TestWorkspace::with_config(&built.to_json().unwrap());

    // Reload and fill in what components need
    let loaded = ws.read_config();
    assert_eq!(loaded, built);
    let config = initialize(&loaded, &registry()).unwrap();

    // The spatial view already reaches its layers through meta coordination,
    // so only its zoom is new.
    let spatial = config.view("A").unwrap();
    assert!(!spatial.coordination_scopes.contains("spatialImageLayer"));
    assert_eq!(
        config.coordination("A", &["spatialZoom"]).unwrap().values["spatialZoom"],
        Some(json!(-3))
    );
    assert_eq!(
        config.coordination("C", &["embeddingType"]).unwrap().values["embeddingType"],
        Some(json!("UMAP"))
    );

    // Per-channel values through both linked views
    for uid in ["A", "B"] {
        let l2 = config
            .coordination_l2(uid, "spatialImageLayer", "spatialImageChannel", &["spatialTargetC"])
            .unwrap();
        assert_eq!(
            l2.values["init_0"]["init_1"]["spatialTargetC"],
            Some(json!(1)),
            "view {uid}"
        );
    }

    // Mutate through a setter obtained from one view; observe in the other
    let store = CoordinationStore::new(config);
    let notified = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&notified);
    store.subscribe(move |_| *counter.lock().unwrap() += 1);

    let setters = store
        .get_state()
        .coordination_l2("B", "spatialImageLayer", "spatialImageChannel", &["spatialTargetC"])
        .unwrap()
        .setters;
    let setter = &setters["init_0"]["init_1"]["setSpatialTargetC"];
    store.dispatch(setter.action(json!(5))).unwrap();

    let after = store
        .get_state()
        .coordination_l2("A", "spatialImageLayer", "spatialImageChannel", &["spatialTargetC"])
        .unwrap();
    assert_eq!(after.values["init_0"]["init_1"]["spatialTargetC"], Some(json!(5)));
    assert_eq!(after.values["init_0"]["init_0"]["spatialTargetC"], Some(json!(0)));
    assert_eq!(*notified.lock().unwrap(), 1);

    // A rejected action leaves everything as it was
    let version = store.version();
    let rejected = store.dispatch(Action::SetValue {
        coordination_type: "spatialTargetC".to_string(),
        scope: "missing".to_string(),
        value: json!(0),
    });
    assert!(rejected.is_err());
    assert_eq!(store.version(), version);
    assert_eq!(*notified.lock().unwrap(), 1);
}
