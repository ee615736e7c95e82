//! Sample view configs.
//!
//! Each fixture comes as raw JSON (`*_json`) and as a parsed
//! [`ViewConfig`]. The JSON form is what a config file on disk looks like.

use coord_space::ViewConfig;
use serde_json::{Value, json};

/// Two sliders on separate scopes of one type.
///
/// `v1` reads `value/A` (0.5); `v2` reads `value/B` (0.75).
pub fn two_sliders_json() -> Value {
    json!({
        "version": "1.0.16",
        "name": "two sliders",
        "coordinationSpace": {
            "value": {"A": 0.5, "B": 0.75}
        },
        "layout": [
            {"uid": "v1", "component": "slider", "coordinationScopes": {"value": "A"}},
            {"uid": "v2", "component": "slider", "coordinationScopes": {"value": "B"}}
        ]
    })
}

pub fn two_sliders() -> ViewConfig {
    parse(two_sliders_json())
}

/// One view whose explicit `value: A` is overridden by meta scope `M`.
pub fn meta_override_json() -> Value {
    json!({
        "version": "1.0.16",
        "name": "meta override",
        "coordinationSpace": {
            "value": {"A": 0.5, "B": 0.75},
            "metaCoordinationScopes": {"M": {"value": "B"}}
        },
        "layout": [
            {
                "uid": "v1",
                "component": "slider",
                "coordinationScopes": {"metaCoordinationScopes": "M", "value": "A"}
            }
        ]
    })
}

pub fn meta_override() -> ViewConfig {
    parse(meta_override_json())
}

/// Two layers with three channels between them, linked to two views
/// through one meta scope pair.
///
/// - `L0` has channels `C0`, `C1` and opacity `O0` (1.0)
/// - `L1` has channel `C2` and opacity `O1` (0.5)
/// - channel `Ci` targets `Ti` (= i) with color `Ki`
/// - `v1` also has its own `spatialZoom: Z`
pub fn layered_spatial_json() -> Value {
    json!({
        "version": "1.0.16",
        "name": "layered spatial",
        "coordinationSpace": {
            "spatialImageLayer": {"L0": "__dummy__", "L1": "__dummy__"},
            "spatialImageChannel": {"C0": "__dummy__", "C1": "__dummy__", "C2": "__dummy__"},
            "spatialTargetC": {"T0": 0, "T1": 1, "T2": 2},
            "spatialChannelColor": {"K0": [255, 0, 0], "K1": [0, 255, 0], "K2": [0, 0, 255]},
            "spatialLayerOpacity": {"O0": 1.0, "O1": 0.5},
            "spatialZoom": {"Z": -2.0},
            "metaCoordinationScopes": {
                "M": {"spatialImageLayer": ["L0", "L1"]}
            },
            "metaCoordinationScopesBy": {
                "MB": {
                    "spatialImageLayer": {
                        "spatialImageChannel": {"L0": ["C0", "C1"], "L1": ["C2"]},
                        "spatialLayerOpacity": {"L0": "O0", "L1": "O1"}
                    },
                    "spatialImageChannel": {
                        "spatialTargetC": {"C0": "T0", "C1": "T1", "C2": "T2"},
                        "spatialChannelColor": {"C0": "K0", "C1": "K1", "C2": "K2"}
                    }
                }
            }
        },
        "layout": [
            {
                "uid": "v1",
                "component": "spatial",
                "coordinationScopes": {
                    "metaCoordinationScopes": ["M"],
                    "metaCoordinationScopesBy": ["MB"],
                    "spatialZoom": "Z"
                }
            },
            {
                "uid": "v2",
                "component": "layerController",
                "coordinationScopes": {
                    "metaCoordinationScopes": ["M"],
                    "metaCoordinationScopesBy": ["MB"]
                }
            }
        ]
    })
}

pub fn layered_spatial() -> ViewConfig {
    parse(layered_spatial_json())
}

fn parse(value: Value) -> ViewConfig {
    serde_json::from_value(value).expect("fixture must be a valid view config")
}
