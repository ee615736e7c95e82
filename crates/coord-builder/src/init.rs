//! Filling in coordination a config leaves out
//!
//! A component consumes a fixed set of coordination types. A view whose
//! effective mapping lacks one of them gets its own fresh scope holding the
//! registry's default for that type, or `null` when there is none.

use crate::builder::ViewConfigBuilder;
use crate::error::Result;
use crate::handle::ViewHandle;
use coord_space::{ViewConfig, resolve_view};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Which coordination types each component consumes, and their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRegistry {
    #[serde(default)]
    pub components: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component<I, S>(mut self, component: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components
            .insert(component.into(), types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, coordination_type: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(coordination_type.into(), value);
        self
    }

    /// Coordination types a component consumes; empty for unknown components.
    pub fn types_for(&self, component: &str) -> &[String] {
        self.components
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn default_value(&self, coordination_type: &str) -> Value {
        self.defaults
            .get(coordination_type)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// Give every view a scope for each type its component consumes.
///
/// Types already reachable through the view's own mapping or its meta
/// scopes are left alone, so initializing twice changes nothing.
pub fn initialize(config: &ViewConfig, registry: &ComponentRegistry) -> Result<ViewConfig> {
    let mut builder = ViewConfigBuilder::from_config(config.clone());

    for view in &config.layout {
        let effective = resolve_view(&config.coordination_space, view);
        let missing: Vec<&str> = registry
            .types_for(&view.component)
            .iter()
            .map(String::as_str)
            .filter(|t| !effective.scopes.contains(t))
            .collect();
        if missing.is_empty() {
            continue;
        }

        tracing::debug!(view = %view.uid, component = %view.component, missing = ?missing, "Initializing coordination");
        let scopes = builder.add_coordination(&missing);
        for scope in &scopes {
            builder.set_value(scope, registry.default_value(&scope.coordination_type))?;
        }
        let handle = ViewHandle {
            uid: view.uid.clone(),
        };
        builder.use_coordination(&handle, &scopes)?;
    }

    Ok(builder.into_config())
}
