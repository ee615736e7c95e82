//! Views and the persisted view config
//!
//! The view config is the only wire format: a coordination space plus the
//! per-view scope mappings, as plain nested JSON.

use crate::error::{Error, Result};
use crate::scope::{CoordinationScopes, CoordinationScopesBy};
use crate::space::CoordinationSpace;
use crate::validate::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default view config schema version written by this crate
pub const CONFIG_VERSION: &str = "1.0.16";

/// A view: an identifier plus its raw scope mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub uid: String,

    /// Component rendered by this view (opaque to the core)
    pub component: String,

    #[serde(default)]
    pub coordination_scopes: CoordinationScopes,

    #[serde(default, skip_serializing_if = "CoordinationScopesBy::is_empty")]
    pub coordination_scopes_by: CoordinationScopesBy,
}

impl View {
    pub fn new(uid: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            component: component.into(),
            coordination_scopes: CoordinationScopes::new(),
            coordination_scopes_by: CoordinationScopesBy::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: CoordinationScopes) -> Self {
        self.coordination_scopes = scopes;
        self
    }

    pub fn with_scopes_by(mut self, scopes_by: CoordinationScopesBy) -> Self {
        self.coordination_scopes_by = scopes_by;
        self
    }
}

/// A coordination space together with the views that point into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub version: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub coordination_space: CoordinationSpace,

    #[serde(default)]
    pub layout: Vec<View>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            name: String::new(),
            description: None,
            coordination_space: CoordinationSpace::new(),
            layout: Vec::new(),
        }
    }
}

impl ViewConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a view config from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a view config after passing it through a validator.
    ///
    /// Validation errors propagate unchanged; nothing is retried.
    pub fn from_json_with<V>(value: Value, validator: &V) -> Result<Self>
    where
        V: Validator<ViewConfig> + ?Sized,
    {
        validator.parse(value)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn view(&self, uid: &str) -> Option<&View> {
        self.layout.iter().find(|view| view.uid == uid)
    }

    pub fn view_mut(&mut self, uid: &str) -> Option<&mut View> {
        self.layout.iter_mut().find(|view| view.uid == uid)
    }

    /// Look up a view, reporting its absence as an error.
    pub fn require_view(&self, uid: &str) -> Result<&View> {
        self.view(uid).ok_or_else(|| Error::ViewNotFound {
            uid: uid.to_string(),
        })
    }
}
