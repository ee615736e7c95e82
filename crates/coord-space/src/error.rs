//! Error types for coord-space

/// Result type for coord-space operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in coord-space operations
///
/// Reads never produce these: resolution degrades to `None` instead.
/// Only writes and boundary parsing report errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write targeted a scope that does not exist in the space
    #[error("Scope '{scope}' not found for coordination type '{coordination_type}'")]
    ScopeNotFound {
        coordination_type: String,
        scope: String,
    },

    /// A write targeted a type whose scope resolves to a list
    #[error("Coordination type '{coordination_type}' resolves to multiple scopes")]
    MultipleScopes { coordination_type: String },

    /// No scope could be resolved for the requested type
    #[error("No scope is mapped for coordination type '{coordination_type}'")]
    Unmapped { coordination_type: String },

    /// No view with the given uid exists in the layout
    #[error("View not found: {uid}")]
    ViewNotFound { uid: String },

    /// A meta table entry or scope mapping had the wrong shape
    #[error("Invalid scope mapping under '{key}': {message}")]
    InvalidScopeMapping { key: String, message: String },

    /// An injected validator rejected its input
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn scope_not_found(coordination_type: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::ScopeNotFound {
            coordination_type: coordination_type.into(),
            scope: scope.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
