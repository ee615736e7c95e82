//! Error types for coord-builder

/// Result type for coord-builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a view config
///
/// Errors from declarative input carry the path of the offending entry,
/// e.g. `spatialImageLayer[1].spatialImageChannel[0].spatialTargetC`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A level id that was not created by this builder
    #[error("Unknown coordination level at {path}")]
    UnknownLevel { path: String },

    /// A level that contains itself, directly or through nested levels
    #[error("Coordination level refers to itself at {path}")]
    LevelCycle { path: String },

    /// A scope handle used under a key of a different coordination type
    #[error("Scope of type '{found}' used for '{expected}' at {path}")]
    ScopeTypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A scope handle that does not exist in the coordination space
    #[error("Unknown scope '{scope}' of type '{coordination_type}' at {path}")]
    UnknownScope {
        path: String,
        coordination_type: String,
        scope: String,
    },

    /// Meta tables cannot be populated through declarative input
    #[error("Reserved coordination type '{coordination_type}' at {path}")]
    ReservedType {
        path: String,
        coordination_type: String,
    },

    /// No view with this uid exists
    #[error("Unknown view: {uid}")]
    UnknownView { uid: String },

    /// A view with this uid already exists
    #[error("Duplicate view uid: {uid}")]
    DuplicateView { uid: String },

    /// Initial values do not line up with the linked types
    #[error("Expected {expected} initial values, got {found}")]
    ValueCountMismatch { expected: usize, found: usize },

    /// Error from coord-space
    #[error(transparent)]
    Space(#[from] coord_space::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
