//! Lightweight handles into a builder's config
//!
//! Handles are plain names. All reads and writes go through the
//! [`crate::ViewConfigBuilder`] that minted them.

/// One scope of one coordination type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinationScope {
    pub coordination_type: String,
    pub scope: String,
}

impl CoordinationScope {
    pub fn new(coordination_type: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            coordination_type: coordination_type.into(),
            scope: scope.into(),
        }
    }
}

/// A pair of meta scopes: one in `metaCoordinationScopes`, one in
/// `metaCoordinationScopesBy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaCoordination {
    pub meta_scope: String,
    pub meta_by_scope: String,
}

/// A view in the builder's layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewHandle {
    pub uid: String,
}

/// Anything that owns a scope mapping and a by-mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    View(ViewHandle),
    Meta(MetaCoordination),
}

impl From<&ViewHandle> for LinkTarget {
    fn from(view: &ViewHandle) -> Self {
        LinkTarget::View(view.clone())
    }
}

impl From<&MetaCoordination> for LinkTarget {
    fn from(meta: &MetaCoordination) -> Self {
        LinkTarget::Meta(meta.clone())
    }
}
