//! Reserved coordination type names

/// Coordination type whose scopes hold meta scope mappings.
pub const META_COORDINATION_SCOPES: &str = "metaCoordinationScopes";

/// Coordination type whose scopes hold meta by-mappings.
pub const META_COORDINATION_SCOPES_BY: &str = "metaCoordinationScopesBy";

/// Value stored in the scope created for each node of a coordination level.
///
/// It is non-null so level scopes count as active in scope listings.
pub const LEVEL_PLACEHOLDER: &str = "__dummy__";
