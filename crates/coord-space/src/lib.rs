//! Coordination space model, scope resolution, and mutation
//!
//! A coordination space holds shared values for many views: type → scope →
//! value. Views hold scope names, never values, so two views pointing at
//! the same scope stay synchronized while others remain independent.
//!
//! This crate provides:
//!
//! - **Scope naming**: alphabetic and (prefixed) numeric name generators
//! - **Scope resolution**: effective mappings through meta-coordination
//! - **Value resolution**: flat, per-instance (L1) and two-level (L2) lookups,
//!   with setters that write back to the scope each lookup read from
//! - **Mutation**: pure state transitions and a versioned store
//!
//! # Architecture
//!
//! ```text
//!   raw view mapping ──► resolve_scopes ──► effective mapping
//!                           ▲                     │
//!              meta tables ─┘                     ▼
//!                                       resolve_values / setters
//!                                                 │
//!   CoordinationStore ◄── reduce(Action) ◄────────┘
//! ```

pub mod constants;
pub mod coordination;
pub mod error;
pub mod mutation;
pub mod naming;
pub mod resolve;
pub mod scope;
pub mod setters;
pub mod space;
pub mod store;
pub mod validate;
pub mod values;
pub mod view;

pub use constants::{LEVEL_PLACEHOLDER, META_COORDINATION_SCOPES, META_COORDINATION_SCOPES_BY};
pub use coordination::{ViewCoordination, ViewCoordinationByType, ViewCoordinationL2};
pub use error::{Error, Result};
pub use mutation::{Action, SetCoordinationValue, merge_coordination, reduce, set_coordination_value};
pub use naming::{
    ScopeNamer, next_alphabetic_name, next_numeric_name, prefixed_numeric_name_factory,
};
pub use resolve::{
    EffectiveScopes, get_meta_scope, get_meta_scope_by, resolve_scopes, resolve_scopes_by,
    resolve_view,
};
pub use scope::{CoordinationScopes, CoordinationScopesBy, ScopeRef};
pub use setters::{Setter, Setters, setter_name};
pub use space::{CoordinationSpace, ScopeValues};
pub use store::{CoordinationStore, SubscriptionId};
pub use validate::{DanglingReference, ReferenceSite, SerdeValidator, Validator, dangling_references};
pub use values::{
    CoordinationValues, ValuesByScope, ValuesByScopeL2, multi_scopes_non_null,
    multi_scopes_secondary_non_null, parameter_scope, parameter_scope_by, resolve_values,
    resolve_values_by_type, resolve_values_l2,
};
pub use view::{CONFIG_VERSION, View, ViewConfig};
