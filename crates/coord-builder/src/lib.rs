//! Programmatic construction of coordinated view configs
//!
//! This crate builds [`coord_space::ViewConfig`]s: it mints scope names,
//! links views to scopes directly or through meta scopes, and expands
//! declarative coordination trees with per-level memoization.
//!
//! # Example
//!
//! ```
//! use coord_builder::{CoordinationObject, LinkOptions, ViewConfigBuilder};
//! use serde_json::json;
//!
//! let mut builder = ViewConfigBuilder::new("linked sliders");
//! let left = builder.add_view("slider");
//! let right = builder.add_view("slider");
//!
//! let input = CoordinationObject::new().with("sliderValue", json!(0.5));
//! builder
//!     .link_views_by_object(&[left.clone(), right.clone()], &input, LinkOptions::default())
//!     .unwrap();
//!
//! let config = builder.into_config();
//! let values = config.coordination(&right.uid, &["sliderValue"]).unwrap().values;
//! assert_eq!(values["sliderValue"], Some(json!(0.5)));
//! ```

pub mod builder;
pub mod error;
pub mod handle;
pub mod init;
pub mod level;

pub use builder::{LinkOptions, ViewConfigBuilder};
pub use error::{Error, Result};
pub use handle::{CoordinationScope, LinkTarget, MetaCoordination, ViewHandle};
pub use init::{ComponentRegistry, initialize};
pub use level::{CoordinationObject, InputValue, LevelId, ScopeLevel, ScopeNode, ScopeTree};
