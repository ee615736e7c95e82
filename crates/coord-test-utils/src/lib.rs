//! Shared test fixtures for the coordination workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: sample view configs, from two linked sliders up to a
//!   layered spatial config with meta and by-mappings
//! - [`workspace`]: [`workspace::TestWorkspace`], a temp directory holding
//!   a config file for CLI and file-based tests

pub mod fixtures;
pub mod workspace;
