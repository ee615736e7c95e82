//! Command implementations for coord-cli

pub mod check;
pub mod init;
pub mod merge;
pub mod resolve;
pub mod scopes;
pub mod set;

pub use check::run_check;
pub use init::run_init;
pub use merge::run_merge;
pub use resolve::{ResolveShape, run_resolve};
pub use scopes::run_scopes;
pub use set::run_set;
