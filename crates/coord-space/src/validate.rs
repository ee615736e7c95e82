//! Validation capability and reference checks
//!
//! Value-shape checking belongs to whichever schema validator the caller
//! injects through [`Validator`]. This module only ships the serde-backed
//! structural validator and a check for scope references that point nowhere.

use crate::constants::{META_COORDINATION_SCOPES, META_COORDINATION_SCOPES_BY};
use crate::error::{Error, Result};
use crate::view::ViewConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Parses untrusted input into `T` or rejects it.
pub trait Validator<T> {
    fn parse(&self, input: Value) -> Result<T>;
}

impl<T, F> Validator<T> for F
where
    F: Fn(Value) -> Result<T>,
{
    fn parse(&self, input: Value) -> Result<T> {
        self(input)
    }
}

/// Structural validation through `serde` deserialization.
pub struct SerdeValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeValidator<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Validator<T> for SerdeValidator<T> {
    fn parse(&self, input: Value) -> Result<T> {
        serde_json::from_value(input).map_err(|e| Error::validation(e.to_string()))
    }
}

/// Where a dangling reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSite {
    /// `coordinationScopes[type]`
    Scopes,
    /// `coordinationScopesBy[by_type][type][by_scope]`
    ScopesBy { by_type: String, by_scope: String },
    /// An entry inside a meta table scope
    Meta { meta_scope: String },
}

/// A view or meta entry pointing at a scope absent from the space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// The view holding the reference, `None` for meta table entries
    pub view: Option<String>,
    pub coordination_type: String,
    pub scope: String,
    pub site: ReferenceSite,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.view.as_deref().unwrap_or("<meta>");
        match &self.site {
            ReferenceSite::Scopes => write!(
                f,
                "{owner}: {} -> {} (missing)",
                self.coordination_type, self.scope
            ),
            ReferenceSite::ScopesBy { by_type, by_scope } => write!(
                f,
                "{owner}: {by_type}[{by_scope}].{} -> {} (missing)",
                self.coordination_type, self.scope
            ),
            ReferenceSite::Meta { meta_scope } => write!(
                f,
                "{owner}: meta {meta_scope}.{} -> {} (missing)",
                self.coordination_type, self.scope
            ),
        }
    }
}

/// List every scope reference in the config that does not resolve.
///
/// References into the meta tables themselves are checked too. Resolution
/// tolerates all of these; this report exists for tooling.
pub fn dangling_references(config: &ViewConfig) -> Vec<DanglingReference> {
    let space = &config.coordination_space;
    let mut dangling = Vec::new();

    let missing = |coordination_type: &str, scope: &str| !space.contains_scope(coordination_type, scope);

    for view in &config.layout {
        for (coordination_type, scope_ref) in view.coordination_scopes.iter() {
            for scope in scope_ref.iter().filter(|s| missing(coordination_type, s)) {
                dangling.push(DanglingReference {
                    view: Some(view.uid.clone()),
                    coordination_type: coordination_type.clone(),
                    scope: scope.to_string(),
                    site: ReferenceSite::Scopes,
                });
            }
        }
        for (by_type, coordination_type, by_scope, scope_ref) in view.coordination_scopes_by.entries() {
            for scope in scope_ref.iter().filter(|s| missing(coordination_type, s)) {
                dangling.push(DanglingReference {
                    view: Some(view.uid.clone()),
                    coordination_type: coordination_type.to_string(),
                    scope: scope.to_string(),
                    site: ReferenceSite::ScopesBy {
                        by_type: by_type.to_string(),
                        by_scope: by_scope.to_string(),
                    },
                });
            }
        }
    }

    if let Some(table) = space.meta_scopes_table() {
        for meta_scope in table.keys() {
            let Some(scopes) = space.meta_scopes(meta_scope) else {
                continue;
            };
            for (coordination_type, scope_ref) in scopes.iter() {
                if coordination_type == META_COORDINATION_SCOPES
                    || coordination_type == META_COORDINATION_SCOPES_BY
                {
                    continue;
                }
                for scope in scope_ref.iter().filter(|s| missing(coordination_type, s)) {
                    dangling.push(DanglingReference {
                        view: None,
                        coordination_type: coordination_type.clone(),
                        scope: scope.to_string(),
                        site: ReferenceSite::Meta {
                            meta_scope: meta_scope.clone(),
                        },
                    });
                }
            }
        }
    }

    if let Some(table) = space.meta_scopes_by_table() {
        for meta_scope in table.keys() {
            let Some(scopes_by) = space.meta_scopes_by(meta_scope) else {
                continue;
            };
            for (_, coordination_type, _, scope_ref) in scopes_by.entries() {
                for scope in scope_ref.iter().filter(|s| missing(coordination_type, s)) {
                    dangling.push(DanglingReference {
                        view: None,
                        coordination_type: coordination_type.to_string(),
                        scope: scope.to_string(),
                        site: ReferenceSite::Meta {
                            meta_scope: meta_scope.clone(),
                        },
                    });
                }
            }
        }
    }

    dangling
}
