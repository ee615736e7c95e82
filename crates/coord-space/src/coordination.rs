//! Per-view value/setter pairs
//!
//! This is what view components consume: values and setters keyed by
//! coordination type, never raw scope names.

use crate::error::Result;
use crate::resolve::resolve_view;
use crate::setters::{Setters, setters, setters_by_type, setters_l2};
use crate::values::{
    CoordinationValues, ValuesByScope, ValuesByScopeL2, resolve_values, resolve_values_by_type,
    resolve_values_l2,
};
use crate::view::ViewConfig;
use std::collections::BTreeMap;

/// Flat values and their setters for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCoordination {
    pub values: CoordinationValues,
    pub setters: Setters,
}

/// L1 values and setters for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCoordinationByType {
    pub values: ValuesByScope,
    pub setters: BTreeMap<String, Setters>,
}

/// L2 values and setters for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCoordinationL2 {
    pub values: ValuesByScopeL2,
    pub setters: BTreeMap<String, BTreeMap<String, Setters>>,
}

impl ViewConfig {
    /// Resolve flat values and setters for a view.
    pub fn coordination(&self, uid: &str, types: &[&str]) -> Result<ViewCoordination> {
        let view = self.require_view(uid)?;
        let space = &self.coordination_space;
        let effective = resolve_view(space, view);
        Ok(ViewCoordination {
            values: resolve_values(space, &effective.scopes, types),
            setters: setters(space, &effective.scopes, types),
        })
    }

    /// Resolve values and setters per scope of `by_type` for a view.
    pub fn coordination_by_type(&self, uid: &str, by_type: &str, types: &[&str]) -> Result<ViewCoordinationByType> {
        let view = self.require_view(uid)?;
        let space = &self.coordination_space;
        let effective = resolve_view(space, view);
        Ok(ViewCoordinationByType {
            values: resolve_values_by_type(space, &effective.scopes, &effective.scopes_by, by_type, types),
            setters: setters_by_type(space, &effective.scopes, &effective.scopes_by, by_type, types),
        })
    }

    /// Resolve values and setters per secondary scope per primary scope.
    pub fn coordination_l2(
        &self,
        uid: &str,
        primary_type: &str,
        secondary_type: &str,
        types: &[&str],
    ) -> Result<ViewCoordinationL2> {
        let view = self.require_view(uid)?;
        let space = &self.coordination_space;
        let effective = resolve_view(space, view);
        Ok(ViewCoordinationL2 {
            values: resolve_values_l2(
                space,
                &effective.scopes,
                &effective.scopes_by,
                primary_type,
                secondary_type,
                types,
            ),
            setters: setters_l2(
                space,
                &effective.scopes,
                &effective.scopes_by,
                primary_type,
                secondary_type,
                types,
            ),
        })
    }
}
