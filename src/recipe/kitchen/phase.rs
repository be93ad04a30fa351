// src/recipe/kitchen/phase.rs

//! Phase state machine for a single cook
//!
//! ```text
//! Unvalidated -> Validated -> Generated -> Configured -> Built -> Packaged -> Described
//! ```
//!
//! Each phase may only run from the state its predecessor leaves behind, so
//! transitions are strictly forward and no phase runs twice.

use crate::error::{Error, Result};
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// A cooking phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Validate,
    Generate,
    Configure,
    Build,
    Package,
    Describe,
}

/// Where a cook currently stands
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumIter, Serialize,
)]
pub enum PhaseState {
    #[default]
    Unvalidated,
    Validated,
    Generated,
    Configured,
    Built,
    Packaged,
    Described,
}

impl Phase {
    /// State the phase must start from
    pub fn requires(&self) -> PhaseState {
        match self {
            Self::Validate => PhaseState::Unvalidated,
            Self::Generate => PhaseState::Validated,
            Self::Configure => PhaseState::Generated,
            Self::Build => PhaseState::Configured,
            Self::Package => PhaseState::Built,
            Self::Describe => PhaseState::Packaged,
        }
    }

    /// State the phase leaves behind on success
    pub fn completes(&self) -> PhaseState {
        match self {
            Self::Validate => PhaseState::Validated,
            Self::Generate => PhaseState::Generated,
            Self::Configure => PhaseState::Configured,
            Self::Build => PhaseState::Built,
            Self::Package => PhaseState::Packaged,
            Self::Describe => PhaseState::Described,
        }
    }
}

impl PhaseState {
    /// Check that `phase` may run from this state
    pub fn admit(&self, phase: Phase) -> Result<()> {
        if *self == phase.requires() {
            Ok(())
        } else {
            Err(Error::PhaseOrder {
                attempted: phase,
                state: *self,
            })
        }
    }

    /// Phase that runs next, if any
    pub fn next_phase(&self) -> Option<Phase> {
        use strum::IntoEnumIterator;
        Phase::iter().find(|phase| phase.requires() == *self)
    }
}
