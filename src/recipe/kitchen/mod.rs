// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked
//!
//! A cook walks a recipe through six phases:
//! 1. **Validate**: static checks, option and dependency resolution
//! 2. **Generate**: locate dependencies, write toolchain and config files
//! 3. **Configure**: run the build tool's configure step
//! 4. **Build**: run the build tool's build step
//! 5. **Package**: install build output into the package folder
//! 6. **Describe**: produce the package descriptor
//!
//! The build tool and the dependency fetcher are collaborators supplied by
//! the caller, so the Kitchen itself never touches the network or decides
//! how a package is built.

pub mod build_tool;
mod config;
mod cook;
pub mod phase;

pub use build_tool::{BuildLayout, BuildTool, CMakeTool};
pub use config::{CookFailure, CookResult, KitchenConfig};
pub use cook::Cook;
pub use phase::{Phase, PhaseState};

use crate::platform::PlatformFacts;
use crate::recipe::fetch::DependencyFetcher;
use crate::recipe::format::Recipe;
use crate::recipe::options::UserOverrides;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    tool: Arc<dyn BuildTool>,
    fetcher: Arc<dyn DependencyFetcher>,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration and collaborators
    pub fn new(
        config: KitchenConfig,
        tool: Arc<dyn BuildTool>,
        fetcher: Arc<dyn DependencyFetcher>,
    ) -> Self {
        Self {
            config,
            tool,
            fetcher,
        }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Begin a cook without running any phase
    pub fn start<'a>(
        &'a self,
        recipe: &'a Recipe,
        facts: &'a PlatformFacts,
        overrides: &'a UserOverrides,
    ) -> Cook<'a> {
        Cook::new(self, recipe, facts, overrides)
    }

    /// Cook a recipe through every phase
    ///
    /// Stops at the first failing phase. The failure records that phase and
    /// the last state reached; later phases never run.
    pub fn cook(
        &self,
        recipe: &Recipe,
        facts: &PlatformFacts,
        overrides: &UserOverrides,
    ) -> std::result::Result<CookResult, CookFailure> {
        info!("Cooking {} for {}", recipe.reference(), facts);

        let mut cook = self.start(recipe, facts, overrides);
        for phase in Phase::iter() {
            info!("{}: {}", recipe.reference(), phase);
            if let Err(error) = cook.run(phase) {
                warn!("{} failed in {} phase: {}", recipe.reference(), phase, error);
                return Err(CookFailure {
                    phase,
                    reached: cook.state(),
                    error,
                });
            }
        }

        let reached = cook.state();
        cook.finish().map_err(|error| CookFailure {
            phase: Phase::Describe,
            reached,
            error,
        })
    }
}
