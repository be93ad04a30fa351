// src/recipe/evaluation.rs

//! Recipe evaluation: everything that can be decided without the build tool

use crate::error::Result;
use crate::platform::PlatformFacts;
use crate::recipe::format::Recipe;
use crate::recipe::options::{resolve_options, ResolvedConfig, UserOverrides};
use crate::recipe::parser::validate_recipe;
use crate::recipe::requirements::{resolve_dependencies, DependencyGraph};
use serde::Serialize;
use tracing::{info, warn};

/// Resolved configuration and dependencies for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub config: ResolvedConfig,
    pub graph: DependencyGraph,
    /// Non-fatal recipe findings
    pub warnings: Vec<String>,
}

/// Validate a recipe and resolve its options and dependencies
pub fn evaluate(
    recipe: &Recipe,
    facts: &PlatformFacts,
    overrides: &UserOverrides,
) -> Result<Evaluation> {
    let warnings = validate_recipe(recipe)?;
    for warning in &warnings {
        warn!("{}: {}", recipe.reference(), warning);
    }

    recipe.check_min_cppstd(facts)?;

    let config = resolve_options(&recipe.options, overrides, facts)?;
    let graph = resolve_dependencies(&recipe.requires, &recipe.tool_requires, &config, facts)?;

    info!(
        "Evaluated {} for {}: {} option(s), {} requirement(s), {} tool requirement(s)",
        recipe.reference(),
        facts,
        config.len(),
        graph.requires.len(),
        graph.tool_requires.len()
    );

    Ok(Evaluation {
        config,
        graph,
        warnings,
    })
}
