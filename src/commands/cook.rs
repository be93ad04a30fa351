// src/commands/cook.rs

//! Cook command - build packages from recipes

use super::Session;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use brigade::recipe::CMakeTool;
use brigade::{Kitchen, KitchenConfig};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Cook a package from a recipe
///
/// # Arguments
/// * `args` - Recipe path, overrides, settings, profile and cache
/// * `build_folder` - Build folder override (default: recipe layout)
/// * `package_folder` - Install prefix override (default: `<build>/package`)
/// * `jobs` - Number of parallel build jobs (None = tool default)
/// * `configure_args` - Extra configure arguments, after the profile's
/// * `json` - Print the result as JSON
pub fn cmd_cook(
    args: &RecipeArgs,
    build_folder: Option<PathBuf>,
    package_folder: Option<PathBuf>,
    jobs: Option<u32>,
    configure_args: Vec<String>,
    json: bool,
) -> Result<()> {
    let session = Session::open(args)?;
    let recipe = &session.recipe;

    let mut config = KitchenConfig::for_recipe(recipe, &session.recipe_dir)
        .with_configure_args(session.configure_args.iter().cloned())
        .with_configure_args(configure_args);
    if let Some(folder) = build_folder {
        config.build_folder = folder;
    }
    config.package_folder = package_folder;
    config.jobs = jobs;

    let tool = CMakeTool::locate().context("Cannot cook without cmake")?;
    let kitchen = Kitchen::new(config, Arc::new(tool), Arc::new(session.cache.clone()));

    if !json {
        println!("Cooking {} for {}", recipe.reference(), session.facts);
    }

    let result = kitchen
        .cook(recipe, &session.facts, &session.overrides)
        .with_context(|| format!("Failed to cook {}", recipe.reference()))?;

    if json {
        let report = json!({
            "descriptor": result.descriptor,
            "options": result.config,
            "dependencies": result.graph,
            "toolchain": result.variables,
            "package_folder": result.package_folder,
            "warnings": result.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }
    println!(
        "[OK] {} installed to {}",
        recipe.reference(),
        result.package_folder.display()
    );
    if !result.descriptor.libs.is_empty() {
        println!("  libs: {}", result.descriptor.libs.join(", "));
    }
    if !result.descriptor.bins.is_empty() {
        println!("  bins: {}", result.descriptor.bins.join(", "));
    }

    Ok(())
}
