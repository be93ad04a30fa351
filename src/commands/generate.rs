// src/commands/generate.rs

//! Generate command - write toolchain files without building

use super::Session;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use brigade::recipe::CMakeTool;
use brigade::{Kitchen, KitchenConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub fn cmd_generate(args: &RecipeArgs, build_folder: Option<PathBuf>) -> Result<()> {
    let session = Session::open(args)?;
    let recipe = &session.recipe;

    let mut config = KitchenConfig::for_recipe(recipe, &session.recipe_dir);
    if let Some(folder) = build_folder {
        config.build_folder = folder;
    }

    let kitchen = Kitchen::new(
        config,
        Arc::new(CMakeTool::new()),
        Arc::new(session.cache.clone()),
    );

    let mut cook = kitchen.start(recipe, &session.facts, &session.overrides);
    cook.validate()
        .with_context(|| format!("Failed to validate {}", recipe.reference()))?;
    cook.generate()
        .with_context(|| format!("Failed to generate files for {}", recipe.reference()))?;

    info!("{} variable(s) generated", cook.variables().len());
    println!(
        "Generated files in {}",
        kitchen.config().generators_dir().display()
    );
    for (name, value) in cook.variables().iter() {
        println!("  {} = {}", name, value);
    }

    Ok(())
}
