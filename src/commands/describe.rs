// src/commands/describe.rs

//! Describe command - print a recipe's package descriptor

use super::load_recipe;
use anyhow::Result;
use brigade::PackageDescriptor;
use std::path::Path;

pub fn cmd_describe(recipe_path: &Path) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let descriptor = PackageDescriptor::from_recipe(&recipe);
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}
