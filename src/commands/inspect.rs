// src/commands/inspect.rs

//! Inspect command - show how a recipe resolves on this platform

use super::Session;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use brigade::recipe::{generate_toolchain, Evaluation, ToolchainVariables};
use brigade::{evaluate, PlatformFacts};
use serde::Serialize;

#[derive(Serialize)]
struct InspectReport<'a> {
    reference: String,
    platform: &'a PlatformFacts,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
    toolchain: &'a ToolchainVariables,
}

pub fn cmd_inspect(args: &RecipeArgs, json: bool) -> Result<()> {
    let session = Session::open(args)?;
    let recipe = &session.recipe;

    let evaluation = evaluate(recipe, &session.facts, &session.overrides)
        .with_context(|| format!("Failed to evaluate {}", recipe.reference()))?;
    let variables = generate_toolchain(&recipe.toolchain, &evaluation.config);

    if json {
        let report = InspectReport {
            reference: recipe.reference(),
            platform: &session.facts,
            evaluation: &evaluation,
            toolchain: &variables,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Recipe: {}", recipe.reference());
    println!("Platform: {}", session.facts);

    println!();
    println!("Options:");
    if evaluation.config.is_empty() {
        println!("  (none)");
    }
    for (name, value) in evaluation.config.iter() {
        println!("  {} = {}", name, value);
    }

    println!();
    println!("Requires:");
    if evaluation.graph.requires.is_empty() {
        println!("  (none)");
    }
    for dep in &evaluation.graph.requires {
        println!("  {}", dep);
    }

    if !evaluation.graph.tool_requires.is_empty() {
        println!();
        println!("Tool requires:");
        for dep in &evaluation.graph.tool_requires {
            println!("  {}", dep);
        }
    }

    println!();
    println!("Toolchain variables:");
    for (name, value) in variables.iter() {
        println!("  {} = {}", name, value);
    }

    for warning in &evaluation.warnings {
        println!("Warning: {}", warning);
    }

    Ok(())
}
