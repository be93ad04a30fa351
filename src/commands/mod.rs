// src/commands/mod.rs
//! Command handlers for the brigade CLI

mod cook;
mod describe;
mod generate;
mod inspect;

pub use cook::cmd_cook;
pub use describe::cmd_describe;
pub use generate::cmd_generate;
pub use inspect::cmd_inspect;

use crate::cli::RecipeArgs;
use anyhow::{anyhow, Context, Result};
use brigade::recipe::options::{OptionValue, UserOverrides};
use brigade::recipe::LocalCache;
use brigade::{parse_recipe_file, HostProbe, PlatformFacts, PlatformProbe, Profile, Recipe};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a recipe command needs, with CLI values layered over the profile
pub struct Session {
    pub recipe: Recipe,
    /// Directory the recipe file lives in
    pub recipe_dir: PathBuf,
    pub facts: PlatformFacts,
    pub overrides: UserOverrides,
    pub configure_args: Vec<String>,
    pub cache: LocalCache,
}

impl Session {
    pub fn open(args: &RecipeArgs) -> Result<Self> {
        let recipe = load_recipe(&args.recipe)?;
        let recipe_dir = args
            .recipe
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let profile = match &args.profile {
            Some(path) => Profile::load(path)
                .with_context(|| format!("Failed to load profile: {}", path.display()))?,
            None => Profile::default(),
        };

        let mut facts = HostProbe.probe().context("Failed to probe the host platform")?;
        profile
            .apply_settings(&mut facts)
            .context("Invalid profile settings")?;
        for setting in &args.settings {
            let (key, value) = split_assignment(setting)?;
            facts
                .set(key, value)
                .with_context(|| format!("Invalid setting: {}", setting))?;
        }
        debug!("Platform: {}", facts);

        let overrides = profile.overrides_with(&parse_overrides(&args.options)?);

        let cache = LocalCache::new(args.cache.clone().unwrap_or_else(LocalCache::default_root));

        Ok(Self {
            recipe,
            recipe_dir,
            facts,
            overrides,
            configure_args: profile.configure_args,
            cache,
        })
    }
}

pub fn load_recipe(path: &Path) -> Result<Recipe> {
    parse_recipe_file(path).with_context(|| format!("Failed to parse recipe: {}", path.display()))
}

/// Parse `name=value` option overrides, keeping their order
pub fn parse_overrides(assignments: &[String]) -> Result<UserOverrides> {
    let mut overrides = UserOverrides::new();
    for assignment in assignments {
        let (name, value) = split_assignment(assignment)?;
        overrides.insert(name.to_string(), OptionValue::from(value));
    }
    Ok(overrides)
}

fn split_assignment(text: &str) -> Result<(&str, &str)> {
    text.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", text))
}
