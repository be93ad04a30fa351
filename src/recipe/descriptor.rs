// src/recipe/descriptor.rs

//! Package descriptor: the declared output of a cooked recipe

use crate::recipe::format::Recipe;
use serde::{Deserialize, Serialize};

/// Declared artifacts and identity of a package
///
/// Computed from the recipe alone; it does not inspect build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Source globs shipped alongside the recipe
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports_sources: Vec<String>,
    pub libs: Vec<String>,
    #[serde(default)]
    pub bins: Vec<String>,
}

impl PackageDescriptor {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            license: recipe.package.license.clone(),
            author: recipe.package.author.clone(),
            description: recipe.package.description.clone(),
            url: recipe.package.url.clone(),
            topics: recipe.package.topics.clone(),
            exports_sources: recipe.package.exports_sources.clone(),
            libs: recipe.package_info.libs.clone(),
            bins: recipe.package_info.bins.clone(),
        }
    }
}
