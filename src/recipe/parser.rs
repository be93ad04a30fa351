// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::options::OptionSchema;
use crate::recipe::predicate::Predicate;
use std::collections::HashMap;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)?;
    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Violations of static invariants are errors; missing optional metadata
/// produces warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ValidationFailed(
            "Recipe package name cannot be empty".to_string(),
        ));
    }
    if let Err(e) = semver::Version::parse(&recipe.package.version) {
        return Err(Error::ValidationFailed(format!(
            "Recipe version '{}' is not a semantic version: {}",
            recipe.package.version, e
        )));
    }

    recipe.options.check()?;

    // Every option must land on its own variable
    let toolchain = &recipe.toolchain;
    for option in toolchain.variables.keys() {
        if !recipe.options.domains.contains_key(option) {
            return Err(Error::ValidationFailed(format!(
                "Toolchain entry for undeclared option '{}'",
                option
            )));
        }
    }
    let mut owners: HashMap<String, &str> = toolchain
        .constants
        .keys()
        .map(|name| (name.clone(), "constant"))
        .collect();
    for option in recipe.options.domains.keys() {
        let variable = toolchain.variable_name(option);
        if let Some(previous) = owners.insert(variable.clone(), option) {
            return Err(Error::ValidationFailed(format!(
                "Option '{}' and {} both map to toolchain variable {}",
                option, previous, variable
            )));
        }
    }

    let conditions = recipe
        .requires
        .iter()
        .chain(&recipe.tool_requires)
        .filter_map(|requirement| requirement.when.as_ref())
        .chain(recipe.options.remove.iter().map(|removal| &removal.when));
    for condition in conditions {
        check_condition_values(&recipe.options, condition)?;
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package_info.libs.is_empty() && recipe.package_info.bins.is_empty() {
        warnings.push("Package declares no libs or bins".to_string());
    }
    for option in recipe.options.domains.keys() {
        if !recipe.options.defaults.contains_key(option) {
            warnings.push(format!(
                "Option '{}' has no default; {} is only set by overrides",
                option,
                toolchain.variable_name(option)
            ));
        }
    }

    Ok(warnings)
}

/// Reject option conditions comparing against a value outside the domain
fn check_condition_values(schema: &OptionSchema, condition: &Predicate) -> Result<()> {
    match condition {
        Predicate::Option { name, equals } => match schema.domains.get(name) {
            Some(domain) if !domain.iter().any(|allowed| allowed.matches(equals)) => {
                Err(Error::ValidationFailed(format!(
                    "Condition compares option '{}' with '{}', outside its domain",
                    name, equals
                )))
            }
            _ => Ok(()),
        },
        Predicate::All(conditions) | Predicate::Any(conditions) => conditions
            .iter()
            .try_for_each(|c| check_condition_values(schema, c)),
        Predicate::Not(inner) => check_condition_values(schema, inner),
        Predicate::Always | Predicate::Platform { .. } => Ok(()),
    }
}
