// src/recipe/options.rs

//! Option schema and option resolution
//!
//! A recipe declares each option's domain (the allowed values) and,
//! optionally, a default. Resolution layers three sources in order:
//!
//! 1. Schema defaults
//! 2. User overrides (from profiles and the command line)
//! 3. Platform-conditioned removals, which win over everything
//!
//! Options removed in step 3 are absent from the result, not unset.

use crate::error::{Error, Result};
use crate::platform::PlatformFacts;
use crate::recipe::predicate::Predicate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A single option value: boolean or string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Check whether two values denote the same option value
    ///
    /// Strings are compared exactly against strings. A string compared with
    /// a boolean matches when it spells that boolean (`True`, `false`, `1`,
    /// `off`, ...), so textual overrides line up with boolean domains.
    pub fn matches(&self, other: &OptionValue) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(b), Self::Str(s)) | (Self::Str(s), Self::Bool(b)) => {
                parse_bool_text(s) == Some(*b)
            }
        }
    }

    /// Boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

fn parse_bool_text(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Removal of options when a platform condition holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRemoval {
    /// Condition under which the options are removed
    pub when: Predicate,
    /// Options to remove
    pub options: Vec<String>,
}

/// The `[options]` section of a recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    /// Allowed values per option, in declaration order
    #[serde(default)]
    pub domains: IndexMap<String, Vec<OptionValue>>,

    /// Default value per option
    #[serde(default)]
    pub defaults: IndexMap<String, OptionValue>,

    /// Platform-conditioned removals
    #[serde(default)]
    pub remove: Vec<OptionRemoval>,
}

impl OptionSchema {
    /// Declare an option with its domain
    pub fn with_option(mut self, name: &str, domain: Vec<OptionValue>) -> Self {
        self.domains.insert(name.to_string(), domain);
        self
    }

    /// Declare a default value
    pub fn with_default(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.defaults.insert(name.to_string(), value.into());
        self
    }

    /// Declare a platform-conditioned removal
    pub fn with_removal(mut self, when: Predicate, options: &[&str]) -> Self {
        self.remove.push(OptionRemoval {
            when,
            options: options.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Domain of a boolean option
    pub fn boolean() -> Vec<OptionValue> {
        vec![OptionValue::Bool(true), OptionValue::Bool(false)]
    }

    /// Find the domain value matching `value`
    pub fn coerce(&self, name: &str, value: &OptionValue) -> Result<OptionValue> {
        let domain = self
            .domains
            .get(name)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;

        domain
            .iter()
            .find(|allowed| allowed.matches(value))
            .cloned()
            .ok_or_else(|| Error::InvalidOptionValue {
                option: name.to_string(),
                value: value.to_string(),
            })
    }

    /// Check the static schema invariants
    ///
    /// Every domain is non-empty, every default names a declared option and
    /// lies in that option's domain, and every removal names declared options.
    pub fn check(&self) -> Result<()> {
        for (name, domain) in &self.domains {
            if domain.is_empty() {
                return Err(Error::ValidationFailed(format!(
                    "Option '{}' has an empty domain",
                    name
                )));
            }
        }

        for (name, value) in &self.defaults {
            let Some(domain) = self.domains.get(name) else {
                return Err(Error::ValidationFailed(format!(
                    "Default given for undeclared option '{}'",
                    name
                )));
            };
            if !domain.iter().any(|allowed| allowed.matches(value)) {
                return Err(Error::ValidationFailed(format!(
                    "Default '{}' for option '{}' is outside its domain",
                    value, name
                )));
            }
        }

        for removal in &self.remove {
            for name in &removal.options {
                if !self.domains.contains_key(name) {
                    return Err(Error::ValidationFailed(format!(
                        "Removal names undeclared option '{}'",
                        name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// User-supplied option values, keyed by option name
pub type UserOverrides = IndexMap<String, OptionValue>;

/// Concrete option values after resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: IndexMap<String, OptionValue>,
}

impl ResolvedConfig {
    /// Value of an option, if present
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Whether the option is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Options in schema declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for ResolvedConfig {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Resolve the option set for a platform
///
/// Fails with [`Error::UnknownOption`] for overrides naming undeclared
/// options and [`Error::InvalidOptionValue`] for overrides outside the
/// domain. Options with neither default nor override stay absent.
pub fn resolve_options(
    schema: &OptionSchema,
    overrides: &UserOverrides,
    facts: &PlatformFacts,
) -> Result<ResolvedConfig> {
    schema.check()?;

    if let Some(unknown) = overrides.keys().find(|name| !schema.domains.contains_key(*name)) {
        return Err(Error::UnknownOption(unknown.clone()));
    }

    let mut values: IndexMap<String, OptionValue> = IndexMap::new();
    for name in schema.domains.keys() {
        let value = if let Some(value) = overrides.get(name) {
            let value = schema.coerce(name, value)?;
            debug!("Option override {} = {}", name, value);
            value
        } else if let Some(default) = schema.defaults.get(name) {
            schema.coerce(name, default)?
        } else {
            continue;
        };
        values.insert(name.clone(), value);
    }

    // Removal conditions see the configuration as it stood before any removal
    let before = ResolvedConfig {
        values: values.clone(),
    };
    for removal in &schema.remove {
        if removal.when.evaluate(&before, facts)? {
            for name in &removal.options {
                if values.shift_remove(name).is_some() {
                    debug!("Removed option {} ({})", name, removal.when);
                }
            }
        }
    }

    Ok(ResolvedConfig { values })
}
