// src/recipe/predicate.rs

//! Conditions over the resolved configuration and platform facts
//!
//! Recipes gate requirements and option removals with a small closed set of
//! condition kinds. In TOML:
//!
//! ```toml
//! when = "always"
//! when = { platform = { fact = "os", equals = "Windows" } }
//! when = { option = { name = "with_examples", equals = true } }
//! when = { all = [ { option = { name = "shared", equals = false } },
//!                  { not = { platform = { fact = "os", equals = "Macos" } } } ] }
//! ```
//!
//! Evaluation is total and side-effect free. Every option a condition
//! mentions must exist in the resolved configuration, including options in
//! branches that short-circuiting would never reach.

use crate::error::{Error, Result};
use crate::platform::{PlatformFact, PlatformFacts};
use crate::recipe::options::{OptionValue, ResolvedConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition attached to a requirement or option removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Always true
    Always,
    /// A platform fact equals a value (ASCII case-insensitive)
    Platform { fact: PlatformFact, equals: String },
    /// A resolved option equals a value
    Option { name: String, equals: OptionValue },
    /// All sub-conditions hold (true when empty)
    All(Vec<Predicate>),
    /// At least one sub-condition holds (false when empty)
    Any(Vec<Predicate>),
    /// The sub-condition does not hold
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn platform(fact: PlatformFact, equals: impl Into<String>) -> Self {
        Self::Platform {
            fact,
            equals: equals.into(),
        }
    }

    pub fn option(name: impl Into<String>, equals: impl Into<OptionValue>) -> Self {
        Self::Option {
            name: name.into(),
            equals: equals.into(),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Names of every option this condition mentions
    pub fn referenced_options(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_options(&mut names);
        names
    }

    fn collect_options<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Always | Self::Platform { .. } => {}
            Self::Option { name, .. } => names.push(name),
            Self::All(items) | Self::Any(items) => {
                for item in items {
                    item.collect_options(names);
                }
            }
            Self::Not(inner) => inner.collect_options(names),
        }
    }

    /// Evaluate against a configuration and platform snapshot
    pub fn evaluate(&self, config: &ResolvedConfig, facts: &PlatformFacts) -> Result<bool> {
        if let Some(missing) = self
            .referenced_options()
            .into_iter()
            .find(|name| !config.contains(name))
        {
            return Err(Error::UndefinedOptionReference(missing.to_string()));
        }
        Ok(self.holds(config, facts))
    }

    fn holds(&self, config: &ResolvedConfig, facts: &PlatformFacts) -> bool {
        match self {
            Self::Always => true,
            Self::Platform { fact, equals } => facts
                .get(*fact)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(equals)),
            Self::Option { name, equals } => {
                config.get(name).is_some_and(|actual| actual.matches(equals))
            }
            Self::All(items) => items.iter().all(|p| p.holds(config, facts)),
            Self::Any(items) => items.iter().any(|p| p.holds(config, facts)),
            Self::Not(inner) => !inner.holds(config, facts),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: &[Predicate]| {
            items
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Always => write!(f, "always"),
            Self::Platform { fact, equals } => write!(f, "{} == {}", fact, equals),
            Self::Option { name, equals } => write!(f, "options.{} == {}", name, equals),
            Self::All(items) => write!(f, "all({})", join(items)),
            Self::Any(items) => write!(f, "any({})", join(items)),
            Self::Not(inner) => write!(f, "not({})", inner),
        }
    }
}
