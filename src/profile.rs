// src/profile.rs

//! User-side build profiles
//!
//! A profile pins platform settings and option values so they do not have
//! to be repeated on every command line:
//!
//! ```toml
//! configure_args = ["-GNinja"]
//!
//! [settings]
//! os = "Windows"
//! compiler = "msvc"
//! build_type = "Debug"
//! cppstd = 17
//!
//! [options]
//! shared = true
//! ```

use crate::error::{Error, Result};
use crate::platform::PlatformFacts;
use crate::recipe::options::{OptionValue, UserOverrides};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings, option values and extra configure arguments
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Profile {
    /// Platform fact overrides (`os`, `arch`, `compiler`, ...)
    #[serde(default)]
    pub settings: IndexMap<String, toml::Value>,

    /// Option overrides
    #[serde(default)]
    pub options: IndexMap<String, OptionValue>,

    /// Extra arguments for the configure step
    #[serde(default)]
    pub configure_args: Vec<String>,
}

impl Profile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading profile {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Apply every setting to `facts`, in file order
    pub fn apply_settings(&self, facts: &mut PlatformFacts) -> Result<()> {
        for (key, value) in &self.settings {
            facts.set(key, &setting_text(key, value)?)?;
        }
        Ok(())
    }

    /// Profile options with `cli` layered on top
    pub fn overrides_with(&self, cli: &UserOverrides) -> UserOverrides {
        let mut merged = self.options.clone();
        for (name, value) in cli {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

fn setting_text(key: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(Error::ParseError(format!(
            "Setting '{}' must be a scalar, got {}",
            key,
            other.type_str()
        ))),
    }
}
