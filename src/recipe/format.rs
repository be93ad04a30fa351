// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that declare a package's identity, its options,
//! its requirements, and how its options reach the build tool.

use crate::error::{Error, Result};
use crate::platform::PlatformFacts;
use crate::recipe::options::OptionSchema;
use crate::recipe::requirements::Requirement;
use crate::recipe::toolchain::ToolchainSection;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A complete recipe
///
/// Loaded once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Package identity and metadata
    pub package: PackageSection,

    /// Static checks run before anything else
    #[serde(default)]
    pub validate: ValidateSection,

    /// Option schema, defaults, and platform removals
    #[serde(default)]
    pub options: OptionSchema,

    /// Link-time requirements
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// Build-tool requirements
    #[serde(default)]
    pub tool_requires: Vec<Requirement>,

    /// Source and build folder layout
    #[serde(default)]
    pub layout: LayoutSection,

    /// How options become build-system variables
    #[serde(default)]
    pub toolchain: ToolchainSection,

    /// Artifacts the package declares
    #[serde(default)]
    pub package_info: PackageInfoSection,
}

impl Recipe {
    /// `name/version` reference of this recipe
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package.name, self.package.version)
    }

    /// Check the minimum C++ standard against the platform
    ///
    /// Platforms that do not state a `cppstd` are accepted; the compiler's
    /// own default applies.
    pub fn check_min_cppstd(&self, facts: &PlatformFacts) -> Result<()> {
        let Some(required) = &self.validate.min_cppstd else {
            return Ok(());
        };
        let required_rank = cppstd_rank(required).ok_or_else(|| {
            Error::ValidationFailed(format!("Unknown C++ standard in recipe: {}", required))
        })?;

        let Some(actual) = &facts.cppstd else {
            debug!(
                "No cppstd setting; assuming compiler default satisfies C++{}",
                required
            );
            return Ok(());
        };
        let actual_rank = cppstd_rank(actual).ok_or_else(|| {
            Error::ValidationFailed(format!("Unknown C++ standard setting: {}", actual))
        })?;

        if actual_rank < required_rank {
            return Err(Error::ValidationFailed(format!(
                "{} requires at least C++{}, but cppstd is {}",
                self.reference(),
                required,
                actual
            )));
        }
        Ok(())
    }
}

/// Order C++ standards: "98" < "11" < ... < "23"; a `gnu` prefix is ignored
fn cppstd_rank(value: &str) -> Option<u32> {
    let digits = value.trim().trim_start_matches("gnu");
    let year: u32 = digits.parse().ok()?;
    match year {
        98 => Some(1998),
        3 => Some(2003),
        11 | 14 | 17 | 20 | 23 | 26 => Some(2000 + year),
        _ => None,
    }
}

/// Package identity and metadata section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version (semantic version)
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Homepage or repository URL
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Search tags
    #[serde(default)]
    pub topics: Vec<String>,

    /// Source globs exported with the recipe
    #[serde(default)]
    pub exports_sources: Vec<String>,
}

/// Static validation section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateSection {
    /// Minimum C++ standard, e.g. "17"
    #[serde(default)]
    pub min_cppstd: Option<String>,
}

/// Folder layout, relative to the recipe's directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(default = "default_source_folder")]
    pub source_folder: String,

    #[serde(default = "default_build_folder")]
    pub build_folder: String,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            source_folder: default_source_folder(),
            build_folder: default_build_folder(),
        }
    }
}

fn default_source_folder() -> String {
    ".".to_string()
}

fn default_build_folder() -> String {
    "build".to_string()
}

/// Declared package artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfoSection {
    /// Library names the package provides
    #[serde(default)]
    pub libs: Vec<String>,

    /// Executable names the package provides
    #[serde(default)]
    pub bins: Vec<String>,
}
