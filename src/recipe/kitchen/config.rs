// src/recipe/kitchen/config.rs

//! Configuration and result types for the Kitchen

use super::phase::{Phase, PhaseState};
use crate::error::Error;
use crate::recipe::descriptor::PackageDescriptor;
use crate::recipe::fetch::DependencyLocator;
use crate::recipe::format::Recipe;
use crate::recipe::options::ResolvedConfig;
use crate::recipe::requirements::DependencyGraph;
use crate::recipe::toolchain::ToolchainVariables;
use std::path::{Path, PathBuf};

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Folder containing the top-level build script (CMakeLists.txt)
    pub source_folder: PathBuf,
    /// Folder the build tool configures into
    pub build_folder: PathBuf,
    /// Folder for generated files (default: `<build>/generators`)
    pub generators_folder: Option<PathBuf>,
    /// Install prefix for the package phase (default: `<build>/package`)
    pub package_folder: Option<PathBuf>,
    /// Extra configure arguments, passed in order after generated ones
    ///
    /// Entries are concatenated positionally; duplicates are not merged.
    pub configure_args: Vec<String>,
    /// Parallel build jobs handed to the build tool (None = tool default)
    pub jobs: Option<u32>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from("."),
            build_folder: PathBuf::from("build"),
            generators_folder: None,
            package_folder: None,
            configure_args: Vec::new(),
            jobs: None,
        }
    }
}

impl KitchenConfig {
    /// Configuration following a recipe's `[layout]`, relative to `recipe_dir`
    pub fn for_recipe(recipe: &Recipe, recipe_dir: &Path) -> Self {
        Self {
            source_folder: recipe_dir.join(&recipe.layout.source_folder),
            build_folder: recipe_dir.join(&recipe.layout.build_folder),
            ..Self::default()
        }
    }

    /// Append extra configure arguments
    pub fn with_configure_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.configure_args.extend(args);
        self
    }

    pub fn generators_dir(&self) -> PathBuf {
        self.generators_folder
            .clone()
            .unwrap_or_else(|| self.build_folder.join("generators"))
    }

    pub fn package_dir(&self) -> PathBuf {
        self.package_folder
            .clone()
            .unwrap_or_else(|| self.build_folder.join("package"))
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Declared package output
    pub descriptor: PackageDescriptor,
    /// Options the package was built with
    pub config: ResolvedConfig,
    /// Dependencies it was built against
    pub graph: DependencyGraph,
    /// Variables handed to the build tool
    pub variables: ToolchainVariables,
    /// Install paths of link-time dependencies, in link order
    pub locators: Vec<DependencyLocator>,
    /// Files written by the generate phase
    pub generated_files: Vec<PathBuf>,
    /// Where the package phase installed to
    pub package_folder: PathBuf,
    /// Recipe warnings
    pub warnings: Vec<String>,
}

/// A cook that stopped before reaching `Described`
#[derive(thiserror::Error, Debug)]
#[error("{phase} phase failed (reached {reached}): {error}")]
pub struct CookFailure {
    /// Phase that failed
    pub phase: Phase,
    /// Last state successfully reached
    pub reached: PhaseState,
    /// The underlying error
    #[source]
    pub error: Error,
}
