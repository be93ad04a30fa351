// src/recipe/mod.rs

//! Recipe system for building packages from source
//!
//! A recipe declares a package's options, how those options depend on the
//! platform, which other packages it needs under which conditions, and how
//! its options reach the build tool. Evaluating a recipe against a set of
//! platform facts yields a resolved configuration, a dependency graph and a
//! set of toolchain variables.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Cook**: Build a package from a recipe, phase by phase
//! - **Kitchen**: Runs cooks against a build tool and a dependency fetcher
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "gvw"
//! version = "1.0.0"
//! license = "MIT"
//!
//! [options.domains]
//! shared = [true, false]
//! fPIC = [true, false]
//!
//! [options.defaults]
//! shared = false
//! fPIC = true
//!
//! [[options.remove]]
//! when = { platform = { fact = "os", equals = "Windows" } }
//! options = ["fPIC"]
//!
//! [[requires]]
//! ref = "eigen/3.4.0"
//!
//! [package_info]
//! libs = ["gvw"]
//! ```

pub mod descriptor;
pub mod evaluation;
pub mod fetch;
mod format;
pub mod kitchen;
pub mod options;
pub mod parser;
pub mod predicate;
pub mod requirements;
pub mod toolchain;

pub use descriptor::PackageDescriptor;
pub use evaluation::{evaluate, Evaluation};
pub use fetch::{DependencyFetcher, DependencyLocator, LocalCache};
pub use format::{LayoutSection, PackageInfoSection, PackageSection, Recipe, ValidateSection};
pub use kitchen::{
    BuildLayout, BuildTool, CMakeTool, Cook, CookFailure, CookResult, Kitchen, KitchenConfig,
    Phase, PhaseState,
};
pub use options::{
    resolve_options, OptionRemoval, OptionSchema, OptionValue, ResolvedConfig, UserOverrides,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use predicate::Predicate;
pub use requirements::{resolve_dependencies, Dependency, DependencyGraph, Requirement};
pub use toolchain::{
    generate_toolchain, write_generated_files, ToolchainSection, ToolchainValue,
    ToolchainVariables, ValueTransform, VariableMapping,
};
