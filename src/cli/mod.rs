// src/cli/mod.rs
//! CLI definitions for brigade
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brigade")]
#[command(author = "Brigade Contributors")]
#[command(version)]
#[command(about = "Evaluate declarative build recipes and cook them with CMake", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every recipe command
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    /// Path to the recipe file
    #[arg(default_value = "brigade.toml")]
    pub recipe: PathBuf,

    /// Option override as name=value (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Platform setting as key=value, e.g. os=Windows (repeatable)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Profile file with settings, options and configure arguments
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Dependency package cache (default: user cache dir)
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve options and dependencies without building
    Inspect {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the recipe and write toolchain files
    Generate {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Build folder (default: from the recipe layout)
        #[arg(short, long)]
        build_folder: Option<PathBuf>,
    },

    /// Run every phase: validate, generate, configure, build, package, describe
    Cook {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Build folder (default: from the recipe layout)
        #[arg(short, long)]
        build_folder: Option<PathBuf>,

        /// Install prefix for the package phase (default: <build>/package)
        #[arg(long)]
        package_folder: Option<PathBuf>,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Extra argument for the configure step (repeatable)
        #[arg(long = "configure-arg", value_name = "ARG", allow_hyphen_values = true)]
        configure_args: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the package descriptor as JSON
    Describe {
        /// Path to the recipe file
        #[arg(default_value = "brigade.toml")]
        recipe: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
