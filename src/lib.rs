// src/lib.rs

//! Brigade: declarative build recipes for C++ packages
//!
//! A recipe declares a package's options, its conditional dependencies and
//! how its options reach CMake. Brigade evaluates the recipe against the
//! platform, writes the toolchain files, and drives CMake through the
//! configure, build and install steps.
//!
//! # Architecture
//!
//! - Option resolution: schema defaults, user overrides, platform removals
//! - Dependency resolution: predicate-gated requirements, first wins
//! - Toolchain generation: resolved options become CMake cache variables
//! - Kitchen: strictly ordered phases around an external build tool

mod error;
pub mod platform;
pub mod profile;
pub mod recipe;

pub use error::{Error, Result};
pub use platform::{BuildType, HostProbe, Os, PlatformFact, PlatformFacts, PlatformProbe};
pub use profile::Profile;
pub use recipe::{
    evaluate, parse_recipe, parse_recipe_file, Cook, CookFailure, CookResult, Kitchen,
    KitchenConfig, PackageDescriptor, Phase, PhaseState, Recipe,
};
