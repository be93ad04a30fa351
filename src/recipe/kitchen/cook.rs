// src/recipe/kitchen/cook.rs

//! Cook: phase-by-phase execution of a single recipe

use crate::error::{Error, Result};
use crate::platform::PlatformFacts;
use crate::recipe::descriptor::PackageDescriptor;
use crate::recipe::evaluation::{evaluate, Evaluation};
use crate::recipe::fetch::DependencyLocator;
use crate::recipe::format::Recipe;
use crate::recipe::options::UserOverrides;
use crate::recipe::toolchain::{generate_toolchain, write_generated_files, ToolchainVariables};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use super::build_tool::BuildLayout;
use super::config::CookResult;
use super::phase::{Phase, PhaseState};
use super::Kitchen;

/// A single cook operation
///
/// Phases must be called in order. Calling one out of order fails with
/// [`Error::PhaseOrder`] and leaves the state untouched.
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a Recipe,
    facts: &'a PlatformFacts,
    overrides: &'a UserOverrides,
    state: PhaseState,
    evaluation: Option<Evaluation>,
    variables: ToolchainVariables,
    /// Link-time dependency locations
    locators: Vec<DependencyLocator>,
    /// Tool dependency locations, only used for `PATH`
    tool_locators: Vec<DependencyLocator>,
    generated_files: Vec<PathBuf>,
    descriptor: Option<PackageDescriptor>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        facts: &'a PlatformFacts,
        overrides: &'a UserOverrides,
    ) -> Self {
        Self {
            kitchen,
            recipe,
            facts,
            overrides,
            state: PhaseState::Unvalidated,
            evaluation: None,
            variables: ToolchainVariables::default(),
            locators: Vec::new(),
            tool_locators: Vec::new(),
            generated_files: Vec::new(),
            descriptor: None,
        }
    }

    /// Current state
    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// Evaluation produced by the validate phase
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn variables(&self) -> &ToolchainVariables {
        &self.variables
    }

    /// Run one named phase
    pub fn run(&mut self, phase: Phase) -> Result<()> {
        match phase {
            Phase::Validate => self.validate(),
            Phase::Generate => self.generate(),
            Phase::Configure => self.configure(),
            Phase::Build => self.build(),
            Phase::Package => self.package(),
            Phase::Describe => self.describe().map(|_| ()),
        }
    }

    /// Validate the recipe and resolve options and dependencies
    pub fn validate(&mut self) -> Result<()> {
        self.state.admit(Phase::Validate)?;

        let evaluation = evaluate(self.recipe, self.facts, self.overrides)?;
        self.evaluation = Some(evaluation);

        self.state = Phase::Validate.completes();
        Ok(())
    }

    /// Locate dependencies and write toolchain and config files
    pub fn generate(&mut self) -> Result<()> {
        self.state.admit(Phase::Generate)?;
        let evaluation = self.resolved()?;

        let fetcher = &self.kitchen.fetcher;
        let locators = fetcher.locate_all(&evaluation.graph.requires)?;
        let tool_locators = fetcher.locate_all(&evaluation.graph.tool_requires)?;
        let variables = generate_toolchain(&self.recipe.toolchain, &evaluation.config);

        let generators = self.kitchen.config.generators_dir();
        fs::create_dir_all(&generators)?;
        let generated_files =
            write_generated_files(&generators, &self.recipe.reference(), &variables, &locators)?;

        self.locators = locators;
        self.tool_locators = tool_locators;
        self.variables = variables;
        self.generated_files = generated_files;

        self.state = Phase::Generate.completes();
        Ok(())
    }

    /// Configure the build tree with the generated variables
    pub fn configure(&mut self) -> Result<()> {
        self.state.admit(Phase::Configure)?;

        let layout = self.layout();
        fs::create_dir_all(&layout.build_folder)?;
        let status = self.kitchen.tool.configure(
            &layout,
            &self.variables,
            &self.kitchen.config.configure_args,
        )?;
        check_status(Phase::Configure, status)?;

        self.state = Phase::Configure.completes();
        Ok(())
    }

    /// Build the configured tree
    pub fn build(&mut self) -> Result<()> {
        self.state.admit(Phase::Build)?;

        let status = self.kitchen.tool.build(&self.layout())?;
        check_status(Phase::Build, status)?;

        self.state = Phase::Build.completes();
        Ok(())
    }

    /// Install build output into the package folder
    pub fn package(&mut self) -> Result<()> {
        self.state.admit(Phase::Package)?;

        let status = self.kitchen.tool.install(&self.layout())?;
        check_status(Phase::Package, status)?;

        self.state = Phase::Package.completes();
        Ok(())
    }

    /// Produce the package descriptor
    pub fn describe(&mut self) -> Result<&PackageDescriptor> {
        self.state.admit(Phase::Describe)?;

        let descriptor = PackageDescriptor::from_recipe(self.recipe);
        debug!(
            "Package {} declares {} lib(s), {} bin(s)",
            self.recipe.reference(),
            descriptor.libs.len(),
            descriptor.bins.len()
        );

        self.state = Phase::Describe.completes();
        Ok(&*self.descriptor.insert(descriptor))
    }

    /// Consume a fully described cook
    pub fn finish(self) -> Result<CookResult> {
        let (Some(evaluation), Some(descriptor)) = (self.evaluation, self.descriptor) else {
            return Err(Error::PhaseOrder {
                attempted: Phase::Describe,
                state: self.state,
            });
        };

        info!(
            "Cooked {} into {}",
            self.recipe.reference(),
            self.kitchen.config.package_dir().display()
        );

        Ok(CookResult {
            descriptor,
            config: evaluation.config,
            graph: evaluation.graph,
            variables: self.variables,
            locators: self.locators,
            generated_files: self.generated_files,
            package_folder: self.kitchen.config.package_dir(),
            warnings: evaluation.warnings,
        })
    }

    fn resolved(&self) -> Result<&Evaluation> {
        self.evaluation.as_ref().ok_or(Error::PhaseOrder {
            attempted: Phase::Generate,
            state: self.state,
        })
    }

    fn layout(&self) -> BuildLayout {
        let config = &self.kitchen.config;
        BuildLayout {
            source_folder: config.source_folder.clone(),
            build_folder: config.build_folder.clone(),
            generators_folder: config.generators_dir(),
            package_folder: config.package_dir(),
            build_type: self.facts.build_type,
            jobs: config.jobs,
            tool_paths: self
                .tool_locators
                .iter()
                .flat_map(|locator| locator.bin_dirs.iter().cloned())
                .collect(),
        }
    }
}

fn check_status(phase: Phase, exit_status: i32) -> Result<()> {
    if exit_status == 0 {
        Ok(())
    } else {
        Err(Error::ExternalBuildFailure { phase, exit_status })
    }
}
