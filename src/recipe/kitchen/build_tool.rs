// src/recipe/kitchen/build_tool.rs

//! External build tool invocation

use crate::error::{Error, Result};
use crate::platform::BuildType;
use crate::recipe::toolchain::{ToolchainVariables, TOOLCHAIN_FILE};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Folders and settings shared by every build tool call in one cook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub generators_folder: PathBuf,
    pub package_folder: PathBuf,
    pub build_type: BuildType,
    pub jobs: Option<u32>,
    /// Directories prepended to `PATH` (tool requirement `bin` dirs)
    pub tool_paths: Vec<PathBuf>,
}

/// The external build system
///
/// Each call blocks until the tool exits and returns its raw exit status.
/// Failing to start the tool at all is an [`Error::Io`].
pub trait BuildTool: Send + Sync {
    /// Configure the build tree
    fn configure(
        &self,
        layout: &BuildLayout,
        variables: &ToolchainVariables,
        extra_args: &[String],
    ) -> Result<i32>;

    /// Build the configured tree
    fn build(&self, layout: &BuildLayout) -> Result<i32>;

    /// Install build output into the package folder
    fn install(&self, layout: &BuildLayout) -> Result<i32>;
}

/// CMake driven through its command line
#[derive(Debug, Clone)]
pub struct CMakeTool {
    program: PathBuf,
}

impl CMakeTool {
    /// Use `cmake` as found on `PATH` at execution time
    pub fn new() -> Self {
        Self::with_program("cmake")
    }

    /// Use a specific cmake executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find cmake on `PATH` now, failing early if it is missing
    pub fn locate() -> Result<Self> {
        let program = which::which("cmake").map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("cmake not found in PATH: {}", e),
            ))
        })?;
        debug!("Using cmake at {}", program.display());
        Ok(Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for the configure call
    pub fn configure_args(
        layout: &BuildLayout,
        variables: &ToolchainVariables,
        extra_args: &[String],
    ) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            layout.source_folder.display().to_string(),
            "-B".to_string(),
            layout.build_folder.display().to_string(),
            format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                layout.generators_folder.join(TOOLCHAIN_FILE).display()
            ),
            format!("-DCMAKE_BUILD_TYPE={}", layout.build_type),
        ];
        args.extend(variables.to_cmake_args());
        args.extend(extra_args.iter().cloned());
        args
    }

    /// Arguments for the build call
    pub fn build_args(layout: &BuildLayout) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            layout.build_folder.display().to_string(),
            "--config".to_string(),
            layout.build_type.to_string(),
        ];
        if let Some(jobs) = layout.jobs {
            args.push("--parallel".to_string());
            args.push(jobs.to_string());
        }
        args
    }

    /// Arguments for the install call
    pub fn install_args(layout: &BuildLayout) -> Vec<String> {
        vec![
            "--install".to_string(),
            layout.build_folder.display().to_string(),
            "--config".to_string(),
            layout.build_type.to_string(),
            "--prefix".to_string(),
            layout.package_folder.display().to_string(),
        ]
    }

    fn run(&self, step: &str, args: &[String], layout: &BuildLayout) -> Result<i32> {
        info!("Running cmake {}", step);
        debug!("Command: {} {}", self.program.display(), args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(args);
        if !layout.tool_paths.is_empty() {
            command.env("PATH", prefixed_path(&layout.tool_paths)?);
        }

        let status = command.status().map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to run {}: {}", self.program.display(), e),
            ))
        })?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                warn!("cmake {} was terminated by a signal", step);
                Ok(-1)
            }
        }
    }
}

impl Default for CMakeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildTool for CMakeTool {
    fn configure(
        &self,
        layout: &BuildLayout,
        variables: &ToolchainVariables,
        extra_args: &[String],
    ) -> Result<i32> {
        let args = Self::configure_args(layout, variables, extra_args);
        self.run("configure", &args, layout)
    }

    fn build(&self, layout: &BuildLayout) -> Result<i32> {
        self.run("build", &Self::build_args(layout), layout)
    }

    fn install(&self, layout: &BuildLayout) -> Result<i32> {
        self.run("install", &Self::install_args(layout), layout)
    }
}

/// `PATH` with `dirs` in front of the current value
fn prefixed_path(dirs: &[PathBuf]) -> Result<OsString> {
    let mut paths: Vec<PathBuf> = dirs.to_vec();
    if let Some(current) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(paths).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Cannot build PATH: {}", e),
        ))
    })
}
