// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use brigade::recipe::{BuildLayout, BuildTool, ToolchainVariables};
use brigade::{Os, PlatformFacts, Phase};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Recipe modelled on a small graphics library with platform-dependent options
pub const GVW_RECIPE: &str = r#"
[package]
name = "gvw"
version = "1.0.0"
license = "MIT"
description = "GLFW and Vulkan widgets"
topics = ["C++", "GLFW", "Vulkan"]

[validate]
min_cppstd = "17"

[options.domains]
shared = [true, false]
fPIC = [true, false]
gvw_static = [true, false]
gvw_examples = [true, false]

[options.defaults]
shared = false
fPIC = true
gvw_static = true
gvw_examples = false

[[options.remove]]
when = { platform = { fact = "os", equals = "Windows" } }
options = ["fPIC"]

[[requires]]
ref = "glfw/3.3.8"

[[requires]]
ref = "vulkan-headers/1.3.243.0"
when = { option = { name = "gvw_examples", equals = true } }

[[tool_requires]]
ref = "ninja/1.11.1"

[toolchain]
constants = { GVW_BRIGADE = true }

[toolchain.variables]
fPIC = { name = "CMAKE_POSITION_INDEPENDENT_CODE", transform = "on-off" }

[package_info]
libs = ["gvw"]
"#;

/// Write `content` as `brigade.toml` in `dir`
pub fn write_recipe(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("brigade.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Create `<root>/<name>/<version>/{include,lib,bin}` for each package
pub fn populate_cache(root: &Path, packages: &[(&str, &str)]) {
    for (name, version) in packages {
        let dir = root.join(name).join(version);
        for sub in ["include", "lib", "bin"] {
            fs::create_dir_all(dir.join(sub)).unwrap();
        }
    }
}

pub fn linux() -> PlatformFacts {
    PlatformFacts::new(Os::Linux, "x86_64").with_cppstd("17")
}

pub fn windows() -> PlatformFacts {
    PlatformFacts::new(Os::Windows, "x86_64").with_cppstd("17")
}

/// Build tool that records calls and fails one phase on request
#[derive(Default)]
pub struct RecordingTool {
    pub calls: Mutex<Vec<Phase>>,
    pub configure_args: Mutex<Vec<String>>,
    pub layouts: Mutex<Vec<BuildLayout>>,
    pub fail: Option<(Phase, i32)>,
}

impl RecordingTool {
    pub fn failing(phase: Phase, exit_status: i32) -> Self {
        Self {
            fail: Some((phase, exit_status)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Phase> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, phase: Phase, layout: &BuildLayout) -> i32 {
        self.calls.lock().unwrap().push(phase);
        self.layouts.lock().unwrap().push(layout.clone());
        match self.fail {
            Some((failing, status)) if failing == phase => status,
            _ => 0,
        }
    }
}

impl BuildTool for RecordingTool {
    fn configure(
        &self,
        layout: &BuildLayout,
        variables: &ToolchainVariables,
        extra_args: &[String],
    ) -> brigade::Result<i32> {
        let mut args = variables.to_cmake_args();
        args.extend(extra_args.iter().cloned());
        *self.configure_args.lock().unwrap() = args;
        Ok(self.record(Phase::Configure, layout))
    }

    fn build(&self, layout: &BuildLayout) -> brigade::Result<i32> {
        Ok(self.record(Phase::Build, layout))
    }

    fn install(&self, layout: &BuildLayout) -> brigade::Result<i32> {
        Ok(self.record(Phase::Package, layout))
    }
}
