// src/platform.rs

//! Platform facts consumed by recipe evaluation
//!
//! Facts are a read-only snapshot taken once per evaluation. The host is
//! probed through [`PlatformProbe`]; any fact can be overridden by name so
//! profiles and the command line can describe a different target.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Operating system of the build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    #[strum(serialize = "FreeBSD")]
    FreeBsd,
}

impl Os {
    /// Map a `std::env::consts::OS` value
    pub fn from_consts(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Macos),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }

    /// Compiler assumed when nothing else is known
    pub fn default_compiler(&self) -> &'static str {
        match self {
            Self::Linux => "gcc",
            Self::Windows => "msvc",
            Self::Macos => "apple-clang",
            Self::FreeBsd => "clang",
        }
    }
}

/// CMake-style build type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Name of a single platform fact, as used in recipe conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlatformFact {
    Os,
    Compiler,
    CompilerVersion,
    BuildType,
    Arch,
    Cppstd,
}

/// Snapshot of the build environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFacts {
    pub os: Os,
    pub compiler: String,
    #[serde(default)]
    pub compiler_version: Option<String>,
    #[serde(default)]
    pub build_type: BuildType,
    pub arch: String,
    /// C++ language standard the compiler is configured for (e.g. "17")
    #[serde(default)]
    pub cppstd: Option<String>,
}

impl PlatformFacts {
    /// Create facts for an OS and architecture with that OS's default compiler
    pub fn new(os: Os, arch: impl Into<String>) -> Self {
        Self {
            os,
            compiler: os.default_compiler().to_string(),
            compiler_version: None,
            build_type: BuildType::default(),
            arch: arch.into(),
            cppstd: None,
        }
    }

    /// Set the C++ standard
    pub fn with_cppstd(mut self, cppstd: impl Into<String>) -> Self {
        self.cppstd = Some(cppstd.into());
        self
    }

    /// Set the build type
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Textual value of a fact, if it is known
    pub fn get(&self, fact: PlatformFact) -> Option<String> {
        match fact {
            PlatformFact::Os => Some(self.os.to_string()),
            PlatformFact::Compiler => Some(self.compiler.clone()),
            PlatformFact::CompilerVersion => self.compiler_version.clone(),
            PlatformFact::BuildType => Some(self.build_type.to_string()),
            PlatformFact::Arch => Some(self.arch.clone()),
            PlatformFact::Cppstd => self.cppstd.clone(),
        }
    }

    /// Override a fact from `key=value` style input
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let fact = PlatformFact::from_str(key)
            .map_err(|_| Error::ParseError(format!("Unknown platform setting: {}", key)))?;
        match fact {
            PlatformFact::Os => {
                self.os = Os::from_str(value).map_err(|_| {
                    Error::ParseError(format!("Unknown operating system: {}", value))
                })?;
            }
            PlatformFact::Compiler => self.compiler = value.to_string(),
            PlatformFact::CompilerVersion => self.compiler_version = Some(value.to_string()),
            PlatformFact::BuildType => {
                self.build_type = BuildType::from_str(value)
                    .map_err(|_| Error::ParseError(format!("Unknown build type: {}", value)))?;
            }
            PlatformFact::Arch => self.arch = value.to_string(),
            PlatformFact::Cppstd => self.cppstd = Some(value.to_string()),
        }
        debug!("Platform setting {} = {}", fact, value);
        Ok(())
    }
}

impl fmt::Display for PlatformFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} arch={} compiler={} build_type={}",
            self.os, self.arch, self.compiler, self.build_type
        )?;
        if let Some(version) = &self.compiler_version {
            write!(f, " compiler_version={}", version)?;
        }
        if let Some(cppstd) = &self.cppstd {
            write!(f, " cppstd={}", cppstd)?;
        }
        Ok(())
    }
}

/// Source of platform facts
pub trait PlatformProbe {
    /// Take a snapshot of the build environment
    fn probe(&self) -> Result<PlatformFacts>;
}

/// Probe for the machine this process runs on
#[derive(Debug, Default, Clone)]
pub struct HostProbe;

impl PlatformProbe for HostProbe {
    fn probe(&self) -> Result<PlatformFacts> {
        let os = Os::from_consts(std::env::consts::OS).ok_or_else(|| {
            Error::ValidationFailed(format!(
                "Unsupported host operating system: {}",
                std::env::consts::OS
            ))
        })?;

        let mut facts = PlatformFacts::new(os, std::env::consts::ARCH);
        if let Ok(cxx) = std::env::var("CXX")
            && let Some(compiler) = compiler_from_path(&cxx, os)
        {
            facts.compiler = compiler.to_string();
        }

        debug!("Probed host platform: {}", facts);
        Ok(facts)
    }
}

/// Guess the compiler family from a `CXX`-style path
fn compiler_from_path(path: &str, os: Os) -> Option<&'static str> {
    let stem = Path::new(path).file_stem()?.to_str()?;
    if stem.contains("clang") {
        Some(if os == Os::Macos { "apple-clang" } else { "clang" })
    } else if stem.contains("g++") || stem.contains("gcc") {
        Some("gcc")
    } else if stem.eq_ignore_ascii_case("cl") {
        Some("msvc")
    } else {
        None
    }
}
