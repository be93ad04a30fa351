// src/recipe/requirements.rs

//! Dependency requirements and their resolution
//!
//! Requirements are evaluated in declaration order. The order survives into
//! the generated dependency files and therefore into link order, so it must
//! be stable for identical inputs.
//!
//! Duplicates are collapsed by name: the first requirement whose condition
//! holds wins, and later versions of the same name are dropped without error.
//! Requirements whose condition is false never take part in deduplication.

use crate::error::{Error, Result};
use crate::platform::PlatformFacts;
use crate::recipe::options::ResolvedConfig;
use crate::recipe::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A dependency identity: `name/version`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a `name/version` reference
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || Error::ParseError(format!("Invalid dependency reference: '{}'", reference));

        let (name, version) = reference.trim().split_once('/').ok_or_else(invalid)?;
        let (name, version) = (name.trim(), version.trim());
        if name.is_empty() || version.is_empty() || version.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Dependency {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Dependency::parse(s)
    }
}

impl TryFrom<String> for Dependency {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Dependency::parse(&value)
    }
}

impl From<Dependency> for String {
    fn from(dep: Dependency) -> Self {
        dep.to_string()
    }
}

/// A requirement rule from a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// The dependency to require
    #[serde(rename = "ref")]
    pub dependency: Dependency,

    /// Condition gating the requirement; absent means unconditional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Predicate>,
}

impl Requirement {
    /// An unconditional requirement
    pub fn always(dependency: Dependency) -> Self {
        Self {
            dependency,
            when: None,
        }
    }

    /// A requirement gated by a condition
    pub fn when(dependency: Dependency, condition: Predicate) -> Self {
        Self {
            dependency,
            when: Some(condition),
        }
    }

    fn applies(&self, config: &ResolvedConfig, facts: &PlatformFacts) -> Result<bool> {
        match &self.when {
            Some(condition) => condition.evaluate(config, facts),
            None => Ok(true),
        }
    }
}

/// Concrete dependencies for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    /// Link-time dependencies, in link order
    pub requires: Vec<Dependency>,
    /// Build-tool dependencies, never linked
    pub tool_requires: Vec<Dependency>,
}

/// Resolve requirement rules into a dependency graph
pub fn resolve_dependencies(
    requires: &[Requirement],
    tool_requires: &[Requirement],
    config: &ResolvedConfig,
    facts: &PlatformFacts,
) -> Result<DependencyGraph> {
    Ok(DependencyGraph {
        requires: select(requires, config, facts)?,
        tool_requires: select(tool_requires, config, facts)?,
    })
}

fn select(
    rules: &[Requirement],
    config: &ResolvedConfig,
    facts: &PlatformFacts,
) -> Result<Vec<Dependency>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected = Vec::new();

    for rule in rules {
        let dep = &rule.dependency;
        if !rule.applies(config, facts)? {
            debug!("Skipping {}: condition not met", dep);
            continue;
        }
        if !seen.insert(dep.name.as_str()) {
            debug!("Ignoring {}: {} already required", dep, dep.name);
            continue;
        }
        selected.push(dep.clone());
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Os, PlatformFact};
    use crate::recipe::options::OptionValue;

    fn facts() -> PlatformFacts {
        PlatformFacts::new(Os::Linux, "x86_64")
    }

    fn config() -> ResolvedConfig {
        [("examples".to_string(), OptionValue::Bool(true))]
            .into_iter()
            .collect()
    }

    fn dep(reference: &str) -> Dependency {
        Dependency::parse(reference).unwrap()
    }

    #[test]
    fn test_parse_reference() {
        let d = dep("vulkan-headers/1.3.243.0");
        assert_eq!(d.name, "vulkan-headers");
        assert_eq!(d.version, "1.3.243.0");
        assert_eq!(d.to_string(), "vulkan-headers/1.3.243.0");
    }

    #[test]
    fn test_parse_invalid_reference() {
        assert!(Dependency::parse("glfw").is_err());
        assert!(Dependency::parse("/3.3.8").is_err());
        assert!(Dependency::parse("glfw/").is_err());
        assert!(Dependency::parse("glfw/3.3/8").is_err());
    }

    #[test]
    fn test_unconditional_in_order() {
        let rules = vec![
            Requirement::always(dep("glfw/3.3.8")),
            Requirement::always(dep("vulkan-headers/1.3.243.0")),
        ];
        let graph = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert_eq!(
            graph.requires,
            vec![dep("glfw/3.3.8"), dep("vulkan-headers/1.3.243.0")]
        );
        assert!(graph.tool_requires.is_empty());
    }

    #[test]
    fn test_false_condition_excluded() {
        let rules = vec![
            Requirement::when(dep("lib/1.0"), Predicate::option("examples", false)),
            Requirement::when(dep("lib/2.0"), Predicate::option("examples", true)),
        ];
        let graph = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert_eq!(graph.requires, vec![dep("lib/2.0")]);
    }

    #[test]
    fn test_false_condition_alone_yields_nothing() {
        let rules = vec![Requirement::when(
            dep("lib/1.0"),
            Predicate::option("examples", false),
        )];
        let graph = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert!(graph.requires.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let rules = vec![
            Requirement::always(dep("zlib/1.2.13")),
            Requirement::always(dep("glfw/3.3.8")),
            Requirement::when(dep("zlib/1.3.1"), Predicate::Always),
        ];
        let graph = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert_eq!(graph.requires, vec![dep("zlib/1.2.13"), dep("glfw/3.3.8")]);
    }

    #[test]
    fn test_tool_requires_kept_separate() {
        let rules = vec![Requirement::always(dep("glfw/3.3.8"))];
        let tools = vec![Requirement::always(dep("cmake/3.22.6"))];
        let graph = resolve_dependencies(&rules, &tools, &config(), &facts()).unwrap();
        assert_eq!(graph.requires, vec![dep("glfw/3.3.8")]);
        assert_eq!(graph.tool_requires, vec![dep("cmake/3.22.6")]);
    }

    #[test]
    fn test_same_name_in_requires_and_tools_not_deduped() {
        let rules = vec![Requirement::always(dep("protobuf/3.21.12"))];
        let tools = vec![Requirement::always(dep("protobuf/3.21.12"))];
        let graph = resolve_dependencies(&rules, &tools, &config(), &facts()).unwrap();
        assert_eq!(graph.requires.len(), 1);
        assert_eq!(graph.tool_requires.len(), 1);
    }

    #[test]
    fn test_undefined_option_reference_fails() {
        let rules = vec![Requirement::when(dep("lib/1.0"), Predicate::option("fPIC", true))];
        let err = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap_err();
        assert!(matches!(err, Error::UndefinedOptionReference(name) if name == "fPIC"));
    }

    #[test]
    fn test_platform_gated_requirement() {
        let rules = vec![Requirement::when(
            dep("wayland/1.22.0"),
            Predicate::platform(PlatformFact::Os, "Linux"),
        )];
        let linux = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert_eq!(linux.requires.len(), 1);

        let windows = PlatformFacts::new(Os::Windows, "x86_64");
        let graph = resolve_dependencies(&rules, &[], &config(), &windows).unwrap();
        assert!(graph.requires.is_empty());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let rules = vec![
            Requirement::always(dep("b/1")),
            Requirement::when(dep("a/1"), Predicate::option("examples", true)),
            Requirement::always(dep("b/2")),
            Requirement::always(dep("c/1")),
        ];
        let first = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        let second = resolve_dependencies(&rules, &[], &config(), &facts()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.requires, vec![dep("b/1"), dep("a/1"), dep("c/1")]);
    }

    #[test]
    fn test_requirement_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            requires: Vec<Requirement>,
        }

        let holder: Holder = toml::from_str(
            r#"
[[requires]]
ref = "glfw/3.3.8"

[[requires]]
ref = "vulkan-headers/1.3.243.0"
when = { option = { name = "examples", equals = true } }
"#,
        )
        .unwrap();
        assert_eq!(holder.requires[0], Requirement::always(dep("glfw/3.3.8")));
        assert!(holder.requires[1].when.is_some());

        let bad: std::result::Result<Holder, _> = toml::from_str("[[requires]]\nref = \"glfw\"\n");
        assert!(bad.is_err());
    }
}
