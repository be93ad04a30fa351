// src/recipe/toolchain.rs

//! Toolchain variable generation
//!
//! Every resolved option becomes exactly one build-system variable. The
//! variable name defaults to the option name in upper case
//! (`gvw_static` -> `GVW_STATIC`); the value transform comes from the
//! recipe's `[toolchain]` table, which is enumerated once:
//!
//! ```toml
//! [toolchain]
//! default_transform = "bool"
//! constants = { GVW_CONAN = true }
//!
//! [toolchain.variables]
//! fPIC = { name = "CMAKE_POSITION_INDEPENDENT_CODE", transform = "on-off" }
//! ```

use crate::error::Result;
use crate::recipe::fetch::DependencyLocator;
use crate::recipe::options::{OptionValue, ResolvedConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the generated CMake toolchain file
pub const TOOLCHAIN_FILE: &str = "brigade_toolchain.cmake";

/// Name of the generated dependency manifest
pub const DEPENDENCIES_FILE: &str = "dependencies.json";

/// How an option value is rendered for the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueTransform {
    /// Booleans become `ON` / `OFF`
    OnOff,
    /// Booleans stay booleans, rendered as `TRUE` / `FALSE`
    #[default]
    Bool,
    /// The option's own spelling (`True`, `False`, or the string)
    Verbatim,
}

impl ValueTransform {
    pub fn apply(&self, value: &OptionValue) -> ToolchainValue {
        match (self, value) {
            (Self::OnOff, OptionValue::Bool(b)) => {
                ToolchainValue::Str(if *b { "ON" } else { "OFF" }.to_string())
            }
            (Self::Bool, OptionValue::Bool(b)) => ToolchainValue::Bool(*b),
            (Self::Verbatim, OptionValue::Bool(_)) => ToolchainValue::Str(value.to_string()),
            (_, OptionValue::Str(s)) => ToolchainValue::Str(s.clone()),
        }
    }
}

/// Per-option entry of the toolchain table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMapping {
    /// Variable name, replacing the upper-cased option name
    #[serde(default)]
    pub name: Option<String>,
    /// Value transform, replacing the table default
    #[serde(default)]
    pub transform: Option<ValueTransform>,
}

/// The `[toolchain]` section of a recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainSection {
    #[serde(default)]
    pub default_transform: ValueTransform,

    /// Variables emitted regardless of options
    #[serde(default)]
    pub constants: IndexMap<String, ToolchainValue>,

    /// Per-option overrides of name and transform
    #[serde(default)]
    pub variables: IndexMap<String, VariableMapping>,
}

impl ToolchainSection {
    /// Variable name an option maps to
    pub fn variable_name(&self, option: &str) -> String {
        self.variables
            .get(option)
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| default_variable_name(option))
    }

    /// Transform an option uses
    pub fn transform(&self, option: &str) -> ValueTransform {
        self.variables
            .get(option)
            .and_then(|m| m.transform)
            .unwrap_or(self.default_transform)
    }
}

/// Upper-case the option name, replacing anything but `[A-Za-z0-9_]` with `_`
pub fn default_variable_name(option: &str) -> String {
    option
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// A scalar build-system variable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolchainValue {
    Bool(bool),
    Str(String),
}

impl ToolchainValue {
    /// CMake cache type for the value
    pub fn cmake_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "BOOL",
            Self::Str(_) => "STRING",
        }
    }
}

impl fmt::Display for ToolchainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Flat, ordered set of build-system variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolchainVariables {
    vars: IndexMap<String, ToolchainValue>,
}

impl ToolchainVariables {
    pub fn get(&self, name: &str) -> Option<&ToolchainValue> {
        self.vars.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ToolchainValue)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `-DNAME=VALUE` arguments for a CMake configure call
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(name, value)| format!("-D{}={}", name, value))
            .collect()
    }
}

/// Project a resolved configuration into toolchain variables
///
/// Constants come first, then one variable per option in option order.
pub fn generate_toolchain(section: &ToolchainSection, config: &ResolvedConfig) -> ToolchainVariables {
    let mut vars = IndexMap::new();

    for (name, value) in &section.constants {
        vars.insert(name.clone(), value.clone());
    }

    for (option, value) in config.iter() {
        let name = section.variable_name(option);
        let rendered = section.transform(option).apply(value);
        debug!("Toolchain variable {} = {} (from {})", name, rendered, option);
        vars.insert(name, rendered);
    }

    ToolchainVariables { vars }
}

/// Render the CMake toolchain file
pub fn render_toolchain_file(
    reference: &str,
    variables: &ToolchainVariables,
    generators_folder: &Path,
    locators: &[DependencyLocator],
) -> String {
    let mut out = format!("# Generated by brigade for {}\n\n", reference);

    for (name, value) in variables.iter() {
        out.push_str(&format!(
            "set({} {} CACHE {} \"\" FORCE)\n",
            name,
            cmake_quote(&value.to_string()),
            value.cmake_type()
        ));
    }

    if !locators.is_empty() {
        out.push('\n');
        for locator in locators {
            out.push_str(&format!(
                "set({}_DIR {})\n",
                locator.name,
                cmake_path(generators_folder)
            ));
        }
        out.push_str(&format!(
            "list(PREPEND CMAKE_PREFIX_PATH {})\n",
            cmake_path(generators_folder)
        ));
    }

    out
}

/// Render the `<name>-config.cmake` file for one dependency
pub fn render_config_file(locator: &DependencyLocator) -> String {
    let name = &locator.name;
    let mut out = format!("# Generated by brigade for {}/{}\n\n", name, locator.version);
    out.push_str(&format!("set({}_FOUND TRUE)\n", name));
    out.push_str(&format!("set({}_VERSION {})\n", name, cmake_quote(&locator.version)));
    out.push_str(&format!(
        "set({}_ROOT {})\n",
        name,
        cmake_path(&locator.root)
    ));
    for (suffix, dirs) in [
        ("INCLUDE_DIRS", &locator.include_dirs),
        ("LIB_DIRS", &locator.lib_dirs),
        ("BIN_DIRS", &locator.bin_dirs),
    ] {
        out.push_str(&format!("set({}_{} {})\n", name, suffix, cmake_list(dirs)));
    }
    out
}

/// Write the toolchain file, one config file per dependency, and the
/// dependency manifest into `generators_folder`
///
/// The folder must already exist.
pub fn write_generated_files(
    generators_folder: &Path,
    reference: &str,
    variables: &ToolchainVariables,
    locators: &[DependencyLocator],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let toolchain_path = generators_folder.join(TOOLCHAIN_FILE);
    fs::write(
        &toolchain_path,
        render_toolchain_file(reference, variables, generators_folder, locators),
    )?;
    written.push(toolchain_path);

    for locator in locators {
        let path = generators_folder.join(format!("{}-config.cmake", locator.name));
        fs::write(&path, render_config_file(locator))?;
        written.push(path);
    }

    let manifest_path = generators_folder.join(DEPENDENCIES_FILE);
    let manifest = serde_json::to_string_pretty(locators).map_err(std::io::Error::from)?;
    fs::write(&manifest_path, manifest)?;
    written.push(manifest_path);

    info!(
        "Generated {} file(s) in {}",
        written.len(),
        generators_folder.display()
    );
    Ok(written)
}

/// Quote a value as a CMake argument, escaping `\`, `"` and `$`
fn cmake_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Path with separators normalized to `/`
fn cmake_path_text(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn cmake_path(path: &Path) -> String {
    cmake_quote(&cmake_path_text(path))
}

fn cmake_list(dirs: &[PathBuf]) -> String {
    let joined = dirs
        .iter()
        .map(|d| cmake_path_text(d))
        .collect::<Vec<_>>()
        .join(";");
    cmake_quote(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::requirements::Dependency;
    use tempfile::TempDir;

    fn config(pairs: &[(&str, OptionValue)]) -> ResolvedConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_naming() {
        assert_eq!(default_variable_name("gvw_static"), "GVW_STATIC");
        assert_eq!(default_variable_name("fPIC"), "FPIC");
        assert_eq!(default_variable_name("with-x11"), "WITH_X11");
    }

    #[test]
    fn test_one_variable_per_option() {
        let cfg = config(&[
            ("gvw_static", OptionValue::Bool(true)),
            ("gvw_shared", OptionValue::Bool(false)),
            ("backend", OptionValue::from("vulkan")),
        ]);
        let vars = generate_toolchain(&ToolchainSection::default(), &cfg);
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get("GVW_STATIC"), Some(&ToolchainValue::Bool(true)));
        assert_eq!(vars.get("GVW_SHARED"), Some(&ToolchainValue::Bool(false)));
        assert_eq!(vars.get("BACKEND"), Some(&ToolchainValue::Str("vulkan".into())));
    }

    #[test]
    fn test_transforms() {
        let t = OptionValue::Bool(true);
        assert_eq!(ValueTransform::OnOff.apply(&t), ToolchainValue::Str("ON".into()));
        assert_eq!(
            ValueTransform::OnOff.apply(&OptionValue::Bool(false)),
            ToolchainValue::Str("OFF".into())
        );
        assert_eq!(ValueTransform::Bool.apply(&t), ToolchainValue::Bool(true));
        assert_eq!(ValueTransform::Verbatim.apply(&t), ToolchainValue::Str("True".into()));
        assert_eq!(
            ValueTransform::OnOff.apply(&OptionValue::from("x")),
            ToolchainValue::Str("x".into())
        );
    }

    #[test]
    fn test_table_overrides_and_constants() {
        let section: ToolchainSection = toml::from_str(
            r#"
default_transform = "on-off"
constants = { GVW_CONAN = true }

[variables]
fPIC = { name = "CMAKE_POSITION_INDEPENDENT_CODE" }
gvw_examples = { transform = "bool" }
"#,
        )
        .unwrap();

        let cfg = config(&[
            ("gvw_static", OptionValue::Bool(true)),
            ("gvw_examples", OptionValue::Bool(false)),
            ("fPIC", OptionValue::Bool(true)),
        ]);
        let vars = generate_toolchain(&section, &cfg);

        let names: Vec<&str> = vars.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "GVW_CONAN",
                "GVW_STATIC",
                "GVW_EXAMPLES",
                "CMAKE_POSITION_INDEPENDENT_CODE"
            ]
        );
        assert_eq!(vars.get("GVW_CONAN"), Some(&ToolchainValue::Bool(true)));
        assert_eq!(vars.get("GVW_STATIC"), Some(&ToolchainValue::Str("ON".into())));
        assert_eq!(vars.get("GVW_EXAMPLES"), Some(&ToolchainValue::Bool(false)));
        assert_eq!(
            vars.get("CMAKE_POSITION_INDEPENDENT_CODE"),
            Some(&ToolchainValue::Str("ON".into()))
        );
    }

    #[test]
    fn test_cmake_args() {
        let cfg = config(&[("gvw_static", OptionValue::Bool(true))]);
        let vars = generate_toolchain(&ToolchainSection::default(), &cfg);
        assert_eq!(vars.to_cmake_args(), vec!["-DGVW_STATIC=TRUE"]);
    }

    #[test]
    fn test_string_values_escaped_not_rewritten() {
        let cfg = config(&[
            ("prefix", OptionValue::from(r"C:\tools")),
            ("flags", OptionValue::from("${HOME}")),
        ]);
        let vars = generate_toolchain(&ToolchainSection::default(), &cfg);
        let rendered = render_toolchain_file("x/1.0", &vars, Path::new("/gen"), &[]);

        assert!(rendered.contains(r#"set(PREFIX "C:\\tools" CACHE STRING "" FORCE)"#));
        assert!(rendered.contains(r#"set(FLAGS "\${HOME}" CACHE STRING "" FORCE)"#));
    }

    #[test]
    fn test_paths_use_forward_slashes() {
        assert_eq!(cmake_path(Path::new(r"C:\pkgs\glfw")), r#""C:/pkgs/glfw""#);
        assert_eq!(
            cmake_list(&[PathBuf::from(r"a\include"), PathBuf::from("b/include")]),
            r#""a/include;b/include""#
        );
    }

    #[test]
    fn test_variables_serialize_as_plain_map() {
        let cfg = config(&[("gvw_static", OptionValue::Bool(true))]);
        let vars = generate_toolchain(&ToolchainSection::default(), &cfg);
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json, serde_json::json!({"GVW_STATIC": true}));
    }

    #[test]
    fn test_write_generated_files() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&[("gvw_static", OptionValue::Bool(true))]);
        let vars = generate_toolchain(&ToolchainSection::default(), &cfg);
        let locators = vec![
            DependencyLocator::conventional(&Dependency::new("glfw", "3.3.8"), "/pkgs/glfw"),
            DependencyLocator::conventional(
                &Dependency::new("vulkan-headers", "1.3.243.0"),
                "/pkgs/vk",
            ),
        ];

        let written = write_generated_files(temp.path(), "gvw/1.0.0", &vars, &locators).unwrap();
        assert_eq!(written.len(), 4);

        let toolchain = fs::read_to_string(temp.path().join(TOOLCHAIN_FILE)).unwrap();
        assert!(toolchain.contains("set(GVW_STATIC \"TRUE\" CACHE BOOL \"\" FORCE)"));
        assert!(toolchain.contains("set(glfw_DIR"));
        assert!(toolchain.contains("set(vulkan-headers_DIR"));

        let config_file = fs::read_to_string(temp.path().join("glfw-config.cmake")).unwrap();
        assert!(config_file.contains("set(glfw_FOUND TRUE)"));
        assert!(config_file.contains("set(glfw_VERSION \"3.3.8\")"));
        assert!(config_file.contains("/pkgs/glfw/include"));

        let manifest = fs::read_to_string(temp.path().join(DEPENDENCIES_FILE)).unwrap();
        let parsed: Vec<DependencyLocator> = serde_json::from_str(&manifest).unwrap();
        assert_eq!(parsed, locators);
    }
}
