// src/recipe/fetch.rs

//! Locating dependency packages
//!
//! Fetching and caching packages is not done here. A [`DependencyFetcher`]
//! turns each resolved dependency into a [`DependencyLocator`], an opaque
//! record of install paths that is handed through to the generated files.

use crate::error::{Error, Result};
use crate::recipe::requirements::Dependency;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Install paths of one dependency package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLocator {
    pub name: String,
    pub version: String,
    /// Package root
    pub root: PathBuf,
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub bin_dirs: Vec<PathBuf>,
}

impl DependencyLocator {
    /// Locator using the conventional `include`, `lib` and `bin` subdirectories
    pub fn conventional(dep: &Dependency, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: dep.name.clone(),
            version: dep.version.clone(),
            include_dirs: vec![root.join("include")],
            lib_dirs: vec![root.join("lib")],
            bin_dirs: vec![root.join("bin")],
            root,
        }
    }
}

/// Collaborator that provides installed dependency packages
///
/// Failure to provide a package is reported as
/// [`Error::DependencyUnavailable`].
pub trait DependencyFetcher: Send + Sync {
    /// Locate one dependency
    fn locate(&self, dep: &Dependency) -> Result<DependencyLocator>;

    /// Locate dependencies, preserving order
    fn locate_all(&self, deps: &[Dependency]) -> Result<Vec<DependencyLocator>> {
        deps.iter().map(|dep| self.locate(dep)).collect()
    }
}

/// Packages already unpacked under `<root>/<name>/<version>/`
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default cache root: the user cache directory, or `.brigade/packages`
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join("brigade").join("packages"))
            .unwrap_or_else(|| PathBuf::from(".brigade/packages"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, dep: &Dependency) -> PathBuf {
        self.root.join(&dep.name).join(&dep.version)
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl DependencyFetcher for LocalCache {
    fn locate(&self, dep: &Dependency) -> Result<DependencyLocator> {
        let dir = self.package_dir(dep);
        if !dir.is_dir() {
            debug!("No cached package at {}", dir.display());
            return Err(Error::DependencyUnavailable {
                name: dep.name.clone(),
                version: dep.version.clone(),
            });
        }

        let mut locator = DependencyLocator::conventional(dep, &dir);
        locator.include_dirs.retain(|p| p.is_dir());
        locator.lib_dirs.retain(|p| p.is_dir());
        locator.bin_dirs.retain(|p| p.is_dir());

        info!("Located {} at {}", dep, dir.display());
        Ok(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_local_cache_locates_existing_package() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("glfw").join("3.3.8");
        fs::create_dir_all(pkg.join("include")).unwrap();
        fs::create_dir_all(pkg.join("lib")).unwrap();

        let cache = LocalCache::new(temp.path());
        let dep = Dependency::new("glfw", "3.3.8");
        let locator = cache.locate(&dep).unwrap();

        assert_eq!(locator.name, "glfw");
        assert_eq!(locator.version, "3.3.8");
        assert_eq!(locator.root, pkg);
        assert_eq!(locator.include_dirs, vec![pkg.join("include")]);
        assert_eq!(locator.lib_dirs, vec![pkg.join("lib")]);
        assert!(locator.bin_dirs.is_empty());
    }

    #[test]
    fn test_local_cache_missing_package() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        let err = cache.locate(&Dependency::new("glfw", "3.3.8")).unwrap_err();
        assert!(matches!(
            err,
            Error::DependencyUnavailable { name, version } if name == "glfw" && version == "3.3.8"
        ));
    }

    #[test]
    fn test_local_cache_wrong_version_is_unavailable() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("glfw").join("3.3.7")).unwrap();
        let cache = LocalCache::new(temp.path());
        assert!(cache.locate(&Dependency::new("glfw", "3.3.8")).is_err());
    }

    #[test]
    fn test_locate_all_preserves_order() {
        let temp = TempDir::new().unwrap();
        for (name, version) in [("b", "1"), ("a", "2")] {
            fs::create_dir_all(temp.path().join(name).join(version)).unwrap();
        }
        let cache = LocalCache::new(temp.path());
        let deps = vec![Dependency::new("b", "1"), Dependency::new("a", "2")];
        let names: Vec<String> = cache
            .locate_all(&deps)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
