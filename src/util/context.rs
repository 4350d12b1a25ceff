//! Global context: where berth keeps its data.
//!
//! ```text
//! <home>/config.toml                            global configuration
//! <home>/w/<name>/<version>/<package-id>/       working folders (sources, build)
//! <home>/p/<name>/<version>/<package-id>/       finished packages
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "berth", "berth"));

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    home: PathBuf,
}

impl GlobalContext {
    /// Create a context rooted at the platform data directory, or at `home`
    /// when given.
    pub fn new(home: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = match home {
            Some(home) => home,
            None => PROJECT_DIRS
                .as_ref()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| cwd.join(".berth-home")),
        };
        Ok(GlobalContext { cwd, home })
    }

    /// Create a context with explicit working and home directories.
    pub fn with_paths(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext { cwd, home }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Global configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Project configuration file.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(".berth").join("config.toml")
    }

    /// Default location of recipe folders.
    pub fn recipes_dir(&self) -> PathBuf {
        self.cwd.join("recipes")
    }

    /// Root of all working folders.
    pub fn work_root(&self) -> PathBuf {
        self.home.join("w")
    }

    /// Root of all packages.
    pub fn packages_root(&self) -> PathBuf {
        self.home.join("p")
    }

    pub fn work_dir(&self, name: &str, version: &str, package_id: &str) -> PathBuf {
        self.work_root().join(name).join(version).join(package_id)
    }

    pub fn package_dir(&self, name: &str, version: &str, package_id: &str) -> PathBuf {
        self.packages_root().join(name).join(version).join(package_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let ctx = GlobalContext::with_paths(PathBuf::from("/proj"), PathBuf::from("/home/berth"));
        assert_eq!(ctx.config_path(), PathBuf::from("/home/berth/config.toml"));
        assert_eq!(
            ctx.project_config_path(),
            PathBuf::from("/proj/.berth/config.toml")
        );
        assert_eq!(ctx.recipes_dir(), PathBuf::from("/proj/recipes"));
        assert_eq!(
            ctx.work_dir("vtk", "9.3.1", "abcd"),
            PathBuf::from("/home/berth/w/vtk/9.3.1/abcd")
        );
        assert_eq!(
            ctx.package_dir("vtk", "9.3.1", "abcd"),
            PathBuf::from("/home/berth/p/vtk/9.3.1/abcd")
        );
    }

    #[test]
    fn test_explicit_home() {
        let ctx = GlobalContext::new(Some(PathBuf::from("/tmp/berth-home"))).unwrap();
        assert_eq!(ctx.home(), Path::new("/tmp/berth-home"));
    }
}
