//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `<home>/config.toml` - user-wide defaults
//! - Project: `.berth/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config; command-line flags
//! take precedence over both.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::settings::Settings;

/// Berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CMake invocation settings
    pub build: BuildConfig,

    /// Default target settings
    pub settings: SettingsConfig,

    /// Network settings
    pub net: NetConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// CMake generator (e.g. "Ninja")
    pub generator: Option<String>,

    /// Parallel build jobs (None = let CMake decide)
    pub jobs: Option<usize>,
}

/// Default values for the target settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub compiler: Option<String>,
    pub build_type: Option<String>,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Never fetch sources; fail if they are not already present
    #[serde(default)]
    pub offline: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }

        if other.settings.os.is_some() {
            self.settings.os = other.settings.os;
        }
        if other.settings.arch.is_some() {
            self.settings.arch = other.settings.arch;
        }
        if other.settings.compiler.is_some() {
            self.settings.compiler = other.settings.compiler;
        }
        if other.settings.build_type.is_some() {
            self.settings.build_type = other.settings.build_type;
        }

        if other.net.offline {
            self.net.offline = true;
        }
    }

    /// Apply configured setting defaults on top of `base`.
    ///
    /// Setting the OS without a compiler also switches to that OS's
    /// conventional compiler.
    pub fn apply_settings(&self, base: Settings) -> Result<Settings> {
        let mut settings = base;
        if let Some(ref os) = self.settings.os {
            settings = Settings {
                arch: settings.arch,
                build_type: settings.build_type,
                ..Settings::for_os(os.parse()?)
            };
        }
        if let Some(ref arch) = self.settings.arch {
            settings.arch = arch.parse()?;
        }
        if let Some(ref compiler) = self.settings.compiler {
            settings.compiler = compiler.parse()?;
        }
        if let Some(ref build_type) = self.settings.build_type {
            settings.build_type = build_type.parse()?;
        }
        Ok(settings)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config (<home>/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{BuildType, Compiler, Os};
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.generator.is_none());
        assert!(config.build.jobs.is_none());
        assert!(!config.net.offline);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
generator = "Ninja"
jobs = 8

[settings]
os = "Windows"
build_type = "Debug"

[net]
offline = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(config.build.jobs, Some(8));
        assert_eq!(config.settings.os.as_deref(), Some("Windows"));
        assert!(config.net.offline);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.generator = Some("Unix Makefiles".to_string());
        base.build.jobs = Some(4);

        let mut override_cfg = Config::default();
        override_cfg.build.generator = Some("Ninja".to_string());

        base.merge(override_cfg);

        assert_eq!(base.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(base.build.jobs, Some(4));
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        config.settings.os = Some("Windows".to_string());
        config.settings.build_type = Some("Debug".to_string());

        let settings = config.apply_settings(Settings::for_os(Os::Linux)).unwrap();
        assert_eq!(settings.os, Os::Windows);
        assert_eq!(settings.compiler, Compiler::Msvc);
        assert_eq!(settings.build_type, BuildType::Debug);
    }

    #[test]
    fn test_apply_settings_rejects_bad_value() {
        let mut config = Config::default();
        config.settings.compiler = Some("tcc".to_string());
        assert!(config.apply_settings(Settings::host()).is_err());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            "[build]\ngenerator = \"Ninja\"\njobs = 2\n",
        )
        .unwrap();
        std::fs::write(&project_path, "[build]\njobs = 16\n").unwrap();

        let config = load_config(&global_path, &project_path);
        assert_eq!(config.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(config.build.jobs, Some(16));
    }
}
