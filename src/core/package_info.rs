//! Consumer-facing package information.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::write_string;

/// File written into every package folder.
pub const PACKAGE_INFO_FILE: &str = "berth_package_info.json";

/// What downstream projects need to consume a package.
///
/// All directories are relative to the package folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppInfo {
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
    pub libs: Vec<String>,
    pub build_dirs: Vec<String>,
    pub build_modules: Vec<String>,

    /// Free-form properties, e.g. `cmake_find_mode`.
    pub properties: BTreeMap<String, String>,

    /// Per-generator package names, e.g. `cmake_find_package` -> `VTK`.
    pub names: BTreeMap<String, String>,
}

impl CppInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout most CMake-installed libraries use.
    pub fn standard() -> Self {
        CppInfo {
            include_dirs: vec!["include".to_string()],
            lib_dirs: vec!["lib".to_string()],
            bin_dirs: vec!["bin".to_string()],
            ..Default::default()
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }
}

/// Everything recorded about a finished package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo<'a> {
    pub reference: String,
    pub package_id: &'a str,
    pub settings: &'a crate::core::settings::Settings,
    pub options: &'a crate::core::options::Options,
    pub requires: &'a [&'static str],
    pub cpp_info: &'a CppInfo,
}

impl PackageInfo<'_> {
    /// Write as pretty JSON into `package_folder`.
    pub fn write(&self, package_folder: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("failed to serialize package info")?;
        write_string(&package_folder.join(PACKAGE_INFO_FILE), &json)
    }
}
