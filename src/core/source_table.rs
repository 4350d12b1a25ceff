//! Versioned source table (`sources.toml`).
//!
//! Each recipe folder carries a table keyed by version:
//!
//! ```toml
//! [sources."4.10.0"]
//! url = "https://github.com/opencv/opencv.git"
//! tag = "4.10.0"
//! ```
//!
//! The vendor SDK recipe adds the folder-naming fields of its archive
//! (`sdkVersion`, `includeFolder`, `libFolder`, `binFolder`). Both camelCase
//! and snake_case keys are accepted.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// File name of the source table inside a recipe folder.
pub const SOURCE_TABLE_FILE: &str = "sources.toml";

/// Per-version source record. Read once per invocation, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceDescriptor {
    /// Git remote to clone from. Absent for bundled archives.
    pub url: Option<String>,

    /// Tag (or branch) to check out; for bundled archives, the release tag
    /// embedded in the archive's folder name.
    pub tag: String,

    #[serde(rename = "sdkVersion", alias = "sdk_version")]
    pub sdk_version: Option<String>,

    #[serde(rename = "includeFolder", alias = "include_folder")]
    pub include_folder: Option<String>,

    #[serde(rename = "libFolder", alias = "lib_folder")]
    pub lib_folder: Option<String>,

    #[serde(rename = "binFolder", alias = "bin_folder")]
    pub bin_folder: Option<String>,
}

impl SourceDescriptor {
    /// The git remote, parsed.
    pub fn remote(&self) -> Result<Url, SourceTableError> {
        let raw = self.url.as_deref().ok_or(SourceTableError::MissingField {
            field: "url",
        })?;
        Url::parse(raw).map_err(|e| SourceTableError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// A field the caller requires, or an error naming it.
    pub fn require<'a>(
        &'a self,
        field: &'static str,
        value: &'a Option<String>,
    ) -> Result<&'a str, SourceTableError> {
        value
            .as_deref()
            .ok_or(SourceTableError::MissingField { field })
    }
}

/// Errors looking up a version in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceTableError {
    #[error("version `{version}` is not in the source table (known: {known})")]
    UnknownVersion { version: String, known: String },

    #[error("source record is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid source url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// All source records of one recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceTable {
    #[serde(default)]
    sources: BTreeMap<String, SourceDescriptor>,
}

impl SourceTable {
    /// Parse a table from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse source table")
    }

    /// Load `sources.toml` from a recipe folder.
    pub fn load(recipe_folder: &Path) -> Result<Self> {
        let path = recipe_folder.join(SOURCE_TABLE_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read source table: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load source table: {}", path.display()))
    }

    /// Look up the record for `version`.
    pub fn get(&self, version: &str) -> Result<&SourceDescriptor, SourceTableError> {
        self.sources
            .get(version)
            .ok_or_else(|| SourceTableError::UnknownVersion {
                version: version.to_string(),
                known: self.versions().collect::<Vec<_>>().join(", "),
            })
    }

    /// Known versions, sorted lexically.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
