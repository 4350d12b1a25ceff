//! Recipe options: declarations, per-OS schema variants and resolved values.
//!
//! A recipe declares its options once as a static table of [`OptionSpec`].
//! [`OptionsSchema::for_os`] turns that table into the schema variant for a
//! single operating system: options that do not exist on that OS are left
//! out, and OS-indexed defaults are resolved. Nothing is mutated after that;
//! user overrides are applied by [`OptionsSchema::resolve`], which produces a
//! fresh [`Options`] value.

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::settings::Os;

/// Errors raised while resolving or reading options.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum OptionError {
    #[error("unknown option `{name}` for {os}")]
    #[diagnostic(code(berth::options::unknown))]
    Unknown {
        name: String,
        os: Os,
        #[help]
        known: Option<String>,
    },

    #[error("invalid value '{value}' for option `{name}`")]
    #[diagnostic(code(berth::options::invalid_value))]
    InvalidValue {
        name: String,
        value: String,
        #[help]
        allowed: Option<String>,
    },

    #[error("option override '{raw}' is not of the form name=value")]
    #[diagnostic(code(berth::options::malformed), help("write overrides as `-o with_cuda=True`"))]
    Malformed { raw: String },

    #[error("option `{name}` has no resolved value")]
    #[diagnostic(code(berth::options::missing))]
    Missing { name: String },

    #[error("option `{name}` is not a {expected} option")]
    #[diagnostic(code(berth::options::type_mismatch))]
    TypeMismatch { name: String, expected: &'static str },
}

/// The set of values an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDomain {
    /// `True` or `False`.
    Bool,
    /// One of a fixed list of strings.
    Choice(&'static [&'static str]),
    /// Any string.
    Any,
}

impl OptionDomain {
    /// Parse a raw user-supplied value into this domain.
    pub fn parse(&self, name: &str, raw: &str) -> Result<OptionValue, OptionError> {
        match self {
            OptionDomain::Bool => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| OptionError::InvalidValue {
                    name: name.to_string(),
                    value: raw.to_string(),
                    allowed: Some("expected one of: True, False".to_string()),
                }),
            OptionDomain::Choice(values) => {
                if values.contains(&raw) {
                    Ok(OptionValue::Str(raw.to_string()))
                } else {
                    Err(OptionError::InvalidValue {
                        name: name.to_string(),
                        value: raw.to_string(),
                        allowed: Some(format!("expected one of: {}", describe_choices(values))),
                    })
                }
            }
            OptionDomain::Any => Ok(OptionValue::Str(raw.to_string())),
        }
    }

    /// Short human description, used by `berth inspect`.
    pub fn describe(&self) -> String {
        match self {
            OptionDomain::Bool => "[True, False]".to_string(),
            OptionDomain::Choice(values) => format!("[{}]", describe_choices(values)),
            OptionDomain::Any => "ANY".to_string(),
        }
    }
}

fn describe_choices(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| if v.is_empty() { "\"\"" } else { v })
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// A static default, as written in a recipe's option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Str(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> OptionValue {
        match self {
            DefaultValue::Bool(b) => OptionValue::Bool(b),
            DefaultValue::Str(s) => OptionValue::Str(s.to_string()),
        }
    }
}

/// Which operating systems an option exists on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platforms {
    All,
    Only(Os),
}

impl Platforms {
    pub fn includes(&self, os: Os) -> bool {
        match self {
            Platforms::All => true,
            Platforms::Only(only) => *only == os,
        }
    }
}

/// One entry of a recipe's option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub default: DefaultValue,
    /// Defaults that replace `default` on a specific OS.
    pub os_defaults: &'static [(Os, DefaultValue)],
    pub platforms: Platforms,
}

impl OptionSpec {
    pub const fn boolean(name: &'static str, default: bool) -> Self {
        OptionSpec {
            name,
            domain: OptionDomain::Bool,
            default: DefaultValue::Bool(default),
            os_defaults: &[],
            platforms: Platforms::All,
        }
    }

    pub const fn choice(
        name: &'static str,
        values: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        OptionSpec {
            name,
            domain: OptionDomain::Choice(values),
            default: DefaultValue::Str(default),
            os_defaults: &[],
            platforms: Platforms::All,
        }
    }

    pub const fn any(name: &'static str, default: &'static str) -> Self {
        OptionSpec {
            name,
            domain: OptionDomain::Any,
            default: DefaultValue::Str(default),
            os_defaults: &[],
            platforms: Platforms::All,
        }
    }

    /// Restrict the option to a single operating system.
    pub const fn only_on(mut self, os: Os) -> Self {
        self.platforms = Platforms::Only(os);
        self
    }

    /// Attach an OS-indexed default table.
    pub const fn with_os_defaults(mut self, table: &'static [(Os, DefaultValue)]) -> Self {
        self.os_defaults = table;
        self
    }

    /// The default that applies on `os`.
    pub fn default_for(&self, os: Os) -> DefaultValue {
        self.os_defaults
            .iter()
            .find(|(candidate, _)| *candidate == os)
            .map(|(_, value)| *value)
            .unwrap_or(self.default)
    }
}

/// A concrete option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => f.write_str("True"),
            OptionValue::Bool(false) => f.write_str("False"),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// An option as it exists on one operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub default: OptionValue,
}

/// The option schema of a recipe for one operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsSchema {
    os: Os,
    decls: Vec<OptionDecl>,
}

impl OptionsSchema {
    /// Build the schema variant for `os` from a recipe's option table.
    pub fn for_os(specs: &[OptionSpec], os: Os) -> Self {
        let decls = specs
            .iter()
            .filter(|spec| spec.platforms.includes(os))
            .map(|spec| OptionDecl {
                name: spec.name,
                domain: spec.domain,
                default: spec.default_for(os).to_value(),
            })
            .collect();

        OptionsSchema { os, decls }
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declarations in table order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Resolve every option, applying `overrides` on top of the defaults.
    ///
    /// Later overrides of the same name win.
    pub fn resolve<'a, I>(&self, overrides: I) -> Result<Options, OptionError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values: BTreeMap<String, OptionValue> = self
            .decls
            .iter()
            .map(|d| (d.name.to_string(), d.default.clone()))
            .collect();

        for (name, raw) in overrides {
            let decl = self.get(name).ok_or_else(|| OptionError::Unknown {
                name: name.to_string(),
                os: self.os,
                known: self.known_names_hint(),
            })?;
            let value = decl.domain.parse(name, raw)?;
            tracing::debug!("option {} = {}", name, value);
            values.insert(name.to_string(), value);
        }

        Ok(Options { values })
    }

    fn known_names_hint(&self) -> Option<String> {
        if self.decls.is_empty() {
            return Some("this recipe declares no options".to_string());
        }
        let names: Vec<_> = self.decls.iter().map(|d| d.name).collect();
        Some(format!("available options: {}", names.join(", ")))
    }
}

/// Split a `name=value` override.
pub fn parse_override(raw: &str) -> Result<(String, String), OptionError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(OptionError::Malformed {
            raw: raw.to_string(),
        }),
    }
}

/// Fully resolved option values for one recipe invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, OptionError> {
        match self.require(name)? {
            OptionValue::Bool(b) => Ok(*b),
            OptionValue::Str(_) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str, OptionError> {
        match self.require(name)? {
            OptionValue::Str(s) => Ok(s),
            OptionValue::Bool(_) => Err(OptionError::TypeMismatch {
                name: name.to_string(),
                expected: "string",
            }),
        }
    }

    fn require(&self, name: &str) -> Result<&OptionValue, OptionError> {
        self.values.get(name).ok_or_else(|| OptionError::Missing {
            name: name.to_string(),
        })
    }

    /// Values sorted by option name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
