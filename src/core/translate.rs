//! Options-to-configuration translation.
//!
//! Each recipe describes how its options become CMake variables with a
//! static table of [`VarMapping`]. [`translate`] walks that table for one
//! operating system and produces the [`ConfigVars`] handed to the CMake
//! toolchain. No cross-option validation happens here; CMake rejects
//! combinations it cannot satisfy.

use std::fmt;

use crate::core::options::{OptionError, Options, Platforms};
use crate::core::settings::Os;

/// How a boolean option is spelled in CMake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// `ON` / `OFF`
    OnOff,
    /// `YES` / `NO`, used by module group switches.
    YesNo,
}

impl Toggle {
    pub fn render(&self, enabled: bool) -> &'static str {
        match (self, enabled) {
            (Toggle::OnOff, true) => "ON",
            (Toggle::OnOff, false) => "OFF",
            (Toggle::YesNo, true) => "YES",
            (Toggle::YesNo, false) => "NO",
        }
    }
}

/// Where a variable's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSource {
    /// A boolean option. `inverted` flips the value, for `DISABLE_*` style variables.
    Flag {
        option: &'static str,
        toggle: Toggle,
        inverted: bool,
    },
    /// A string option, copied verbatim.
    Passthrough(&'static str),
    /// A fixed value independent of options.
    Const(&'static str),
}

/// One row of a recipe's translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarMapping {
    pub variable: &'static str,
    pub source: VarSource,
    pub platforms: Platforms,
}

impl VarMapping {
    pub const fn flag(variable: &'static str, option: &'static str) -> Self {
        Self::with_source(
            variable,
            VarSource::Flag {
                option,
                toggle: Toggle::OnOff,
                inverted: false,
            },
        )
    }

    pub const fn inverted(variable: &'static str, option: &'static str) -> Self {
        Self::with_source(
            variable,
            VarSource::Flag {
                option,
                toggle: Toggle::OnOff,
                inverted: true,
            },
        )
    }

    pub const fn yes_no(variable: &'static str, option: &'static str) -> Self {
        Self::with_source(
            variable,
            VarSource::Flag {
                option,
                toggle: Toggle::YesNo,
                inverted: false,
            },
        )
    }

    pub const fn passthrough(variable: &'static str, option: &'static str) -> Self {
        Self::with_source(variable, VarSource::Passthrough(option))
    }

    pub const fn constant(variable: &'static str, value: &'static str) -> Self {
        Self::with_source(variable, VarSource::Const(value))
    }

    /// Emit this variable only when targeting `os`.
    pub const fn only_on(mut self, os: Os) -> Self {
        self.platforms = Platforms::Only(os);
        self
    }

    const fn with_source(variable: &'static str, source: VarSource) -> Self {
        VarMapping {
            variable,
            source,
            platforms: Platforms::All,
        }
    }

    /// The option this row reads, if any.
    pub fn option(&self) -> Option<&'static str> {
        match self.source {
            VarSource::Flag { option, .. } | VarSource::Passthrough(option) => Some(option),
            VarSource::Const(_) => None,
        }
    }

    fn evaluate(&self, options: &Options) -> Result<String, OptionError> {
        match self.source {
            VarSource::Flag {
                option,
                toggle,
                inverted,
            } => {
                let enabled = options.get_bool(option)?;
                Ok(toggle.render(enabled != inverted).to_string())
            }
            VarSource::Passthrough(option) => Ok(options.get_str(option)?.to_string()),
            VarSource::Const(value) => Ok(value.to_string()),
        }
    }
}

/// CMake variables in insertion order. Setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigVars {
    entries: Vec<(String, String)>,
}

impl ConfigVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ConfigVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

/// Translate resolved options into the variable set for `os`.
pub fn translate(
    mappings: &[VarMapping],
    options: &Options,
    os: Os,
) -> Result<ConfigVars, OptionError> {
    let mut vars = ConfigVars::new();
    for mapping in mappings.iter().filter(|m| m.platforms.includes(os)) {
        vars.set(mapping.variable, mapping.evaluate(options)?);
    }
    Ok(vars)
}
