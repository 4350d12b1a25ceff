//! Build settings: the target environment a recipe is built for.
//!
//! Settings are not options. Options belong to a recipe and are declared in
//! its schema; settings describe the platform and are shared by every recipe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a setting value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {setting} '{value}'; expected one of: {expected}")]
pub struct SettingParseError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Windows,
    Macos,
}

impl Os {
    /// All supported operating systems.
    pub const ALL: [Os; 3] = [Os::Linux, Os::Windows, Os::Macos];

    /// The operating system this binary was compiled for.
    pub fn host() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::Macos
        } else {
            Os::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Windows => "Windows",
            Os::Macos => "Macos",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "windows" | "win" => Ok(Os::Windows),
            "macos" | "darwin" => Ok(Os::Macos),
            _ => Err(SettingParseError {
                setting: "os",
                value: s.to_string(),
                expected: "Linux, Windows, Macos",
            }),
        }
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    X86_64,
    X86,
    Armv8,
}

impl Arch {
    pub fn host() -> Arch {
        if cfg!(target_arch = "aarch64") {
            Arch::Armv8
        } else if cfg!(target_arch = "x86") {
            Arch::X86
        } else {
            Arch::X86_64
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::X86 => "x86",
            Arch::Armv8 => "armv8",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Ok(Arch::X86_64),
            "x86" | "i686" => Ok(Arch::X86),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            _ => Err(SettingParseError {
                setting: "arch",
                value: s.to_string(),
                expected: "x86_64, x86, armv8",
            }),
        }
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    /// The conventional default compiler for an operating system.
    pub fn default_for(os: Os) -> Compiler {
        match os {
            Os::Linux => Compiler::Gcc,
            Os::Windows => Compiler::Msvc,
            Os::Macos => Compiler::AppleClang,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Clang => "clang",
            Compiler::AppleClang => "apple-clang",
            Compiler::Msvc => "msvc",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(Compiler::Gcc),
            "clang" => Ok(Compiler::Clang),
            "apple-clang" | "appleclang" => Ok(Compiler::AppleClang),
            "msvc" | "cl" => Ok(Compiler::Msvc),
            _ => Err(SettingParseError {
                setting: "compiler",
                value: s.to_string(),
                expected: "gcc, clang, apple-clang, msvc",
            }),
        }
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = SettingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(SettingParseError {
                setting: "build_type",
                value: s.to_string(),
                expected: "Debug, Release, RelWithDebInfo, MinSizeRel",
            }),
        }
    }
}

/// The complete set of settings for one recipe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub arch: Arch,
    pub compiler: Compiler,
    pub build_type: BuildType,
}

impl Settings {
    /// Settings for the host machine.
    pub fn host() -> Self {
        let os = Os::host();
        Settings {
            os,
            arch: Arch::host(),
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
        }
    }

    /// Settings targeting `os`, with the conventional compiler for it.
    pub fn for_os(os: Os) -> Self {
        Settings {
            os,
            compiler: Compiler::default_for(os),
            ..Settings::host()
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} arch={} compiler={} build_type={}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}
