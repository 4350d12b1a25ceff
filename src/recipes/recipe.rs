//! The recipe trait and the context its lifecycle hooks run in.
//!
//! Hooks are invoked by `ops::create` in a fixed order: `export_sources`,
//! `source`, `generate`, `build`, `package`, `package_info`; the layout is
//! computed from [`Recipe::folders`] before any of them run.
//!
//! The default implementations cover a git-hosted CMake project; recipes
//! override what differs.

use std::fmt;

use anyhow::Result;

use crate::builder::{BuildOptions, CMake, CMakeToolchain};
use crate::core::layout::Layout;
use crate::core::options::{OptionError, OptionSpec, Options, OptionsSchema};
use crate::core::package_info::CppInfo;
use crate::core::settings::{Os, Settings};
use crate::core::source_table::SourceDescriptor;
use crate::core::translate::{translate, ConfigVars, VarMapping};
use crate::sources::GitCheckout;
use crate::util::shell::Shell;

/// Kind of artifact a recipe produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    /// Static or shared, decided by the `shared` option.
    Library,
    SharedLibrary,
    StaticLibrary,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Library => "library",
            PackageType::SharedLibrary => "shared-library",
            PackageType::StaticLibrary => "static-library",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeMetadata {
    pub name: &'static str,
    pub user: &'static str,
    pub channel: &'static str,
    pub package_type: PackageType,
    pub url: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
}

impl RecipeMetadata {
    /// Full reference, `name/version@user/channel`.
    pub fn reference(&self, version: &str) -> String {
        format!("{}/{}@{}/{}", self.name, version, self.user, self.channel)
    }
}

/// Everything a hook may read. Nothing in it changes while hooks run.
pub struct RecipeContext<'a> {
    pub version: &'a str,
    pub settings: &'a Settings,
    pub options: &'a Options,
    pub source: &'a SourceDescriptor,
    pub layout: &'a Layout,
    pub build: &'a BuildOptions,
    pub shell: &'a Shell,
}

/// A package recipe.
pub trait Recipe {
    fn metadata(&self) -> &RecipeMetadata;

    /// Option table, before per-OS pruning.
    fn option_specs(&self) -> &'static [OptionSpec] {
        &[]
    }

    /// Options-to-variable translation table.
    fn var_mappings(&self) -> &'static [VarMapping] {
        &[]
    }

    /// Packages this recipe depends on, as version-range references.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    /// Source and build folder names inside the working directory.
    fn folders(&self) -> (&'static str, &'static str) {
        ("src", "build")
    }

    /// Extra arguments passed to `cmake` at configure time.
    fn configure_args(&self) -> &'static [&'static str] {
        &[]
    }

    /// The option schema variant for `os`.
    fn schema(&self, os: Os) -> OptionsSchema {
        OptionsSchema::for_os(self.option_specs(), os)
    }

    /// The CMake variable set for resolved options.
    fn configuration(
        &self,
        options: &Options,
        settings: &Settings,
    ) -> Result<ConfigVars, OptionError> {
        translate(self.var_mappings(), options, settings.os)
    }

    /// Copy files shipped with the recipe into the export folder.
    fn export_sources(&self, _ctx: &RecipeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Shallow-clone the version's tag into the source folder.
    fn source(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        let remote = ctx.source.remote()?;
        let commit =
            GitCheckout::new(remote, ctx.source.tag.as_str(), &ctx.layout.source_folder).fetch()?;
        tracing::info!("checked out {} at {}", ctx.source.tag, commit);
        Ok(())
    }

    /// Translate the options and write the toolchain file.
    fn write_toolchain(&self, ctx: &RecipeContext<'_>) -> Result<CMakeToolchain> {
        let toolchain = CMakeToolchain::new(self.configuration(ctx.options, ctx.settings)?);
        toolchain.generate(&ctx.layout.generators_folder)?;
        Ok(toolchain)
    }

    /// Prepare the build: by default only the toolchain file.
    fn generate(&self, ctx: &RecipeContext<'_>) -> Result<CMakeToolchain> {
        self.write_toolchain(ctx)
    }

    /// Configure and build with CMake.
    fn build(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        let cmake = CMake::new(ctx.layout, ctx.settings, ctx.build)?;
        cmake.configure(self.configure_args())?;
        cmake.build()
    }

    /// Install the build into the package folder.
    fn package(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        CMake::new(ctx.layout, ctx.settings, ctx.build)?.install()
    }

    /// What consumers of the package need.
    fn package_info(&self, ctx: &RecipeContext<'_>) -> CppInfo;
}
