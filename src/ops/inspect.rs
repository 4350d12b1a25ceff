//! Implementation of `berth inspect` and `berth toolchain`.

use std::fmt::Write as _;

use anyhow::Result;

use crate::builder::CMakeToolchain;
use crate::core::options::OptionsSchema;
use crate::core::settings::{Os, Settings};
use crate::ops::resolve::{lookup_recipe, resolve_options};
use crate::recipes::{RecipeMetadata, RecipeRegistry};

/// A recipe's metadata and its option schema on one OS.
pub struct InspectReport {
    pub metadata: RecipeMetadata,
    pub requires: &'static [&'static str],
    pub schema: OptionsSchema,
}

/// Describe a recipe as seen on `os`.
pub fn inspect(registry: &RecipeRegistry, name: &str, os: Os) -> Result<InspectReport> {
    let recipe = lookup_recipe(registry, name)?;
    Ok(InspectReport {
        metadata: *recipe.metadata(),
        requires: recipe.requires(),
        schema: recipe.schema(os),
    })
}

/// Render an inspect report for the terminal.
pub fn format_report(report: &InspectReport) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    writeln!(out, "name: {}", meta.name).unwrap();
    writeln!(out, "user: {}", meta.user).unwrap();
    writeln!(out, "channel: {}", meta.channel).unwrap();
    writeln!(out, "package_type: {}", meta.package_type).unwrap();
    writeln!(out, "url: {}", meta.url).unwrap();
    writeln!(out, "description: {}", meta.description).unwrap();
    writeln!(out, "topics: {}", meta.topics.join(", ")).unwrap();
    if !report.requires.is_empty() {
        writeln!(out, "requires: {}", report.requires.join(", ")).unwrap();
    }

    writeln!(out, "options ({}):", report.schema.os()).unwrap();
    if report.schema.is_empty() {
        writeln!(out, "    (none)").unwrap();
    }
    for decl in report.schema.iter() {
        writeln!(
            out,
            "    {}: {} = {}",
            decl.name,
            decl.domain.describe(),
            decl.default
        )
        .unwrap();
    }

    out
}

/// Translate options into the CMake variable set without building anything.
pub fn preview_toolchain(
    registry: &RecipeRegistry,
    name: &str,
    overrides: &[String],
    settings: &Settings,
) -> Result<CMakeToolchain> {
    let recipe = lookup_recipe(registry, name)?;
    let options = resolve_options(recipe, settings.os, overrides)?;
    Ok(CMakeToolchain::new(recipe.configuration(&options, settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_opencv_linux() {
        let report = inspect(&RecipeRegistry::new(), "opencv", Os::Linux).unwrap();
        let text = format_report(&report);

        assert!(text.contains("name: opencv"));
        assert!(text.contains("package_type: library"));
        assert!(text.contains("options (Linux):"));
        assert!(text.contains("    with_gtk: [True, False] = True"));
        assert!(text.contains("    cpu_baseline: [\"\", SSE, SSE2"));
        assert!(text.contains("    videoio_plugins: ANY = all"));
        assert!(!text.contains("with_msmf"));
    }

    #[test]
    fn test_inspect_phantom_has_no_options() {
        let report = inspect(&RecipeRegistry::new(), "phantom", Os::Windows).unwrap();
        let text = format_report(&report);
        assert!(text.contains("package_type: shared-library"));
        assert!(text.contains("    (none)"));
    }

    #[test]
    fn test_inspect_vtk_lists_requires() {
        let report = inspect(&RecipeRegistry::new(), "vtk", Os::Macos).unwrap();
        assert!(format_report(&report).contains("requires: nlohmann_json/[~3.11]"));
    }

    #[test]
    fn test_preview_toolchain() {
        let toolchain = preview_toolchain(
            &RecipeRegistry::new(),
            "opencv",
            &["with_cuda=True".to_string()],
            &Settings::for_os(Os::Windows),
        )
        .unwrap();

        let vars = toolchain.variables();
        assert_eq!(vars.get("WITH_CUDA"), Some("ON"));
        assert_eq!(vars.get("WITH_MSMF"), Some("ON"));
        assert!(!vars.contains("WITH_GTK"));
        assert!(toolchain.render().contains("set(WITH_CUDA \"ON\" CACHE STRING"));
    }
}
