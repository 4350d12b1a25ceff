//! VTK, built from a shallow clone of the release tag against an external
//! nlohmann_json.

use std::path::Path;

use anyhow::{Context, Result};

use crate::builder::CMakeToolchain;
use crate::core::options::OptionSpec;
use crate::core::package_info::CppInfo;
use crate::core::settings::Compiler;
use crate::core::translate::VarMapping;
use crate::recipes::recipe::{PackageType, Recipe, RecipeContext, RecipeMetadata};
use crate::util::fs::{read_to_string, replace_in_file};

const METADATA: RecipeMetadata = RecipeMetadata {
    name: "vtk",
    user: "apexturbine",
    channel: "stable",
    package_type: PackageType::Library,
    url: "https://github.com/kitware/vtk",
    description: "The Visualization Toolkit (VTK) is an open-source, freely available \
                  software system for 3D computer graphics, image processing, and visualization.",
    topics: &["vtk", "models", "3d"],
};

static OPTIONS: &[OptionSpec] = &[
    OptionSpec::boolean("shared", true),
    OptionSpec::boolean("enable_standalone", true),
    OptionSpec::boolean("enable_qt", true),
    OptionSpec::choice("qt_version", &["5", "6"], "6"),
    OptionSpec::boolean("wrap_python", false),
    OptionSpec::boolean("wrap_tcl", false),
    OptionSpec::boolean("wrap_java", false),
    OptionSpec::boolean("install_sdk", true),
    OptionSpec::boolean("install_headers", true),
    OptionSpec::boolean("install_versioned_libs", false),
    OptionSpec::boolean("enable_examples", false),
    OptionSpec::boolean("enable_testing", false),
    OptionSpec::boolean("exclude_data", true),
    OptionSpec::boolean("install_no_development", true),
    OptionSpec::choice("smp_type", &["STDThreads", "serial", "OpenMP"], "STDThreads"),
    OptionSpec::any("lib_install_dir", "lib"),
    OptionSpec::any("bin_install_dir", "bin"),
    OptionSpec::any("ar_install_dir", "lib"),
];

static VARIABLES: &[VarMapping] = &[
    VarMapping::flag("BUILD_SHARED_LIBS", "shared"),
    VarMapping::yes_no("VTK_GROUP_ENABLE_STANDALONE", "enable_standalone"),
    VarMapping::yes_no("VTK_GROUP_ENABLE_Qt", "enable_qt"),
    VarMapping::passthrough("VTK_QT_VERSION", "qt_version"),
    VarMapping::flag("VTK_WRAP_PYTHON", "wrap_python"),
    VarMapping::flag("VTK_WRAP_TCL", "wrap_tcl"),
    VarMapping::flag("VTK_WRAP_JAVA", "wrap_java"),
    VarMapping::flag("VTK_INSTALL_SDK", "install_sdk"),
    VarMapping::flag("VTK_INSTALL_HEADERS", "install_headers"),
    VarMapping::flag("VTK_VERSIONED_INSTALL", "install_versioned_libs"),
    VarMapping::flag("VTK_BUILD_EXAMPLES", "enable_examples"),
    VarMapping::flag("VTK_BUILD_TESTING", "enable_testing"),
    VarMapping::flag("VTK_DATA_EXCLUDE_FROM_ALL", "exclude_data"),
    VarMapping::flag("VTK_INSTALL_NO_DEVELOPMENT", "install_no_development"),
    VarMapping::passthrough("VTK_SMP_IMPLEMENTATION_TYPE", "smp_type"),
    VarMapping::passthrough("VTK_LIBRARY_DESTINATION", "lib_install_dir"),
    VarMapping::passthrough("VTK_RUNTIME_DESTINATION", "bin_install_dir"),
    VarMapping::passthrough("VTK_ARCHIVE_DESTINATION", "ar_install_dir"),
    VarMapping::constant("VTK_MODULE_USE_EXTERNAL_VTK_nlohmannjson", "ON"),
];

/// Bundled libtiff CMake file that needs `-fcommon` under clang.
const TIFF_CMAKELISTS: &str = "ThirdParty/tiff/vtktiff/CMakeLists.txt";
const TIFF_ANCHOR: &str = "add_subdirectory(libtiff)";
const TIFF_FCOMMON: &str = "target_compile_options(tiff PRIVATE -fcommon)";

/// Add `-fcommon` to the bundled libtiff target. A file that already carries
/// the flag is left alone, so re-running generate on the same sources works.
pub fn patch_tiff_fcommon(source_folder: &Path) -> Result<()> {
    let path = source_folder.join(TIFF_CMAKELISTS);
    let contents = read_to_string(&path)?;
    if contents.contains(TIFF_FCOMMON) {
        tracing::debug!("{} already patched", path.display());
        return Ok(());
    }
    replace_in_file(&path, TIFF_ANCHOR, &format!("{}\n{}", TIFF_ANCHOR, TIFF_FCOMMON))
        .context("failed to patch libtiff for clang")
}

/// The VTK recipe.
pub struct Vtk;

impl Recipe for Vtk {
    fn metadata(&self) -> &RecipeMetadata {
        &METADATA
    }

    fn option_specs(&self) -> &'static [OptionSpec] {
        OPTIONS
    }

    fn var_mappings(&self) -> &'static [VarMapping] {
        VARIABLES
    }

    fn requires(&self) -> &'static [&'static str] {
        &["nlohmann_json/[~3.11]"]
    }

    fn folders(&self) -> (&'static str, &'static str) {
        ("vtk", "build")
    }

    fn generate(&self, ctx: &RecipeContext<'_>) -> Result<CMakeToolchain> {
        if ctx.settings.compiler == Compiler::Clang {
            patch_tiff_fcommon(&ctx.layout.source_folder)?;
        }
        self.write_toolchain(ctx)
    }

    fn package_info(&self, _ctx: &RecipeContext<'_>) -> CppInfo {
        let mut info = CppInfo::standard();
        info.include_dirs = vec!["include".to_string(), "include/vtk".to_string()];
        info.build_dirs = vec!["lib/cmake/vtk".to_string()];
        info.build_modules = vec!["lib/cmake/vtk/vtk-config.cmake".to_string()];
        info.set_property("cmake_find_mode", "none");
        info.names
            .insert("cmake_find_package".to_string(), "VTK".to_string());
        info.names
            .insert("cmake_find_package_multi".to_string(), "VTK".to_string());
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{Os, Settings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_variables() {
        let options = Vtk.schema(Os::Linux).resolve(std::iter::empty()).unwrap();
        let vars = Vtk
            .configuration(&options, &Settings::for_os(Os::Linux))
            .unwrap();

        assert_eq!(vars.len(), VARIABLES.len());
        assert_eq!(vars.get("BUILD_SHARED_LIBS"), Some("ON"));
        assert_eq!(vars.get("VTK_GROUP_ENABLE_STANDALONE"), Some("YES"));
        assert_eq!(vars.get("VTK_GROUP_ENABLE_Qt"), Some("YES"));
        assert_eq!(vars.get("VTK_QT_VERSION"), Some("6"));
        assert_eq!(vars.get("VTK_WRAP_PYTHON"), Some("OFF"));
        assert_eq!(vars.get("VTK_SMP_IMPLEMENTATION_TYPE"), Some("STDThreads"));
        assert_eq!(vars.get("VTK_ARCHIVE_DESTINATION"), Some("lib"));
        assert_eq!(vars.get("VTK_MODULE_USE_EXTERNAL_VTK_nlohmannjson"), Some("ON"));
    }

    #[test]
    fn test_every_boolean_option_translates() {
        crate::recipes::assert_bool_options_translate(&Vtk);
    }

    #[test]
    fn test_group_switches_use_yes_no() {
        let options = Vtk
            .schema(Os::Windows)
            .resolve([("enable_qt", "False"), ("enable_standalone", "False")])
            .unwrap();
        let vars = Vtk
            .configuration(&options, &Settings::for_os(Os::Windows))
            .unwrap();
        assert_eq!(vars.get("VTK_GROUP_ENABLE_Qt"), Some("NO"));
        assert_eq!(vars.get("VTK_GROUP_ENABLE_STANDALONE"), Some("NO"));
    }

    #[test]
    fn test_schema_is_platform_independent() {
        for os in Os::ALL {
            assert_eq!(Vtk.schema(os).len(), OPTIONS.len());
        }
    }

    #[test]
    fn test_patch_tiff() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(TIFF_CMAKELISTS);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "project(tiff)\nadd_subdirectory(libtiff)\n").unwrap();

        patch_tiff_fcommon(tmp.path()).unwrap();
        patch_tiff_fcommon(tmp.path()).unwrap();

        let patched = fs::read_to_string(&path).unwrap();
        assert_eq!(
            patched,
            "project(tiff)\nadd_subdirectory(libtiff)\ntarget_compile_options(tiff PRIVATE -fcommon)\n"
        );
    }

    #[test]
    fn test_patch_tiff_requires_anchor() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(TIFF_CMAKELISTS);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "project(tiff)\n").unwrap();

        assert!(patch_tiff_fcommon(tmp.path()).is_err());
    }

    #[test]
    fn test_requires() {
        assert_eq!(Vtk.requires(), &["nlohmann_json/[~3.11]"]);
    }
}
