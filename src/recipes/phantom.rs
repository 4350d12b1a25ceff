//! Phantom high-speed camera SDK.
//!
//! The vendor ships the SDK as `SDK <version>.zip`, placed next to the
//! recipe's `sources.toml`. Nothing is compiled: the archive is unpacked
//! and its headers and binaries are staged into the package.
//!
//! The folder names inside the archive come from the source table. If a
//! record does not match the archive the resolved paths simply do not exist
//! and packaging copies nothing.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::package_info::CppInfo;
use crate::core::settings::Os;
use crate::core::source_table::SourceDescriptor;
use crate::recipes::recipe::{PackageType, Recipe, RecipeContext, RecipeMetadata};
use crate::sources::unpack;
use crate::util::fs::copy_matching;

const METADATA: RecipeMetadata = RecipeMetadata {
    name: "phantom",
    user: "apexturbine",
    channel: "stable",
    package_type: PackageType::SharedLibrary,
    url: "http://www.phantomhighspeed.com",
    description: "SDK supporting Phantom High Speed Cameras",
    topics: &["phantom", "highspeed", "computervision"],
};

/// Folder the archive is unpacked into, relative to the build folder.
const EXTRACT_DIR: &str = "src";

/// Libraries consumers link against.
const LIBS: &[&str] = &["PhFile", "PhInt", "PhCon", "PhRange", "PhSig", "PhSigV"];

/// File name of the bundled archive for `version`.
pub fn archive_name(version: &str) -> String {
    format!("SDK {}.zip", version)
}

/// Locations of the SDK's headers and binaries, relative to the build folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkPaths {
    pub include: PathBuf,
    pub lib: PathBuf,
    pub bin: PathBuf,
}

impl SdkPaths {
    /// Resolve the archive's folder layout for `version` on `os`.
    ///
    /// ```text
    /// src/SDK CD Image <version><tag>/Manual Install/SDK <sdkVersion>/<includeFolder>
    /// src/SDK CD Image <version><tag>/Manual Install/SDK <sdkVersion>/<libFolder>/x64
    /// src/SDK CD Image <version><tag>/Manual Install/SDK <sdkVersion>/<binFolder>/<Win64|Linux64>
    /// ```
    pub fn resolve(version: &str, source: &SourceDescriptor, os: Os) -> Result<Self> {
        let sdk_version = source.require("sdkVersion", &source.sdk_version)?;
        let include_folder = source.require("includeFolder", &source.include_folder)?;
        let lib_folder = source.require("libFolder", &source.lib_folder)?;
        let bin_folder = source.require("binFolder", &source.bin_folder)?;

        let base = Path::new(EXTRACT_DIR)
            .join(format!("SDK CD Image {}{}", version, source.tag))
            .join("Manual Install")
            .join(format!("SDK {}", sdk_version));

        let os_folder = if os == Os::Windows { "Win64" } else { "Linux64" };

        Ok(SdkPaths {
            include: base.join(include_folder),
            // The vendor only ships 64-bit libraries, under an `x64` folder on every OS.
            lib: base.join(lib_folder).join("x64"),
            bin: base.join(bin_folder).join(os_folder),
        })
    }
}

/// Copy the SDK files found under `build_folder` into `package_folder`.
///
/// Patterns that match nothing are skipped. Running twice into the same
/// package folder produces the same tree.
pub fn stage(paths: &SdkPaths, build_folder: &Path, package_folder: &Path) -> Result<Vec<PathBuf>> {
    let include = build_folder.join(&paths.include);
    let lib = build_folder.join(&paths.lib);
    let bin = build_folder.join(&paths.bin);

    let include_dst = package_folder.join("include").join("phantom");
    let lib_dst = package_folder.join("lib");
    let bin_dst = package_folder.join("bin");

    let copies = [
        ("*.h", &include, &include_dst),
        ("*.lib", &lib, &lib_dst),
        ("*.dll", &bin, &bin_dst),
        ("*.Dll", &bin, &bin_dst),
        ("*.so", &lib, &lib_dst),
        ("*.a", &lib, &lib_dst),
    ];

    let mut staged = Vec::new();
    for (pattern, src, dst) in copies {
        let copied = copy_matching(pattern, src, dst)?;
        tracing::debug!("{} from {}: {} file(s)", pattern, src.display(), copied.len());
        staged.extend(copied);
    }
    Ok(staged)
}

/// The Phantom SDK recipe.
pub struct Phantom;

impl Recipe for Phantom {
    fn metadata(&self) -> &RecipeMetadata {
        &METADATA
    }

    fn folders(&self) -> (&'static str, &'static str) {
        ("src", "build")
    }

    fn export_sources(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        let exported = copy_matching("*.zip", &ctx.layout.recipe_folder, &ctx.layout.export_folder)?;
        tracing::debug!("exported {} archive(s)", exported.len());
        Ok(())
    }

    fn source(&self, _ctx: &RecipeContext<'_>) -> Result<()> {
        // The archive is bundled with the recipe; there is nothing to fetch.
        Ok(())
    }

    fn build(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        let archive = ctx.layout.export_folder.join(archive_name(ctx.version));
        let dest = ctx.layout.build_folder.join(EXTRACT_DIR);
        let files = unpack(&archive, &dest)?;
        tracing::info!("extracted {} file(s) from {}", files.len(), archive.display());

        let paths = SdkPaths::resolve(ctx.version, ctx.source, ctx.settings.os)?;
        tracing::info!("include path: {}", paths.include.display());
        tracing::info!("lib path: {}", paths.lib.display());
        tracing::info!("bin path: {}", paths.bin.display());
        Ok(())
    }

    fn package(&self, ctx: &RecipeContext<'_>) -> Result<()> {
        let paths = SdkPaths::resolve(ctx.version, ctx.source, ctx.settings.os)?;
        let staged = stage(&paths, &ctx.layout.build_folder, &ctx.layout.package_folder)?;
        if staged.is_empty() {
            ctx.shell.warn(format!(
                "no SDK files found under {}; check the source table folder names",
                ctx.layout.build_folder.display()
            ));
        }
        Ok(())
    }

    fn package_info(&self, _ctx: &RecipeContext<'_>) -> CppInfo {
        let mut info = CppInfo::standard();
        info.libs = LIBS.iter().map(|l| l.to_string()).collect();
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn record() -> SourceDescriptor {
        SourceDescriptor {
            tag: "v1.2.3".to_string(),
            sdk_version: Some("7".to_string()),
            include_folder: Some("Include".to_string()),
            lib_folder: Some("Lib".to_string()),
            bin_folder: Some("Bin".to_string()),
            ..Default::default()
        }
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(dir).unwrap().to_path_buf(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_resolve_windows() {
        let paths = SdkPaths::resolve("1.2.3", &record(), Os::Windows).unwrap();
        let base = Path::new("src/SDK CD Image 1.2.3v1.2.3/Manual Install/SDK 7");
        assert_eq!(paths.include, base.join("Include"));
        assert_eq!(paths.lib, base.join("Lib").join("x64"));
        assert_eq!(paths.bin, base.join("Bin").join("Win64"));
    }

    #[test]
    fn test_resolve_linux() {
        let paths = SdkPaths::resolve("1.2.3", &record(), Os::Linux).unwrap();
        assert!(paths.bin.ends_with("Bin/Linux64"));
        assert!(paths.lib.ends_with("Lib/x64"));
    }

    #[test]
    fn test_resolve_requires_sdk_fields() {
        let mut source = record();
        source.lib_folder = None;
        let err = SdkPaths::resolve("1.2.3", &source, Os::Linux).unwrap_err();
        assert!(err.to_string().contains("libFolder"));
    }

    #[test]
    fn test_stage_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        let package = tmp.path().join("package");
        let paths = SdkPaths::resolve("1.2.3", &record(), Os::Windows).unwrap();

        write(build.join(&paths.include).join("PhCon.h"), "// con");
        write(build.join(&paths.include).join("sub/PhInt.h"), "// int");
        write(build.join(&paths.lib).join("PhCon.lib"), "lib");
        write(build.join(&paths.bin).join("PhCon.dll"), "dll");
        write(build.join(&paths.bin).join("PhFile.Dll"), "Dll");
        write(build.join(&paths.bin).join("readme.txt"), "skip");

        stage(&paths, &build, &package).unwrap();
        let first = snapshot(&package);
        stage(&paths, &build, &package).unwrap();
        let second = snapshot(&package);

        assert_eq!(first, second);
        let names: Vec<_> = first.keys().cloned().collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("bin/PhCon.dll"),
                PathBuf::from("bin/PhFile.Dll"),
                PathBuf::from("include/phantom/PhCon.h"),
                PathBuf::from("include/phantom/sub/PhInt.h"),
                PathBuf::from("lib/PhCon.lib"),
            ]
        );
    }

    #[test]
    fn test_stage_with_mismatched_names_copies_nothing() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        let package = tmp.path().join("package");
        write(build.join("src/SDK CD Image 1.2.3/whatever.h"), "//");

        let paths = SdkPaths::resolve("1.2.3", &record(), Os::Linux).unwrap();
        let staged = stage(&paths, &build, &package).unwrap();
        assert!(staged.is_empty());
        assert!(!package.exists());
    }

    #[test]
    fn test_package_info() {
        assert_eq!(archive_name("1.2.3"), "SDK 1.2.3.zip");
        assert_eq!(Phantom.metadata().package_type, PackageType::SharedLibrary);
        assert!(Phantom.schema(Os::Linux).is_empty());
    }
}
