//! Implementation of `berth create`: run a recipe's lifecycle end to end.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use crate::builder::BuildOptions;
use crate::core::layout::Layout;
use crate::core::package_info::{CppInfo, PackageInfo};
use crate::core::settings::Settings;
use crate::core::source_table::SourceTable;
use crate::ops::resolve::{lookup_recipe, package_id, resolve_options};
use crate::recipes::{RecipeContext, RecipeRegistry};
use crate::util::fs::{ensure_dir, is_populated_dir, remove_dir_all_if_exists};
use crate::util::shell::{format_duration, Shell, Status};
use crate::util::GlobalContext;

/// Options for the create command.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Recipe name
    pub recipe: String,

    /// Version to build; must be in the recipe's source table
    pub version: String,

    /// Raw `name=value` option overrides
    pub overrides: Vec<String>,

    /// Target settings
    pub settings: Settings,

    /// Folder holding one sub-folder per recipe
    pub recipes_dir: PathBuf,

    /// Explicit package folder, instead of one under the berth home
    pub package_folder: Option<PathBuf>,

    /// CMake invocation options
    pub build: BuildOptions,

    /// Refuse to fetch sources over the network
    pub offline: bool,
}

/// Outcome of a successful create.
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub reference: String,
    pub package_id: String,
    pub package_folder: PathBuf,
    pub cpp_info: CppInfo,
}

/// Run export sources, source, generate, build, package and package info,
/// in that order. The first failing step aborts the run.
pub fn create(
    gctx: &GlobalContext,
    shell: &Shell,
    registry: &RecipeRegistry,
    opts: &CreateOptions,
) -> Result<CreateResult> {
    let start = Instant::now();
    let recipe = lookup_recipe(registry, &opts.recipe)?;
    let metadata = recipe.metadata();
    let reference = metadata.reference(&opts.version);

    let recipe_folder = opts.recipes_dir.join(metadata.name);
    if !recipe_folder.is_dir() {
        bail!(
            "recipe folder not found: {}\n\
             hint: pass --recipes-dir or run from the directory containing `recipes/`",
            recipe_folder.display()
        );
    }
    let table = SourceTable::load(&recipe_folder)?;
    let source = table
        .get(&opts.version)
        .with_context(|| format!("cannot build {}", reference))?;

    let options = resolve_options(recipe, opts.settings.os, &opts.overrides)?;
    let id = package_id(metadata.name, &opts.version, &opts.settings, &options);
    tracing::debug!("package id for {}: {}", reference, id);

    let work_dir = gctx.work_dir(metadata.name, &opts.version, &id);
    let package_folder = match opts.package_folder {
        Some(ref folder) => folder.clone(),
        None => gctx.package_dir(metadata.name, &opts.version, &id),
    };
    let (src_folder, build_folder) = recipe.folders();
    let layout = Layout::cmake(
        &recipe_folder,
        &work_dir,
        &package_folder,
        src_folder,
        build_folder,
        opts.settings.build_type,
    );

    let ctx = RecipeContext {
        version: &opts.version,
        settings: &opts.settings,
        options: &options,
        source,
        layout: &layout,
        build: &opts.build,
        shell,
    };

    shell.status(Status::Exporting, format!("{} ({})", reference, opts.settings));
    ensure_dir(&layout.export_folder)?;
    recipe
        .export_sources(&ctx)
        .with_context(|| format!("export sources failed for {}", reference))?;

    if is_populated_dir(&layout.source_folder) {
        shell.status(
            Status::Fresh,
            format!("sources in {}", layout.source_folder.display()),
        );
    } else {
        let _spinner = match source.url {
            Some(ref url) => {
                if opts.offline {
                    bail!(
                        "cannot fetch sources for {} in offline mode\n\
                         hint: run once without --offline to populate {}",
                        reference,
                        layout.source_folder.display()
                    );
                }
                Some(shell.spinner(Status::Fetching, format!("{} ({})", url, source.tag)))
            }
            // Bundled sources: nothing to download.
            None => None,
        };
        ensure_dir(&layout.source_folder)?;
        if let Err(e) = recipe.source(&ctx) {
            // A partial checkout must not pass for fresh sources next time.
            remove_dir_all_if_exists(&layout.source_folder)?;
            return Err(e.context(format!("source failed for {}", reference)));
        }
    }

    ensure_dir(&layout.generators_folder)?;
    let toolchain = recipe
        .generate(&ctx)
        .with_context(|| format!("generate failed for {}", reference))?;
    shell.status(
        Status::Generating,
        format!(
            "{} CMake variable(s) in {}",
            toolchain.variables().len(),
            layout.generators_folder.display()
        ),
    );

    {
        let spinner = shell.spinner(Status::Building, &reference);
        recipe
            .build(&ctx)
            .with_context(|| format!("build failed for {}", reference))?;
        tracing::info!("built {} in {}", reference, format_duration(spinner.elapsed()));
    }

    shell.status(Status::Packaging, package_folder.display());
    // Only a package folder under the berth home is ours to wipe.
    if opts.package_folder.is_none() {
        remove_dir_all_if_exists(&package_folder)?;
    }
    ensure_dir(&package_folder)?;
    recipe
        .package(&ctx)
        .with_context(|| format!("package failed for {}", reference))?;

    let cpp_info = recipe.package_info(&ctx);
    PackageInfo {
        reference: reference.clone(),
        package_id: &id,
        settings: &opts.settings,
        options: &options,
        requires: recipe.requires(),
        cpp_info: &cpp_info,
    }
    .write(&package_folder)?;

    shell.status(
        Status::Finished,
        format!("{} [{}] in {}", reference, id, format_duration(start.elapsed())),
    );

    Ok(CreateResult {
        reference,
        package_id: id,
        package_folder,
        cpp_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::package_info::PACKAGE_INFO_FILE;
    use crate::core::settings::Os;
    use crate::util::shell::{ColorChoice, Verbosity};
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn quiet() -> Shell {
        Shell::new(Verbosity::Quiet, ColorChoice::Never)
    }

    fn write_sdk_zip(path: &std::path::Path) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        let base = "SDK CD Image 1.2.3v1.2.3/Manual Install/SDK 7";
        for (name, contents) in [
            (format!("{base}/Include/PhCon.h"), "// con"),
            (format!("{base}/Lib/x64/PhCon.lib"), "lib"),
            (format!("{base}/Lib/x64/libPhCon.so"), "so"),
            (format!("{base}/Bin/Win64/PhCon.dll"), "dll"),
            (format!("{base}/Bin/Linux64/PhCon.so"), "so"),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn phantom_recipes(root: &std::path::Path) -> PathBuf {
        let recipes = root.join("recipes");
        let phantom = recipes.join("phantom");
        fs::create_dir_all(&phantom).unwrap();
        fs::write(
            phantom.join("sources.toml"),
            r#"
[sources."1.2.3"]
tag = "v1.2.3"
sdkVersion = "7"
includeFolder = "Include"
libFolder = "Lib"
binFolder = "Bin"
"#,
        )
        .unwrap();
        write_sdk_zip(&phantom.join("SDK 1.2.3.zip"));
        recipes
    }

    fn options(recipes_dir: PathBuf, recipe: &str, version: &str, os: Os) -> CreateOptions {
        CreateOptions {
            recipe: recipe.to_string(),
            version: version.to_string(),
            overrides: Vec::new(),
            settings: Settings::for_os(os),
            recipes_dir,
            package_folder: None,
            build: BuildOptions::default(),
            offline: false,
        }
    }

    #[test]
    fn test_create_phantom_windows() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));

        let result = create(
            &gctx,
            &quiet(),
            &RecipeRegistry::new(),
            &options(recipes, "phantom", "1.2.3", Os::Windows),
        )
        .unwrap();

        assert_eq!(result.reference, "phantom/1.2.3@apexturbine/stable");
        let pkg = &result.package_folder;
        assert!(pkg.starts_with(tmp.path().join("home/p/phantom/1.2.3")));
        assert!(pkg.join("include/phantom/PhCon.h").is_file());
        assert!(pkg.join("lib/PhCon.lib").is_file());
        assert!(pkg.join("lib/libPhCon.so").is_file());
        assert!(pkg.join("bin/PhCon.dll").is_file());
        assert!(!pkg.join("bin/PhCon.so").exists());

        let info: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(pkg.join(PACKAGE_INFO_FILE)).unwrap())
                .unwrap();
        assert_eq!(info["cpp_info"]["libs"][5], "PhSigV");
        assert_eq!(info["package_id"], result.package_id.as_str());
    }

    #[test]
    fn test_create_twice_is_stable() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));
        let opts = options(recipes, "phantom", "1.2.3", Os::Linux);

        let first = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap();
        let second = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap();
        assert_eq!(first.package_id, second.package_id);
        assert!(second.package_folder.join("lib/libPhCon.so").is_file());
    }

    #[test]
    fn test_unknown_version_fails() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));

        let err = create(
            &gctx,
            &quiet(),
            &RecipeRegistry::new(),
            &options(recipes, "phantom", "9.9.9", Os::Linux),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("known: 1.2.3"));
    }

    #[test]
    fn test_missing_archive_fails() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        fs::remove_file(recipes.join("phantom/SDK 1.2.3.zip")).unwrap();
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));

        let err = create(
            &gctx,
            &quiet(),
            &RecipeRegistry::new(),
            &options(recipes, "phantom", "1.2.3", Os::Linux),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("archive not found"));
    }

    #[test]
    fn test_offline_refuses_fetch() {
        let tmp = TempDir::new().unwrap();
        let recipes = tmp.path().join("recipes");
        fs::create_dir_all(recipes.join("vtk")).unwrap();
        fs::write(
            recipes.join("vtk/sources.toml"),
            "[sources.\"9.3.1\"]\nurl = \"https://github.com/kitware/vtk\"\ntag = \"v9.3.1\"\n",
        )
        .unwrap();
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));

        let mut opts = options(recipes, "vtk", "9.3.1", Os::Linux);
        opts.offline = true;
        let err = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap_err();
        assert!(err.to_string().contains("offline mode"));
    }

    #[test]
    fn test_explicit_package_folder_keeps_existing_files() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));
        let project = tmp.path().join("my_project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("notes.txt"), "keep me").unwrap();

        let mut opts = options(recipes, "phantom", "1.2.3", Os::Windows);
        opts.package_folder = Some(project.clone());
        let result = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap();

        assert_eq!(result.package_folder, project);
        assert_eq!(fs::read_to_string(project.join("notes.txt")).unwrap(), "keep me");
        assert!(project.join("include/phantom/PhCon.h").is_file());
        assert!(project.join(PACKAGE_INFO_FILE).is_file());
    }

    #[test]
    fn test_default_package_folder_is_rebuilt() {
        let tmp = TempDir::new().unwrap();
        let recipes = phantom_recipes(tmp.path());
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));
        let opts = options(recipes, "phantom", "1.2.3", Os::Windows);

        let first = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap();
        fs::write(first.package_folder.join("stale.txt"), "old").unwrap();
        let second = create(&gctx, &quiet(), &RecipeRegistry::new(), &opts).unwrap();

        assert_eq!(first.package_folder, second.package_folder);
        assert!(!second.package_folder.join("stale.txt").exists());
    }

    #[test]
    fn test_failed_fetch_leaves_no_source_folder() {
        let tmp = TempDir::new().unwrap();
        let empty_repo = tmp.path().join("empty.git");
        git2::Repository::init_bare(&empty_repo).unwrap();
        let url = url::Url::from_file_path(&empty_repo).unwrap();

        let recipes = tmp.path().join("recipes");
        fs::create_dir_all(recipes.join("vtk")).unwrap();
        fs::write(
            recipes.join("vtk/sources.toml"),
            format!("[sources.\"9.3.1\"]\nurl = \"{}\"\ntag = \"v9.3.1\"\n", url),
        )
        .unwrap();
        let gctx = GlobalContext::with_paths(tmp.path().to_path_buf(), tmp.path().join("home"));
        let registry = RecipeRegistry::new();
        let mut opts = options(recipes, "vtk", "9.3.1", Os::Linux);

        let err = create(&gctx, &quiet(), &registry, &opts).unwrap_err();
        assert!(err.to_string().contains("source failed for vtk/9.3.1"));

        let recipe = lookup_recipe(&registry, "vtk").unwrap();
        let resolved = resolve_options(recipe, Os::Linux, &[]).unwrap();
        let id = package_id("vtk", "9.3.1", &opts.settings, &resolved);
        let (src_folder, _) = recipe.folders();
        assert!(!gctx.work_dir("vtk", "9.3.1", &id).join(src_folder).exists());

        opts.offline = true;
        let err = create(&gctx, &quiet(), &registry, &opts).unwrap_err();
        assert!(err.to_string().contains("offline mode"));
    }
}
