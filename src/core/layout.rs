//! Working folder layout for one recipe invocation.

use std::path::{Path, PathBuf};

use crate::core::settings::BuildType;

/// Folders a recipe reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The recipe's own folder (source table, bundled archives).
    pub recipe_folder: PathBuf,
    /// Copies of exported files.
    pub export_folder: PathBuf,
    /// Upstream sources.
    pub source_folder: PathBuf,
    /// CMake binary dir.
    pub build_folder: PathBuf,
    /// Generated toolchain files.
    pub generators_folder: PathBuf,
    /// Final package.
    pub package_folder: PathBuf,
}

impl Layout {
    /// CMake-style layout under `work_dir`.
    ///
    /// ```text
    /// <work_dir>/export
    /// <work_dir>/<src_folder>
    /// <work_dir>/<build_folder>/<BuildType>
    /// <work_dir>/<build_folder>/<BuildType>/generators
    /// ```
    pub fn cmake(
        recipe_folder: &Path,
        work_dir: &Path,
        package_folder: &Path,
        src_folder: &str,
        build_folder: &str,
        build_type: BuildType,
    ) -> Self {
        let build_folder = work_dir.join(build_folder).join(build_type.as_str());
        Layout {
            recipe_folder: recipe_folder.to_path_buf(),
            export_folder: work_dir.join("export"),
            source_folder: work_dir.join(src_folder),
            generators_folder: build_folder.join("generators"),
            build_folder,
            package_folder: package_folder.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmake_layout() {
        let layout = Layout::cmake(
            Path::new("/recipes/opencv"),
            Path::new("/work"),
            Path::new("/pkg"),
            "opencv",
            "build",
            BuildType::Release,
        );

        assert_eq!(layout.source_folder, PathBuf::from("/work/opencv"));
        assert_eq!(layout.build_folder, PathBuf::from("/work/build/Release"));
        assert_eq!(
            layout.generators_folder,
            PathBuf::from("/work/build/Release/generators")
        );
        assert_eq!(layout.export_folder, PathBuf::from("/work/export"));
        assert_eq!(layout.package_folder, PathBuf::from("/pkg"));
    }
}
