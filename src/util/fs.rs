//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Whether `path` is a directory with at least one entry.
pub fn is_populated_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Copy every file under `src` whose path relative to `src` matches
/// `pattern` into `dst`, keeping the relative path.
///
/// Matching is case-sensitive and `*` crosses directory separators, so
/// `*.h` picks up headers at any depth. A missing `src` or a pattern that
/// matches nothing copies nothing and is not an error. Existing files in
/// `dst` are overwritten. Returns the destination paths, sorted.
pub fn copy_matching(pattern: &str, src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let matcher =
        Pattern::new(pattern).with_context(|| format!("invalid copy pattern: {}", pattern))?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    if !src.is_dir() {
        tracing::debug!("copy source {} does not exist; nothing to copy", src.display());
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", src.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_path(src, entry.path());
        if !matcher.matches_path_with(&relative, options) {
            continue;
        }

        let target = dst.join(&relative);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(entry.path(), &target).with_context(|| {
            format!(
                "failed to copy {} to {}",
                entry.path().display(),
                target.display()
            )
        })?;
        copied.push(target);
    }

    copied.sort();
    Ok(copied)
}

/// Replace the first occurrence of `search` in a text file.
///
/// Fails when `search` does not occur.
pub fn replace_in_file(path: &Path, search: &str, replace: &str) -> Result<()> {
    let contents = read_to_string(path)?;
    if !contents.contains(search) {
        bail!(
            "pattern `{}` not found in {}",
            search,
            path.display()
        );
    }
    let updated = contents.replacen(search, replace, 1);
    write_string(path, &updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    relative_path(dir, e.path()),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn sample_tree(root: &Path) {
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.h"), "a").unwrap();
        fs::write(root.join("sub/b.h"), "b").unwrap();
        fs::write(root.join("lib.Dll"), "dll").unwrap();
        fs::write(root.join("notes.txt"), "txt").unwrap();
    }

    #[test]
    fn test_copy_matching_recurses_and_keeps_paths() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        sample_tree(&src);

        let copied = copy_matching("*.h", &src, &dst).unwrap();
        assert_eq!(copied, vec![dst.join("a.h"), dst.join("sub/b.h")]);
        assert!(!dst.join("notes.txt").exists());
    }

    #[test]
    fn test_copy_matching_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        sample_tree(&src);

        assert!(copy_matching("*.dll", &src, &dst).unwrap().is_empty());
        assert_eq!(copy_matching("*.Dll", &src, &dst).unwrap().len(), 1);
    }

    #[test]
    fn test_copy_matching_zero_matches_is_noop() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        sample_tree(&src);
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("existing.txt"), "keep").unwrap();

        let before = snapshot(&dst);
        let copied = copy_matching("*.lib", &src, &dst).unwrap();
        assert!(copied.is_empty());
        assert_eq!(snapshot(&dst), before);
    }

    #[test]
    fn test_copy_matching_missing_source_is_noop() {
        let tmp = TempDir::new().unwrap();
        let copied =
            copy_matching("*.h", &tmp.path().join("missing"), &tmp.path().join("dst")).unwrap();
        assert!(copied.is_empty());
        assert!(!tmp.path().join("dst").exists());
    }

    #[test]
    fn test_copy_matching_twice_is_identical() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        sample_tree(&src);

        copy_matching("*.h", &src, &dst).unwrap();
        let first = snapshot(&dst);
        copy_matching("*.h", &src, &dst).unwrap();
        assert_eq!(snapshot(&dst), first);
    }

    #[test]
    fn test_replace_in_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");
        fs::write(&path, "add_subdirectory(libtiff)\n").unwrap();

        replace_in_file(&path, "add_subdirectory(libtiff)", "add_subdirectory(libtiff)\nX").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "add_subdirectory(libtiff)\nX\n"
        );

        assert!(replace_in_file(&path, "missing()", "x").is_err());
    }

    #[test]
    fn test_is_populated_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_populated_dir(&tmp.path().join("nope")));
        assert!(!is_populated_dir(tmp.path()));
        fs::write(tmp.path().join("f"), "").unwrap();
        assert!(is_populated_dir(tmp.path()));
    }
}
