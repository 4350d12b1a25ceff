//! Extraction of bundled `.zip` source archives.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use zip::ZipArchive;

use crate::util::fs::ensure_dir;

/// Extract `archive` into `dest`, returning the extracted file paths.
pub fn unpack(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    if !archive.is_file() {
        bail!("archive not found: {}", archive.display());
    }
    if !is_zip(archive) {
        bail!("unsupported archive format: {}", archive.display());
    }
    extract_zip(archive, dest)
}

fn is_zip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Extract a zip archive.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("failed to read zip archive: {}", archive_path.display()))?;

    ensure_dir(dest)?;
    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("failed to read entry {} of {}", i, archive_path.display()))?;

        // Entries that would escape `dest` are skipped.
        let Some(relative) = entry.enclosed_name().map(|p| p.to_owned()) else {
            tracing::warn!("skipping unsafe zip entry: {}", entry.name());
            continue;
        };
        let target = dest.join(&relative);

        if entry.is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        let mut out = File::create(&target)
            .with_context(|| format!("failed to create {}", target.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("failed to extract {}", target.display()))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }

        extracted.push(target);
    }

    Ok(extracted)
}
