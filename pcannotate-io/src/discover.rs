//! Recursive data file discovery

use log::{debug, warn};
use pcannotate_core::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the regular files below `root` whose extension is `extension`.
///
/// The extension is matched case-insensitively, with or without a leading
/// dot. Files come back sorted by path so runs over the same tree present
/// instances in the same order.
pub fn discover<P: AsRef<Path>>(root: P, extension: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::not_found(root, "data directory does not exist"));
    }
    if !root.is_dir() {
        return Err(Error::not_found(root, "data directory is not a directory"));
    }

    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} '.{}' files under {}", files.len(), extension, root.display());
    Ok(files)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
