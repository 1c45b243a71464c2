//! Source file collection.

use std::path::{Path, PathBuf};

/// Which files a directory walk picks up.
pub struct FileFilter {
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl FileFilter {
    pub fn new(extensions: Vec<String>, exclude: Vec<glob::Pattern>) -> Self {
        Self {
            extensions,
            exclude,
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path = path.strip_prefix(".").unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(path))
    }
}

/// Collect source files from the given paths (files or directories).
///
/// Files named explicitly are kept whatever their extension; directories are
/// walked recursively, skipping hidden directories. The result is sorted
/// and free of duplicates.
pub fn collect_source_files(
    paths: &[PathBuf],
    filter: &FileFilter,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if filter.is_excluded(path) {
            continue;
        }
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_in_dir(path, filter, &mut files)?;
        } else {
            anyhow::bail!("{}: no such file or directory", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_in_dir(dir: &Path, filter: &FileFilter, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if filter.is_excluded(&path) {
            tracing::trace!(path = %path.display(), "excluded");
            continue;
        }

        if path.is_dir() {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            collect_in_dir(&path, filter, files)?;
        } else if filter.has_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}
