//! Source tree discovery.
//!
//! Walks the source root recursively in file-name order and yields every file
//! with the record extension, skipping directories and files that are part of
//! the site rather than data:
//!
//! ```text
//! src/
//! ├── _includes/          # skipped (templates)
//! ├── scripts/            # skipped
//! ├── services/           # skipped
//! ├── deno.json           # skipped (tooling config)
//! ├── CA/
//! │   ├── data.json       # state record
//! │   ├── los_angeles.json
//! │   └── orange.json
//! └── TX/
//!     └── harris.json
//! ```
//!
//! Any walk error (unreadable root or subdirectory) is fatal for the run.

use crate::config::ScanConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot read source tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Directories that never hold records.
const EXCLUDED_DIRS: &[&str] = &["services", "scripts", "_includes"];

/// Site files that are not records.
const EXCLUDED_FILES: &[&str] = &[
    "_data.yml",
    "plugins.ts",
    "_config.ts",
    "README.md",
    "CHANGELOG.md",
    "404.md",
    "deno.json",
    "package.json",
    "tsconfig.json",
];

/// Enumerate record files under `root`, lazily.
///
/// The iterator is single-pass; collect it (or use [`scan`]) to process the
/// paths more than once.
pub fn walk<'a>(
    root: &Path,
    config: &'a ScanConfig,
) -> impl Iterator<Item = Result<PathBuf, ScanError>> + 'a {
    let extension = config.extension.trim_start_matches('.').to_string();
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| e.depth() == 0 || !is_excluded(e, &config.exclude))
        .filter_map(move |entry| match entry {
            Ok(e) if e.file_type().is_file() && has_extension(e.path(), &extension) => {
                Some(Ok(e.into_path()))
            }
            Ok(_) => None,
            Err(err) => Some(Err(ScanError::from(err))),
        })
}

/// Collect every record file under `root`, in sorted order.
pub fn scan(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    walk(root, config).collect()
}

fn is_excluded(entry: &DirEntry, extra: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || extra.iter().any(|x| *x == name) {
        return true;
    }
    if entry.file_type().is_dir() {
        EXCLUDED_DIRS.contains(&&*name)
    } else {
        EXCLUDED_FILES.contains(&&*name) || name.starts_with("LICENSE")
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
