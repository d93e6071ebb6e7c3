//! Record loading and classification.
//!
//! Reads one source file, parses it into a [`Record`], checks the two fields
//! every record needs (GEOID and a state name), classifies it by GEOID length
//! and works out where its outputs go:
//!
//! ```text
//! src/CA/los_angeles.json
//!     │  └─ leaf:  "los_angeles"  → counties/ca/los_angeles.md
//!     └──── state: "ca"           → states/ca/
//! ```
//!
//! Problems with the content itself (bad encoding or JSON, missing fields,
//! no state directory) are *skips*: the file produces nothing and the run goes on. An
//! I/O error reading the file is a per-file *failure*.

use crate::naming::sanitize_filename;
use crate::record::{Kind, Record};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Record is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Missing 'geoid' information")]
    MissingGeoid,
    #[error("Missing 'state' information")]
    MissingState,
    #[error("Unable to determine state directory or filename")]
    NoStateDirectory,
}

impl LoadError {
    /// Content problems that are reported as a warning rather than a failure.
    pub fn is_skip(&self) -> bool {
        !matches!(self, LoadError::Io(_))
    }
}

/// A parsed, classified record and where its outputs belong.
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub source: PathBuf,
    pub record: Record,
    pub kind: Kind,
    /// Aggregation key: `coverage.state`, or the raw state directory name.
    pub state_code: String,
    /// Sanitized first path segment below the source root.
    pub state_dir: String,
    /// Sanitized file stem.
    pub leaf: String,
}

/// Read, parse and classify the record at `path`.
pub fn load_record(root: &Path, path: &Path) -> Result<LoadedRecord, LoadError> {
    let content = String::from_utf8(fs::read(path)?)?;
    classify(root, path, &content)
}

/// Parse and classify record text that was read from `path`.
pub fn classify(root: &Path, path: &Path, content: &str) -> Result<LoadedRecord, LoadError> {
    let record: Record = serde_json::from_str(content)?;

    let geoid = record.geoid().ok_or(LoadError::MissingGeoid)?;
    record.state_name().ok_or(LoadError::MissingState)?;
    let kind = Kind::of_geoid(geoid);

    let (raw_state_dir, stem) = split_source_path(root, path).ok_or(LoadError::NoStateDirectory)?;
    let state_code = record
        .state_code()
        .map(str::to_string)
        .unwrap_or_else(|| raw_state_dir.clone());

    Ok(LoadedRecord {
        source: path.to_path_buf(),
        kind,
        state_code,
        state_dir: sanitize_filename(&raw_state_dir),
        leaf: sanitize_filename(&stem),
        record,
    })
}

/// First directory below `root` and the file stem; `None` for files that sit
/// directly in `root`.
fn split_source_path(root: &Path, path: &Path) -> Option<(String, String)> {
    let rel = path.strip_prefix(root).ok()?;
    let mut components = rel.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s),
        _ => None,
    });
    let state = components.next()?.to_string_lossy().to_string();
    // Need at least one more segment below the state directory.
    components.next()?;
    let stem = path.file_stem()?.to_string_lossy().to_string();
    Some((state, stem))
}
