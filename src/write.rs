//! Output writing.
//!
//! ```text
//! content/
//! ├── counties/
//! │   └── ca/
//! │       ├── los_angeles.md
//! │       └── orange.md
//! └── states/
//!     └── ca/
//!         ├── data.json
//!         └── README.md
//! ```
//!
//! Files are overwritten unconditionally. Each file is written on its own: a
//! failure on one does not stop its sibling.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COUNTIES_DIR: &str = "counties";
pub const STATES_DIR: &str = "states";
pub const STATE_JSON: &str = "data.json";
pub const STATE_README: &str = "README.md";

#[derive(Error, Debug)]
#[error("Failed to write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Writes generated artifacts below a content root.
#[derive(Debug, Clone)]
pub struct ContentWriter {
    root: PathBuf,
}

impl ContentWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn county_path(&self, state_dir: &str, leaf: &str) -> PathBuf {
        self.root
            .join(COUNTIES_DIR)
            .join(state_dir)
            .join(format!("{leaf}.md"))
    }

    pub fn state_dir(&self, state_dir: &str) -> PathBuf {
        self.root.join(STATES_DIR).join(state_dir)
    }

    /// Write a county document to `counties/<state>/<leaf>.md`.
    pub fn write_county(
        &self,
        state_dir: &str,
        leaf: &str,
        markdown: &str,
    ) -> Result<PathBuf, WriteError> {
        let path = self.county_path(state_dir, leaf);
        write_file(&path, markdown)?;
        Ok(path)
    }

    /// Write `states/<state>/data.json` and `states/<state>/README.md`.
    ///
    /// Both writes are attempted; one result per file, JSON first.
    pub fn write_state(
        &self,
        state_dir: &str,
        json: &str,
        readme: &str,
    ) -> [Result<PathBuf, WriteError>; 2] {
        let dir = self.state_dir(state_dir);
        [
            write_file(&dir.join(STATE_JSON), json).map(|()| dir.join(STATE_JSON)),
            write_file(&dir.join(STATE_README), readme).map(|()| dir.join(STATE_README)),
        ]
    }
}

/// Create parent directories as needed, then write `content` to `path`.
fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, content).map_err(wrap)
}
