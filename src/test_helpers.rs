//! Shared test utilities for the coverage-docs test suite.
//!
//! Record builders for the common shapes (county with one addresses layer,
//! bare state record), their JSON text counterparts for loader tests, and
//! fixture-tree setup for pipeline tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_source(&tmp.path().join("src"), "NV/clark.json", &county_json("32003", "Clark", "Nevada", "NV"));
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::record::{Census, Coverage, Layer, Layers, Record};
use serde_json::json;

// =========================================================================
// Record builders
// =========================================================================

/// A layer with the given name and data URL, protocol `http`.
pub fn layer(name: &str, data: &str) -> Layer {
    Layer {
        name: name.to_string(),
        data: data.to_string(),
        protocol: "http".to_string(),
        ..Default::default()
    }
}

/// A county record with a single `addresses` layer carrying a nested conform.
pub fn county_record(geoid: &str, county: &str, state_name: &str, state_code: &str) -> Record {
    let mut addresses = layer("county", "https://example.com/addresses.zip");
    addresses.conform = Some(json!({"number": {"fields": ["house_number"]}}));
    let mut layers = Layers::new();
    layers.entry("addresses").push(addresses);

    Record {
        coverage: Coverage {
            us_census: Some(Census {
                geoid: Some(geoid.to_string()),
                name: Some(county.to_string()),
                state: Some(state_name.to_string()),
                ..Default::default()
            }),
            country: Some("us".to_string()),
            state: Some(state_code.to_string()),
            county: Some(county.to_string()),
            ..Default::default()
        },
        layers: Some(layers),
        ..Default::default()
    }
}

/// A state-level record with no layers.
pub fn state_record(geoid: &str, state_name: &str, state_code: &str) -> Record {
    Record {
        coverage: Coverage {
            us_census: Some(Census {
                geoid: Some(geoid.to_string()),
                name: Some(state_name.to_string()),
                state: Some(state_name.to_string()),
                ..Default::default()
            }),
            country: Some("us".to_string()),
            state: Some(state_code.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// JSON text of [`county_record`].
pub fn county_json(geoid: &str, county: &str, state_name: &str, state_code: &str) -> String {
    to_json(&county_record(geoid, county, state_name, state_code))
}

/// JSON text of [`state_record`].
pub fn state_json(geoid: &str, state_name: &str, state_code: &str) -> String {
    to_json(&state_record(geoid, state_name, state_code))
}

fn to_json(record: &Record) -> String {
    serde_json::to_string_pretty(record).unwrap()
}

// =========================================================================
// Filesystem setup
// =========================================================================

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_source(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

/// Copy `fixtures/` to a temp directory and return it.
///
/// The copy holds `src/` (the source tree); tests write `content/` next to it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Every file under `root`, as sorted `/`-separated relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
