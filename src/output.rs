//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! Progress lines go to stdout, warnings and failures to stderr:
//!
//! ```text
//! Generated content/counties/ca/los_angeles.md
//! Warning: skipping src/CA/broken.json: Malformed record: expected value at line 1 column 1
//! Error: src/TX/harris.json: Failed to write content/counties/tx/harris.md: Permission denied
//! Superseded src/CA/data.json by synthesized states/ca/
//! Generated content/states/ca/data.json
//! Generated content/states/ca/README.md
//!
//! Generated 3 files from 4 sources (1 county, 1 state)
//! 1 skipped, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! States
//!     CA  CA/data.json
//! Counties
//!     CA  CA/los_angeles.json
//!     TX  TX/harris.json
//! Skipped
//!     CA/broken.json
//!         Malformed record: expected value at line 1 column 1
//!
//! Checked 4 files: 2 counties, 1 state, 1 skipped, 0 failed
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O; `print_*`
//! wrappers write them out.

use crate::pipeline::{BuildEvent, BuildReport, CheckEntry, CheckOutcome};
use crate::record::Kind;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when possible, `/`-separated.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// `1 county`, `2 counties`.
fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format a single build event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    let line = match event {
        BuildEvent::Generated { path } => format!("Generated {}", path.display()),
        BuildEvent::Skipped { source, reason } => {
            format!("Warning: skipping {}: {}", source.display(), reason)
        }
        BuildEvent::Failed { source, error } => {
            format!("Error: {}: {}", source.display(), error)
        }
        BuildEvent::Superseded { source, state_dir } => format!(
            "Superseded {} by synthesized states/{}/",
            source.display(),
            state_dir
        ),
        BuildEvent::EmptyState { state_code } => {
            format!("Warning: No counties data found for state code: {state_code}")
        }
    };
    vec![line]
}

/// Print a build event; problems go to stderr.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        if event.is_problem() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format the closing summary of a build.
pub fn format_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} from {} ({}, {})",
        plural(report.generated, "file", "files"),
        plural(report.sources, "source", "sources"),
        plural(report.counties, "county", "counties"),
        plural(report.states, "state", "states"),
    )];
    if report.skipped > 0 || report.failed > 0 {
        lines.push(format!(
            "{} skipped, {} failed",
            report.skipped, report.failed
        ));
    }
    lines
}

pub fn print_summary(report: &BuildReport) {
    println!();
    for line in format_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format `check` results grouped by outcome, paths relative to `source_root`.
pub fn format_check_output(entries: &[CheckEntry], source_root: &Path) -> Vec<String> {
    let mut states = Vec::new();
    let mut counties = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    for entry in entries {
        let path = display_path(&entry.source, source_root);
        match &entry.outcome {
            CheckOutcome::Valid { kind, state_code } => {
                let line = format!("{}{}  {}", indent(1), state_code, path);
                match kind {
                    Kind::State => states.push(line),
                    Kind::County => counties.push(line),
                }
            }
            CheckOutcome::Skipped(reason) => {
                skipped.push(format!("{}{}", indent(1), path));
                skipped.push(format!("{}{}", indent(2), reason));
            }
            CheckOutcome::Failed(error) => {
                failed.push(format!("{}{}", indent(1), path));
                failed.push(format!("{}{}", indent(2), error));
            }
        }
    }

    let state_count = states.len();
    let county_count = counties.len();
    let skipped_count = skipped.len() / 2;
    let failed_count = failed.len() / 2;

    let mut lines = Vec::new();
    for (header, section) in [
        ("States", states),
        ("Counties", counties),
        ("Skipped", skipped),
        ("Failed", failed),
    ] {
        if !section.is_empty() {
            lines.push(header.to_string());
            lines.extend(section);
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {}: {}, {}, {} skipped, {} failed",
        plural(entries.len(), "file", "files"),
        plural(county_count, "county", "counties"),
        plural(state_count, "state", "states"),
        skipped_count,
        failed_count
    ));
    lines
}

pub fn print_check_output(entries: &[CheckEntry], source_root: &Path) {
    for line in format_check_output(entries, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
