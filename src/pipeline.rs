//! Pipeline driver.
//!
//! ```text
//! 1. Scan       src/            →  [path, ...]             (fatal on error)
//! 2. Per file   load → render → write counties/<st>/<leaf>.md
//!               county records  →  StateAccumulator
//!               state records   →  held for phase 3
//! 3. States     accumulator     →  synthesize → states/<st>/{data.json,README.md}
//!               explicit states →  written where no aggregate exists
//! ```
//!
//! Step 2 runs on a fixed-size rayon pool over the materialized path list.
//! Step 3 starts only after every worker has returned.
//!
//! ## Explicit and synthesized state records
//!
//! When a state directory has both an explicit state record and county
//! records, the synthesized aggregate is written and the explicit record is
//! reported as superseded. Explicit records are written only for states with
//! no aggregate; among several for one directory, the first in scan order wins.
//!
//! ## Failure model
//!
//! Only scan failures abort a run. Everything per file (bad content, missing
//! fields, I/O errors) is reported as a [`BuildEvent`] and counted in the
//! [`BuildReport`]; other files are unaffected.

use crate::aggregate::{AggregateError, StateAccumulator, synthesize};
use crate::config::{Config, ConfigError};
use crate::load::{LoadedRecord, load_record};
use crate::record::{Kind, Record};
use crate::render::{to_canonical_json, to_document};
use crate::scan::{ScanError, scan};
use crate::write::ContentWriter;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Progress and diagnostics emitted while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// An output file was written.
    Generated { path: PathBuf },
    /// A source file was skipped because of its content.
    Skipped { source: PathBuf, reason: String },
    /// A source file or output could not be processed.
    Failed { source: PathBuf, error: String },
    /// An explicit state record lost to the synthesized aggregate.
    Superseded { source: PathBuf, state_dir: String },
    /// A state group held no counties.
    EmptyState { state_code: String },
}

impl BuildEvent {
    /// Warnings and failures, as opposed to progress.
    pub fn is_problem(&self) -> bool {
        !matches!(self, BuildEvent::Generated { .. })
    }
}

/// Counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Source files found by the scan.
    pub sources: usize,
    /// County documents written.
    pub counties: usize,
    /// State directories written (explicit or synthesized).
    pub states: usize,
    /// Output files written.
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Result of checking one source file without writing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckEntry {
    pub source: PathBuf,
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Valid { kind: Kind, state_code: String },
    Skipped(String),
    Failed(String),
}

/// Event sink shared by all workers.
struct Events(Option<Sender<BuildEvent>>);

impl Events {
    fn emit(&self, event: BuildEvent) {
        if let Some(tx) = &self.0 {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }
}

/// Per-file result of phase 2.
enum FileOutcome {
    County,
    State(Box<LoadedRecord>),
    Skipped,
    Failed,
}

/// Run the full pipeline for `config`.
pub fn build(
    config: &Config,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    config.validate()?;
    let events = Events(events);
    let writer = ContentWriter::new(&config.content);
    let paths = scan(&config.source, &config.scan)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.processing.workers)
        .build()?;

    let mut report = BuildReport {
        sources: paths.len(),
        ..Default::default()
    };

    let accumulator = StateAccumulator::new();
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        paths
            .par_iter()
            .enumerate()
            .map(|(order, path)| {
                process_file(&config.source, order, path, &writer, &accumulator, &events)
            })
            .collect()
    });

    let mut explicit_states = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::County => {
                report.counties += 1;
                report.generated += 1;
            }
            FileOutcome::State(loaded) => explicit_states.push(*loaded),
            FileOutcome::Skipped => report.skipped += 1,
            FileOutcome::Failed => report.failed += 1,
        }
    }

    let mut written = HashSet::new();
    for group in accumulator.into_groups() {
        match synthesize(&group) {
            Ok(state) => {
                let source = writer.state_dir(&group.state_dir);
                write_state(&writer, &group.state_dir, &state, &source, &events, &mut report);
                written.insert(group.state_dir);
            }
            Err(AggregateError::EmptyGroup(state_code)) => {
                events.emit(BuildEvent::EmptyState { state_code });
                report.skipped += 1;
            }
        }
    }

    for loaded in explicit_states {
        if !written.insert(loaded.state_dir.clone()) {
            events.emit(BuildEvent::Superseded {
                source: loaded.source,
                state_dir: loaded.state_dir,
            });
            continue;
        }
        write_state(
            &writer,
            &loaded.state_dir,
            &loaded.record,
            &loaded.source,
            &events,
            &mut report,
        );
    }

    Ok(report)
}

fn process_file(
    root: &Path,
    order: usize,
    path: &Path,
    writer: &ContentWriter,
    accumulator: &StateAccumulator,
    events: &Events,
) -> FileOutcome {
    let loaded = match load_record(root, path) {
        Ok(loaded) => loaded,
        Err(e) if e.is_skip() => {
            events.emit(BuildEvent::Skipped {
                source: path.to_path_buf(),
                reason: e.to_string(),
            });
            return FileOutcome::Skipped;
        }
        Err(e) => {
            events.emit(BuildEvent::Failed {
                source: path.to_path_buf(),
                error: e.to_string(),
            });
            return FileOutcome::Failed;
        }
    };

    match loaded.kind {
        Kind::State => FileOutcome::State(Box::new(loaded)),
        Kind::County => {
            let document = to_document(&loaded.record, Kind::County);
            match writer.write_county(&loaded.state_dir, &loaded.leaf, &document) {
                Ok(written) => {
                    events.emit(BuildEvent::Generated { path: written });
                    accumulator.record(&loaded.state_code, order, loaded.record);
                    FileOutcome::County
                }
                Err(e) => {
                    events.emit(BuildEvent::Failed {
                        source: path.to_path_buf(),
                        error: e.to_string(),
                    });
                    FileOutcome::Failed
                }
            }
        }
    }
}

/// Render and write one state directory, recording each file's outcome.
fn write_state(
    writer: &ContentWriter,
    dir: &str,
    record: &Record,
    source: &Path,
    events: &Events,
    report: &mut BuildReport,
) {
    let json = match to_canonical_json(record) {
        Ok(json) => json,
        Err(e) => {
            events.emit(BuildEvent::Failed {
                source: source.to_path_buf(),
                error: e.to_string(),
            });
            report.failed += 1;
            return;
        }
    };
    let readme = to_document(record, Kind::State);

    let mut any_written = false;
    for result in writer.write_state(dir, &json, &readme) {
        match result {
            Ok(path) => {
                events.emit(BuildEvent::Generated { path });
                report.generated += 1;
                any_written = true;
            }
            Err(e) => {
                events.emit(BuildEvent::Failed {
                    source: source.to_path_buf(),
                    error: e.to_string(),
                });
                report.failed += 1;
            }
        }
    }
    if any_written {
        report.states += 1;
    }
}

/// Scan and classify every source file without writing output.
pub fn check(config: &Config) -> Result<Vec<CheckEntry>, PipelineError> {
    config.validate()?;
    let paths = scan(&config.source, &config.scan)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.processing.workers)
        .build()?;

    let entries = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let outcome = match load_record(&config.source, path) {
                    Ok(loaded) => CheckOutcome::Valid {
                        kind: loaded.kind,
                        state_code: loaded.state_code,
                    },
                    Err(e) if e.is_skip() => CheckOutcome::Skipped(e.to_string()),
                    Err(e) => CheckOutcome::Failed(e.to_string()),
                };
                CheckEntry {
                    source: path.clone(),
                    outcome,
                }
            })
            .collect()
    });
    Ok(entries)
}
