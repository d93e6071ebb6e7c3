//! # Coverage Docs
//!
//! Turns a directory tree of geographic coverage descriptors (one JSON record
//! per county or state) into a documentation content tree: one Markdown page
//! per county, and per state a synthesized `data.json` plus a `README.md`
//! indexing its counties and layers.
//!
//! # Architecture: Two-Phase Pipeline
//!
//! ```text
//! 1. Per file   src/<ST>/<name>.json  →  content/counties/<st>/<name>.md
//!                                         (county records also collected per state)
//! 2. Per state  collected counties    →  content/states/<st>/data.json
//!                                         content/states/<st>/README.md
//! ```
//!
//! Phase 1 runs on a fixed-size worker pool; phase 2 starts once every file
//! is done. Each run regenerates everything, so running twice on the same
//! input produces byte-identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source tree and lists record files, pruning non-data entries |
//! | [`load`] | Reads and parses one record, classifies it as county or state, resolves its output location |
//! | [`record`] | The record data model: typed known fields, free-form `conform`/`license` values, preserved extras |
//! | [`aggregate`] | Concurrency-safe per-state accumulation and state record synthesis |
//! | [`render`] | Canonical JSON encoding and front matter + Markdown documents |
//! | [`write`] | Output layout under the content root |
//! | [`pipeline`] | Drives scan → load → render → write, then aggregation; emits [`pipeline::BuildEvent`]s |
//! | [`config`] | `coverage-docs.toml` loading and validation |
//! | [`naming`] | Filename sanitizing and YAML string escaping |
//! | [`output`] | CLI output formatting for build events, summaries and `check` results |
//!
//! # Output Contract
//!
//! Documents are consumed by a separate static-site build. Front matter keys
//! (`title`, `geoid`, `state`, `country`, `county` or `type`, `schema`,
//! `layers`) and the JSON record shape are stable.

pub mod aggregate;
pub mod config;
pub mod load;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod scan;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
