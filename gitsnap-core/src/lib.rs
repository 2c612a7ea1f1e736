//! # gitsnap-core
//!
//! Core library for gitsnap: exporting a git history commit by commit, and
//! packing a project's files into a single text blob for LLM context.
//!
//! The exporter drives the `git` executable as a subprocess and parses its
//! textual output; no git internals are reimplemented here.

pub mod diff;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod naming;
pub mod pack;
pub mod report;
pub mod runner;
pub mod snapshot;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use export::{ExportOptions, Exporter};
pub use models::{
    Change, ChangeKind, Commit, CommitOutcome, CommitPair, CommitReport, DiffStats, ExportSummary,
    Parent,
};
pub use pack::{pack, PackConfig, PackRules, PackSummary};
pub use report::{Collector, CommitProgress, Reporter, TracingReporter};
pub use runner::GitRunner;
