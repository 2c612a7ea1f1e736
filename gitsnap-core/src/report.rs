use crate::models::{Commit, CommitReport, DiffStats};
use std::path::Path;
use tracing::{info, warn};

/// Per-commit progress handed to [`Reporter::commit_started`].
#[derive(Debug, Clone, Copy)]
pub struct CommitProgress<'a> {
    /// Zero-based position in the history.
    pub index: usize,
    pub total: usize,
    pub commit: &'a Commit,
    pub stats: DiffStats,
    pub directory_name: &'a str,
}

/// Sink for warnings and progress emitted while exporting or packing.
///
/// Only `warn` is required; the progress hooks default to no-ops.
pub trait Reporter {
    fn warn(&mut self, message: &str);

    fn commit_started(&mut self, _progress: &CommitProgress<'_>) {}

    fn commit_skipped(&mut self, _directory: &Path) {}

    fn changes_found(&mut self, _count: usize, _stats: DiffStats) {}

    fn file_exported(&mut self, _path: &str) {}

    fn commit_finished(&mut self, _report: &CommitReport) {}
}

/// Forwards everything to `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&mut self, message: &str) {
        warn!("{}", message);
    }

    fn commit_started(&mut self, progress: &CommitProgress<'_>) {
        info!(
            "Processing commit {}/{}: {} - {} (+{} -{})",
            progress.index + 1,
            progress.total,
            progress.commit.short_hash(),
            progress.commit.subject,
            progress.stats.insertions,
            progress.stats.deletions
        );
    }

    fn commit_skipped(&mut self, directory: &Path) {
        info!("Directory {:?} already exists, skipping", directory);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Warning(String),
    Started { index: usize, hash: String },
    Skipped(String),
    Exported(String),
    Finished { index: usize },
}

/// Records every event in memory.
#[derive(Debug, Default)]
pub struct Collector {
    pub events: Vec<Event>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Warning(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn exported_files(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Exported(path) => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Skipped(_)))
            .count()
    }
}

impl Reporter for Collector {
    fn warn(&mut self, message: &str) {
        self.events.push(Event::Warning(message.to_string()));
    }

    fn commit_started(&mut self, progress: &CommitProgress<'_>) {
        self.events.push(Event::Started {
            index: progress.index,
            hash: progress.commit.hash.clone(),
        });
    }

    fn commit_skipped(&mut self, directory: &Path) {
        self.events
            .push(Event::Skipped(directory.display().to_string()));
    }

    fn file_exported(&mut self, path: &str) {
        self.events.push(Event::Exported(path.to_string()));
    }

    fn commit_finished(&mut self, report: &CommitReport) {
        self.events.push(Event::Finished {
            index: report.index,
        });
    }
}
