use crate::error::Result;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Hash git assigns to the empty tree in SHA-1 repositories.
pub const EMPTY_TREE_HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

pub const NO_SUBJECT: &str = "no_subject";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    /// Committer time, unix seconds.
    pub timestamp: i64,
    pub subject: String,
}

impl Commit {
    pub fn new(hash: String, timestamp: i64, subject: &str) -> Self {
        let subject = subject.trim();
        Self {
            hash,
            timestamp,
            subject: if subject.is_empty() {
                NO_SUBJECT.to_string()
            } else {
                subject.to_string()
            },
        }
    }

    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }

    pub fn committed_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.timestamp, 0).single()
    }
}

/// The commit a diff is taken against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "hash", rename_all = "snake_case")]
pub enum Parent {
    /// No predecessor: the first commit of the history is diffed against nothing.
    EmptyTree,
    Commit(String),
}

impl Parent {
    pub fn revision(&self) -> &str {
        match self {
            Parent::EmptyTree => EMPTY_TREE_HASH,
            Parent::Commit(hash) => hash,
        }
    }

    pub fn is_empty_tree(&self) -> bool {
        matches!(self, Parent::EmptyTree)
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::EmptyTree => write!(f, "(empty tree)"),
            Parent::Commit(hash) => write!(f, "{}", &hash[..hash.len().min(7)]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPair {
    pub previous: Parent,
    pub current: String,
}

impl CommitPair {
    pub fn new(previous: Parent, current: impl Into<String>) -> Self {
        Self {
            previous,
            current: current.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Copied,
    Modified,
    Renamed,
    TypeChanged,
}

impl ChangeKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Copied => "copied",
            ChangeKind::Modified => "modified",
            ChangeKind::Renamed => "renamed",
            ChangeKind::TypeChanged => "type-changed",
        }
    }

    /// Maps a `--name-status` letter. Rename and copy letters carry a similarity score (`R100`).
    pub fn from_status(status: &str) -> Option<Self> {
        match status.chars().next()? {
            'A' => Some(ChangeKind::Added),
            'C' => Some(ChangeKind::Copied),
            'M' => Some(ChangeKind::Modified),
            'R' => Some(ChangeKind::Renamed),
            'T' => Some(ChangeKind::TypeChanged),
            _ => None,
        }
    }

    pub fn has_source(&self) -> bool {
        matches!(self, ChangeKind::Copied | ChangeKind::Renamed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Repository-relative path as of the current commit.
    pub path: String,
    pub source: Option<String>,
}

impl Change {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub insertions: u64,
    pub deletions: u64,
}

impl DiffStats {
    pub fn new(insertions: u64, deletions: u64) -> Self {
        Self {
            insertions,
            deletions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    Exported { files: usize, failed: usize },
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    pub index: usize,
    pub hash: String,
    pub subject: String,
    pub previous: Parent,
    pub stats: DiffStats,
    pub directory: PathBuf,
    pub outcome: CommitOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub repository: PathBuf,
    pub output_root: PathBuf,
    pub commits: Vec<CommitReport>,
}

impl ExportSummary {
    pub fn new(repository: PathBuf, output_root: PathBuf) -> Self {
        Self {
            repository,
            output_root,
            commits: Vec::new(),
        }
    }

    pub fn exported(&self) -> usize {
        self.commits
            .iter()
            .filter(|c| matches!(c.outcome, CommitOutcome::Exported { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.commits
            .iter()
            .filter(|c| c.outcome == CommitOutcome::Skipped)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.commits
            .iter()
            .filter(|c| matches!(c.outcome, CommitOutcome::Failed { .. }))
            .count()
    }

    pub fn files_written(&self) -> usize {
        self.commits
            .iter()
            .map(|c| match c.outcome {
                CommitOutcome::Exported { files, .. } => files,
                _ => 0,
            })
            .sum()
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
