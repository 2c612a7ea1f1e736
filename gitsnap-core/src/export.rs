use crate::diff::{changed_paths, diff_stats};
use crate::error::{Error, Result};
use crate::history::list_commits;
use crate::models::{
    CommitOutcome, CommitPair, CommitReport, DiffStats, ExportSummary, Parent,
};
use crate::naming::{export_dir_name, DEFAULT_MAX_SUBJECT_LEN};
use crate::report::{CommitProgress, Reporter};
use crate::runner::GitRunner;
use crate::snapshot::extract_or_warn;
use chrono::{Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_OUTPUT_DIR: &str = "git_commit_exports_detailed";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_root: PathBuf,
    pub max_subject_len: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_subject_len: DEFAULT_MAX_SUBJECT_LEN,
        }
    }
}

impl ExportOptions {
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_max_subject_len(mut self, max_subject_len: usize) -> Self {
        self.max_subject_len = max_subject_len;
        self
    }
}

/// Walks a repository's history oldest-first and copies each commit's changed
/// files into its own directory under the output root.
///
/// A commit's directory is only given its final name once every file has been
/// attempted; until then it lives at `.<hash>.partial`. The final name is the
/// marker that a commit was exported, so reruns skip it.
pub struct Exporter {
    git: GitRunner,
    repo: PathBuf,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(git: GitRunner, repo: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            git,
            repo: repo.into(),
            options,
        }
    }

    /// Exports with directory timestamps in local time.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<ExportSummary> {
        self.run_in(&Local, reporter)
    }

    pub fn run_in<Tz>(&self, tz: &Tz, reporter: &mut dyn Reporter) -> Result<ExportSummary>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let repo = std::path::absolute(&self.repo)?;
        if !repo.join(".git").is_dir() {
            return Err(Error::NotARepository(repo.display().to_string()));
        }

        let version = self.git.version(&repo)?;
        debug!("using {}", version);

        let output_root = std::path::absolute(&self.options.output_root)?;
        fs::create_dir_all(&output_root)?;
        info!("Exporting commits from {:?} to {:?}", repo, output_root);

        let commits = list_commits(&self.git, &repo, reporter);
        let mut summary = ExportSummary::new(repo.clone(), output_root.clone());
        let total = commits.len();
        let mut previous = Parent::EmptyTree;

        for (index, commit) in commits.iter().enumerate() {
            let pair = CommitPair::new(previous.clone(), commit.hash.clone());
            let stats = diff_stats(&self.git, &repo, &pair, reporter);
            let name = export_dir_name(commit, stats, self.options.max_subject_len, tz);
            let directory = output_root.join(&name);

            reporter.commit_started(&CommitProgress {
                index,
                total,
                commit,
                stats,
                directory_name: &name,
            });

            let outcome = if directory.exists() {
                reporter.commit_skipped(&directory);
                CommitOutcome::Skipped
            } else {
                match self.export_commit(&repo, &output_root, &name, &pair, stats, reporter) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        reporter.warn(&format!(
                            "Unable to export commit {} into {:?}: {}",
                            commit.short_hash(),
                            directory,
                            e
                        ));
                        CommitOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };

            let report = CommitReport {
                index,
                hash: commit.hash.clone(),
                subject: commit.subject.clone(),
                previous,
                stats,
                directory,
                outcome,
            };
            reporter.commit_finished(&report);
            summary.commits.push(report);

            previous = Parent::Commit(commit.hash.clone());
        }

        Ok(summary)
    }

    fn export_commit(
        &self,
        repo: &Path,
        output_root: &Path,
        name: &str,
        pair: &CommitPair,
        stats: DiffStats,
        reporter: &mut dyn Reporter,
    ) -> Result<CommitOutcome> {
        let staging = staging_dir(output_root, &pair.current);
        if staging.exists() {
            debug!("removing stale staging directory {:?}", staging);
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let changes = changed_paths(&self.git, repo, pair, reporter);
        reporter.changes_found(changes.len(), stats);

        let mut files = 0;
        let mut failed = 0;
        for change in &changes {
            let destination = staging.join(&change.path);
            if extract_or_warn(
                &self.git,
                repo,
                &pair.current,
                &change.path,
                &destination,
                reporter,
            ) {
                files += 1;
                reporter.file_exported(&change.path);
            } else {
                failed += 1;
            }
        }

        fs::rename(&staging, output_root.join(name))?;

        Ok(CommitOutcome::Exported { files, failed })
    }
}

/// Named after the commit hash so its length never depends on the subject.
fn staging_dir(output_root: &Path, hash: &str) -> PathBuf {
    output_root.join(format!(".{}.partial", hash))
}
