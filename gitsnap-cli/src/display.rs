use colored::Colorize;
use gitsnap_core::{CommitOutcome, CommitProgress, CommitReport, DiffStats, Reporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Prints warnings to stdout; used where there is no progress to show.
pub struct WarningPrinter;

impl Reporter for WarningPrinter {
    fn warn(&mut self, message: &str) {
        println!("  {} {}", "warning:".yellow().bold(), message);
    }
}

/// Prints export progress and warnings to stdout, with a progress bar on stderr.
pub struct ConsoleReporter {
    progress: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let style =
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
        let progress = ProgressBar::new(0).with_style(style);

        Self { progress }
    }

    fn print(&self, line: String) {
        self.progress.suspend(|| println!("{}", line));
    }

    pub fn finish(&self) {
        self.progress.finish_and_clear();
    }
}

impl Reporter for ConsoleReporter {
    fn warn(&mut self, message: &str) {
        self.print(format!("  {} {}", "warning:".yellow().bold(), message));
    }

    fn commit_started(&mut self, progress: &CommitProgress<'_>) {
        self.progress.set_length(progress.total as u64);
        self.progress.set_position(progress.index as u64);
        self.progress
            .set_message(progress.commit.short_hash().to_string());

        self.print(String::new());
        self.print(format!(
            "{} {}/{}: {} - {}",
            "Processing commit".bold(),
            progress.index + 1,
            progress.total,
            progress.commit.short_hash().yellow(),
            progress.commit.subject
        ));
        self.print(format!(
            "  {}: {} insertions, {} deletions",
            "Stats".bold(),
            format!("+{}", progress.stats.insertions).green(),
            format!("-{}", progress.stats.deletions).red()
        ));
        self.print(format!(
            "  {}: {}",
            "Target directory".bold(),
            progress.directory_name
        ));
    }

    fn commit_skipped(&mut self, directory: &Path) {
        self.print(format!(
            "  {}",
            format!(
                "Directory '{}' already exists, skipping this commit to avoid overwriting.",
                directory.display()
            )
            .dimmed()
        ));
    }

    fn changes_found(&mut self, count: usize, stats: DiffStats) {
        let line = match (count, stats.is_empty()) {
            (0, true) => "No file or line changes in this commit (empty or metadata-only commit)."
                .dimmed()
                .to_string(),
            (0, false) => "Line counts changed but no files qualify for copying (e.g. only deletions)."
                .dimmed()
                .to_string(),
            (n, _) => format!(
                "Found {} changed (added/modified/renamed) file(s):",
                n.to_string().cyan()
            ),
        };
        self.print(format!("  {}", line));
    }

    fn file_exported(&mut self, path: &str) {
        self.print(format!("    - {}", path));
    }

    fn commit_finished(&mut self, report: &CommitReport) {
        if let CommitOutcome::Failed { error } = &report.outcome {
            self.print(format!("  {} {}", "failed:".red().bold(), error));
        }
        self.progress.inc(1);
    }
}
