use crate::display::ConsoleReporter;
use anyhow::{Context, Result};
use colored::Colorize;
use gitsnap_core::{Error, ExportOptions, Exporter, GitRunner, TracingReporter};
use std::path::PathBuf;

pub fn run(
    repo: PathBuf,
    output: PathBuf,
    max_subject_len: usize,
    git: PathBuf,
    report: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let options = ExportOptions::default()
        .with_output_root(&output)
        .with_max_subject_len(max_subject_len);
    let exporter = Exporter::new(GitRunner::new(git), &repo, options);

    println!(
        "{} '{}' -> '{}'",
        "Exporting commit changes from".bold().cyan(),
        repo.display(),
        output.display()
    );

    let result = if quiet {
        exporter.run(&mut TracingReporter)
    } else {
        let mut reporter = ConsoleReporter::new();
        let result = exporter.run(&mut reporter);
        reporter.finish();
        result
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(Error::NotARepository(path)) => {
            anyhow::bail!(
                "'{}' does not look like a git repository. Check the path and that it contains a '.git' directory.",
                path
            );
        }
        Err(e) => return Err(e).context("Export aborted"),
    };

    if summary.commits.is_empty() {
        println!("{}", "No commits found, or the git log could not be read.".yellow());
        return Ok(());
    }

    println!();
    println!(
        "{} Files exported to '{}'.",
        "✓ Export complete.".green().bold(),
        summary.output_root.display()
    );
    println!(
        "  {}: {}  {}: {}  {}: {}  {}: {}",
        "Commits".bold(),
        summary.commits.len(),
        "Exported".bold(),
        summary.exported().to_string().green(),
        "Skipped".bold(),
        summary.skipped().to_string().yellow(),
        "Files".bold(),
        summary.files_written()
    );
    if summary.failed() > 0 {
        println!(
            "  {}: {}",
            "Failed commits".bold(),
            summary.failed().to_string().red()
        );
    }

    if let Some(path) = report {
        summary
            .write_json(&path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("  {}: {}", "Report".bold(), path.display());
    }

    Ok(())
}
