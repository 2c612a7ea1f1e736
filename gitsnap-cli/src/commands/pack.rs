use crate::display::WarningPrinter;
use anyhow::{Context, Result};
use colored::Colorize;
use gitsnap_core::PackConfig;
use std::path::PathBuf;

pub fn run(
    directory: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    print_config: bool,
) -> Result<()> {
    let config = match config {
        Some(path) => PackConfig::from_file(&path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => PackConfig::default(),
    };

    if print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    if !directory.is_dir() {
        anyhow::bail!(
            "The path '{}' is not a valid directory.",
            directory.display()
        );
    }

    println!("{}: {}", "Target directory".bold(), directory.display());
    println!("Searching for files matching the rules...");

    let summary = gitsnap_core::pack(&directory, &output, &config, &mut WarningPrinter)
        .with_context(|| format!("Failed to pack {}", directory.display()))?;

    if summary.files.is_empty() {
        println!(
            "{}",
            "No matching files found. Check your rules and the target directory.".yellow()
        );
        return Ok(());
    }

    println!(
        "Found {} files.",
        summary.files.len().to_string().cyan()
    );
    println!();
    println!(
        "{} {}",
        "✓ Packed all content into:".green().bold(),
        summary.output.display()
    );

    Ok(())
}
