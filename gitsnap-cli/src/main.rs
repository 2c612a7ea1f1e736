use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

use commands::{export, pack};
use gitsnap_core::export::DEFAULT_OUTPUT_DIR;
use gitsnap_core::naming::DEFAULT_MAX_SUBJECT_LEN;
use gitsnap_core::pack::DEFAULT_OUTPUT_FILE;

#[derive(Parser)]
#[command(name = "gitsnap")]
#[command(
    version,
    about = "Pack project files for LLM context and export git history commit by commit",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). GITSNAP_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack matching project files into a single text file
    Pack {
        /// Project directory to scan
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// TOML file overriding include / exclude_dirs / exclude_files
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the effective rules as TOML and exit
        #[arg(long)]
        print_config: bool,
    },

    /// Export the files changed by every commit into per-commit directories
    Export {
        /// Path to a local git clone (must contain a .git directory)
        repo_directory: PathBuf,

        /// Base directory for the exported commits
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Maximum length of the commit subject in directory names
        #[arg(long, default_value_t = DEFAULT_MAX_SUBJECT_LEN)]
        max_subject_len: usize,

        /// git executable to run
        #[arg(long, default_value = "git")]
        git: PathBuf,

        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only log progress (see --verbose) instead of printing it
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Pack {
            directory,
            output,
            config,
            print_config,
        } => {
            pack::run(directory, output, config, print_config)?;
        }
        Commands::Export {
            repo_directory,
            output,
            max_subject_len,
            git,
            report,
            quiet,
        } => {
            export::run(repo_directory, output, max_subject_len, git, report, quiet)?;
        }
    }

    Ok(())
}
