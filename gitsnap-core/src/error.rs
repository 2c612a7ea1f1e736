use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Executable not found: '{program}'. Is it installed and on your PATH?")]
    ExecutableNotFound { program: String },

    #[error("Command failed ({}): {command}\n{stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a git repository (no .git directory): {0}")]
    NotARepository(String),

    #[error("Not a directory: {0}")]
    InvalidDirectory(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
