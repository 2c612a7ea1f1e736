use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Turn a non-zero exit status into `Error::CommandFailed`.
    pub must_succeed: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { must_succeed: true }
    }
}

/// Runs the git executable as a subprocess.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn execute<S: AsRef<str>>(
        &self,
        dir: &Path,
        args: &[S],
        options: RunOptions,
    ) -> Result<Vec<u8>> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        debug!("git {} (in {:?})", args.join(" "), dir);

        let output = Command::new(&self.program)
            .args(["-c", "core.quotepath=off"])
            .args(&args)
            .current_dir(dir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::ExecutableNotFound {
                    program: self.program.display().to_string(),
                },
                _ => Error::Io(e),
            })?;

        if options.must_succeed && !output.status.success() {
            return Err(Error::CommandFailed {
                command: format!("{} {}", self.program.display(), args.join(" ")),
                code: output.status.code(),
                stderr: decode_text(&output.stderr),
            });
        }

        Ok(output.stdout)
    }

    pub fn text<S: AsRef<str>>(&self, dir: &Path, args: &[S]) -> Result<String> {
        let stdout = self.execute(dir, args, RunOptions::default())?;
        Ok(decode_text(&stdout))
    }

    pub fn bytes<S: AsRef<str>>(&self, dir: &Path, args: &[S]) -> Result<Vec<u8>> {
        self.execute(dir, args, RunOptions::default())
    }

    /// `git --version`; fails with `ExecutableNotFound` when git is unavailable.
    pub fn version(&self, dir: &Path) -> Result<String> {
        self.text(dir, &["--version"])
    }
}

/// UTF-8 decode that drops undecodable bytes and trims surrounding whitespace.
pub fn decode_text(bytes: &[u8]) -> String {
    decode_lossless_ignore(bytes).trim().to_string()
}

/// UTF-8 decode that drops undecodable bytes, keeping everything else verbatim.
pub fn decode_lossless_ignore(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
