use crate::error::Result;
use crate::report::Reporter;
use crate::runner::GitRunner;
use std::fs;
use std::path::Path;

/// Writes `relative_path` as it existed at `commit` to `destination`, byte for byte.
pub fn extract(
    git: &GitRunner,
    repo: &Path,
    commit: &str,
    relative_path: &str,
    destination: &Path,
) -> Result<()> {
    let content = git.bytes(
        repo,
        &["cat-file", "blob", &format!("{}:{}", commit, relative_path)],
    )?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, content)?;

    Ok(())
}

/// Like [`extract`], but reports failures as warnings. Returns whether the file was written.
pub fn extract_or_warn(
    git: &GitRunner,
    repo: &Path,
    commit: &str,
    relative_path: &str,
    destination: &Path,
    reporter: &mut dyn Reporter,
) -> bool {
    match extract(git, repo, commit, relative_path, destination) {
        Ok(()) => true,
        Err(e) => {
            reporter.warn(&format!(
                "Unable to copy '{}' from commit {}; it may be a submodule or a broken symlink ({})",
                relative_path,
                &commit[..commit.len().min(7)],
                e
            ));
            false
        }
    }
}
