//! Scratch git repositories for tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub(crate) struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        Self::init(&["init", "-q"])
    }

    pub fn with_object_format(format: &str) -> Self {
        Self::init(&["init", "-q", &format!("--object-format={format}")])
    }

    fn init(args: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir };
        repo.git(args);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self, args: &[&str]) -> String {
        self.git_at(args, None)
    }

    fn git_at(&self, args: &[&str], timestamp: Option<i64>) -> String {
        let mut cmd = Command::new("git");
        cmd.args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(self.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CONFIG_GLOBAL", "/dev/null");
        if let Some(ts) = timestamp {
            let date = format!("{ts} +0000");
            cmd.env("GIT_AUTHOR_DATE", &date)
                .env("GIT_COMMITTER_DATE", &date);
        }

        let output = cmd.output().expect("git must be installed to run tests");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write(&self, relative: &str, content: &str) {
        self.write_bytes(relative, content.as_bytes());
    }

    pub fn write_bytes(&self, relative: &str, content: &[u8]) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path().join(relative)).unwrap();
    }

    pub fn rename(&self, from: &str, to: &str) {
        if let Some(parent) = self.path().join(to).parent() {
            fs::create_dir_all(parent).unwrap();
        }
        self.git(&["mv", from, to]);
    }

    /// Stages everything and commits with a fixed author/committer time.
    pub fn commit(&self, message: &str, timestamp: i64) -> String {
        self.git(&["add", "-A"]);
        self.commit_staged(message, timestamp)
    }

    pub fn commit_staged(&self, message: &str, timestamp: i64) -> String {
        self.git_at(
            &[
                "commit",
                "-q",
                "--allow-empty",
                "--allow-empty-message",
                "-m",
                message,
            ],
            Some(timestamp),
        );
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn output_dir(&self) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("exports");
        (dir, out)
    }
}
