use crate::models::{Change, ChangeKind, CommitPair, DiffStats, Parent};
use crate::report::Reporter;
use crate::runner::{decode_lossless_ignore, GitRunner};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static INSERTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+insertions?\(\+\)").expect("valid regex"));
static DELETIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+deletions?\(-\)").expect("valid regex"));

/// Aggregate line counts between the pair. Failures yield `(0, 0)`.
pub fn diff_stats(
    git: &GitRunner,
    repo: &Path,
    pair: &CommitPair,
    reporter: &mut dyn Reporter,
) -> DiffStats {
    match git.text(
        repo,
        &["diff", "--shortstat", pair.previous.revision(), &pair.current],
    ) {
        Ok(output) => parse_shortstat(&output),
        Err(e) => {
            reporter.warn(&format!(
                "Unable to get stats for {}..{}; it may be an empty or initial commit ({})",
                pair.previous,
                short(&pair.current),
                e
            ));
            DiffStats::default()
        }
    }
}

/// Parses `N files changed, X insertions(+), Y deletions(-)`; missing counts are 0.
pub fn parse_shortstat(output: &str) -> DiffStats {
    let count = |re: &Regex| {
        re.captures(output)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .unwrap_or(0)
    };

    DiffStats::new(count(&INSERTIONS), count(&DELETIONS))
}

/// Paths added, copied, modified, renamed or type-changed by the pair. Deletions never appear.
pub fn changed_paths(
    git: &GitRunner,
    repo: &Path,
    pair: &CommitPair,
    reporter: &mut dyn Reporter,
) -> Vec<Change> {
    let diff = git.bytes(
        repo,
        &[
            "diff",
            "--name-status",
            "-z",
            "--diff-filter=ACMRT",
            pair.previous.revision(),
            &pair.current,
        ],
    );

    match (diff, &pair.previous) {
        (Ok(output), _) => parse_name_status(&decode_lossless_ignore(&output), reporter),
        (Err(e), Parent::EmptyTree) => {
            debug!("empty tree diff rejected: {}", e);
            reporter.warn(&format!(
                "Diff against the empty tree failed; listing the full tree of initial commit {}",
                short(&pair.current)
            ));
            list_tree(git, repo, &pair.current, reporter)
        }
        (Err(e), Parent::Commit(_)) => {
            reporter.warn(&format!(
                "Unable to diff {}..{}; it may be an empty commit ({})",
                pair.previous,
                short(&pair.current),
                e
            ));
            Vec::new()
        }
    }
}

fn list_tree(
    git: &GitRunner,
    repo: &Path,
    commit: &str,
    reporter: &mut dyn Reporter,
) -> Vec<Change> {
    match git.bytes(repo, &["ls-tree", "-r", "-z", "--name-only", commit]) {
        Ok(output) => decode_lossless_ignore(&output)
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(|path| Change::new(ChangeKind::Added, path))
            .collect(),
        Err(e) => {
            reporter.warn(&format!("ls-tree also failed for {}: {}", short(commit), e));
            Vec::new()
        }
    }
}

/// Parses `diff --name-status -z` output: a status field followed by one path,
/// or by source and destination paths for renames and copies. Paths are raw,
/// never C-quoted.
pub fn parse_name_status(output: &str, reporter: &mut dyn Reporter) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut fields = output.split('\0').filter(|field| !field.is_empty());

    while let Some(status) = fields.next() {
        let Some(kind) = ChangeKind::from_status(status) else {
            let path = fields.next().unwrap_or_default();
            reporter.warn(&format!(
                "Skipping unexpected diff status '{}' for '{}'",
                status, path
            ));
            continue;
        };

        let first = fields.next();
        let second = if kind.has_source() { fields.next() } else { None };
        match (first, second) {
            (Some(source), Some(path)) => {
                changes.push(Change::new(kind, path).with_source(source));
            }
            (Some(path), None) if !kind.has_source() => {
                changes.push(Change::new(kind, path));
            }
            _ => {
                reporter.warn(&format!(
                    "Unable to parse {} entry with status '{}': output ended early",
                    kind.as_str(),
                    status
                ));
            }
        }
    }

    changes
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(7)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Collector;
    use crate::test_support::TestRepo;

    #[test]
    fn test_parse_shortstat() {
        assert_eq!(
            parse_shortstat(" 3 files changed, 10 insertions(+), 4 deletions(-)"),
            DiffStats::new(10, 4)
        );
        assert_eq!(
            parse_shortstat(" 1 file changed, 2 insertions(+)"),
            DiffStats::new(2, 0)
        );
        assert_eq!(
            parse_shortstat(" 1 file changed, 1 insertion(+), 1 deletion(-)"),
            DiffStats::new(1, 1)
        );
        assert_eq!(
            parse_shortstat(" 2 files changed, 8 deletions(-)"),
            DiffStats::new(0, 8)
        );
        assert_eq!(parse_shortstat(""), DiffStats::default());
    }

    #[test]
    fn test_parse_name_status() {
        let mut collector = Collector::new();
        let output = "A\0new.txt\0M\0src/lib.rs\0R087\0old name.rs\0new name.rs\0C100\0a.rs\0b.rs\0T\0link\0";

        let changes = parse_name_status(output, &mut collector);

        assert_eq!(
            changes,
            vec![
                Change::new(ChangeKind::Added, "new.txt"),
                Change::new(ChangeKind::Modified, "src/lib.rs"),
                Change::new(ChangeKind::Renamed, "new name.rs").with_source("old name.rs"),
                Change::new(ChangeKind::Copied, "b.rs").with_source("a.rs"),
                Change::new(ChangeKind::TypeChanged, "link"),
            ]
        );
        assert!(collector.warnings().is_empty());
    }

    #[test]
    fn test_parse_name_status_skips_malformed_and_deleted() {
        let mut collector = Collector::new();
        let output = "D\0gone.txt\0A\0kept.txt\0X\0odd.txt\0R100\0only-one\0";

        let changes = parse_name_status(output, &mut collector);

        assert_eq!(changes, vec![Change::new(ChangeKind::Added, "kept.txt")]);
        assert_eq!(collector.warnings().len(), 3);
        assert!(collector.warnings()[0].contains("gone.txt"));
    }

    #[test]
    fn test_stats_and_paths_against_empty_tree() {
        let repo = TestRepo::new();
        repo.write("a.txt", "one\ntwo\n");
        repo.write("dir/b.txt", "three\n");
        let first = repo.commit("initial", 1_600_000_000);

        let git = GitRunner::default();
        let mut collector = Collector::new();
        let pair = CommitPair::new(Parent::EmptyTree, first);

        assert_eq!(
            diff_stats(&git, repo.path(), &pair, &mut collector),
            DiffStats::new(3, 0)
        );
        let paths: Vec<_> = changed_paths(&git, repo.path(), &pair, &mut collector)
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(paths, vec!["a.txt", "dir/b.txt"]);
        assert!(collector.warnings().is_empty());
    }

    #[test]
    fn test_changed_paths_between_commits() {
        let repo = TestRepo::new();
        repo.write("keep.txt", "keep\n");
        repo.write("drop.txt", "drop\n");
        repo.write("move.txt", "a fairly long line so rename detection is confident\n");
        let first = repo.commit("initial", 1_600_000_000);

        repo.write("keep.txt", "keep\nmore\n");
        repo.remove("drop.txt");
        repo.rename("move.txt", "moved/here.txt");
        let second = repo.commit("change things", 1_600_000_100);

        let git = GitRunner::default();
        let mut collector = Collector::new();
        let pair = CommitPair::new(Parent::Commit(first), second);

        let changes = changed_paths(&git, repo.path(), &pair, &mut collector);
        let paths: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();

        assert_eq!(paths, vec!["keep.txt", "moved/here.txt"]);
        assert_eq!(changes[1].kind, ChangeKind::Renamed);
        assert_eq!(changes[1].source.as_deref(), Some("move.txt"));

        let stats = diff_stats(&git, repo.path(), &pair, &mut collector);
        assert_eq!(stats, DiffStats::new(1, 1));
    }

    #[test]
    fn test_failures_degrade_gracefully() {
        let repo = TestRepo::new();
        repo.write("a.txt", "a\n");
        let first = repo.commit("initial", 1_600_000_000);

        let git = GitRunner::default();
        let mut collector = Collector::new();
        let pair = CommitPair::new(Parent::Commit("0".repeat(40)), first);

        assert_eq!(
            diff_stats(&git, repo.path(), &pair, &mut collector),
            DiffStats::default()
        );
        assert!(changed_paths(&git, repo.path(), &pair, &mut collector).is_empty());
        assert_eq!(collector.warnings().len(), 2);
    }

    #[test]
    fn test_empty_tree_fallback_lists_full_tree() {
        let repo = TestRepo::new();
        repo.write("a.txt", "a\n");
        repo.write("nested/b.txt", "b\n");
        let first = repo.commit("initial", 1_600_000_000);

        let git = GitRunner::default();
        let mut collector = Collector::new();

        let changes = list_tree(&git, repo.path(), &first, &mut collector);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Added));
        let paths: Vec<_> = changes.into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["a.txt", "nested/b.txt"]);

        assert!(list_tree(&git, repo.path(), "nope", &mut collector).is_empty());
        assert_eq!(collector.warnings().len(), 1);
    }

    #[test]
    fn test_paths_with_quotes_and_control_characters() {
        let repo = TestRepo::new();
        repo.write("plain.txt", "plain\n");
        let first = repo.commit("initial", 1_600_000_000);

        repo.write("say \"hi\".txt", "hi\n");
        repo.write("back\\slash.txt", "slash\n");
        repo.write("tab\there.txt", "tab\n");
        let second = repo.commit("odd names", 1_600_000_100);

        let git = GitRunner::default();
        let mut collector = Collector::new();
        let pair = CommitPair::new(Parent::Commit(first), second.clone());

        let mut paths: Vec<_> = changed_paths(&git, repo.path(), &pair, &mut collector)
            .into_iter()
            .map(|c| c.path)
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["back\\slash.txt", "say \"hi\".txt", "tab\there.txt"]);

        let tree: Vec<_> = list_tree(&git, repo.path(), &second, &mut collector)
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert!(tree.contains(&"tab\there.txt".to_string()));
        assert!(collector.warnings().is_empty());
    }

    #[test]
    fn test_changed_paths_falls_back_when_empty_tree_is_rejected() {
        // The well-known empty tree is a SHA-1 object id, unknown to SHA-256 repositories.
        let repo = TestRepo::with_object_format("sha256");
        repo.write("a.txt", "a\n");
        repo.write("nested/b.txt", "b\n");
        let first = repo.commit("initial", 1_600_000_000);

        let git = GitRunner::default();
        let mut collector = Collector::new();
        let pair = CommitPair::new(Parent::EmptyTree, first);

        assert_eq!(
            diff_stats(&git, repo.path(), &pair, &mut collector),
            DiffStats::default()
        );
        let changes = changed_paths(&git, repo.path(), &pair, &mut collector);

        assert!(changes.iter().all(|c| c.kind == ChangeKind::Added));
        let paths: Vec<_> = changes.into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["a.txt", "nested/b.txt"]);
        assert_eq!(collector.warnings().len(), 2);
        assert!(collector.warnings()[1].contains("empty tree"));
    }
}
