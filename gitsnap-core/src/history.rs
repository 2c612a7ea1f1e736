use crate::models::Commit;
use crate::report::Reporter;
use crate::runner::GitRunner;
use std::path::Path;

const FIELD_SEPARATOR: char = '\0';

/// All commits reachable from HEAD, oldest first. Failures degrade to an empty list.
pub fn list_commits(git: &GitRunner, repo: &Path, reporter: &mut dyn Reporter) -> Vec<Commit> {
    let output = match git.text(repo, &["log", "--reverse", "--pretty=format:%H%x00%ct%x00%s"]) {
        Ok(output) => output,
        Err(e) => {
            reporter.warn(&format!(
                "Unable to read git log from {:?}. Is it a valid git repository? ({})",
                repo, e
            ));
            return Vec::new();
        }
    };

    parse_log(&output, reporter)
}

pub fn parse_log(output: &str, reporter: &mut dyn Reporter) -> Vec<Commit> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_log_line(line) {
            Ok(commit) => Some(commit),
            Err(reason) => {
                let preview: String = line.chars().take(100).collect();
                reporter.warn(&format!(
                    "Unable to parse commit line '{}': {}",
                    preview.replace(FIELD_SEPARATOR, "\\0"),
                    reason
                ));
                None
            }
        })
        .collect()
}

fn parse_log_line(line: &str) -> std::result::Result<Commit, String> {
    let mut parts = line.splitn(3, FIELD_SEPARATOR);
    let (Some(hash), Some(timestamp), Some(subject)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err("expected hash, timestamp and subject".to_string());
    };

    let hash = hash.trim();
    if hash.is_empty() {
        return Err("missing commit hash".to_string());
    }
    let timestamp: i64 = timestamp
        .trim()
        .parse()
        .map_err(|e| format!("invalid timestamp '{}': {}", timestamp, e))?;

    Ok(Commit::new(hash.to_string(), timestamp, subject))
}
