use crate::models::{Commit, DiffStats};
use chrono::TimeZone;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_MAX_SUBJECT_LEN: usize = 100;
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const NO_MESSAGE: &str = "no_message";

static ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-.]+").expect("valid regex"));

/// Makes `name` safe to use as a single directory name component.
pub fn sanitize_directory_name(name: &str, max_len: usize) -> String {
    if name.is_empty() {
        return NO_MESSAGE.to_string();
    }

    let stripped = ILLEGAL_CHARS.replace_all(name, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&stripped, "_");
    let truncated: String = trim_separators(&collapsed).chars().take(max_len).collect();
    // Truncation can land on a separator.
    let trimmed = trim_separators(&truncated);

    if trimmed.is_empty() {
        NO_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn trim_separators(name: &str) -> &str {
    name.trim_matches(|c| c == '_' || c == ' ')
}

/// `<YYYYMMDD_HHMMSS>_<subject>_新增<insertions>行`, timestamp rendered in `tz`.
pub fn export_dir_name<Tz>(commit: &Commit, stats: DiffStats, max_len: usize, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let timestamp = commit
        .committed_at(tz)
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| commit.timestamp.to_string());

    format!(
        "{}_{}_新增{}行",
        timestamp,
        sanitize_directory_name(&commit.subject, max_len),
        stats.insertions
    )
}
