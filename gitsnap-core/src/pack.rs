use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::runner::decode_lossless_ignore;
use crate::tree;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_OUTPUT_FILE: &str = "project_context.txt";

const DEFAULT_INCLUDE: &[&str] = &[
    "*.py",
    "*.ts",
    "*.tsx",
    "*.js",
    "*.jsx",
    "*.html",
    "*.css",
    "*.scss",
    "*.md",
    "*.yaml",
    "*.yml",
    "Dockerfile",
    "docker-compose.yml",
    "Makefile",
    ".env.example",
    "requirements.txt",
    "package.json",
];

const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    "dist",
    "build",
    "__pycache__",
    "venv",
    ".venv",
    "target",
    "*.egg-info",
];

const DEFAULT_EXCLUDE_FILES: &[&str] = &[
    "*.json", "*.yml", "*.md", "*.log", "*.lock", "*.svg", "*.png", "*.jpg", "*.jpeg", "*.gif",
    "*.ico",
];

/// Include/exclude rules for the packager. Each list holds glob patterns
/// matched against a bare file or directory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub include: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            include: owned(DEFAULT_INCLUDE),
            exclude_dirs: owned(DEFAULT_EXCLUDE_DIRS),
            exclude_files: owned(DEFAULT_EXCLUDE_FILES),
        }
    }
}

impl PackConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| Error::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PackRules {
    include: Vec<Pattern>,
    exclude_dirs: Vec<Pattern>,
    exclude_files: Vec<Pattern>,
}

impl PackRules {
    pub fn compile(config: &PackConfig) -> Result<Self> {
        Ok(Self {
            include: compile(&config.include)?,
            exclude_dirs: compile(&config.exclude_dirs)?,
            exclude_files: compile(&config.exclude_files)?,
        })
    }

    pub fn excludes_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|p| p.matches(name))
    }

    /// Exclusions win over inclusions.
    pub fn includes_file(&self, name: &str) -> bool {
        if self.exclude_files.iter().any(|p| p.matches(name)) {
            return false;
        }
        self.include.iter().any(|p| p.matches(name))
    }
}

/// Files under `root` accepted by `rules`, sorted by relative path.
/// Unreadable entries are reported and skipped.
pub fn scan(root: &Path, rules: &PackRules, reporter: &mut dyn Reporter) -> Vec<PathBuf> {
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || !rules.excludes_dir(&entry.file_name().to_string_lossy())
    });

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                reporter.warn(&format!("Skipping unreadable entry: {}", e));
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && entry.path().is_file());
        if !is_file || !rules.includes_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.into_path();
        files.push((relative_posix(root, &path), path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    files.into_iter().map(|(_, path)| path).collect()
}

pub fn relative_posix(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

/// Tree diagram followed by every file's text, each under a `--- file_path: ... ---` header.
pub fn render_blob(root: &Path, files: &[PathBuf]) -> String {
    let rule = |c: &str| c.repeat(80);
    let relative: Vec<String> = files.iter().map(|f| relative_posix(root, f)).collect();

    let mut parts = vec![
        rule("="),
        tree::render(&root_name(root), &relative),
        format!("{}\n", rule("=")),
    ];

    for (path, rel) in files.iter().zip(&relative) {
        parts.push(format!("--- file_path: {} ---", rel));
        match fs::read(path) {
            Ok(bytes) => parts.push(decode_lossless_ignore(&bytes)),
            Err(e) => parts.push(format!("Unable to read file: {}", e)),
        }
        parts.push(format!("\n{}\n", rule("-")));
    }

    parts.join("\n")
}

#[derive(Debug, Clone)]
pub struct PackSummary {
    pub root: PathBuf,
    pub output: PathBuf,
    /// Relative POSIX paths of the packed files, in output order.
    pub files: Vec<String>,
}

/// Scans `directory`, and writes the blob to `output` unless nothing matched.
pub fn pack(
    directory: &Path,
    output: &Path,
    config: &PackConfig,
    reporter: &mut dyn Reporter,
) -> Result<PackSummary> {
    if !directory.is_dir() {
        return Err(Error::InvalidDirectory(directory.display().to_string()));
    }
    let root = std::path::absolute(directory)?;
    let output = std::path::absolute(output)?;
    let rules = PackRules::compile(config)?;

    let files: Vec<PathBuf> = scan(&root, &rules, reporter)
        .into_iter()
        .filter(|f| *f != output)
        .collect();
    debug!("matched {} files under {:?}", files.len(), root);

    let summary = PackSummary {
        files: files.iter().map(|f| relative_posix(&root, f)).collect(),
        root: root.clone(),
        output: output.clone(),
    };
    if files.is_empty() {
        return Ok(summary);
    }

    fs::write(&output, render_blob(&root, &files))?;
    Ok(summary)
}
