use clap::ValueEnum;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Hex commit identifier as printed by git.
pub type CommitId = String;

/// Which identity line of a commit attributes its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributionLabel {
    #[default]
    Author,
    Committer,
}

impl AttributionLabel {
    pub fn from_use_committer(use_committer: bool) -> Self {
        if use_committer {
            AttributionLabel::Committer
        } else {
            AttributionLabel::Author
        }
    }

    /// Metadata key in `git blame --porcelain` output.
    pub fn blame_key(self) -> &'static str {
        match self {
            AttributionLabel::Author => "author",
            AttributionLabel::Committer => "committer",
        }
    }

    /// Header key in `git log --format=fuller` output.
    pub fn log_key(self) -> &'static str {
        match self {
            AttributionLabel::Author => "Author:",
            AttributionLabel::Committer => "Commit:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OrderBy {
    #[default]
    Lines,
    Commits,
    Files,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Tabular,
    Csv,
    Json,
    JsonLines,
}

/// Attribution of one file at one revision.
///
/// `lines_by_commit` holds one entry per commit owning at least one line.
/// `author_by_commit` normally has the same keys; a fallback-resolved empty
/// file has a single author entry and no line entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBlameResult {
    pub filename: String,
    pub lines_by_commit: HashMap<CommitId, u64>,
    pub author_by_commit: HashMap<CommitId, String>,
}

impl FileBlameResult {
    pub fn lines_for(&self, commit: &str) -> u64 {
        self.lines_by_commit.get(commit).copied().unwrap_or(0)
    }

    pub fn total_lines(&self) -> u64 {
        self.lines_by_commit.values().sum()
    }

    /// True when blame yielded nothing to attribute.
    pub fn is_degenerate(&self) -> bool {
        self.author_by_commit.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStat {
    pub author: String,
    pub total_lines: u64,
    pub commits: HashSet<CommitId>,
    pub files: HashSet<String>,
}

impl AuthorStat {
    pub fn new(author: String) -> Self {
        Self {
            author,
            total_lines: 0,
            commits: HashSet::new(),
            files: HashSet::new(),
        }
    }

    pub fn to_row(&self) -> AuthorRow {
        AuthorRow {
            name: self.author.clone(),
            lines: self.total_lines,
            commits: self.commits.len() as u64,
            files: self.files.len() as u64,
        }
    }
}

/// One line of the final report. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRow {
    pub name: String,
    pub lines: u64,
    pub commits: u64,
    pub files: u64,
}
