//! Attribution for files that blame cannot attribute (empty files).
//!
//! Reads the change summary of the most recent commit touching the file,
//! as printed by `git log -1 --format=fuller`.

use crate::error::{FameError, Result};
use crate::model::{AttributionLabel, CommitId, FileBlameResult};

/// Extracts `(commit, identity)` from a change summary.
///
/// A summary without `commit`/identity lines yields empty strings.
pub fn parse_last_change(summary: &str, label: AttributionLabel) -> Result<(CommitId, String)> {
    let mut commit = String::new();
    let mut author = String::new();

    for line in summary.lines() {
        let (key, rest) = line.split_once(' ').unwrap_or((line, ""));
        if key == "commit" {
            commit = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| FameError::MalformedLog(format!("commit line without hash: {line:?}")))?
                .to_string();
        } else if key == label.log_key() {
            author = strip_email(rest.trim()).to_string();
        }
    }

    Ok((commit, author))
}

/// `Name <mail>` -> `Name`
fn strip_email(identity: &str) -> &str {
    match identity.rfind(" <") {
        Some(idx) if identity.ends_with('>') => identity[..idx].trim_end(),
        _ => identity,
    }
}

/// Fills a degenerate blame result with the last change's author.
///
/// The commit gets an author but no line entry, so it counts as a commit of
/// that author while contributing zero lines.
pub fn resolve(result: &mut FileBlameResult, summary: &str, label: AttributionLabel) -> Result<()> {
    let (commit, author) = parse_last_change(summary, label)?;
    result.author_by_commit.insert(commit, author);
    Ok(())
}
