//! Parser for `git blame --porcelain` output.
//!
//! The stream is a sequence of groups. Each starts with a header
//! `<commit> <orig-line> <final-line> [<group-size>]`. The first time a
//! commit appears its header is followed by `key value` metadata lines up to
//! and including `filename`, then one tab-prefixed content line. Later
//! headers for the same commit are followed by the content line, sometimes
//! preceded by `previous` and `filename` again.

use crate::error::{FameError, Result};
use crate::model::{AttributionLabel, CommitId, FileBlameResult};
use std::io::BufRead;

const FILENAME_KEY: &str = "filename";

/// Parses one file's porcelain blame into per-commit line counts and authors.
pub fn parse_blame<R: BufRead>(reader: R, label: AttributionLabel) -> Result<FileBlameResult> {
    let mut lines = LineReader::new(reader);
    let mut result = FileBlameResult::default();

    while let Some(line) = lines.next_line()? {
        let commit = parse_header(&line, lines.line_no())?;
        match result.lines_by_commit.get_mut(&commit) {
            Some(count) => {
                *count += 1;
                read_repeat_body(&mut lines, &mut result)?;
            }
            None => {
                result.lines_by_commit.insert(commit.clone(), 1);
                read_commit_details(&mut lines, commit, label, &mut result)?;
            }
        }
    }

    Ok(result)
}

struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    fn line_no(&self) -> usize {
        self.line_no
    }

    /// Content lines are arbitrary bytes, so decoding is lossy.
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    fn skip_content(&mut self) -> Result<()> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(FameError::malformed_blame(
                self.line_no + 1,
                "missing content line",
            ));
        }
        self.line_no += 1;
        Ok(())
    }
}

fn parse_header(line: &str, line_no: usize) -> Result<CommitId> {
    let mut tokens = line.split(' ');

    let commit = tokens
        .next()
        .filter(|t| is_commit_id(t))
        .ok_or_else(|| FameError::malformed_blame(line_no, format!("expected commit header, got {line:?}")))?;

    for what in ["original line number", "final line number"] {
        tokens
            .next()
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| FameError::malformed_blame(line_no, format!("missing {what} in {line:?}")))?;
    }

    if let Some(size) = tokens.next() {
        size.parse::<u32>()
            .map_err(|_| FameError::malformed_blame(line_no, format!("bad group size {size:?}")))?;
    }
    if tokens.next().is_some() {
        return Err(FameError::malformed_blame(line_no, format!("trailing tokens in {line:?}")));
    }

    Ok(commit.to_string())
}

fn is_commit_id(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_hexdigit())
}

fn split_metadata(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

fn read_commit_details<R: BufRead>(
    lines: &mut LineReader<R>,
    commit: CommitId,
    label: AttributionLabel,
    result: &mut FileBlameResult,
) -> Result<()> {
    let label_key = label.blame_key();
    loop {
        let line = lines.next_line()?.ok_or_else(|| {
            FameError::malformed_blame(lines.line_no() + 1, format!("commit {commit} has no filename line"))
        })?;
        let (key, value) = split_metadata(&line);
        if key == label_key {
            result.author_by_commit.insert(commit.clone(), value.to_string());
        } else if key == FILENAME_KEY {
            set_filename(result, value, lines.line_no())?;
            return lines.skip_content();
        }
    }
}

/// A repeated commit is usually followed by its content line alone. When the
/// commit touched the file under more than one path git repeats `previous`
/// and `filename` before the content; only `filename` is kept.
fn read_repeat_body<R: BufRead>(lines: &mut LineReader<R>, result: &mut FileBlameResult) -> Result<()> {
    loop {
        let line = lines
            .next_line()?
            .ok_or_else(|| FameError::malformed_blame(lines.line_no() + 1, "missing content line"))?;
        if line.starts_with('\t') {
            return Ok(());
        }
        if let (FILENAME_KEY, value) = split_metadata(&line) {
            set_filename(result, value, lines.line_no())?;
            return lines.skip_content();
        }
    }
}

fn set_filename(result: &mut FileBlameResult, value: &str, line_no: usize) -> Result<()> {
    if value.is_empty() {
        return Err(FameError::malformed_blame(line_no, "empty filename"));
    }
    result.filename = value.to_string();
    Ok(())
}
