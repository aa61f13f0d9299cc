//! The attribution run: list files, blame them on a bounded worker pool,
//! merge into one author table and render it once every file is done.

use crate::blame::parse_blame;
use crate::cli::Cli;
use crate::error::{FameError, Result};
use crate::fallback;
use crate::filter::FileFilter;
use crate::git::{AttributionSource, GitCli, GitRepo};
use crate::language::LanguageTable;
use crate::model::{AttributionLabel, AuthorStat, FileBlameResult, Format, OrderBy};
use crate::output::{render, write_report};
use crate::rank::rank;
use crate::store::AggregationStore;
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub label: AttributionLabel,
    pub order_by: OrderBy,
    pub format: Format,
    pub jobs: usize,
    pub progress: bool,
}

impl RunSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            label: cli.label(),
            order_by: cli.order_by,
            format: cli.format,
            jobs: cli.jobs(),
            progress: cli.progress,
        }
    }
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: FameError,
}

pub fn exec(cli: Cli) -> anyhow::Result<()> {
    let settings = RunSettings::from_cli(&cli);

    let languages = LanguageTable::builtin().context("Failed to load language table")?;
    let filter_options = cli.filter_options();
    let filter = FileFilter::new(&filter_options, &languages).context("Invalid file filter")?;

    let repo = GitRepo::open(Some(&cli.repository)).context("Failed to open git repository")?;
    let commit = repo
        .resolve_commit(&cli.revision)
        .context("Failed to resolve revision")?;

    let all_files = repo
        .list_files(&commit)
        .context("Failed to list files at revision")?;
    let files: Vec<PathBuf> = all_files.into_iter().filter(|p| filter.accepts(p)).collect();
    info!(revision = %cli.revision, %commit, files = files.len(), "attributing files");

    let source = GitCli::new(repo.path());
    let stats = collect_stats(&source, &commit, &files, &settings)?;
    let rows = rank(&stats, settings.order_by);

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &rows, settings.format).context("Failed to write report")?;
    Ok(())
}

/// Blame result for one file, falling back to its last change when blame
/// attributes no lines.
pub fn attribute_file<S: AttributionSource + ?Sized>(
    source: &S,
    revision: &str,
    path: &Path,
    label: AttributionLabel,
) -> Result<FileBlameResult> {
    let blame = source.blame(revision, path)?;
    let mut result = parse_blame(&blame[..], label)?;

    if result.is_degenerate() {
        debug!(path = %path.display(), "blame attributed no lines, using last change");
        let summary = source.last_change(revision, path)?;
        fallback::resolve(&mut result, &String::from_utf8_lossy(&summary), label)?;
        if result.author_by_commit.contains_key("") {
            warn!(path = %path.display(), "no commit found for file");
        }
    }

    Ok(result)
}

/// Attributes every file on `settings.jobs` workers and merges the results.
///
/// All files are attempted. If any of them fails, each failure is reported
/// on stderr and the whole run fails.
pub fn collect_stats<S: AttributionSource + ?Sized>(
    source: &S,
    revision: &str,
    files: &[PathBuf],
    settings: &RunSettings,
) -> Result<Vec<AuthorStat>> {
    let store = AggregationStore::new();
    let progress = progress_bar(files.len() as u64, settings.progress);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs)
        .build()?;

    let failures: Vec<FileFailure> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|path| {
                let outcome = attribute_file(source, revision, path, settings.label);
                progress.inc(1);
                match outcome {
                    Ok(result) => {
                        store.merge(result);
                        None
                    }
                    Err(error) => Some(FileFailure {
                        path: path.clone(),
                        error,
                    }),
                }
            })
            .collect()
    });
    progress.finish_and_clear();

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{} {}: {}", style("failed").red().bold(), failure.path.display(), failure.error);
        }
        return Err(FameError::FilesFailed {
            failed: failures.len(),
            total: files.len(),
        });
    }

    let stats = store.into_stats();
    debug!(authors = stats.len(), "aggregation complete");
    Ok(stats)
}

/// Rendered report for `files`, as `exec` prints it.
pub fn build_report<S: AttributionSource + ?Sized>(
    source: &S,
    revision: &str,
    files: &[PathBuf],
    settings: &RunSettings,
) -> Result<String> {
    let stats = collect_stats(source, revision, files, settings)?;
    render(&rank(&stats, settings.order_by), settings.format)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
