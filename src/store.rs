use crate::model::{AuthorStat, FileBlameResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Table {
    stats: Vec<AuthorStat>,
    index: HashMap<String, usize>,
}

impl Table {
    fn entry(&mut self, author: &str) -> &mut AuthorStat {
        let idx = match self.index.get(author) {
            Some(&idx) => idx,
            None => {
                let idx = self.stats.len();
                self.index.insert(author.to_string(), idx);
                self.stats.push(AuthorStat::new(author.to_string()));
                idx
            }
        };
        &mut self.stats[idx]
    }
}

/// Author table shared by every file worker.
///
/// Stats are kept in first-seen order; callers sort before presenting them.
#[derive(Debug, Default)]
pub struct AggregationStore {
    table: Mutex<Table>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Merges never leave the table half-updated, so a poisoned lock is still usable.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Folds one file's attribution into the table.
    ///
    /// Every attributed commit adds its line count in this file to its
    /// author's total. Commits and filenames are sets, so re-merging a pair
    /// the author already owns leaves their sizes unchanged. An empty
    /// filename (fallback-resolved file) is not recorded.
    pub fn merge(&self, result: FileBlameResult) {
        let mut table = self.lock();
        for (commit, author) in &result.author_by_commit {
            let lines = result.lines_for(commit);
            let stat = table.entry(author);
            stat.commits.insert(commit.clone());
            stat.total_lines += lines;
            if !result.filename.is_empty() {
                stat.files.insert(result.filename.clone());
            }
        }
    }

    pub fn get(&self, author: &str) -> Option<AuthorStat> {
        let table = self.lock();
        table.index.get(author).map(|&idx| table.stats[idx].clone())
    }

    /// Consumes the store once every merge has completed.
    pub fn into_stats(self) -> Vec<AuthorStat> {
        self.table
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .stats
    }
}
