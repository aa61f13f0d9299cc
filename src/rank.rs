use crate::model::{AuthorRow, AuthorStat, OrderBy};
use std::cmp::Ordering;

/// Metric tuple compared in descending order, primary key first.
fn sort_key(row: &AuthorRow, order: OrderBy) -> (u64, u64, u64) {
    match order {
        OrderBy::Lines => (row.lines, row.commits, row.files),
        OrderBy::Commits => (row.commits, row.lines, row.files),
        OrderBy::Files => (row.files, row.commits, row.lines),
    }
}

/// Metrics descending, then author name ascending.
pub fn compare(a: &AuthorRow, b: &AuthorRow, order: OrderBy) -> Ordering {
    sort_key(b, order)
        .cmp(&sort_key(a, order))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn rank(stats: &[AuthorStat], order: OrderBy) -> Vec<AuthorRow> {
    let mut rows: Vec<AuthorRow> = stats.iter().map(AuthorStat::to_row).collect();
    rows.sort_by(|a, b| compare(a, b, order));
    rows
}
