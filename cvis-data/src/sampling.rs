//! Per-group decimation of observed rows.

use crate::alignment::AlignedRow;
use std::collections::BTreeSet;

/// Keep every `every`th observed row plus the last one.
///
/// Rows must be sorted by relative day. Synthetic rows and rows on an
/// `anchored` day (a coordinate an overlay points at) are never dropped.
/// Only non-synthetic rows count toward the stride. `every <= 1` keeps
/// everything.
pub fn sample_observed(rows: Vec<AlignedRow>, every: usize, anchored: &BTreeSet<i64>) -> Vec<AlignedRow> {
    if every <= 1 {
        return rows;
    }
    let observed = rows.iter().filter(|row| !row.synthetic).count();
    let mut seen = 0usize;
    rows.into_iter()
        .filter(|row| {
            if row.synthetic {
                return true;
            }
            let index = seen;
            seen += 1;
            index % every == 0 || index + 1 == observed || anchored.contains(&row.relative_day)
        })
        .collect()
}
