//! Group enumeration and top-K selection.

use crate::alignment::anchor_date;
use crate::config::TopK;
use crate::prepare::GroupedSeries;
use cvis_core::GroupKey;
use std::collections::{BTreeMap, BTreeSet};

/// Each group's largest measure over its whole series.
pub fn peak_values(grouped: &GroupedSeries) -> BTreeMap<GroupKey, f64> {
    grouped
        .iter()
        .filter_map(|(group, rows)| {
            rows.iter()
                .map(|row| row.measure)
                .filter(|value| !value.is_nan())
                .reduce(f64::max)
                .map(|peak| (group.clone(), peak))
        })
        .collect()
}

/// Select `k` groups by peak, always including the allow-list.
///
/// Pinned groups are taken first and occupy slots, but only those whose
/// series crosses `threshold`; a pinned group that would vanish at
/// alignment does not use up a slot. The remaining slots go to the highest
/// peaks, equal peaks ranking by group key ascending. The result exceeds
/// `k` only when more than `k` surviving groups are pinned.
pub fn top_k_groups(grouped: &GroupedSeries, top: &TopK, threshold: f64) -> BTreeSet<GroupKey> {
    let mut selected = BTreeSet::new();
    for group in &top.always_include {
        match grouped.get(group) {
            Some(rows) if anchor_date(rows, threshold).is_some() => {
                selected.insert(group.clone());
            }
            Some(_) => {
                log::debug!("[CVIS] groups: always-included {group} never exceeds {threshold}")
            }
            None => log::debug!("[CVIS] groups: always-included {group} has no series rows"),
        }
    }

    let mut ranked: Vec<(GroupKey, f64)> = peak_values(grouped).into_iter().collect();
    // BTreeMap iteration is key-ascending; the stable sort keeps that for ties.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (group, _) in ranked {
        if selected.len() >= top.k {
            break;
        }
        selected.insert(group);
    }

    log::info!(
        "[CVIS] groups: top {} with {} pinned -> {} of {} groups",
        top.k,
        top.always_include.len(),
        selected.len(),
        grouped.len()
    );
    selected
}

/// Assign `0..n` to the given groups in lexicographic order.
pub fn enumerate_groups<'a, I>(groups: I) -> BTreeMap<GroupKey, usize>
where
    I: IntoIterator<Item = &'a GroupKey>,
{
    let sorted: BTreeSet<&GroupKey> = groups.into_iter().collect();
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, group)| (group.clone(), index))
        .collect()
}
