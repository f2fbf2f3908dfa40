//! Threshold alignment: re-express every date as "days since the group
//! first exceeded N", then clip to the visible domain.

use crate::config::{DayDomain, ValueDomain};
use crate::prepare::GroupedSeries;
use chrono::{Duration, NaiveDate};
use cvis_core::series::SeriesRow;
use cvis_core::GroupKey;
use cvis_utils::dates::days_between;
use std::collections::BTreeMap;

/// A series row placed on its group's relative-day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub group: GroupKey,
    pub date: NaiveDate,
    pub relative_day: i64,
    pub value: f64,
    /// Inserted by row synthesis rather than observed.
    pub synthetic: bool,
}

/// Aligned rows plus the anchor (threshold-crossing) date of every group
/// that has one.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    pub anchors: BTreeMap<GroupKey, NaiveDate>,
    /// Per-group rows sorted by relative day.
    pub rows: BTreeMap<GroupKey, Vec<AlignedRow>>,
}

/// First date on which the group's criterion exceeds `threshold`.
///
/// Rows must be in date order; on a date tie the first row wins.
pub fn anchor_date(rows: &[SeriesRow], threshold: f64) -> Option<NaiveDate> {
    rows.iter()
        .filter(|row| row.criterion() > threshold)
        .map(|row| row.date)
        .min()
}

/// Relative-day offset of `date` on an axis anchored at `anchor`.
pub fn relative_day(anchor: NaiveDate, date: NaiveDate) -> Option<i64> {
    days_between(Some(anchor), Some(date))
}

/// Calendar date sitting at `day` on an axis anchored at `anchor`.
pub fn date_at(anchor: NaiveDate, day: i64) -> NaiveDate {
    anchor + Duration::days(day)
}

/// Align every group that crosses the threshold; the others are dropped.
pub fn align_series(grouped: &GroupedSeries, threshold: f64) -> Alignment {
    let mut alignment = Alignment::default();
    for (group, rows) in grouped {
        let Some(anchor) = anchor_date(rows, threshold) else {
            log::debug!("[CVIS] alignment: {group} never exceeds {threshold}, dropped");
            continue;
        };
        let aligned: Vec<AlignedRow> = rows
            .iter()
            .filter_map(|row| {
                relative_day(anchor, row.date).map(|relative_day| AlignedRow {
                    group: group.clone(),
                    date: row.date,
                    relative_day,
                    value: row.measure,
                    synthetic: false,
                })
            })
            .collect();
        alignment.anchors.insert(group.clone(), anchor);
        alignment.rows.insert(group.clone(), aligned);
    }
    log::info!(
        "[CVIS] alignment: {} of {} groups reached the threshold {}",
        alignment.anchors.len(),
        grouped.len(),
        threshold
    );
    alignment
}

impl Alignment {
    /// Keep only rows inside the visible domains. Groups left without rows
    /// are removed, anchors included.
    pub fn clip(&mut self, days: Option<DayDomain>, values: Option<ValueDomain>) {
        if days.is_none() && values.is_none() {
            return;
        }
        for rows in self.rows.values_mut() {
            rows.retain(|row| {
                days.map_or(true, |domain| domain.contains(row.relative_day))
                    && values.map_or(true, |domain| domain.contains(row.value))
            });
        }
        let before = self.rows.len();
        self.rows.retain(|_, rows| !rows.is_empty());
        let rows = &self.rows;
        self.anchors.retain(|group, _| rows.contains_key(group));
        log::debug!(
            "[CVIS] alignment: clipping left {} of {} groups",
            self.rows.len(),
            before
        );
    }

    /// Each group's largest visible relative day.
    pub fn max_relative_days(&self) -> BTreeMap<GroupKey, i64> {
        self.rows
            .iter()
            .filter_map(|(group, rows)| {
                rows.iter()
                    .map(|row| row.relative_day)
                    .max()
                    .map(|max| (group.clone(), max))
            })
            .collect()
    }

    pub fn group_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvis_core::series::SeriesTable;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, month, day).unwrap()
    }

    fn series(rows: &[(&str, NaiveDate, f64)]) -> GroupedSeries {
        SeriesTable::new(
            rows.iter()
                .map(|(group, date, value)| SeriesRow::new(*group, *date, *value))
                .collect(),
        )
        .by_group()
    }

    #[test]
    fn anchor_is_first_date_strictly_above_threshold() {
        let grouped = series(&[
            ("A", d(3, 1), 10.0),
            ("A", d(3, 5), 50.0),
            ("A", d(3, 10), 60.0),
            ("A", d(3, 11), 80.0),
        ]);
        let alignment = align_series(&grouped, 50.0);
        let a = GroupKey::from("A");
        assert_eq!(alignment.anchors[&a], d(3, 10));
        let days: Vec<i64> = alignment.rows[&a].iter().map(|r| r.relative_day).collect();
        assert_eq!(days, vec![-9, -5, 0, 1]);
    }

    #[test]
    fn groups_below_threshold_are_dropped() {
        let grouped = series(&[("A", d(3, 1), 100.0), ("B", d(3, 1), 49.0), ("B", d(3, 2), 50.0)]);
        let alignment = align_series(&grouped, 50.0);
        assert_eq!(alignment.group_count(), 1);
        assert!(!alignment.anchors.contains_key(&GroupKey::from("B")));
    }

    #[test]
    fn separate_threshold_column_drives_anchor() {
        let mut row_a = SeriesRow::new("A", d(3, 1), 1.0);
        row_a.threshold_measure = Some(10.0);
        let mut row_b = SeriesRow::new("A", d(3, 2), 2.0);
        row_b.threshold_measure = Some(200.0);
        let grouped = SeriesTable::new(vec![row_a, row_b]).by_group();
        let alignment = align_series(&grouped, 100.0);
        assert_eq!(alignment.anchors[&GroupKey::from("A")], d(3, 2));
        // the charted value is still the measure
        assert_eq!(alignment.rows[&GroupKey::from("A")][1].value, 2.0);
    }

    #[test]
    fn clip_applies_both_domains() {
        let grouped = series(&[
            ("A", d(3, 1), 60.0),
            ("A", d(3, 2), 70.0),
            ("A", d(3, 3), 500.0),
            ("A", d(3, 4), 90.0),
            ("B", d(1, 1), 60.0),
            ("B", d(4, 1), 70.0),
        ]);
        let mut alignment = align_series(&grouped, 50.0);
        alignment.clip(Some(DayDomain::new(0, 3)), Some(ValueDomain::new(0.0, 100.0)));
        let a = GroupKey::from("A");
        let days: Vec<i64> = alignment.rows[&a].iter().map(|r| r.relative_day).collect();
        // day 2 exceeds the value ceiling, day 3 is the excluded upper bound
        assert_eq!(days, vec![0, 1]);
        assert_eq!(alignment.max_relative_days()[&a], 1);
        // B keeps day 0 only
        assert_eq!(alignment.rows[&GroupKey::from("B")].len(), 1);
    }

    #[test]
    fn clip_removes_emptied_groups_and_anchors() {
        let grouped = series(&[("A", d(3, 1), 60.0), ("B", d(3, 1), 5000.0)]);
        let mut alignment = align_series(&grouped, 50.0);
        alignment.clip(None, Some(ValueDomain::new(0.0, 1000.0)));
        assert_eq!(alignment.group_count(), 1);
        assert!(!alignment.anchors.contains_key(&GroupKey::from("B")));
    }

    #[test]
    fn date_at_inverts_relative_day() {
        let anchor = d(3, 10);
        assert_eq!(date_at(anchor, 5), d(3, 15));
        assert_eq!(relative_day(anchor, date_at(anchor, -3)), Some(-3));
    }
}
