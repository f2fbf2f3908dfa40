//! Input preparation ahead of alignment: group exclusion and conversion of
//! incremental counts into cumulative totals.

use cvis_core::series::SeriesRow;
use cvis_core::GroupKey;
use std::collections::BTreeMap;

/// Per-group rows, each vector sorted by date.
pub type GroupedSeries = BTreeMap<GroupKey, Vec<SeriesRow>>;

/// Remove the listed groups entirely.
pub fn exclude_groups(grouped: &mut GroupedSeries, excluded: &[GroupKey]) {
    if excluded.is_empty() {
        return;
    }
    let before = grouped.len();
    grouped.retain(|group, _| !excluded.contains(group));
    log::debug!(
        "[CVIS] prepare: excluded {} of {} groups",
        before - grouped.len(),
        before
    );
}

/// Replace each group's measure by its running sum in date order.
///
/// The separate threshold column, if any, is left untouched.
pub fn accumulate(grouped: &mut GroupedSeries) {
    for rows in grouped.values_mut() {
        let mut total = 0.0;
        for row in rows.iter_mut() {
            total += row.measure;
            row.measure = total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cvis_core::series::SeriesTable;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    #[test]
    fn accumulate_runs_per_group() {
        let table = SeriesTable::new(vec![
            SeriesRow::new("A", d(2), 5.0),
            SeriesRow::new("B", d(1), 1.0),
            SeriesRow::new("A", d(1), 10.0),
            SeriesRow::new("A", d(3), 0.0),
            SeriesRow::new("B", d(2), 2.0),
        ]);
        let mut grouped = table.by_group();
        accumulate(&mut grouped);
        let a: Vec<f64> = grouped[&GroupKey::from("A")].iter().map(|r| r.measure).collect();
        let b: Vec<f64> = grouped[&GroupKey::from("B")].iter().map(|r| r.measure).collect();
        assert_eq!(a, vec![10.0, 15.0, 15.0]);
        assert_eq!(b, vec![1.0, 3.0]);
    }

    #[test]
    fn exclude_groups_drops_listed() {
        let table = SeriesTable::new(vec![
            SeriesRow::new("Veteran Hospitals", d(1), 100.0),
            SeriesRow::new("Ohio", d(1), 100.0),
        ]);
        let mut grouped = table.by_group();
        exclude_groups(&mut grouped, &[GroupKey::from("Veteran Hospitals")]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(&GroupKey::from("Ohio")));
    }
}
