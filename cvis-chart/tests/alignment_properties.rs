use chrono::{Duration, NaiveDate};
use cvis_chart::{ChartConfig, RowKind};
use cvis_core::event::{Coverage, EventTable, InterventionEvent};
use cvis_core::event_kind::EventKind;
use cvis_core::series::{SeriesRow, SeriesTable};
use cvis_data::build_chart_table;
use cvis_data::trend::TrendAnchor;
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
}

/// Up to three groups with non-decreasing cumulative counts over
/// consecutive days.
fn series_strategy() -> impl Strategy<Value = SeriesTable> {
    prop::collection::vec(prop::collection::vec(0u32..400, 1..40), 1..4).prop_map(|groups| {
        let mut rows = Vec::new();
        for (g, increments) in groups.iter().enumerate() {
            let name = format!("G{g}");
            let mut total = 0.0;
            for (offset, inc) in increments.iter().enumerate() {
                total += f64::from(*inc);
                rows.push(SeriesRow::new(name.as_str(), start() + Duration::days(offset as i64), total));
            }
        }
        SeriesTable::new(rows)
    })
}

fn events_strategy() -> impl Strategy<Value = EventTable> {
    prop::collection::vec((0usize..4, 0i64..60, prop::bool::ANY, prop::bool::ANY), 0..8).prop_map(
        |specs| {
            EventTable::new(
                specs
                    .into_iter()
                    .map(|(g, offset, stay_at_home, full)| {
                        let kind = if stay_at_home {
                            EventKind::StayAtHome
                        } else {
                            EventKind::SchoolClosure
                        };
                        let coverage = if full { Coverage::Full } else { Coverage::Partial };
                        InterventionEvent::new(
                            format!("G{g}"),
                            start() + Duration::days(offset),
                            kind,
                            coverage,
                        )
                    })
                    .collect(),
            )
        },
    )
}

proptest! {
    #[test]
    fn only_groups_over_threshold_appear(series in series_strategy(), events in events_strategy()) {
        let config = ChartConfig::default();
        let table = build_chart_table(&series, &events, &config).unwrap();
        for group in &table.groups {
            let peak = series
                .rows
                .iter()
                .filter(|r| r.group == group.group)
                .map(|r| r.measure)
                .fold(f64::MIN, f64::max);
            prop_assert!(peak > config.threshold);
        }
    }

    #[test]
    fn relative_day_follows_date(series in series_strategy()) {
        let table = build_chart_table(&series, &EventTable::default(), &ChartConfig::default()).unwrap();
        for group in &table.groups {
            let mut previous: Option<(String, i64)> = None;
            for row in table.rows_for(&group.group) {
                let date = row.date.clone().unwrap();
                if let Some((prev_date, prev_day)) = &previous {
                    prop_assert!(prev_date < &date);
                    prop_assert!(*prev_day < row.relative_day);
                }
                previous = Some((date, row.relative_day));
            }
        }
    }

    #[test]
    fn events_stay_strictly_inside_domain(
        series in series_strategy(),
        events in events_strategy(),
        lo in -10i64..5,
        width in 1i64..40,
    ) {
        let config = ChartConfig::default()
            .with_relative_day_domain(lo, lo + width)
            .with_filter_events_beyond_max_day(false);
        let table = build_chart_table(&series, &events, &config).unwrap();
        for row in table.rows_of_kind(RowKind::Intervention) {
            prop_assert!(lo < row.relative_day && row.relative_day < lo + width);
        }
        for row in table.rows_of_kind(RowKind::Observed).filter(|r| !r.synthetic) {
            prop_assert!(lo <= row.relative_day && row.relative_day < lo + width);
        }
    }

    #[test]
    fn model_starts_at_pivot_value(series in series_strategy(), events in events_strategy()) {
        let table = build_chart_table(&series, &events, &ChartConfig::default()).unwrap();
        for group in &table.groups {
            let Some(trend) = group.trend else { continue };
            let first_model = table
                .rows_for(&group.group)
                .find(|r| r.row_kind == RowKind::Model);
            if let Some(row) = first_model {
                prop_assert_eq!(row.relative_day, trend.pivot_day);
                prop_assert_eq!(row.model_value, Some(trend.pivot_value));
            }
            let pivot_rows = table
                .rows_for(&group.group)
                .filter(|r| r.row_kind == RowKind::Observed && r.relative_day == trend.pivot_day)
                .count();
            prop_assert_eq!(pivot_rows, 1);
        }
    }

    #[test]
    fn sampling_keeps_first_last_and_synthetic(
        series in series_strategy(),
        events in events_strategy(),
        every in 1usize..6,
    ) {
        let full = build_chart_table(&series, &events, &ChartConfig::default()).unwrap();
        let sampled =
            build_chart_table(&series, &events, &ChartConfig::default().with_sample_every(every)).unwrap();
        for group in &full.groups {
            let observed = |table: &cvis_chart::ChartTable| -> Vec<(i64, bool)> {
                table
                    .rows_for(&group.group)
                    .filter(|r| r.row_kind == RowKind::Observed)
                    .map(|r| (r.relative_day, r.synthetic))
                    .collect()
            };
            let before = observed(&full);
            let after = observed(&sampled);
            let real_before: Vec<i64> = before.iter().filter(|(_, s)| !s).map(|(d, _)| *d).collect();
            let real_after: Vec<i64> = after.iter().filter(|(_, s)| !s).map(|(d, _)| *d).collect();
            prop_assert_eq!(real_before.first(), real_after.first());
            prop_assert_eq!(real_before.last(), real_after.last());
            let synthetic_before: Vec<i64> = before.iter().filter(|(_, s)| *s).map(|(d, _)| *d).collect();
            let synthetic_after: Vec<i64> = after.iter().filter(|(_, s)| *s).map(|(d, _)| *d).collect();
            prop_assert_eq!(synthetic_before, synthetic_after);
            if let Some(trend) = group.trend {
                prop_assert!(after.iter().any(|(d, _)| *d == trend.pivot_day));
            }
            prop_assert_eq!(
                full.rows_of_kind(RowKind::Intervention).count(),
                sampled.rows_of_kind(RowKind::Intervention).count()
            );
            prop_assert_eq!(
                full.rows_of_kind(RowKind::Model).count(),
                sampled.rows_of_kind(RowKind::Model).count()
            );
        }
    }

    #[test]
    fn fitted_rate_reproduces_pivot(
        intercept_day in -20i64..20,
        span in 1i64..30,
        intercept_value in 1.0f64..1e5,
        pivot_value in 1.0f64..1e6,
    ) {
        let trend = TrendAnchor::fit(intercept_day, intercept_value, intercept_day + span, pivot_value).unwrap();
        let back = trend.intercept_value * trend.rate.powi(span as i32);
        prop_assert!((back - pivot_value).abs() <= 1e-9 * pivot_value);
        prop_assert_eq!(trend.value_at(trend.pivot_day), pivot_value);
    }
}
