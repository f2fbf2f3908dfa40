//! The chart build: both canonical tables in, one unified table out.

use crate::alignment::align_series;
use crate::config::ChartConfig;
use crate::events::align_events;
use crate::groups::{enumerate_groups, top_k_groups};
use crate::models::{ChartRow, ChartTable, GroupSummary};
use crate::prepare::{accumulate, exclude_groups};
use crate::sampling::sample_observed;
use crate::synthesis::{ensure_row_at, intervention_rows, model_rows, observed_rows, value_at};
use crate::trend::{fit_group_trend, project, select_reference_event};
use cvis_core::event::EventTable;
use cvis_core::series::SeriesTable;
use cvis_core::Result;
use std::collections::BTreeSet;

/// Run every stage over `series` and `events`.
///
/// Only an invalid `config` is an error. Groups that never cross the
/// threshold, lose all rows to clipping, or cannot be fitted are dropped or
/// left without a trend.
pub fn build_chart_table(
    series: &SeriesTable,
    events: &EventTable,
    config: &ChartConfig,
) -> Result<ChartTable> {
    config.validate()?;
    log::info!(
        "[CVIS] build: {} series rows, {} events",
        series.len(),
        events.len()
    );

    let mut grouped = series.by_group();
    exclude_groups(&mut grouped, &config.excluded_groups);
    if !config.measure_is_cumulative {
        accumulate(&mut grouped);
    }
    if let Some(top) = &config.top_k {
        let keep = top_k_groups(&grouped, top, config.threshold);
        grouped.retain(|group, _| keep.contains(group));
    }

    let mut alignment = align_series(&grouped, config.threshold);
    alignment.clip(config.relative_day_domain, config.value_domain);
    let max_days = alignment.max_relative_days();
    let indexes = enumerate_groups(alignment.rows.keys());

    let mut aligned_events = align_events(
        events,
        &alignment.anchors,
        &max_days,
        config.relative_day_domain,
        config.filter_events_beyond_max_day,
    );

    let ceiling = config.model_ceiling();
    let mut table = ChartTable::default();
    let mut fitted = 0usize;
    for (group, mut rows) in alignment.rows {
        let (Some(&anchor_date), Some(&group_index), Some(&max_relative_day)) = (
            alignment.anchors.get(&group),
            indexes.get(&group),
            max_days.get(&group),
        ) else {
            continue;
        };
        let group_events = aligned_events.remove(&group).unwrap_or_default();

        let pivot_day = select_reference_event(&group_events, &config.reference_event)
            .map(|event| event.relative_day);
        let trend = pivot_day.and_then(|pivot| fit_group_trend(&rows, pivot, config.trend_window));
        match (pivot_day, &trend) {
            (None, _) => log::debug!("[CVIS] trend: {group} has no reference event"),
            (Some(pivot), None) => {
                log::debug!("[CVIS] trend: {group} has no usable fit ending at day {pivot}")
            }
            (Some(_), Some(_)) => fitted += 1,
        }

        // Days an overlay points at; they keep an observed row through sampling.
        let mut anchored: BTreeSet<i64> = pivot_day.into_iter().collect();
        if config.anchor_every_event_day {
            anchored.extend(group_events.iter().map(|event| event.relative_day));
        }
        for &day in &anchored {
            if !ensure_row_at(&mut rows, day, anchor_date) && value_at(&rows, day).is_none() {
                log::debug!("[CVIS] synthesis: {group} has no observed span around day {day}");
            }
        }

        let summary = GroupSummary {
            group,
            group_index,
            anchor_date,
            max_relative_day,
            trend,
        };
        // Event values are looked up before decimation.
        let event_rows = intervention_rows(&summary, &group_events, &rows);
        let rows = match config.sample_every {
            Some(every) => sample_observed(rows, every, &anchored),
            None => rows,
        };
        table.rows.extend(observed_rows(&summary, &rows));
        table.rows.extend(event_rows);
        if let Some(trend) = &summary.trend {
            let points = project(trend, max_relative_day, ceiling);
            table.rows.extend(model_rows(&summary, &points));
        }
        table.groups.push(summary);
    }

    sort_rows(&mut table.rows);
    table.groups.sort_by_key(|summary| summary.group_index);
    log::info!(
        "[CVIS] build: {} rows across {} groups, {} with a trend",
        table.rows.len(),
        table.groups.len(),
        fitted
    );
    Ok(table)
}

/// Group, relative day, row kind, event order.
fn sort_rows(rows: &mut [ChartRow]) {
    rows.sort_by(|a, b| {
        a.group
            .cmp(&b.group)
            .then(a.relative_day.cmp(&b.relative_day))
            .then(a.row_kind.cmp(&b.row_kind))
            .then(a.event_order.cmp(&b.event_order))
    });
}
