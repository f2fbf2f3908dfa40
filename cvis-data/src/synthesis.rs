//! Row synthesis: guarantee observed rows at overlay coordinates and turn
//! observed rows, events and model points into unified [`ChartRow`]s.
//!
//! The renderer binds its hover interaction to `relative_day` alone, so
//! every day an overlay refers to needs an observed row to hit.

use crate::alignment::{date_at, AlignedRow};
use crate::events::AlignedEvent;
use crate::models::{ChartRow, GroupSummary, RowKind};
use crate::trend::ModelPoint;
use chrono::NaiveDate;
use cvis_utils::dates::format_date;

/// Make sure `rows` (sorted by relative day) holds a row at `day`.
///
/// A missing row carries forward the value of the last row before `day`
/// and is marked synthetic. Days outside the span of existing rows are left
/// empty so no value is invented past the data. Returns whether a row was
/// inserted.
pub fn ensure_row_at(rows: &mut Vec<AlignedRow>, day: i64, anchor: NaiveDate) -> bool {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return false;
    };
    if day < first.relative_day || day > last.relative_day {
        return false;
    }
    let at = rows.partition_point(|row| row.relative_day < day);
    if rows.get(at).is_some_and(|row| row.relative_day == day) {
        return false;
    }
    // `first.relative_day < day`, so a previous row exists
    let Some(previous) = at.checked_sub(1).and_then(|i| rows.get(i)) else {
        return false;
    };
    let synthesized = AlignedRow {
        group: previous.group.clone(),
        date: date_at(anchor, day),
        relative_day: day,
        value: previous.value,
        synthetic: true,
    };
    rows.insert(at, synthesized);
    true
}

/// Value of the row at `day`, if any.
pub fn value_at(rows: &[AlignedRow], day: i64) -> Option<f64> {
    rows.iter()
        .find(|row| row.relative_day == day)
        .map(|row| row.value)
}

pub fn observed_rows(summary: &GroupSummary, rows: &[AlignedRow]) -> Vec<ChartRow> {
    rows.iter()
        .map(|row| {
            let mut out = ChartRow::new(
                summary.group.clone(),
                summary.group_index,
                RowKind::Observed,
                row.relative_day,
                summary.max_relative_day,
            )
            .with_trend(summary.trend.as_ref());
            out.value = Some(row.value);
            out.date = Some(format_date(&row.date));
            out.synthetic = row.synthetic;
            out
        })
        .collect()
}

/// Intervention rows, each carrying the observed value found at its day in
/// `lookup`.
pub fn intervention_rows(
    summary: &GroupSummary,
    events: &[AlignedEvent],
    lookup: &[AlignedRow],
) -> Vec<ChartRow> {
    events
        .iter()
        .map(|event| {
            let mut out = ChartRow::new(
                summary.group.clone(),
                summary.group_index,
                RowKind::Intervention,
                event.relative_day,
                summary.max_relative_day,
            )
            .with_trend(summary.trend.as_ref());
            out.value = value_at(lookup, event.relative_day);
            out.date = Some(format_date(&event.event_date));
            out.event_kind = Some(event.kind.label().to_string());
            out.event_glyph = event.kind.glyph().map(str::to_string);
            out.coverage = Some(event.coverage);
            out.event_order = Some(event.event_order);
            out.stack_index = Some(event.stack_index);
            out
        })
        .collect()
}

pub fn model_rows(summary: &GroupSummary, points: &[ModelPoint]) -> Vec<ChartRow> {
    points
        .iter()
        .map(|point| {
            let mut out = ChartRow::new(
                summary.group.clone(),
                summary.group_index,
                RowKind::Model,
                point.relative_day,
                summary.max_relative_day,
            )
            .with_trend(summary.trend.as_ref());
            out.model_value = Some(point.model_value);
            out
        })
        .collect()
}
