//! The unified output table handed to the renderer.

use crate::trend::TrendAnchor;
use chrono::NaiveDate;
use cvis_core::event::Coverage;
use cvis_core::GroupKey;
use serde::Serialize;
use std::fmt;

/// Semantic origin of an output row. The derive order is the sort order
/// used for rows sharing a relative day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Observed,
    Intervention,
    Model,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Observed => "observed",
            RowKind::Intervention => "intervention",
            RowKind::Model => "model",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the unified table. Columns that do not apply to a row's
/// kind are `None` and left out of JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub group: GroupKey,
    pub group_index: usize,
    pub row_kind: RowKind,
    pub relative_day: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// ISO `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub max_relative_day: i64,
    pub synthetic: bool,

    // Intervention rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_glyph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_order: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_index: Option<usize>,

    // Every row of a group with a trend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,

    // Model rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_value: Option<f64>,
}

impl ChartRow {
    /// A row of `kind` with every optional column empty.
    pub fn new(
        group: GroupKey,
        group_index: usize,
        row_kind: RowKind,
        relative_day: i64,
        max_relative_day: i64,
    ) -> Self {
        ChartRow {
            group,
            group_index,
            row_kind,
            relative_day,
            value: None,
            date: None,
            max_relative_day,
            synthetic: false,
            event_kind: None,
            event_glyph: None,
            coverage: None,
            event_order: None,
            stack_index: None,
            pivot_day: None,
            pivot_value: None,
            rate: None,
            model_value: None,
        }
    }

    /// Copy the trend columns onto this row.
    pub fn with_trend(mut self, trend: Option<&TrendAnchor>) -> Self {
        if let Some(trend) = trend {
            self.pivot_day = Some(trend.pivot_day);
            self.pivot_value = Some(trend.pivot_value);
            self.rate = Some(trend.rate);
        }
        self
    }
}

/// Per-group facts behind the rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: GroupKey,
    pub group_index: usize,
    pub anchor_date: NaiveDate,
    pub max_relative_day: i64,
    pub trend: Option<TrendAnchor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartTable {
    pub rows: Vec<ChartRow>,
    /// In `group_index` order.
    pub groups: Vec<GroupSummary>,
}

impl ChartTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn group(&self, group: &GroupKey) -> Option<&GroupSummary> {
        self.groups.iter().find(|summary| &summary.group == group)
    }

    pub fn rows_for<'a>(&'a self, group: &'a GroupKey) -> impl Iterator<Item = &'a ChartRow> + 'a {
        self.rows.iter().filter(move |row| &row.group == group)
    }

    pub fn rows_of_kind(&self, kind: RowKind) -> impl Iterator<Item = &ChartRow> + '_ {
        self.rows.iter().filter(move |row| row.row_kind == kind)
    }
}
