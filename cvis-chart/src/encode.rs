//! Encodings of a [`ChartTable`] for the renderer.
//!
//! JSON carries the rows with empty columns omitted. CSV has a fixed header
//! so every record has the same width; absent values are empty fields.

use anyhow::Context;
use cvis_data::{ChartRow, ChartTable};

/// CSV header, in column order.
pub const CSV_COLUMNS: [&str; 17] = [
    "group",
    "group_index",
    "row_kind",
    "relative_day",
    "value",
    "date",
    "max_relative_day",
    "synthetic",
    "event_kind",
    "event_glyph",
    "coverage",
    "event_order",
    "stack_index",
    "pivot_day",
    "pivot_value",
    "rate",
    "model_value",
];

pub trait TableEncoding {
    /// JSON array of rows.
    fn to_json(&self) -> anyhow::Result<String>;
    /// JSON object with `rows` and per-group `groups`.
    fn to_json_with_groups(&self) -> anyhow::Result<String>;
    fn to_csv(&self) -> anyhow::Result<String>;
}

impl TableEncoding for ChartTable {
    fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.rows).context("failed to encode chart rows as JSON")
    }

    fn to_json_with_groups(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("failed to encode chart table as JSON")
    }

    fn to_csv(&self) -> anyhow::Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(csv_record(row))
                .with_context(|| format!("failed to write row for {}", row.group))?;
        }
        let bytes = wtr.into_inner().context("failed to flush CSV output")?;
        let text = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
        log::debug!("[CVIS] encode: wrote {} CSV rows", self.rows.len());
        Ok(text)
    }
}

fn field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn csv_record(row: &ChartRow) -> [String; 17] {
    [
        row.group.to_string(),
        row.group_index.to_string(),
        row.row_kind.to_string(),
        row.relative_day.to_string(),
        field(row.value),
        field(row.date.as_deref()),
        row.max_relative_day.to_string(),
        row.synthetic.to_string(),
        field(row.event_kind.as_deref()),
        field(row.event_glyph.as_deref()),
        field(row.coverage),
        field(row.event_order),
        field(row.stack_index),
        field(row.pivot_day),
        field(row.pivot_value),
        field(row.rate),
        field(row.model_value),
    ]
}
