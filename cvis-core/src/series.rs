use crate::columns::{require_column, SeriesColumns};
use crate::error::{CvisError, Result};
use crate::group::GroupKey;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use cvis_utils::dates::{is_missing, parse_date_opt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TABLE: &str = "series";

/// A single dated measurement for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub group: GroupKey,
    pub date: NaiveDate,
    /// Cumulative or incremental count, depending on the source.
    pub measure: f64,
    /// Value of a separate threshold column, when one is configured.
    pub threshold_measure: Option<f64>,
}

impl SeriesRow {
    pub fn new(group: impl Into<GroupKey>, date: NaiveDate, measure: f64) -> Self {
        SeriesRow {
            group: group.into(),
            date,
            measure,
            threshold_measure: None,
        }
    }

    /// The value compared against the threshold: the dedicated column when
    /// present, otherwise the measure.
    pub fn criterion(&self) -> f64 {
        self.threshold_measure.unwrap_or(self.measure)
    }
}

/// The canonical series table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    pub rows: Vec<SeriesRow>,
}

impl SeriesTable {
    pub fn new(rows: Vec<SeriesRow>) -> Self {
        SeriesTable { rows }
    }

    /// Parse a series table from CSV text (header row required).
    ///
    /// Rows with an empty group, a missing date or a missing measure are
    /// skipped. A measure that is present but not numeric is an error, and
    /// so is a date in neither accepted format.
    ///
    /// # Example CSV
    /// ```text
    /// group,date,value
    /// Italy,02-21-2020,20
    /// Italy,2020-02-22,62
    /// ```
    pub fn from_csv(csv_data: &str, columns: &SeriesColumns) -> Result<SeriesTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let group_idx = require_column(&headers, TABLE, &columns.group)?;
        let date_idx = require_column(&headers, TABLE, &columns.date)?;
        let measure_idx = require_column(&headers, TABLE, &columns.measure)?;
        let threshold_idx = match &columns.threshold {
            Some(name) => Some(require_column(&headers, TABLE, name)?),
            None => None,
        };

        let mut rows = Vec::new();
        let mut skipped = 0u32;
        for (line, result) in rdr.records().enumerate() {
            let r = result?;
            let group = r.get(group_idx).unwrap_or("").trim();
            if group.is_empty() {
                skipped += 1;
                continue;
            }
            let date = match parse_date_opt(r.get(date_idx).unwrap_or(""))? {
                Some(date) => date,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let measure = match parse_measure(r.get(measure_idx).unwrap_or(""), line + 1)? {
                Some(measure) => measure,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let threshold_measure = match threshold_idx {
                Some(idx) => parse_measure(r.get(idx).unwrap_or(""), line + 1)?,
                None => None,
            };
            rows.push(SeriesRow {
                group: GroupKey::from(group),
                date,
                measure,
                threshold_measure,
            });
        }
        log::info!(
            "[CVIS] loader: Loaded {} series rows, skipped {} incomplete",
            rows.len(),
            skipped
        );
        Ok(SeriesTable { rows })
    }

    /// Split the table into per-group vectors, each sorted by date.
    ///
    /// The sort is stable, so rows sharing a date keep their table order.
    pub fn by_group(&self) -> BTreeMap<GroupKey, Vec<SeriesRow>> {
        let mut result: BTreeMap<GroupKey, Vec<SeriesRow>> = BTreeMap::new();
        for row in &self.rows {
            result.entry(row.group.clone()).or_default().push(row.clone());
        }
        for rows in result.values_mut() {
            rows.sort_by_key(|row| row.date);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_measure(raw: &str, row: usize) -> Result<Option<f64>> {
    if is_missing(raw) {
        return Ok(None);
    }
    let trimmed = raw.trim();
    match trimmed.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(CvisError::InvalidMeasure {
            table: TABLE,
            row,
            value: trimmed.to_string(),
        }),
    }
}
