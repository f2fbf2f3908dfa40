//! Column contracts for the two canonical input tables.
//!
//! Column names are configurable so the same loaders serve tables whose
//! grouping column is e.g. `Country_Region` or `Province_State`.

use crate::error::{CvisError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Column names of the series table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesColumns {
    pub group: String,
    pub date: String,
    /// The charted measure (cumulative or incremental counts).
    pub measure: String,
    /// Column tested against the threshold. `None` tests the measure itself.
    pub threshold: Option<String>,
}

impl Default for SeriesColumns {
    fn default() -> Self {
        SeriesColumns {
            group: "group".to_string(),
            date: "date".to_string(),
            measure: "value".to_string(),
            threshold: None,
        }
    }
}

/// Column names of the intervention event table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventColumns {
    pub group: String,
    pub date: String,
    pub kind: String,
    pub coverage: String,
}

impl Default for EventColumns {
    fn default() -> Self {
        EventColumns {
            group: "group".to_string(),
            date: "event_date".to_string(),
            kind: "event_type".to_string(),
            coverage: "coverage".to_string(),
        }
    }
}

/// Position of a required column in a header row.
pub(crate) fn require_column(
    headers: &StringRecord,
    table: &'static str,
    name: &str,
) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| CvisError::MissingColumn {
            table,
            column: name.to_string(),
        })
}
