use crate::columns::{require_column, EventColumns};
use crate::error::Result;
use crate::event_kind::EventKind;
use crate::group::GroupKey;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use cvis_utils::dates::parse_date_opt;
use serde::{Deserialize, Serialize};
use std::fmt;

const TABLE: &str = "event";

/// Whether an intervention applies to the whole jurisdiction or part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Full,
    Partial,
}

impl Coverage {
    /// Map source coverage text onto the two levels. Anything that does not
    /// clearly denote whole-jurisdiction coverage counts as partial.
    pub fn from_text(text: &str) -> Coverage {
        match text.trim().to_lowercase().as_str() {
            "full" | "statewide" | "state-wide" | "national" | "nationwide" => Coverage::Full,
            _ => Coverage::Partial,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Coverage::Full)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Full => f.write_str("full"),
            Coverage::Partial => f.write_str("partial"),
        }
    }
}

/// A policy intervention enacted for one group on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionEvent {
    pub group: GroupKey,
    pub event_date: NaiveDate,
    pub kind: EventKind,
    pub coverage: Coverage,
}

impl InterventionEvent {
    pub fn new(
        group: impl Into<GroupKey>,
        event_date: NaiveDate,
        kind: EventKind,
        coverage: Coverage,
    ) -> Self {
        InterventionEvent {
            group: group.into(),
            event_date,
            kind,
            coverage,
        }
    }

    /// Expand a compact code string into one event per code letter.
    ///
    /// Each letter names an [`EventKind`]; an upper-case letter marks full
    /// coverage. Letters outside the code table are ignored.
    pub fn from_codes(
        group: impl Into<GroupKey>,
        event_date: NaiveDate,
        codes: &str,
    ) -> Vec<InterventionEvent> {
        let group = group.into();
        codes
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .filter_map(|c| {
                let kind = EventKind::from_code(c);
                if kind.is_none() {
                    log::debug!("[CVIS] loader: ignoring unknown event code {c:?} for {group}");
                }
                kind.map(|kind| {
                    let coverage = if c.is_ascii_uppercase() {
                        Coverage::Full
                    } else {
                        Coverage::Partial
                    };
                    InterventionEvent::new(group.clone(), event_date, kind, coverage)
                })
            })
            .collect()
    }
}

/// The canonical intervention event table. Row order is meaningful: it is
/// the last tie-breaker for events sharing a relative day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    pub events: Vec<InterventionEvent>,
}

impl EventTable {
    pub fn new(events: Vec<InterventionEvent>) -> Self {
        EventTable { events }
    }

    /// Parse an event table from CSV text (header row required).
    ///
    /// Events without a group or a date are dropped; a date in neither
    /// accepted format is an error.
    ///
    /// # Example CSV
    /// ```text
    /// group,event_date,event_type,coverage
    /// Italy,2020-03-09,Stay-at-home Order,Full
    /// Italy,03-05-2020,s,Full
    /// ```
    pub fn from_csv(csv_data: &str, columns: &EventColumns) -> Result<EventTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let group_idx = require_column(&headers, TABLE, &columns.group)?;
        let date_idx = require_column(&headers, TABLE, &columns.date)?;
        let kind_idx = require_column(&headers, TABLE, &columns.kind)?;
        let coverage_idx = require_column(&headers, TABLE, &columns.coverage)?;

        let mut events = Vec::new();
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let group = r.get(group_idx).unwrap_or("").trim();
            let date = parse_date_opt(r.get(date_idx).unwrap_or(""))?;
            let (group, event_date) = match (group.is_empty(), date) {
                (false, Some(date)) => (group, date),
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            events.push(InterventionEvent {
                group: GroupKey::from(group),
                event_date,
                kind: EventKind::parse(r.get(kind_idx).unwrap_or("")),
                coverage: Coverage::from_text(r.get(coverage_idx).unwrap_or("")),
            });
        }
        log::info!(
            "[CVIS] loader: Loaded {} intervention events, skipped {} incomplete",
            events.len(),
            skipped
        );
        Ok(EventTable { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
