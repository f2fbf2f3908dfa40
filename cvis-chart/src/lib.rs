//! Chart build facade for relative-day case/death charts.
//!
//! A [`Chart`] holds a validated [`ChartConfig`] and the two canonical
//! tables. Loading takes CSV text (the caller owns any file access) and
//! [`Chart::build`] runs the whole pipeline, returning the unified
//! [`ChartTable`] the renderer consumes.
//!
//! # Usage
//!
//! ```rust
//! use cvis_chart::{Chart, ChartConfig, TableEncoding};
//!
//! let mut chart = Chart::new(ChartConfig::default().with_relative_day_domain(0, 40)).unwrap();
//! chart
//!     .load_series("group,date,value\nItaly,2020-02-22,62\nItaly,2020-02-23,155\n")
//!     .unwrap();
//! chart
//!     .load_events("group,event_date,event_type,coverage\nItaly,2020-03-09,l,full\n")
//!     .unwrap();
//!
//! let table = chart.build().unwrap();
//! assert_eq!(table.groups.len(), 1);
//! let json = table.to_json().unwrap();
//! assert!(json.contains("\"row_kind\":\"observed\""));
//! ```
//!
//! # Errors
//!
//! Structural problems (missing columns, unreadable dates or measures, an
//! invalid configuration) come back as `anyhow` errors wrapping
//! [`cvis_core::CvisError`]. Sparse groups never fail a build; they show up
//! with fewer rows or without a trend.

pub mod encode;

use anyhow::Context;
use cvis_core::event::{EventTable, InterventionEvent};
use cvis_core::series::SeriesTable;

pub use cvis_data::{ChartConfig, ChartRow, ChartTable, GroupSummary, RowKind, TrendAnchor};
pub use encode::TableEncoding;

/// A configured chart build over one series table and one event table.
#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    series: Option<SeriesTable>,
    events: EventTable,
}

impl Chart {
    /// Validate `config` and create a chart with no data loaded.
    pub fn new(config: ChartConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid chart configuration")?;
        Ok(Self {
            config,
            series: None,
            events: EventTable::default(),
        })
    }

    /// Create a chart from a JSON configuration document. Omitted options
    /// take their defaults.
    pub fn from_config_json(json: &str) -> anyhow::Result<Self> {
        let config: ChartConfig =
            serde_json::from_str(json).context("failed to parse chart configuration")?;
        Self::new(config)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Parse the canonical series CSV, replacing any loaded series.
    /// Returns the number of rows kept.
    pub fn load_series(&mut self, csv_data: &str) -> anyhow::Result<usize> {
        let table = SeriesTable::from_csv(csv_data, &self.config.series_columns)
            .context("failed to load series table")?;
        let count = table.len();
        self.series = Some(table);
        Ok(count)
    }

    /// Parse the canonical event CSV, replacing any loaded events.
    /// Returns the number of events kept.
    pub fn load_events(&mut self, csv_data: &str) -> anyhow::Result<usize> {
        let table = EventTable::from_csv(csv_data, &self.config.event_columns)
            .context("failed to load event table")?;
        let count = table.len();
        self.events = table;
        Ok(count)
    }

    /// Use an already-built series table, e.g. from a source adapter.
    pub fn set_series(&mut self, table: SeriesTable) {
        self.series = Some(table);
    }

    /// Append events produced by an adapter after any loaded ones.
    pub fn extend_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InterventionEvent>,
    {
        self.events.events.extend(events);
    }

    /// Run the pipeline. Without events the table has no intervention or
    /// model rows.
    pub fn build(&self) -> anyhow::Result<ChartTable> {
        let series = self.series.as_ref().context("no series table loaded")?;
        let table = cvis_data::build_chart_table(series, &self.events, &self.config)
            .context("chart build failed")?;
        Ok(table)
    }
}
