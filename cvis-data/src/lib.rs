//! Alignment and trend modeling for per-group case/death series.
//!
//! This crate turns the canonical series and event tables from `cvis-core`
//! into one unified table for charting: every group on a relative-day axis
//! anchored at its threshold crossing, with intervention markers and a
//! counterfactual growth curve alongside the observed values.

pub mod alignment;
pub mod config;
pub mod events;
pub mod groups;
pub mod models;
pub mod pipeline;
pub mod prepare;
pub mod sampling;
pub mod synthesis;
pub mod trend;

pub use config::{ChartConfig, DayDomain, ReferenceEventPolicy, TopK, ValueDomain};
pub use models::{ChartRow, ChartTable, GroupSummary, RowKind};
pub use pipeline::build_chart_table;
pub use trend::TrendAnchor;
