//! Core types for per-group epidemiological series and the intervention
//! events that are overlaid on them.
//!
//! Both inputs arrive as canonical tables (see [`series::SeriesTable`] and
//! [`event::EventTable`]); source-specific adapters are expected to have
//! produced those already.

pub mod columns;
pub mod error;
pub mod event;
pub mod event_kind;
pub mod group;
pub mod series;

pub use error::{CvisError, Result};
pub use group::GroupKey;
