//! Counterfactual trend model.
//!
//! A group's trend is a two-point exponential fit over the short window
//! that ends at its reference intervention (the pivot). Projected forward
//! from the pivot it shows where the curve would have gone at the
//! pre-intervention growth rate. Groups that cannot produce a finite,
//! positive fit get no trend; that is never an error.

use crate::alignment::AlignedRow;
use crate::config::ReferenceEventPolicy;
use crate::events::AlignedEvent;
use serde::Serialize;

/// The two reference points of a fitted trend and the per-day rate between
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendAnchor {
    pub intercept_day: i64,
    pub intercept_value: f64,
    pub pivot_day: i64,
    pub pivot_value: f64,
    pub rate: f64,
}

impl TrendAnchor {
    /// Fit `rate = (pivot_value / intercept_value) ^ (1 / (pivot_day - intercept_day))`.
    ///
    /// Returns `None` when the days coincide or run backwards, when either
    /// value is not strictly positive, or when the rate is not finite.
    pub fn fit(intercept_day: i64, intercept_value: f64, pivot_day: i64, pivot_value: f64) -> Option<Self> {
        if intercept_day >= pivot_day {
            return None;
        }
        if !(intercept_value > 0.0 && pivot_value > 0.0) {
            return None;
        }
        let span = (pivot_day - intercept_day) as f64;
        let rate = (pivot_value / intercept_value).powf(1.0 / span);
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        Some(TrendAnchor {
            intercept_day,
            intercept_value,
            pivot_day,
            pivot_value,
            rate,
        })
    }

    /// Projected value at `day`; exactly `pivot_value` at the pivot.
    pub fn value_at(&self, day: i64) -> f64 {
        let steps = day - self.pivot_day;
        if steps == 0 {
            return self.pivot_value;
        }
        match i32::try_from(steps) {
            Ok(steps) => self.pivot_value * self.rate.powi(steps),
            Err(_) => self.pivot_value * self.rate.powf(steps as f64),
        }
    }
}

/// One point of the projected curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPoint {
    pub relative_day: i64,
    pub model_value: f64,
}

/// Pick the event whose day becomes the pivot.
///
/// `events` must be in `event_order`, so the first match is the earliest
/// with table order breaking same-day ties.
pub fn select_reference_event<'a>(
    events: &'a [AlignedEvent],
    policy: &ReferenceEventPolicy,
) -> Option<&'a AlignedEvent> {
    match policy {
        ReferenceEventPolicy::Earliest => events.first(),
        ReferenceEventPolicy::PrimaryKind {
            kind,
            require_full_coverage,
            fallback_to_earliest,
        } => events
            .iter()
            .find(|event| {
                event.kind == *kind && (!require_full_coverage || event.coverage.is_full())
            })
            .or_else(|| {
                if *fallback_to_earliest {
                    events.first()
                } else {
                    None
                }
            }),
    }
}

/// Fit a group's trend from its observed rows (sorted by relative day).
///
/// Candidates are the non-synthetic rows with
/// `pivot_day - window < relative_day <= pivot_day`. The earliest candidate
/// is the intercept and the latest one supplies the pivot value.
pub fn fit_group_trend(rows: &[AlignedRow], pivot_day: i64, window: i64) -> Option<TrendAnchor> {
    let mut candidates = rows
        .iter()
        .filter(|row| !row.synthetic)
        .filter(|row| pivot_day - window < row.relative_day && row.relative_day <= pivot_day);
    let first = candidates.next()?;
    let last = candidates.last().unwrap_or(first);
    TrendAnchor::fit(first.relative_day, first.value, pivot_day, last.value)
}

/// Model points for every day from the pivot through `max_day`, dropping
/// points above `ceiling` when one is given.
pub fn project(anchor: &TrendAnchor, max_day: i64, ceiling: Option<f64>) -> Vec<ModelPoint> {
    (anchor.pivot_day..=max_day)
        .map(|relative_day| ModelPoint {
            relative_day,
            model_value: anchor.value_at(relative_day),
        })
        .filter(|point| point.model_value.is_finite())
        .filter(|point| ceiling.map_or(true, |ceiling| point.model_value <= ceiling))
        .collect()
}
