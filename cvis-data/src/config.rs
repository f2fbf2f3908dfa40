//! Chart build configuration.
//!
//! Every recognized option lives on [`ChartConfig`] with its default. The
//! `with_*` methods consume and return the config so a build can be set up
//! in one expression; [`ChartConfig::validate`] runs once per build.

use cvis_core::columns::{EventColumns, SeriesColumns};
use cvis_core::event_kind::EventKind;
use cvis_core::{CvisError, GroupKey, Result};
use serde::{Deserialize, Serialize};

/// Default threshold N for the start criterion.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Default number of relative days used to fit the trend.
pub const DEFAULT_TREND_WINDOW: i64 = 5;

/// Visible relative-day domain `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDomain {
    pub lo: i64,
    pub hi: i64,
}

impl DayDomain {
    pub fn new(lo: i64, hi: i64) -> Self {
        DayDomain { lo, hi }
    }

    /// Observed rows are kept on `lo <= day < hi`.
    pub fn contains(&self, day: i64) -> bool {
        self.lo <= day && day < self.hi
    }

    /// Events are kept strictly inside the domain: `lo < day < hi`.
    pub fn strictly_contains(&self, day: i64) -> bool {
        self.lo < day && day < self.hi
    }
}

/// Visible value domain `[min, max]`; `max` is the ceiling for model clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    pub fn new(min: f64, max: f64) -> Self {
        ValueDomain { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Keep the `k` groups with the largest peak, plus an allow-list that is
/// always shown regardless of rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopK {
    pub k: usize,
    #[serde(default)]
    pub always_include: Vec<GroupKey>,
}

/// How the reference intervention for the trend model is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ReferenceEventPolicy {
    /// Earliest event of `kind` (optionally full coverage only). Groups
    /// without one fall back to their earliest event when
    /// `fallback_to_earliest` is set, and get no trend otherwise.
    PrimaryKind {
        kind: EventKind,
        require_full_coverage: bool,
        fallback_to_earliest: bool,
    },
    /// The group's earliest event, whatever its kind.
    Earliest,
}

impl Default for ReferenceEventPolicy {
    fn default() -> Self {
        ReferenceEventPolicy::PrimaryKind {
            kind: EventKind::StayAtHome,
            require_full_coverage: true,
            fallback_to_earliest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub series_columns: SeriesColumns,
    pub event_columns: EventColumns,
    /// Threshold N: a group's day 0 is the first date its measure exceeds N.
    pub threshold: f64,
    /// When false the measure holds daily increments and is summed per group.
    pub measure_is_cumulative: bool,
    /// Groups removed before any other step.
    pub excluded_groups: Vec<GroupKey>,
    pub relative_day_domain: Option<DayDomain>,
    pub value_domain: Option<ValueDomain>,
    /// Drop model points above the value-domain ceiling.
    pub clip_model_to_value_domain: bool,
    /// Drop events later than the group's last visible observed day.
    pub filter_events_beyond_max_day: bool,
    /// Trailing window (in relative days, ending at the pivot) for the trend fit.
    pub trend_window: i64,
    pub reference_event: ReferenceEventPolicy,
    /// Keep every Nth observed row per group.
    pub sample_every: Option<usize>,
    pub top_k: Option<TopK>,
    /// Also guarantee an observed row at every retained event's relative day.
    pub anchor_every_event_day: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            series_columns: SeriesColumns::default(),
            event_columns: EventColumns::default(),
            threshold: DEFAULT_THRESHOLD,
            measure_is_cumulative: true,
            excluded_groups: Vec::new(),
            relative_day_domain: None,
            value_domain: None,
            clip_model_to_value_domain: false,
            filter_events_beyond_max_day: true,
            trend_window: DEFAULT_TREND_WINDOW,
            reference_event: ReferenceEventPolicy::default(),
            sample_every: None,
            top_k: None,
            anchor_every_event_day: false,
        }
    }
}

impl ChartConfig {
    pub fn with_series_columns(mut self, columns: SeriesColumns) -> Self {
        self.series_columns = columns;
        self
    }

    pub fn with_event_columns(mut self, columns: EventColumns) -> Self {
        self.event_columns = columns;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_measure_is_cumulative(mut self, cumulative: bool) -> Self {
        self.measure_is_cumulative = cumulative;
        self
    }

    pub fn with_excluded_groups<I, K>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<GroupKey>,
    {
        self.excluded_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relative_day_domain(mut self, lo: i64, hi: i64) -> Self {
        self.relative_day_domain = Some(DayDomain::new(lo, hi));
        self
    }

    pub fn with_value_domain(mut self, min: f64, max: f64) -> Self {
        self.value_domain = Some(ValueDomain::new(min, max));
        self
    }

    pub fn with_model_clipping(mut self, clip: bool) -> Self {
        self.clip_model_to_value_domain = clip;
        self
    }

    pub fn with_filter_events_beyond_max_day(mut self, filter: bool) -> Self {
        self.filter_events_beyond_max_day = filter;
        self
    }

    pub fn with_trend_window(mut self, days: i64) -> Self {
        self.trend_window = days;
        self
    }

    pub fn with_reference_event(mut self, policy: ReferenceEventPolicy) -> Self {
        self.reference_event = policy;
        self
    }

    pub fn with_sample_every(mut self, every: usize) -> Self {
        self.sample_every = Some(every);
        self
    }

    pub fn with_top_k<I, K>(mut self, k: usize, always_include: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<GroupKey>,
    {
        self.top_k = Some(TopK {
            k,
            always_include: always_include.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_anchor_every_event_day(mut self, anchor: bool) -> Self {
        self.anchor_every_event_day = anchor;
        self
    }

    /// The ceiling applied to model points, if clipping is on.
    pub fn model_ceiling(&self) -> Option<f64> {
        match (self.clip_model_to_value_domain, self.value_domain) {
            (true, Some(domain)) => Some(domain.max),
            _ => None,
        }
    }

    /// Reject option combinations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(CvisError::InvalidConfig(msg));
        let columns = [
            ("series_columns.group", &self.series_columns.group),
            ("series_columns.date", &self.series_columns.date),
            ("series_columns.measure", &self.series_columns.measure),
            ("event_columns.group", &self.event_columns.group),
            ("event_columns.date", &self.event_columns.date),
            ("event_columns.kind", &self.event_columns.kind),
            ("event_columns.coverage", &self.event_columns.coverage),
        ];
        if let Some((name, _)) = columns.iter().find(|(_, value)| value.trim().is_empty()) {
            return invalid(format!("{name} must name a column"));
        }
        if !self.threshold.is_finite() {
            return invalid(format!("threshold must be finite, got {}", self.threshold));
        }
        if self.trend_window < 1 {
            return invalid(format!("trend_window must be at least 1, got {}", self.trend_window));
        }
        if let Some(domain) = self.relative_day_domain {
            if domain.lo >= domain.hi {
                return invalid(format!(
                    "relative_day_domain needs lo < hi, got [{}, {})",
                    domain.lo, domain.hi
                ));
            }
        }
        if let Some(domain) = self.value_domain {
            if !(domain.min.is_finite() && domain.max.is_finite()) || domain.min >= domain.max {
                return invalid(format!(
                    "value_domain needs finite min < max, got [{}, {}]",
                    domain.min, domain.max
                ));
            }
        }
        if self.clip_model_to_value_domain && self.value_domain.is_none() {
            return invalid("clip_model_to_value_domain requires value_domain".to_string());
        }
        if self.sample_every == Some(0) {
            return invalid("sample_every must be at least 1".to_string());
        }
        if let Some(top_k) = &self.top_k {
            if top_k.k == 0 {
                return invalid("top_k.k must be at least 1".to_string());
            }
        }
        Ok(())
    }
}
