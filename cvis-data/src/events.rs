//! Event alignment: place intervention events on each group's relative-day
//! axis and order them for marker stacking.

use crate::alignment::relative_day;
use crate::config::DayDomain;
use chrono::NaiveDate;
use cvis_core::event::{Coverage, EventTable, InterventionEvent};
use cvis_core::event_kind::EventKind;
use cvis_core::GroupKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// An intervention event on its group's relative-day axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedEvent {
    pub group: GroupKey,
    pub event_date: NaiveDate,
    pub kind: EventKind,
    pub coverage: Coverage,
    pub relative_day: i64,
    /// Zero-based position within the group by (relative_day, table order).
    pub event_order: usize,
    /// Zero-based position among the group's events on the same day, full
    /// coverage first.
    pub stack_index: usize,
}

/// Per-group aligned events, each vector in `event_order`.
pub type GroupedEvents = BTreeMap<GroupKey, Vec<AlignedEvent>>;

/// Align `table` against the per-group anchors.
///
/// Events for groups without an anchor are dropped (inner join). With a
/// day domain only events strictly inside it survive. When
/// `filter_beyond_max` is set, events later than the group's entry in
/// `max_days` are dropped as well.
pub fn align_events(
    table: &EventTable,
    anchors: &BTreeMap<GroupKey, NaiveDate>,
    max_days: &BTreeMap<GroupKey, i64>,
    domain: Option<DayDomain>,
    filter_beyond_max: bool,
) -> GroupedEvents {
    // (table position, relative day, event)
    let mut staged: BTreeMap<GroupKey, Vec<(usize, i64, &InterventionEvent)>> = BTreeMap::new();
    let mut unmatched = 0usize;
    let mut outside = 0usize;
    for (position, event) in table.events.iter().enumerate() {
        let Some(anchor) = anchors.get(&event.group) else {
            unmatched += 1;
            continue;
        };
        let Some(day) = relative_day(*anchor, event.event_date) else {
            continue;
        };
        if domain.is_some_and(|domain| !domain.strictly_contains(day)) {
            outside += 1;
            continue;
        }
        if filter_beyond_max && max_days.get(&event.group).is_some_and(|max| day > *max) {
            outside += 1;
            continue;
        }
        staged
            .entry(event.group.clone())
            .or_default()
            .push((position, day, event));
    }

    let mut grouped = GroupedEvents::new();
    let mut kept = 0usize;
    for (group, mut events) in staged {
        events.sort_by_key(|(position, day, _)| (*day, *position));
        let mut aligned: Vec<AlignedEvent> = events
            .iter()
            .enumerate()
            .map(|(event_order, (_, day, event))| AlignedEvent {
                group: group.clone(),
                event_date: event.event_date,
                kind: event.kind.clone(),
                coverage: event.coverage,
                relative_day: *day,
                event_order,
                stack_index: 0,
            })
            .collect();
        assign_stack_indexes(&mut aligned);
        kept += aligned.len();
        grouped.insert(group, aligned);
    }
    log::info!(
        "[CVIS] events: kept {} of {} events ({} without a series, {} outside the domain)",
        kept,
        table.len(),
        unmatched,
        outside
    );
    grouped
}

/// Number the events sharing a relative day, full coverage first and then
/// `event_order`. Expects `events` in `event_order`.
fn assign_stack_indexes(events: &mut [AlignedEvent]) {
    let mut start = 0;
    while start < events.len() {
        let day = events[start].relative_day;
        let end = events[start..]
            .iter()
            .position(|event| event.relative_day != day)
            .map_or(events.len(), |offset| start + offset);
        let mut same_day: Vec<usize> = (start..end).collect();
        same_day.sort_by_key(|&i| (!events[i].coverage.is_full(), events[i].event_order));
        for (stack_index, i) in same_day.into_iter().enumerate() {
            events[i].stack_index = stack_index;
        }
        start = end;
    }
}
