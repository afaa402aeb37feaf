//! Event and date matching.
//!
//! Two different notions of "when" live here on purpose:
//!
//! - [`matches`] and [`events_on_day`] compare local calendar days and ignore
//!   the time of day.
//! - [`has_overdue_deadline`] compares instants: a deadline due at 23:59 today
//!   is not overdue at 09:00 today.

use crate::calendar::Calendar;
use crate::models::{Event, EventKind, Task};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Whether `instant` falls on the local calendar day `day`.
pub fn same_day<Tz: TimeZone>(
    calendar: &Calendar<Tz>,
    instant: &DateTime<Utc>,
    day: NaiveDate,
) -> bool {
    calendar.local_day(instant) == day
}

/// Whether an event falls on the local calendar day `day`.
pub fn matches<Tz: TimeZone>(calendar: &Calendar<Tz>, event: &Event, day: NaiveDate) -> bool {
    same_day(calendar, &event.date, day)
}

/// Events belonging to one project, in their original order.
pub fn project_events<'a>(events: &'a [Event], project_id: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.project_id == project_id).collect()
}

/// Events from `events` that fall on `day`, cloned in their original order.
pub fn events_on_day<'a, Tz: TimeZone>(
    calendar: &Calendar<Tz>,
    events: impl IntoIterator<Item = &'a Event>,
    day: NaiveDate,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|e| matches(calendar, e, day))
        .cloned()
        .collect()
}

/// The first deadline event of a project, if any.
pub fn project_deadline<'a>(events: &'a [Event], project_id: &str) -> Option<&'a Event> {
    events
        .iter()
        .find(|e| e.project_id == project_id && e.kind == EventKind::Deadline)
}

/// All milestone events of a project.
///
/// Not used by the CLI; front ends draw milestone outlines from it.
pub fn project_milestones<'a>(events: &'a [Event], project_id: &str) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| e.project_id == project_id && e.kind == EventKind::Milestone)
        .collect()
}

pub fn has_deadline(events: &[Event], project_id: &str) -> bool {
    project_deadline(events, project_id).is_some()
}

/// True iff the project's deadline instant is strictly before `now`.
///
/// Only the first deadline of the project is considered.
pub fn has_overdue_deadline(events: &[Event], project_id: &str, now: DateTime<Utc>) -> bool {
    project_deadline(events, project_id).is_some_and(|deadline| deadline.date < now)
}

/// A task may only be attached to an event of its own project.
pub fn validate_task_event_assignment(task: &Task, event: Option<&Event>) -> bool {
    event.is_none_or(|event| event.project_id == task.project_id)
}
