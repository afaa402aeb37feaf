//! Event and deadline commands
//!
//! Implements `smap event add|delete|list` and `smap deadline set`. A bare
//! `YYYY-MM-DD` date places the event at 23:59 local time, so a deadline
//! only becomes overdue once its day is over.

use crate::commands::{When, event_time_of_day, generate_unique_id, parse_when, require_name};
use crate::output::format_event_table;
use chrono::{NaiveDate, TimeZone};
use clap::{Args, Subcommand};
use std::fmt;
use studymap_core::{Calendar, CoreError, CoreResult, Event, EventKind, Workspace, matcher};

/// Event subcommands
#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// Add a deadline or milestone to a project
    Add(AddEvent),
    /// Delete an event; linked tasks are kept
    Delete(DeleteEvent),
    /// List events by date
    List(ListEvents),
}

impl EventCommand {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        match self {
            EventCommand::Add(cmd) => cmd.execute(workspace, calendar),
            EventCommand::Delete(cmd) => cmd.execute(workspace).map(|r| r.to_string()),
            EventCommand::List(cmd) => Ok(format_event_table(&cmd.execute(workspace, calendar)?)),
        }
    }
}

/// Deadline subcommands
#[derive(Debug, Subcommand)]
pub enum DeadlineCommand {
    /// Create or move a project's deadline
    Set(SetDeadline),
}

impl DeadlineCommand {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        match self {
            DeadlineCommand::Set(cmd) => cmd.execute(workspace, calendar).map(|r| r.to_string()),
        }
    }
}

/// Parse an event kind
fn parse_kind(s: &str) -> Result<EventKind, String> {
    match s.to_lowercase().as_str() {
        "deadline" => Ok(EventKind::Deadline),
        "milestone" => Ok(EventKind::Milestone),
        _ => Err(format!(
            "invalid kind '{}'. Valid values: deadline, milestone",
            s
        )),
    }
}

/// Add a deadline or milestone to a project
#[derive(Debug, Args)]
pub struct AddEvent {
    /// Owning project ID (case-insensitive)
    #[arg(required = true)]
    pub project: String,

    /// Event name
    #[arg(required = true)]
    pub name: String,

    /// Day (YYYY-MM-DD) or instant (RFC 3339)
    #[arg(short, long, value_parser = parse_when)]
    pub date: When,

    /// Event kind (deadline, milestone)
    #[arg(short, long, value_parser = parse_kind, default_value = "milestone")]
    pub kind: EventKind,
}

impl AddEvent {
    /// Execute the add command, returning the new event's id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when adding a second deadline to
    /// a project; `smap deadline set` moves the existing one instead.
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        let name = require_name(&self.name, "event")?;
        let project_id = self.project.to_lowercase();

        if self.kind == EventKind::Deadline
            && let Some(existing) = matcher::project_deadline(workspace.events(), &project_id)
        {
            return Err(CoreError::invalid_argument(format!(
                "project '{}' already has deadline '{}'; use `smap deadline set` to move it",
                project_id, existing.id
            )));
        }

        let date = self.date.resolve(calendar, event_time_of_day())?;
        let id = generate_unique_id(workspace, &name, calendar.now())?;
        workspace.add_event(Event::new(id.clone(), project_id, name, date, self.kind))?;
        Ok(id)
    }
}

/// Create or move a project's deadline
#[derive(Debug, Args)]
pub struct SetDeadline {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub project: String,

    /// Day (YYYY-MM-DD) or instant (RFC 3339)
    #[arg(required = true, value_parser = parse_when)]
    pub date: When,

    /// Deadline name
    #[arg(short, long, default_value = "Deadline")]
    pub name: String,
}

/// Result of setting a deadline
#[derive(Debug)]
pub struct SetDeadlineResult {
    pub id: String,
    pub project_id: String,
    /// False when an existing deadline was moved
    pub created: bool,
    /// Local day of the deadline
    pub day: NaiveDate,
}

impl fmt::Display for SetDeadlineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.created { "Set" } else { "Moved" };
        write!(
            f,
            "{} deadline {} for project '{}' to {}",
            verb, self.id, self.project_id, self.day
        )
    }
}

impl SetDeadline {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<SetDeadlineResult> {
        let name = require_name(&self.name, "deadline")?;
        let project_id = self.project.to_lowercase();
        let date = self.date.resolve(calendar, event_time_of_day())?;

        let created = !matcher::has_deadline(workspace.events(), &project_id);
        let candidate_id = generate_unique_id(workspace, &name, calendar.now())?;
        let deadline = Event::new(
            candidate_id,
            project_id.clone(),
            name,
            date,
            EventKind::Deadline,
        );
        let id = workspace.set_deadline(deadline)?;

        Ok(SetDeadlineResult {
            id,
            project_id,
            created,
            day: calendar.local_day(&date),
        })
    }
}

/// Delete an event
#[derive(Debug, Args)]
pub struct DeleteEvent {
    /// Event ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

/// Result of deleting an event
#[derive(Debug)]
pub struct DeleteEventResult {
    pub id: String,
    pub name: String,
    /// Tasks that pointed at the event and were unlinked
    pub unlinked_tasks: usize,
}

impl fmt::Display for DeleteEventResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted event: {} ({})", self.id, self.name)?;
        if self.unlinked_tasks > 0 {
            write!(f, "\nUnlinked {} task(s)", self.unlinked_tasks)?;
        }
        Ok(())
    }
}

impl DeleteEvent {
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<DeleteEventResult> {
        let id = self.id.to_lowercase();
        let unlinked_tasks = workspace
            .tasks()
            .iter()
            .filter(|t| t.event_id.as_deref() == Some(id.as_str()))
            .count();

        let event = workspace.delete_event(&id)?;

        Ok(DeleteEventResult {
            id,
            name: event.name,
            unlinked_tasks,
        })
    }
}

/// A summary of an event for display in the list
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub id: String,
    pub project_id: String,
    pub kind: EventKind,
    /// Local day of the event
    pub day: NaiveDate,
    pub name: String,
    /// Whole days until the event; `None` once its day has passed
    pub days_left: Option<i64>,
}

/// List events in date order
#[derive(Debug, Args)]
pub struct ListEvents {
    /// Only events of this project
    #[arg(short, long)]
    pub project: Option<String>,
}

impl ListEvents {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<Vec<EventSummary>> {
        let events: Vec<&Event> = match self.project.as_deref().map(str::to_lowercase) {
            Some(project_id) => {
                if workspace.project(&project_id).is_none() {
                    return Err(CoreError::ProjectNotFound { project_id });
                }
                matcher::project_events(workspace.events(), &project_id)
            }
            None => workspace.events().iter().collect(),
        };

        let mut summaries: Vec<EventSummary> = events
            .into_iter()
            .map(|e| EventSummary {
                id: e.id.clone(),
                project_id: e.project_id.clone(),
                kind: e.kind,
                day: calendar.local_day(&e.date),
                name: e.name.clone(),
                days_left: calendar.days_until(&e.date),
            })
            .collect();
        summaries.sort_by_key(|s| s.day);
        Ok(summaries)
    }
}
