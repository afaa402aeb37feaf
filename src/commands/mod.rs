//! CLI commands for Studymap
//!
//! This module contains all subcommand implementations for the smap CLI.
//! Every command works on an in-memory [`Workspace`] and a [`Calendar`];
//! loading and saving the data file is left to the caller.

pub mod event;
pub mod heatmap;
pub mod project;
pub mod task;

pub use event::{
    AddEvent, DeadlineCommand, DeleteEvent, EventCommand, EventSummary, ListEvents, SetDeadline,
};
pub use heatmap::{HeatmapCommand, HeatmapRow, HeatmapView};
pub use project::{
    AddProject, DeleteProject, ListProjects, MoveProject, ProjectCommand, ProjectSummary,
    RecolorProject, RenameProject, ToggleProject,
};
pub use task::{
    AddTask, CompleteTask, DeleteTask, ListTasks, ReopenTask, TaskCommand, TaskSummary,
};

use crate::id::IdGenerator;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Subcommand;
use studymap_core::{Calendar, CoreError, CoreResult, Workspace};

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, rank, hide and delete projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Record study tasks and their completion
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage deadlines and milestones
    #[command(subcommand)]
    Event(EventCommand),

    /// Set a project's deadline
    #[command(subcommand)]
    Deadline(DeadlineCommand),

    /// Render the activity heatmap
    Heatmap(HeatmapCommand),
}

impl Command {
    /// Execute the command against a workspace.
    ///
    /// # Arguments
    ///
    /// * `workspace` - The loaded workspace; mutated in place
    /// * `calendar` - Time zone and current instant
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the command execution fails. The workspace is
    /// left unchanged in that case.
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        match self {
            Command::Project(cmd) => cmd.execute(workspace, calendar),
            Command::Task(cmd) => cmd.execute(workspace, calendar),
            Command::Event(cmd) => cmd.execute(workspace, calendar),
            Command::Deadline(cmd) => cmd.execute(workspace, calendar),
            Command::Heatmap(cmd) => cmd.execute(workspace, calendar),
        }
    }

    /// Whether the workspace must be saved after a successful run.
    pub fn modifies_workspace(&self) -> bool {
        match self {
            Command::Project(cmd) => !matches!(cmd, ProjectCommand::List(_)),
            Command::Task(cmd) => !matches!(cmd, TaskCommand::List(_)),
            Command::Event(cmd) => !matches!(cmd, EventCommand::List(_)),
            Command::Deadline(_) => true,
            Command::Heatmap(_) => false,
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}'. Expected YYYY-MM-DD", s))
}

/// A point in time given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// A calendar day in the local time zone
    Day(NaiveDate),
    /// An exact instant (RFC 3339)
    Instant(DateTime<Utc>),
}

impl When {
    /// Resolve to an instant; a bare day is placed at local `time`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when that local time does not
    /// exist (skipped by a DST change).
    pub fn resolve<Tz: TimeZone>(
        self,
        calendar: &Calendar<Tz>,
        time: NaiveTime,
    ) -> CoreResult<DateTime<Utc>> {
        match self {
            When::Instant(at) => Ok(at),
            When::Day(day) => calendar.instant_at(day, time).ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "{} {} does not exist in the local time zone",
                    day, time
                ))
            }),
        }
    }
}

/// Parse a `YYYY-MM-DD` day or an RFC 3339 timestamp
pub fn parse_when(s: &str) -> Result<When, String> {
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(When::Day(day));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|at| When::Instant(at.with_timezone(&Utc)))
        .map_err(|_| {
            format!(
                "invalid date '{}'. Expected YYYY-MM-DD or an RFC 3339 timestamp",
                s
            )
        })
}

/// Local time a bare event day resolves to, so it stays due all day
pub(crate) fn event_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Local time a bare completion day resolves to
pub(crate) fn completion_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Reject empty or whitespace-only names.
pub(crate) fn require_name(name: &str, what: &str) -> CoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_argument(format!("{} name required", what)));
    }
    Ok(trimmed.to_string())
}

/// Generate an id not used by any project, task or event.
pub(crate) fn generate_unique_id(
    workspace: &Workspace,
    seed: &str,
    now: DateTime<Utc>,
) -> CoreResult<String> {
    let mut generator = IdGenerator::new(seed, now);

    while let Some(id) = generator.next_id() {
        if workspace.project(&id).is_none()
            && workspace.task(&id).is_none()
            && workspace.event(&id).is_none()
        {
            return Ok(id);
        }
    }

    Err(CoreError::invalid_argument(
        "failed to generate unique ID after maximum retries",
    ))
}
