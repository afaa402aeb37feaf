//! Task commands
//!
//! Implements `smap task add|done|undo|delete|list`. Completing a task is
//! what feeds the heatmap: each task counts towards the local day it was
//! completed on.

use crate::commands::{When, completion_time_of_day, generate_unique_id, parse_when, require_name};
use crate::output::format_task_table;
use chrono::{NaiveDate, TimeZone};
use clap::{Args, Subcommand};
use std::fmt;
use studymap_core::{Calendar, CoreError, CoreResult, Task, Workspace};

/// Task subcommands
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task to a project
    Add(AddTask),
    /// Mark a task as done
    Done(CompleteTask),
    /// Mark a done task as open again
    Undo(ReopenTask),
    /// Delete a task
    Delete(DeleteTask),
    /// List tasks
    List(ListTasks),
}

impl TaskCommand {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        match self {
            TaskCommand::Add(cmd) => cmd.execute(workspace, calendar),
            TaskCommand::Done(cmd) => cmd.execute(workspace, calendar).map(|r| r.to_string()),
            TaskCommand::Undo(cmd) => cmd.execute(workspace, calendar),
            TaskCommand::Delete(cmd) => cmd.execute(workspace),
            TaskCommand::List(cmd) => Ok(format_task_table(&cmd.execute(workspace, calendar)?)),
        }
    }
}

/// Add a task to a project
#[derive(Debug, Args)]
pub struct AddTask {
    /// Owning project ID (case-insensitive)
    #[arg(required = true)]
    pub project: String,

    /// Task name
    #[arg(required = true)]
    pub name: String,

    /// Detailed description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Link the task to a deadline or milestone of the same project
    #[arg(short, long)]
    pub event: Option<String>,

    /// Record the task as already completed on this day (YYYY-MM-DD) or at
    /// this instant (RFC 3339)
    #[arg(long = "done-on", value_parser = parse_when)]
    pub done_on: Option<When>,
}

impl AddTask {
    /// Execute the add command, returning the new task's id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if:
    /// - The name is empty
    /// - The project doesn't exist
    /// - The event doesn't exist or belongs to another project
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        let name = require_name(&self.name, "task")?;
        let project_id = self.project.to_lowercase();
        let now = calendar.now();
        let id = generate_unique_id(workspace, &name, now)?;

        let mut task = Task::new(id.clone(), project_id, name, now);
        task.description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        if let Some(event_id) = &self.event {
            task = task.with_event(event_id.to_lowercase());
        }
        if let Some(when) = self.done_on {
            task = task.completed_on(when.resolve(calendar, completion_time_of_day())?);
        }

        workspace.add_task(task)?;
        Ok(id)
    }
}

/// Mark a task as done
#[derive(Debug, Args)]
pub struct CompleteTask {
    /// Task ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// Completion day (YYYY-MM-DD) or instant (RFC 3339); defaults to now
    #[arg(long = "on", value_parser = parse_when)]
    pub on: Option<When>,
}

/// Result of completing a task
#[derive(Debug)]
pub struct CompleteResult {
    pub id: String,
    pub already_done: bool,
    /// Local day the completion counts towards
    pub day: NaiveDate,
}

impl fmt::Display for CompleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.already_done {
            write!(f, "Task '{}' is already done", self.id)
        } else {
            write!(f, "Completed task: {} on {}", self.id, self.day)
        }
    }
}

impl CompleteTask {
    /// Execute the done command.
    ///
    /// An already completed task keeps its original completion time.
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<CompleteResult> {
        let id = self.id.to_lowercase();
        let task = workspace
            .task(&id)
            .ok_or_else(|| CoreError::TaskNotFound {
                task_id: id.clone(),
            })?;

        if task.completed {
            return Ok(CompleteResult {
                day: calendar.local_day(&task.completion_instant()),
                id,
                already_done: true,
            });
        }

        let at = match self.on {
            Some(when) => when.resolve(calendar, completion_time_of_day())?,
            None => calendar.now(),
        };
        workspace.set_task_completed(&id, true, at)?;

        Ok(CompleteResult {
            id,
            already_done: false,
            day: calendar.local_day(&at),
        })
    }
}

/// Mark a done task as open again
#[derive(Debug, Args)]
pub struct ReopenTask {
    /// Task ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

impl ReopenTask {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        let id = self.id.to_lowercase();
        let completed = workspace
            .task(&id)
            .map(|t| t.completed)
            .ok_or_else(|| CoreError::TaskNotFound {
                task_id: id.clone(),
            })?;

        if !completed {
            return Ok(format!("Task '{}' is not done", id));
        }
        workspace.set_task_completed(&id, false, calendar.now())?;
        Ok(format!("Reopened task: {}", id))
    }
}

/// Delete a task
#[derive(Debug, Args)]
pub struct DeleteTask {
    /// Task ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

impl DeleteTask {
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<String> {
        let task = workspace.delete_task(&self.id.to_lowercase())?;
        Ok(format!("Deleted task: {} ({})", task.id, task.name))
    }
}

/// A summary of a task for display in the list
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub completed: bool,
    /// Local day the task was completed on
    pub completed_on: Option<NaiveDate>,
    pub event_id: Option<String>,
}

/// List tasks, newest first
#[derive(Debug, Args)]
pub struct ListTasks {
    /// Only tasks of this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only open tasks
    #[arg(long, conflicts_with = "done")]
    pub open: bool,

    /// Only completed tasks
    #[arg(long)]
    pub done: bool,
}

impl ListTasks {
    /// # Errors
    ///
    /// Returns `CoreError::ProjectNotFound` when filtering by an unknown
    /// project.
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<Vec<TaskSummary>> {
        let project = self.project.as_deref().map(str::to_lowercase);
        if let Some(project_id) = &project
            && workspace.project(project_id).is_none()
        {
            return Err(CoreError::ProjectNotFound {
                project_id: project_id.clone(),
            });
        }

        let mut tasks: Vec<&Task> = workspace
            .tasks()
            .iter()
            .filter(|t| project.as_ref().is_none_or(|p| &t.project_id == p))
            .filter(|t| !self.open || !t.completed)
            .filter(|t| !self.done || t.completed)
            .collect();
        tasks.sort_by(|a, b| b.completion_instant().cmp(&a.completion_instant()));

        Ok(tasks
            .into_iter()
            .map(|t| TaskSummary {
                id: t.id.clone(),
                project_id: t.project_id.clone(),
                name: t.name.clone(),
                completed: t.completed,
                completed_on: t.completed_at.map(|at| calendar.local_day(&at)),
                event_id: t.event_id.clone(),
            })
            .collect())
    }
}
