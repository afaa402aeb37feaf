//! Project commands
//!
//! Implements `smap project add|list|move|toggle|rename|color|delete`.

use crate::commands::{generate_unique_id, require_name};
use crate::output::format_project_table;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand};
use std::fmt;
use studymap_core::{
    Calendar, CoreError, CoreResult, MoveDirection, PROJECTS_LIMIT, Project, Rgb, Visibility,
    Workspace, matcher, ranker,
};

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Add(AddProject),
    /// List all projects in rank order
    List(ListProjects),
    /// Swap a project with its neighbour in the ranking
    Move(MoveProject),
    /// Show a hidden project or hide a visible one
    Toggle(ToggleProject),
    /// Rename a project
    Rename(RenameProject),
    /// Change a project's colour
    Color(RecolorProject),
    /// Delete a project with all its tasks and events
    Delete(DeleteProject),
}

impl ProjectCommand {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &mut Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        match self {
            ProjectCommand::Add(cmd) => cmd
                .execute(workspace, calendar.now())
                .map(|r| r.to_string()),
            ProjectCommand::List(cmd) => {
                Ok(format_project_table(&cmd.execute(workspace, calendar)))
            }
            ProjectCommand::Move(cmd) => cmd.execute(workspace).map(|r| r.to_string()),
            ProjectCommand::Toggle(cmd) => cmd.execute(workspace).map(|r| r.to_string()),
            ProjectCommand::Rename(cmd) => cmd.execute(workspace),
            ProjectCommand::Color(cmd) => cmd.execute(workspace),
            ProjectCommand::Delete(cmd) => cmd.execute(workspace).map(|r| r.to_string()),
        }
    }
}

/// Parse a `#RRGGBB` colour
fn parse_color(s: &str) -> Result<Rgb, String> {
    Rgb::parse(s).map_err(|e| e.to_string())
}

/// Parse a move direction
fn parse_direction(s: &str) -> Result<MoveDirection, String> {
    match s.to_lowercase().as_str() {
        "up" => Ok(MoveDirection::Up),
        "down" => Ok(MoveDirection::Down),
        _ => Err(format!("invalid direction '{}'. Valid values: up, down", s)),
    }
}

/// Create a project
#[derive(Debug, Args)]
pub struct AddProject {
    /// Project name
    #[arg(required = true)]
    pub name: String,

    /// Base colour as #RRGGBB (defaults to blue)
    #[arg(short, long, value_parser = parse_color)]
    pub color: Option<Rgb>,
}

/// Result of creating a project
#[derive(Debug)]
pub struct AddProjectResult {
    pub id: String,
    /// The visible-project cap was reached, so the project starts hidden
    pub hidden: bool,
}

impl fmt::Display for AddProjectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.hidden {
            write!(
                f,
                "\nProject starts hidden: only {} projects can be visible at a time",
                PROJECTS_LIMIT
            )?;
        }
        Ok(())
    }
}

impl AddProject {
    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` for an empty name.
    pub fn execute(
        &self,
        workspace: &mut Workspace,
        now: DateTime<Utc>,
    ) -> CoreResult<AddProjectResult> {
        let name = require_name(&self.name, "project")?;
        let id = generate_unique_id(workspace, &name, now)?;

        let project =
            Project::new(id.clone(), name, now).with_color(self.color.unwrap_or_default());
        let hidden = workspace.add_project(project)?;

        Ok(AddProjectResult { id, hidden })
    }
}

/// A summary of a project for display in the list
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub id: String,
    pub order: i64,
    pub name: String,
    pub color: Rgb,
    pub hidden: bool,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// Local day of the project's deadline
    pub deadline: Option<NaiveDate>,
    pub overdue: bool,
}

/// List projects in rank order
#[derive(Debug, Args)]
pub struct ListProjects {
    /// Show only hidden projects
    #[arg(long)]
    pub hidden: bool,
}

impl ListProjects {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &Workspace,
        calendar: &Calendar<Tz>,
    ) -> Vec<ProjectSummary> {
        ranker::sorted(workspace.projects())
            .into_iter()
            .filter(|p| !self.hidden || p.hidden)
            .map(|p| {
                let tasks = workspace.project_tasks(&p.id);
                ProjectSummary {
                    id: p.id.clone(),
                    order: p.order,
                    name: p.name.clone(),
                    color: p.color,
                    hidden: p.hidden,
                    completed_tasks: tasks.iter().filter(|t| t.completed).count(),
                    total_tasks: tasks.len(),
                    deadline: matcher::project_deadline(workspace.events(), &p.id)
                        .map(|d| calendar.local_day(&d.date)),
                    overdue: matcher::has_overdue_deadline(
                        workspace.events(),
                        &p.id,
                        calendar.now(),
                    ),
                }
            })
            .collect()
    }
}

/// Swap a project with the one ranked directly above or below it
#[derive(Debug, Args)]
pub struct MoveProject {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// Direction (up, down)
    #[arg(required = true, value_parser = parse_direction)]
    pub direction: MoveDirection,
}

/// Result of a move
#[derive(Debug)]
pub struct MoveResult {
    pub id: String,
    pub direction: MoveDirection,
    /// False when the project was already at that end of the ranking
    pub moved: bool,
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.moved, self.direction) {
            (true, MoveDirection::Up) => write!(f, "Moved project up: {}", self.id),
            (true, MoveDirection::Down) => write!(f, "Moved project down: {}", self.id),
            (false, MoveDirection::Up) => write!(f, "Project '{}' is already at the top", self.id),
            (false, MoveDirection::Down) => {
                write!(f, "Project '{}' is already at the bottom", self.id)
            }
        }
    }
}

impl MoveProject {
    /// Execute the move command.
    ///
    /// A move past either end of the ranking changes nothing and is reported
    /// through [`MoveResult::moved`] rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProjectNotFound` for an unknown id.
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<MoveResult> {
        let id = self.id.to_lowercase();
        let moved = match workspace.move_project(&id, self.direction) {
            Ok(()) => true,
            Err(CoreError::AdjacentNotFound { .. }) => false,
            Err(e) => return Err(e),
        };

        Ok(MoveResult {
            id,
            direction: self.direction,
            moved,
        })
    }
}

/// Show a hidden project or hide a visible one
#[derive(Debug, Args)]
pub struct ToggleProject {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

/// Result of a visibility toggle
#[derive(Debug)]
pub struct ToggleResult {
    pub id: String,
    pub visibility: Visibility,
}

impl fmt::Display for ToggleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.visibility {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        };
        write!(f, "Project '{}' is now {}", self.id, state)
    }
}

impl ToggleProject {
    /// Execute the toggle command.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LimitExceeded` when showing the project would put
    /// more than [`PROJECTS_LIMIT`] projects on the heatmap.
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<ToggleResult> {
        let id = self.id.to_lowercase();
        let visibility = workspace.toggle_project_visibility(&id)?;
        Ok(ToggleResult { id, visibility })
    }
}

/// Rename a project
#[derive(Debug, Args)]
pub struct RenameProject {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// New name
    #[arg(required = true)]
    pub name: String,
}

impl RenameProject {
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<String> {
        let id = self.id.to_lowercase();
        let name = require_name(&self.name, "project")?;
        workspace.rename_project(&id, name)?;
        Ok(format!("Renamed project: {}", id))
    }
}

/// Change a project's colour
#[derive(Debug, Args)]
pub struct RecolorProject {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// New colour as #RRGGBB
    #[arg(required = true, value_parser = parse_color)]
    pub color: Rgb,
}

impl RecolorProject {
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<String> {
        let id = self.id.to_lowercase();
        workspace.recolor_project(&id, self.color)?;
        Ok(format!("Project '{}' colour set to {}", id, self.color))
    }
}

/// Delete a project, its tasks and its events
#[derive(Debug, Args)]
pub struct DeleteProject {
    /// Project ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

/// Result of deleting a project
#[derive(Debug)]
pub struct DeleteProjectResult {
    pub id: String,
    pub name: String,
    pub tasks_removed: usize,
    pub events_removed: usize,
}

impl fmt::Display for DeleteProjectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted project: {} ({})", self.id, self.name)?;
        if self.tasks_removed > 0 || self.events_removed > 0 {
            write!(
                f,
                "\nAlso removed {} task(s) and {} event(s)",
                self.tasks_removed, self.events_removed
            )?;
        }
        Ok(())
    }
}

impl DeleteProject {
    pub fn execute(&self, workspace: &mut Workspace) -> CoreResult<DeleteProjectResult> {
        let id = self.id.to_lowercase();
        let tasks_removed = workspace.project_tasks(&id).len();
        let events_removed = matcher::project_events(workspace.events(), &id).len();

        let project = workspace.delete_project(&id)?;

        Ok(DeleteProjectResult {
            id,
            name: project.name,
            tasks_removed,
            events_removed,
        })
    }
}
