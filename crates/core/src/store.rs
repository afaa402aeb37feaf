//! In-memory workspace of projects, tasks and events.
//!
//! Stands in for the CRUD backend: it owns the three collections, enforces
//! ownership rules (cascading project deletes, unlinking tasks from deleted
//! events) and persists everything to a single JSON file.
//!
//! Project `order` values are kept as a dense `0..n` sequence. Loading a file
//! keeps the persisted ranking and only closes gaps or breaks ties.

use crate::color::Rgb;
use crate::error::{CoreError, CoreResult};
use crate::matcher;
use crate::models::{Event, EventKind, Project, Task};
use crate::ranker::{self, MoveDirection, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// All entities of one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    events: Vec<Event>,
}

impl Workspace {
    /// Build a workspace from existing collections, repairing project order.
    pub fn from_parts(projects: Vec<Project>, tasks: Vec<Task>, events: Vec<Event>) -> Self {
        let mut workspace = Self {
            projects,
            tasks,
            events,
        };
        workspace.repair_order();
        workspace
    }

    /// Load a workspace from a JSON data file.
    ///
    /// A missing file yields an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Io` if the file cannot be read and
    /// `CoreError::Json` if it is not a valid workspace document.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            debug!("No data file at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut workspace: Workspace = serde_json::from_str(&raw)?;
        workspace.repair_order();

        debug!(
            "Loaded {} projects, {} tasks, {} events from {}",
            workspace.projects.len(),
            workspace.tasks.len(),
            workspace.events.len(),
            path.display()
        );
        Ok(workspace)
    }

    /// Write the workspace to a JSON data file, creating parent directories.
    ///
    /// The JSON goes to a sibling temp file first and is renamed over `path`,
    /// so an interrupted save leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CreateDirectory` or `CoreError::Io` on filesystem
    /// failures.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let staging = staging_path(path);
        std::fs::write(&staging, json).map_err(|e| CoreError::Io {
            path: staging.clone(),
            source: e,
        })?;
        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(CoreError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
        debug!("Saved workspace to {}", path.display());
        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Tasks of one project, in insertion order.
    pub fn project_tasks(&self, project_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    /// Add a project at the bottom of the ranking.
    ///
    /// The project starts hidden when the visible-project cap is already
    /// reached. Returns whether that happened.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the id is already taken.
    pub fn add_project(&mut self, mut project: Project) -> CoreResult<bool> {
        if self.project(&project.id).is_some() {
            return Err(CoreError::invalid_argument(format!(
                "project id '{}' already exists",
                project.id
            )));
        }

        let auto_hidden = ranker::assign_default_hidden(&self.projects);
        project.hidden = auto_hidden;
        project.order = self.projects.len() as i64;

        debug!(
            "Creating project: {} ({}), hidden: {}",
            project.id, project.name, auto_hidden
        );
        self.projects.push(project);
        Ok(auto_hidden)
    }

    pub fn rename_project(&mut self, id: &str, name: impl Into<String>) -> CoreResult<()> {
        let project = self.project_mut(id)?;
        project.name = name.into();
        debug!("Renamed project: {}", id);
        Ok(())
    }

    pub fn recolor_project(&mut self, id: &str, color: Rgb) -> CoreResult<()> {
        self.project_mut(id)?.color = color;
        debug!("Recolored project: {} to {}", id, color);
        Ok(())
    }

    /// Delete a project together with its tasks and events.
    pub fn delete_project(&mut self, id: &str) -> CoreResult<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProjectNotFound {
                project_id: id.to_string(),
            })?;

        let removed = self.projects.remove(idx);
        let tasks_before = self.tasks.len();
        let events_before = self.events.len();
        self.tasks.retain(|t| t.project_id != id);
        self.events.retain(|e| e.project_id != id);
        ranker::normalize_order(&mut self.projects);

        debug!(
            "Deleted project: {} with {} tasks and {} events",
            id,
            tasks_before - self.tasks.len(),
            events_before - self.events.len()
        );
        Ok(removed)
    }

    /// Swap a project with its neighbour in the ranking.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AdjacentNotFound` when the project is already at
    /// that end of the ranking.
    pub fn move_project(&mut self, id: &str, direction: MoveDirection) -> CoreResult<()> {
        ranker::move_adjacent(&mut self.projects, id, direction)?;
        debug!("Moved project: {} {:?}", id, direction);
        Ok(())
    }

    /// Show a hidden project or hide a visible one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LimitExceeded` when showing would exceed the cap.
    pub fn toggle_project_visibility(&mut self, id: &str) -> CoreResult<Visibility> {
        let visibility = ranker::toggle_visibility(&mut self.projects, id)?;
        debug!("Project {} is now {:?}", id, visibility);
        Ok(visibility)
    }

    /// Add a task to an existing project.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProjectNotFound`, `CoreError::EventNotFound` or
    /// `CoreError::EventProjectMismatch` when the references don't hold, and
    /// `CoreError::InvalidArgument` for a duplicate id.
    pub fn add_task(&mut self, task: Task) -> CoreResult<()> {
        self.require_project(&task.project_id)?;
        if self.task(&task.id).is_some() {
            return Err(CoreError::invalid_argument(format!(
                "task id '{}' already exists",
                task.id
            )));
        }
        if let Some(event_id) = &task.event_id {
            let event = self.event(event_id).ok_or_else(|| CoreError::EventNotFound {
                event_id: event_id.clone(),
            })?;
            if !matcher::validate_task_event_assignment(&task, Some(event)) {
                return Err(CoreError::EventProjectMismatch {
                    event_id: event_id.clone(),
                    project_id: task.project_id.clone(),
                });
            }
        }

        debug!("Creating task: {} with name: {}", task.id, task.name);
        self.tasks.push(task);
        Ok(())
    }

    /// Mark a task done (stamping `completed_at`) or open again (clearing it).
    pub fn set_task_completed(
        &mut self,
        id: &str,
        completed: bool,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound {
                task_id: id.to_string(),
            })?;

        task.completed = completed;
        task.completed_at = completed.then_some(at);
        debug!("Task {} completed: {}", id, completed);
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> CoreResult<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound {
                task_id: id.to_string(),
            })?;
        debug!("Deleting task: {}", id);
        Ok(self.tasks.remove(idx))
    }

    /// Add a deadline or milestone to an existing project.
    pub fn add_event(&mut self, event: Event) -> CoreResult<()> {
        self.require_project(&event.project_id)?;
        if self.event(&event.id).is_some() {
            return Err(CoreError::invalid_argument(format!(
                "event id '{}' already exists",
                event.id
            )));
        }
        debug!("Creating {} event: {} for project {}", event.kind, event.id, event.project_id);
        self.events.push(event);
        Ok(())
    }

    /// Create the project's deadline, or move its existing one.
    ///
    /// When the project already has a deadline, its name and date are
    /// updated and its id returned; otherwise `deadline` is inserted as a
    /// deadline event.
    pub fn set_deadline(&mut self, deadline: Event) -> CoreResult<String> {
        self.require_project(&deadline.project_id)?;

        let existing = self
            .events
            .iter_mut()
            .find(|e| e.project_id == deadline.project_id && e.kind == EventKind::Deadline);

        if let Some(existing) = existing {
            existing.name = deadline.name;
            existing.date = deadline.date;
            debug!("Updated deadline: {}", existing.id);
            return Ok(existing.id.clone());
        }

        let id = deadline.id.clone();
        self.add_event(Event {
            kind: EventKind::Deadline,
            ..deadline
        })?;
        Ok(id)
    }

    /// Delete an event. Tasks pointing at it are kept and unlinked.
    pub fn delete_event(&mut self, id: &str) -> CoreResult<Event> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::EventNotFound {
                event_id: id.to_string(),
            })?;

        let removed = self.events.remove(idx);
        let mut unlinked = 0;
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.event_id.as_deref() == Some(id))
        {
            task.event_id = None;
            unlinked += 1;
        }
        debug!("Deleted event: {}, unlinked {} tasks", id, unlinked);
        Ok(removed)
    }

    fn project_mut(&mut self, id: &str) -> CoreResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProjectNotFound {
                project_id: id.to_string(),
            })
    }

    fn require_project(&self, id: &str) -> CoreResult<()> {
        self.project(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::ProjectNotFound {
                project_id: id.to_string(),
            })
    }

    fn repair_order(&mut self) {
        if ranker::normalize_order(&mut self.projects) {
            warn!("Project order had gaps or duplicates; renumbered by existing rank");
        }
    }
}

/// `data.json` is staged as `.data.json.tmp` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

static_assertions::assert_impl_all!(Workspace: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PROJECTS_LIMIT;
    use chrono::TimeZone;
    use std::env;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn project(id: &str) -> Project {
        Project::new(id, format!("Project {}", id), at(2024, 1, 1, 0))
    }

    fn milestone(id: &str, project_id: &str) -> Event {
        Event::new(id, project_id, "Chapter 3", at(2024, 3, 5, 9), EventKind::Milestone)
    }

    fn temp_file(name: &str) -> std::path::PathBuf {
        env::temp_dir()
            .join(format!(
                "smap-store-test-{}-{:?}-{}",
                std::process::id(),
                std::thread::current().id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ))
            .join(name)
    }

    fn seeded() -> Workspace {
        let mut ws = Workspace::default();
        ws.add_project(project("p1")).unwrap();
        ws.add_project(project("p2")).unwrap();
        ws.add_event(milestone("e1", "p1")).unwrap();
        ws.add_task(Task::new("t1", "p1", "Read", at(2024, 3, 1, 9)).with_event("e1"))
            .unwrap();
        ws.add_task(Task::new("t2", "p1", "Write", at(2024, 3, 1, 9)))
            .unwrap();
        ws.add_task(Task::new("t3", "p2", "Review", at(2024, 3, 1, 9)))
            .unwrap();
        ws
    }

    #[test]
    fn test_add_project_appends_to_ranking() {
        let ws = seeded();
        let orders: Vec<(&str, i64)> = ws
            .projects()
            .iter()
            .map(|p| (p.id.as_str(), p.order))
            .collect();
        assert_eq!(orders, vec![("p1", 0), ("p2", 1)]);
    }

    #[test]
    fn test_add_project_beyond_limit_starts_hidden() {
        let mut ws = Workspace::default();
        for i in 0..PROJECTS_LIMIT {
            assert!(!ws.add_project(project(&format!("p{}", i))).unwrap());
        }
        assert!(ws.add_project(project("extra")).unwrap());
        assert!(ws.project("extra").unwrap().hidden);
        assert_eq!(ranker::visible_count(ws.projects()), PROJECTS_LIMIT);
    }

    #[test]
    fn test_add_project_rejects_duplicate_id() {
        let mut ws = seeded();
        assert!(matches!(
            ws.add_project(project("p1")),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_delete_project_cascades_and_closes_gap() {
        let mut ws = seeded();
        ws.add_project(project("p3")).unwrap();

        let removed = ws.delete_project("p1").unwrap();
        assert_eq!(removed.id, "p1");
        assert!(ws.tasks().iter().all(|t| t.project_id != "p1"));
        assert!(ws.events().is_empty());
        assert_eq!(ws.tasks().len(), 1);

        let orders: Vec<(&str, i64)> = ws
            .projects()
            .iter()
            .map(|p| (p.id.as_str(), p.order))
            .collect();
        assert_eq!(orders, vec![("p2", 0), ("p3", 1)]);
    }

    #[test]
    fn test_delete_event_unlinks_tasks() {
        let mut ws = seeded();
        ws.delete_event("e1").unwrap();
        let task = ws.task("t1").unwrap();
        assert_eq!(task.event_id, None);
        assert_eq!(ws.tasks().len(), 3);
    }

    #[test]
    fn test_add_task_validates_references() {
        let mut ws = seeded();
        ws.add_event(milestone("e2", "p2")).unwrap();

        assert!(matches!(
            ws.add_task(Task::new("x", "nope", "Orphan", at(2024, 3, 1, 9))),
            Err(CoreError::ProjectNotFound { .. })
        ));
        assert!(matches!(
            ws.add_task(Task::new("x", "p1", "Cross", at(2024, 3, 1, 9)).with_event("e2")),
            Err(CoreError::EventProjectMismatch { .. })
        ));
        assert!(matches!(
            ws.add_task(Task::new("x", "p1", "Ghost", at(2024, 3, 1, 9)).with_event("zz")),
            Err(CoreError::EventNotFound { .. })
        ));
        assert!(matches!(
            ws.add_task(Task::new("t1", "p1", "Dup", at(2024, 3, 1, 9))),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_set_task_completed_stamps_and_clears() {
        let mut ws = seeded();
        ws.set_task_completed("t2", true, at(2024, 3, 5, 17)).unwrap();
        let task = ws.task("t2").unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(at(2024, 3, 5, 17)));

        ws.set_task_completed("t2", false, at(2024, 3, 6, 8)).unwrap();
        let task = ws.task("t2").unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);

        assert!(matches!(
            ws.set_task_completed("zz", true, at(2024, 3, 6, 8)),
            Err(CoreError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_set_deadline_creates_then_updates() {
        let mut ws = seeded();
        let first = Event::new("d1", "p2", "Exam", at(2024, 6, 1, 9), EventKind::Milestone);
        assert_eq!(ws.set_deadline(first).unwrap(), "d1");
        assert!(ws.event("d1").unwrap().is_deadline());

        let moved = Event::new("d2", "p2", "Resit", at(2024, 7, 1, 9), EventKind::Deadline);
        assert_eq!(ws.set_deadline(moved).unwrap(), "d1");
        assert!(ws.event("d2").is_none());
        let deadline = ws.event("d1").unwrap();
        assert_eq!(deadline.name, "Resit");
        assert_eq!(deadline.date, at(2024, 7, 1, 9));
    }

    #[test]
    fn test_move_and_toggle_through_workspace() {
        let mut ws = seeded();
        ws.move_project("p2", MoveDirection::Up).unwrap();
        assert_eq!(ws.project("p2").unwrap().order, 0);
        assert!(matches!(
            ws.move_project("p2", MoveDirection::Up),
            Err(CoreError::AdjacentNotFound { .. })
        ));

        assert_eq!(ws.toggle_project_visibility("p1").unwrap(), Visibility::Hidden);
        assert_eq!(ws.toggle_project_visibility("p1").unwrap(), Visibility::Visible);
    }

    #[test]
    fn test_from_parts_keeps_persisted_ranking() {
        let projects = vec![
            project("a").with_order(7),
            project("b").with_order(3),
            project("c").with_order(3),
        ];
        let ws = Workspace::from_parts(projects, Vec::new(), Vec::new());
        let ranked: Vec<&str> = ranker::sorted(ws.projects())
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "c", "a"]);
        assert_eq!(ws.project("a").unwrap().order, 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_file("data.json");
        let mut ws = seeded();
        ws.move_project("p2", MoveDirection::Up).unwrap();
        ws.save(&path).unwrap();

        let loaded = Workspace::load(&path).unwrap();
        assert_eq!(loaded, ws);
        assert_eq!(loaded.project("p2").unwrap().order, 0);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let path = temp_file("data.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ half written").unwrap();
        // stale staging file from an interrupted run
        std::fs::write(staging_path(&path), "garbage").unwrap();

        let ws = seeded();
        ws.save(&path).unwrap();

        assert_eq!(Workspace::load(&path).unwrap(), ws);
        assert!(!staging_path(&path).exists());
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let path = Path::new("/tmp/studymap/data.json");
        assert_eq!(
            staging_path(path),
            PathBuf::from("/tmp/studymap/.data.json.tmp")
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let ws = Workspace::load(&temp_file("missing.json")).unwrap();
        assert!(ws.projects().is_empty());
    }

    #[test]
    fn test_load_malformed_file() {
        let path = temp_file("broken.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Workspace::load(&path), Err(CoreError::Json(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
