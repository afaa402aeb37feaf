//! Test infrastructure for integration tests
//!
//! Provides an isolated data file per test plus builders for the command
//! structs. Each test gets its own temp directory, removed on drop.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::path::PathBuf;
use studymap::commands::When;
use studymap::{AddEvent, AddProject, AddTask, CompleteTask, HeatmapCommand, SetDeadline};
use studymap_core::{Calendar, EventKind, TimeScale, Workspace};

/// Test context holding a workspace, the file it is saved to, and a fixed
/// clock
pub struct TestContext {
    pub workspace: Workspace,
    pub calendar: Calendar<Utc>,
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context at 2024-03-10 09:00 UTC.
    ///
    /// Each call creates a uniquely named temp directory using process ID,
    /// thread ID, and nanosecond timestamp to guarantee isolation.
    pub fn new() -> Self {
        Self::at(at(2024, 3, 10, 9))
    }

    /// Create a new test context with the clock set to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "smap-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        Self {
            workspace: Workspace::default(),
            calendar: Calendar::new(Utc, now),
            temp_dir,
        }
    }

    /// Path of this context's data file.
    pub fn data_path(&self) -> PathBuf {
        self.temp_dir.join("data.json")
    }

    /// Save the workspace and load it back, as a separate CLI run would.
    pub fn reload(&mut self) {
        self.workspace.save(&self.data_path()).unwrap();
        self.workspace = Workspace::load(&self.data_path()).unwrap();
    }

    /// Create a project and return its id.
    pub fn project(&mut self, name: &str) -> String {
        add_project_cmd(name)
            .execute(&mut self.workspace, self.calendar.now())
            .unwrap()
            .id
    }

    /// Add a task completed on `day` and return its id.
    pub fn completed_task(&mut self, project: &str, name: &str, day: NaiveDate) -> String {
        let id = add_task_cmd(project, name)
            .execute(&mut self.workspace, &self.calendar)
            .unwrap();
        CompleteTask {
            id: id.clone(),
            on: Some(When::Day(day)),
        }
        .execute(&mut self.workspace, &self.calendar)
        .unwrap();
        id
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Auto-cleanup on drop
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

/// Create an AddProject with the default colour.
pub fn add_project_cmd(name: &str) -> AddProject {
    AddProject {
        name: name.to_string(),
        color: None,
    }
}

/// Create an AddTask with no optional fields.
pub fn add_task_cmd(project: &str, name: &str) -> AddTask {
    AddTask {
        project: project.to_string(),
        name: name.to_string(),
        description: None,
        event: None,
        done_on: None,
    }
}

/// Create an AddEvent for a whole local day.
pub fn add_event_cmd(project: &str, name: &str, date: NaiveDate, kind: EventKind) -> AddEvent {
    AddEvent {
        project: project.to_string(),
        name: name.to_string(),
        date: When::Day(date),
        kind,
    }
}

/// Create a SetDeadline for a whole local day.
pub fn set_deadline_cmd(project: &str, date: NaiveDate) -> SetDeadline {
    SetDeadline {
        project: project.to_string(),
        date: When::Day(date),
        name: "Deadline".to_string(),
    }
}

/// Create a HeatmapCommand focused on `focus` with default layout.
pub fn heatmap_cmd(focus: NaiveDate) -> HeatmapCommand {
    HeatmapCommand {
        date: Some(focus),
        scale: TimeScale::default(),
        page: 0,
        width: 1440,
        sidebar_collapsed: false,
        hide_event_titles: false,
        json: false,
    }
}
