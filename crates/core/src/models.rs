//! Data models for Studymap
//!
//! Projects own tasks and events. Tasks may point at one event of the same
//! project through a weak `event_id` reference.

use crate::color::Rgb;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of projects that may be visible in the heatmap at once.
pub const PROJECTS_LIMIT: usize = 8;

/// A study project, shown as one heatmap row when visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Base colour of the project's heatmap cells
    #[serde(default)]
    pub color: Rgb,

    /// Whether the project is left out of the heatmap
    #[serde(default)]
    pub hidden: bool,

    /// Rank among all projects (hidden ones included)
    #[serde(default)]
    pub order: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a visible project at order 0 with the default colour.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: Rgb::default(),
            hidden: false,
            order: 0,
            created_at,
        }
    }

    /// Set the colour of this project
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Set the rank of this project
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set whether this project is hidden
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// A task belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// Task name
    pub name: String,

    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// When the task was marked completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Optional event this task works towards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    /// Create an open task
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
            completed: false,
            created_at,
            completed_at: None,
            event_id: None,
            description: None,
        }
    }

    /// Mark this task completed at the given instant
    pub fn completed_on(mut self, at: DateTime<Utc>) -> Self {
        self.completed = true;
        self.completed_at = Some(at);
        self
    }

    /// Attach this task to an event
    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// The instant that counts towards the heatmap.
    ///
    /// Older records carry no `completed_at`; their creation time is used
    /// instead.
    pub fn completion_instant(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.created_at)
    }
}

/// Kind of a project event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Final due date of a project; at most one per project by convention
    Deadline,
    /// Intermediate checkpoint
    Milestone,
}

impl EventKind {
    /// Returns the string representation used in the data file
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deadline => "deadline",
            EventKind::Milestone => "milestone",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated deadline or milestone of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// Event name
    pub name: String,

    /// When the event happens
    #[serde(alias = "dueDate")]
    pub date: DateTime<Utc>,

    /// Deadline or milestone
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
        date: DateTime<Utc>,
        kind: EventKind,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
            date,
            kind,
        }
    }

    pub fn is_deadline(&self) -> bool {
        self.kind == EventKind::Deadline
    }
}
