//! Heatmap cell aggregation.
//!
//! Joins tasks and events onto every (project, column) pair of a
//! [`DateGrid`]. The result is rebuilt from scratch on every call and holds
//! no references into the inputs, so identical inputs give identical output.

use crate::calendar::Calendar;
use crate::color::Rgb;
use crate::grid::DateGrid;
use crate::matcher;
use crate::models::{Event, EventKind, Project, Task};
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Completed tasks at which a cell reaches full intensity.
pub const INTENSITY_SATURATION: u32 = 10;

/// Alpha of a cell with no completed tasks.
pub const EMPTY_ALPHA: f64 = 0.4;

/// Alpha of a cell with a single completed task is just above this floor.
pub const ACTIVE_ALPHA_FLOOR: f64 = 0.3;

/// Alpha added on top of the floor at full intensity.
pub const ACTIVE_ALPHA_RANGE: f64 = 0.7;

/// Alpha multiplier for days before today.
pub const PAST_ALPHA_FACTOR: f64 = 0.7;

/// Normalized activity of a cell, `min(completed / 10, 1)`.
pub fn intensity(completed_tasks: u32) -> f64 {
    (completed_tasks as f64 / INTENSITY_SATURATION as f64).min(1.0)
}

/// Opacity of a cell's square.
pub fn cell_alpha(completed_tasks: u32, is_past: bool) -> f64 {
    let base = if completed_tasks == 0 {
        EMPTY_ALPHA
    } else {
        ACTIVE_ALPHA_FLOOR + ACTIVE_ALPHA_RANGE * intensity(completed_tasks)
    };
    if is_past {
        base * PAST_ALPHA_FACTOR
    } else {
        base
    }
}

/// Presentation colour of a cell: the project colour at some opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellColor {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl CellColor {
    /// CSS `rgba(...)` form.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

/// Aggregated activity of one project in one grid column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub completed_tasks: u32,
    pub intensity: f64,
    pub events: Vec<Event>,
    pub color: CellColor,
}

impl Cell {
    /// Deadline cells are outlined in the project colour.
    pub fn has_deadline(&self) -> bool {
        self.events.iter().any(|e| e.kind == EventKind::Deadline)
    }

    pub fn has_milestone(&self) -> bool {
        self.events.iter().any(|e| e.kind == EventKind::Milestone)
    }
}

/// Cells of every project, keyed by project id then by column start date.
///
/// Serializes as `{ projectId: { "YYYY-MM-DD": cell } }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct HeatmapData {
    cells: BTreeMap<String, BTreeMap<NaiveDate, Cell>>,
}

impl HeatmapData {
    pub fn cell(&self, project_id: &str, date: NaiveDate) -> Option<&Cell> {
        self.cells.get(project_id)?.get(&date)
    }

    /// One project's row, in column order.
    pub fn project_cells(&self, project_id: &str) -> Option<&BTreeMap<NaiveDate, Cell>> {
        self.cells.get(project_id)
    }

    /// Number of projects with a row of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Build the cells of every project for every column of `grid`.
///
/// A task counts towards the column whose start date is the local day of
/// its completion (`completed_at`, falling back to `created_at`). Events are
/// attached to the column whose start date is their local day.
pub fn aggregate<Tz: TimeZone>(
    projects: &[Project],
    tasks: &[Task],
    events: &[Event],
    grid: &DateGrid,
    calendar: &Calendar<Tz>,
) -> HeatmapData {
    let mut cells = BTreeMap::new();

    for project in projects {
        let completed_by_day = completed_per_day(tasks, &project.id, calendar);
        let project_events = matcher::project_events(events, &project.id);

        let row: BTreeMap<NaiveDate, Cell> = grid
            .dates()
            .iter()
            .map(|&date| {
                let completed_tasks = completed_by_day.get(&date).copied().unwrap_or(0);
                let cell = Cell {
                    completed_tasks,
                    intensity: intensity(completed_tasks),
                    events: matcher::events_on_day(
                        calendar,
                        project_events.iter().copied(),
                        date,
                    ),
                    color: CellColor {
                        rgb: project.color,
                        alpha: cell_alpha(completed_tasks, calendar.is_past(date)),
                    },
                };
                (date, cell)
            })
            .collect();

        trace!(
            "Aggregated {} cells for project {}",
            row.len(),
            project.id
        );
        cells.insert(project.id.clone(), row);
    }

    HeatmapData { cells }
}

fn completed_per_day<Tz: TimeZone>(
    tasks: &[Task],
    project_id: &str,
    calendar: &Calendar<Tz>,
) -> HashMap<NaiveDate, u32> {
    let mut counts = HashMap::new();
    for task in tasks
        .iter()
        .filter(|t| t.project_id == project_id && t.completed)
    {
        *counts
            .entry(calendar.local_day(&task.completion_instant()))
            .or_insert(0) += 1;
    }
    counts
}
