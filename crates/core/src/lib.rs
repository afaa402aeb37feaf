//! Core engine for Studymap
//!
//! Turns projects, tasks and events into the data behind a scrollable
//! contribution heatmap: the column dates, how many columns fit a viewport,
//! where month labels go, per-cell completion counts and colours, and the
//! ranking and visibility of project rows. Also holds the JSON-backed
//! workspace store the CLI edits.

pub mod calendar;
pub mod cells;
pub mod color;
pub mod error;
pub mod fit;
pub mod grid;
pub mod labels;
pub mod matcher;
pub mod models;
pub mod ranker;
pub mod store;

pub use calendar::Calendar;
pub use cells::{Cell, CellColor, HeatmapData, aggregate};
pub use color::{DEFAULT_PROJECT_COLOR, Rgb};
pub use error::{CoreError, CoreResult};
pub use fit::{Breakpoint, LayoutMetrics, RefitTrigger, fit, fit_viewport};
pub use grid::{DateGrid, NavDirection, TimeScale, shift_focus};
pub use labels::MonthLabel;
pub use models::{Event, EventKind, PROJECTS_LIMIT, Project, Task};
pub use ranker::{MoveDirection, Visibility};
pub use store::Workspace;
