//! Heatmap command
//!
//! Implements `smap heatmap`: fits the column count to a viewport width,
//! builds the date grid around the focus date, aggregates cells for every
//! project and places month labels, then hands the visible rows in rank
//! order to the text renderer (or prints them as JSON).

use crate::commands::parse_date;
use crate::output::format_heatmap;
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use serde::Serialize;
use studymap_core::{
    Calendar, Cell, CoreResult, DateGrid, MonthLabel, NavDirection, Rgb, TimeScale, Workspace,
    cells, fit, labels, matcher, ranker, shift_focus,
};
use tracing::debug;

/// Viewport width assumed when none is given, in CSS pixels
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1440;

/// Parse a time scale, clamping it into `[1, 30]`
fn parse_scale(s: &str) -> Result<TimeScale, String> {
    Ok(TimeScale::parse_clamped(s))
}

/// Render the activity heatmap
#[derive(Debug, Args)]
pub struct HeatmapCommand {
    /// Focus date (YYYY-MM-DD); the grid starts a week before it. Defaults
    /// to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Days per column; out-of-range values are clamped to 1..=30
    #[arg(short, long, value_parser = parse_scale, default_value = "1")]
    pub scale: TimeScale,

    /// Move the focus by this many pages of seven columns (negative goes back)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub page: i32,

    /// Viewport width in pixels used to fit the number of columns
    #[arg(short, long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    pub width: u32,

    /// Lay out as if the sidebar were collapsed (automatic at 768px and below)
    #[arg(long)]
    pub sidebar_collapsed: bool,

    /// Leave out the list of events below the grid
    #[arg(long)]
    pub hide_event_titles: bool,

    /// Print the computed heatmap as JSON
    #[arg(long)]
    pub json: bool,
}

/// One visible project row of the heatmap
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub project_id: String,
    pub name: String,
    pub color: Rgb,
    pub overdue: bool,
    /// Whole days until the deadline; `None` without a deadline or once its
    /// day has passed
    pub deadline_in_days: Option<i64>,
    /// One cell per grid column
    pub cells: Vec<Cell>,
}

/// Everything the renderer needs to draw one heatmap
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub focus: NaiveDate,
    pub today: NaiveDate,
    pub time_scale: u32,
    pub dates: Vec<NaiveDate>,
    pub labels: Vec<MonthLabel>,
    pub rows: Vec<HeatmapRow>,
    /// Names of hidden projects, in rank order
    pub hidden_projects: Vec<String>,
    #[serde(skip)]
    pub show_event_titles: bool,
}

impl HeatmapCommand {
    pub fn execute<Tz: TimeZone>(
        &self,
        workspace: &Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<String> {
        let view = self.build(workspace, calendar)?;
        if self.json {
            Ok(serde_json::to_string_pretty(&view)?)
        } else {
            Ok(format_heatmap(&view))
        }
    }

    /// Run the heatmap pipeline.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when paging or the grid leaves
    /// the supported date range.
    pub fn build<Tz: TimeZone>(
        &self,
        workspace: &Workspace,
        calendar: &Calendar<Tz>,
    ) -> CoreResult<HeatmapView> {
        let collapsed = self.sidebar_collapsed || fit::should_auto_collapse_sidebar(self.width);
        let column_count = fit::fit_viewport(self.width, collapsed);
        let focus = self.focus(calendar.today())?;

        let grid = DateGrid::generate(focus, self.scale.days(), column_count)?;
        let placed = labels::place_for_grid(&grid);
        let data = cells::aggregate(
            workspace.projects(),
            workspace.tasks(),
            workspace.events(),
            &grid,
            calendar,
        );
        debug!(
            "Heatmap: {} columns of {} day(s) from {}, {} labels",
            grid.len(),
            grid.time_scale(),
            focus,
            placed.len()
        );

        let rows = ranker::rows(workspace.projects())
            .into_iter()
            .map(|project| {
                let deadline = matcher::project_deadline(workspace.events(), &project.id);
                HeatmapRow {
                    project_id: project.id.clone(),
                    name: project.name.clone(),
                    color: project.color,
                    overdue: matcher::has_overdue_deadline(
                        workspace.events(),
                        &project.id,
                        calendar.now(),
                    ),
                    deadline_in_days: deadline.and_then(|d| calendar.days_until(&d.date)),
                    cells: data
                        .project_cells(&project.id)
                        .map(|row| row.values().cloned().collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let hidden_projects = ranker::sorted(workspace.projects())
            .into_iter()
            .filter(|p| p.hidden)
            .map(|p| p.name.clone())
            .collect();

        Ok(HeatmapView {
            focus,
            today: calendar.today(),
            time_scale: grid.time_scale(),
            dates: grid.dates().to_vec(),
            labels: placed,
            rows,
            hidden_projects,
            show_event_titles: !self.hide_event_titles,
        })
    }

    /// The focus date after applying `--page`.
    fn focus(&self, today: NaiveDate) -> CoreResult<NaiveDate> {
        let direction = if self.page < 0 {
            NavDirection::Back
        } else {
            NavDirection::Forward
        };

        let mut focus = self.date.unwrap_or(today);
        for _ in 0..self.page.unsigned_abs() {
            focus = shift_focus(focus, direction, self.scale.days())?;
        }
        Ok(focus)
    }
}
