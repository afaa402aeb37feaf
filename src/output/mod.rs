//! Output formatting module for Studymap
//!
//! Aligned tables for the list commands and the text rendering of the
//! heatmap.

use crate::commands::{EventSummary, HeatmapRow, HeatmapView, ProjectSummary, TaskSummary};
use chrono::{Datelike, Days, NaiveDate};
use studymap_core::Cell;

/// Maximum width for name columns before truncation
const MAX_NAME_WIDTH: usize = 30;

/// Width of the project name column in the heatmap
const ROW_LABEL_WIDTH: usize = 18;

/// Characters per heatmap column: glyph, event marker, today marker
const CELL_WIDTH: usize = 3;

/// Truncate a string to the specified maximum width in characters, adding
/// an ellipsis if needed.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    }
}

/// Render rows under headers with every column padded to its widest cell.
///
/// ```text
/// ID      Name
/// ------  --------
/// a1b2c3  Algebra
/// ```
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(line(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        lines.push(line(row.clone()));
    }
    lines.join("\n")
}

/// Format projects into an aligned table, in the order given.
pub fn format_project_table(projects: &[ProjectSummary]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            let deadline = match (p.deadline, p.overdue) {
                (Some(day), true) => format!("{} (overdue)", day),
                (Some(day), false) => day.to_string(),
                (None, _) => "-".to_string(),
            };
            vec![
                p.order.to_string(),
                p.id.clone(),
                truncate(&p.name, MAX_NAME_WIDTH),
                p.color.to_string(),
                if p.hidden { "no" } else { "yes" }.to_string(),
                format!("{}/{}", p.completed_tasks, p.total_tasks),
                deadline,
            ]
        })
        .collect();

    render_table(
        &["#", "ID", "Name", "Color", "Visible", "Done", "Deadline"],
        &rows,
    )
}

/// Format tasks into an aligned table.
pub fn format_task_table(tasks: &[TaskSummary]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.project_id.clone(),
                if t.completed { "done" } else { "open" }.to_string(),
                t.completed_on.map_or("-".to_string(), |d| d.to_string()),
                t.event_id.clone().unwrap_or_else(|| "-".to_string()),
                truncate(&t.name, MAX_NAME_WIDTH),
            ]
        })
        .collect();

    render_table(
        &["ID", "Project", "Status", "Completed", "Event", "Name"],
        &rows,
    )
}

/// Format events into an aligned table.
pub fn format_event_table(events: &[EventSummary]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                e.project_id.clone(),
                e.kind.to_string(),
                e.day.to_string(),
                format_days_left(e.days_left),
                truncate(&e.name, MAX_NAME_WIDTH),
            ]
        })
        .collect();

    render_table(&["ID", "Project", "Kind", "Date", "Due", "Name"], &rows)
}

fn format_days_left(days_left: Option<i64>) -> String {
    match days_left {
        None => "passed".to_string(),
        Some(0) => "today".to_string(),
        Some(1) => "in 1 day".to_string(),
        Some(n) => format!("in {} days", n),
    }
}

/// Shade of a cell by intensity.
fn glyph(cell: &Cell) -> char {
    match cell.intensity {
        i if i <= 0.0 => '·',
        i if i <= 0.3 => '░',
        i if i <= 0.6 => '▒',
        i if i < 1.0 => '▓',
        _ => '█',
    }
}

/// `D` for a deadline, `M` for a milestone, blank otherwise.
fn event_marker(cell: &Cell) -> char {
    if cell.has_deadline() {
        'D'
    } else if cell.has_milestone() {
        'M'
    } else {
        ' '
    }
}

/// A header line with `text` written at the start of each given column.
fn header_line(width: usize, placements: &[(usize, String)]) -> String {
    let mut buf = vec![' '; ROW_LABEL_WIDTH + 2 + width * CELL_WIDTH];
    for (column, text) in placements {
        let start = ROW_LABEL_WIDTH + 2 + column * CELL_WIDTH;
        for (offset, ch) in text.chars().enumerate() {
            if let Some(slot) = buf.get_mut(start + offset) {
                *slot = ch;
            }
        }
    }
    buf.into_iter().collect::<String>().trim_end().to_string()
}

fn column_contains(start: NaiveDate, time_scale: u32, day: NaiveDate) -> bool {
    start
        .checked_add_days(Days::new(time_scale as u64))
        .is_some_and(|end| start <= day && day < end)
}

fn format_row(row: &HeatmapRow, dates: &[NaiveDate], today: NaiveDate, time_scale: u32) -> String {
    let mut line = format!(
        "{:<w$}{} ",
        truncate(&row.name, ROW_LABEL_WIDTH),
        if row.overdue { '!' } else { ' ' },
        w = ROW_LABEL_WIDTH
    );
    for (cell, &start) in row.cells.iter().zip(dates) {
        line.push(glyph(cell));
        line.push(event_marker(cell));
        line.push(if column_contains(start, time_scale, today) {
            '<'
        } else {
            ' '
        });
    }

    let mut line = line.trim_end().to_string();
    match (row.overdue, row.deadline_in_days) {
        (true, _) => line.push_str("  deadline passed"),
        (false, Some(0)) => line.push_str("  due today"),
        (false, Some(n)) => line.push_str(&format!("  due in {}d", n)),
        (false, None) => {}
    }
    line
}

/// Render the heatmap as text.
///
/// Produces output in the format:
/// ```text
///                     Mar
///                     01 02 03 04 05 06
/// Algebra           ! ·  ·  ·  ·  ▒D<·  deadline passed
/// ```
///
/// A year line is added above the month line when a January label is
/// shown. Below the grid come the events in view (unless titles are
/// hidden) and the names of hidden projects.
pub fn format_heatmap(view: &HeatmapView) -> String {
    let width = view.dates.len();
    let mut lines = Vec::new();

    let years: Vec<(usize, String)> = view
        .labels
        .iter()
        .filter(|l| l.is_january())
        .map(|l| (l.column, l.year.to_string()))
        .collect();
    if !years.is_empty() {
        lines.push(header_line(width, &years));
    }

    let months: Vec<(usize, String)> = view
        .labels
        .iter()
        .map(|l| (l.column, l.short_name().to_string()))
        .collect();
    lines.push(header_line(width, &months));

    let days: Vec<(usize, String)> = view
        .dates
        .iter()
        .enumerate()
        .map(|(i, d)| (i, format!("{:02}", d.day())))
        .collect();
    lines.push(header_line(width, &days));

    if view.rows.is_empty() {
        lines.push("No visible projects.".to_string());
    }
    for row in &view.rows {
        lines.push(format_row(row, &view.dates, view.today, view.time_scale));
    }

    if view.show_event_titles {
        let mut events: Vec<(NaiveDate, char, &str, &str)> = view
            .rows
            .iter()
            .flat_map(|row| {
                row.cells.iter().zip(&view.dates).flat_map(move |(cell, &date)| {
                    cell.events.iter().map(move |e| {
                        let marker = if e.is_deadline() { 'D' } else { 'M' };
                        (date, marker, e.name.as_str(), row.name.as_str())
                    })
                })
            })
            .collect();
        events.sort_by_key(|&(date, ..)| date);

        if !events.is_empty() {
            lines.push(String::new());
            lines.push("Events:".to_string());
            for (date, marker, name, project) in events {
                lines.push(format!("  {}  {}  {} ({})", date, marker, name, project));
            }
        }
    }

    if !view.hidden_projects.is_empty() {
        lines.push(String::new());
        lines.push(format!("Hidden: {}", view.hidden_projects.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use studymap_core::{CellColor, Event, EventKind, MonthLabel, Rgb};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cell(completed_tasks: u32, events: Vec<Event>) -> Cell {
        Cell {
            completed_tasks,
            intensity: studymap_core::cells::intensity(completed_tasks),
            events,
            color: CellColor {
                rgb: Rgb::default(),
                alpha: 0.4,
            },
        }
    }

    fn event(kind: EventKind) -> Event {
        Event::new(
            "e1",
            "p1",
            "Final exam",
            Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
            kind,
        )
    }

    fn view() -> HeatmapView {
        let dates: Vec<NaiveDate> = (0..4).map(|i| day(2024, 2, 28) + Days::new(i)).collect();
        HeatmapView {
            focus: day(2024, 3, 6),
            today: day(2024, 3, 1),
            time_scale: 1,
            labels: vec![MonthLabel {
                year: 2024,
                month: 3,
                column: 2,
                date: day(2024, 3, 1),
            }],
            rows: vec![HeatmapRow {
                project_id: "p1".to_string(),
                name: "Algebra".to_string(),
                color: Rgb::default(),
                overdue: false,
                deadline_in_days: Some(1),
                cells: vec![
                    cell(0, vec![]),
                    cell(4, vec![]),
                    cell(10, vec![]),
                    cell(2, vec![event(EventKind::Deadline)]),
                ],
            }],
            dates,
            hidden_projects: vec![],
            show_event_titles: true,
        }
    }

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("this is a very long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Übungsblatt Analysis", 8), "Übung...");
        assert_eq!(truncate("Ökonomie", 2), "Ök");
    }

    #[test]
    fn test_format_empty_tables() {
        assert_eq!(format_project_table(&[]), "No projects found.");
        assert_eq!(format_task_table(&[]), "No tasks found.");
        assert_eq!(format_event_table(&[]), "No events found.");
    }

    #[test]
    fn test_project_table_alignment() {
        let projects = vec![
            ProjectSummary {
                id: "abc123".to_string(),
                order: 0,
                name: "Algebra".to_string(),
                color: Rgb::default(),
                hidden: false,
                completed_tasks: 3,
                total_tasks: 5,
                deadline: Some(day(2024, 6, 1)),
                overdue: true,
            },
            ProjectSummary {
                id: "def456".to_string(),
                order: 1,
                name: "History of Science".to_string(),
                color: Rgb::new(0x10, 0xB9, 0x81),
                hidden: true,
                completed_tasks: 0,
                total_tasks: 0,
                deadline: None,
                overdue: false,
            },
        ];
        let table = format_project_table(&projects);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  ID      Name"));
        assert!(lines[1].starts_with("-  ------  ----"));
        assert!(lines[2].contains("#3B82F6"));
        assert!(lines[2].contains("2024-06-01 (overdue)"));
        assert!(lines[3].contains("no"));
        assert_eq!(lines[2].find("Algebra"), lines[3].find("History"));
    }

    #[test]
    fn test_days_left_wording() {
        assert_eq!(format_days_left(None), "passed");
        assert_eq!(format_days_left(Some(0)), "today");
        assert_eq!(format_days_left(Some(1)), "in 1 day");
        assert_eq!(format_days_left(Some(12)), "in 12 days");
    }

    #[test]
    fn test_heatmap_glyphs_and_markers() {
        let out = format_heatmap(&view());
        let row = out.lines().find(|l| l.starts_with("Algebra")).unwrap();
        let grid: String = row.chars().skip(ROW_LABEL_WIDTH + 2).collect();
        assert!(grid.starts_with("·  ▒  █ <░D"), "unexpected row: {:?}", grid);
        assert!(row.ends_with("due in 1d"));
    }

    #[test]
    fn test_heatmap_header_positions() {
        let out = format_heatmap(&view());
        let lines: Vec<&str> = out.lines().collect();
        // no January label, so no year line
        assert_eq!(lines[0].find("Mar"), Some(ROW_LABEL_WIDTH + 2 + 2 * CELL_WIDTH));
        assert_eq!(lines[1].trim_start(), "28 29 01 02");
    }

    #[test]
    fn test_heatmap_year_above_january() {
        let mut v = view();
        v.labels = vec![MonthLabel {
            year: 2025,
            month: 1,
            column: 1,
            date: day(2025, 1, 1),
        }];
        let out = format_heatmap(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].trim(), "2025");
        assert_eq!(lines[1].trim(), "Jan");
        assert_eq!(lines[0].find("2025"), lines[1].find("Jan"));
    }

    #[test]
    fn test_heatmap_lists_events_and_hidden_projects() {
        let mut v = view();
        v.hidden_projects = vec!["History".to_string(), "Latin".to_string()];
        let out = format_heatmap(&v);
        assert!(out.contains("Events:\n  2024-03-02  D  Final exam (Algebra)"));
        assert!(out.ends_with("Hidden: History, Latin"));

        v.show_event_titles = false;
        assert!(!format_heatmap(&v).contains("Events:"));
    }

    #[test]
    fn test_overdue_marker() {
        let mut v = view();
        v.rows[0].overdue = true;
        v.rows[0].deadline_in_days = None;
        let out = format_heatmap(&v);
        let row = out.lines().find(|l| l.starts_with("Algebra")).unwrap();
        assert_eq!(row.chars().nth(ROW_LABEL_WIDTH), Some('!'));
        assert!(row.ends_with("deadline passed"));
    }

    #[test]
    fn test_no_visible_projects() {
        let mut v = view();
        v.rows.clear();
        assert!(format_heatmap(&v).contains("No visible projects."));
    }
}
