//! Month header placement.
//!
//! A column gets a month label when the first day of a month falls inside
//! its period. Labels must not crowd each other, so candidates are thinned
//! out differently for fine (at most 10 days per column) and coarse time
//! scales.

use crate::grid::DateGrid;
use chrono::{Datelike, Days, Month, NaiveDate};
use serde::Serialize;

/// Minimum distance, in columns, between two labels at fine time scales.
pub const MIN_LABEL_SPACING: usize = 3;

/// Time scales above this use the coarse thinning rule.
pub const COARSE_SCALE_THRESHOLD: u32 = 10;

/// Target spacing between labels at coarse time scales.
const COARSE_TARGET_SPACING: f64 = 3.5;

/// A month label anchored to one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub year: i32,
    /// Month number, 1 to 12
    pub month: u32,
    /// Grid column the label sits above
    pub column: usize,
    /// Day the label was derived from: the 1st of the month, or the first
    /// column's own date for the fallback label
    pub date: NaiveDate,
}

impl MonthLabel {
    fn from_date(date: NaiveDate, column: usize) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            column,
            date,
        }
    }

    /// Three-letter English month name, e.g. `Feb`.
    pub fn short_name(&self) -> &'static str {
        Month::try_from(self.month as u8)
            .map(|m| &m.name()[..3])
            .unwrap_or("???")
    }

    /// January labels also show the year.
    pub fn is_january(&self) -> bool {
        self.month == 1
    }
}

/// Month labels for a generated grid.
pub fn place_for_grid(grid: &DateGrid) -> Vec<MonthLabel> {
    place(grid.dates(), grid.time_scale())
}

/// Month labels for columns starting at `dates`, each `time_scale` days long.
///
/// The result is ordered by column.
pub fn place(dates: &[NaiveDate], time_scale: u32) -> Vec<MonthLabel> {
    let candidates = propose(dates, time_scale);
    if time_scale > COARSE_SCALE_THRESHOLD {
        thin_coarse(candidates)
    } else {
        thin_fine(candidates)
    }
}

/// One candidate per (year, month) whose 1st falls in some column, in
/// column order.
///
/// If the first column contains no month start, it gets a label for its own
/// month so the header is never empty at the left edge.
fn propose(dates: &[NaiveDate], time_scale: u32) -> Vec<MonthLabel> {
    let mut candidates: Vec<MonthLabel> = Vec::new();

    for (column, &start) in dates.iter().enumerate() {
        let month_start = (0..time_scale.max(1) as u64)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .find(|d| d.day() == 1);

        if let Some(first) = month_start
            && !candidates
                .iter()
                .any(|c| c.year == first.year() && c.month == first.month())
        {
            candidates.push(MonthLabel::from_date(first, column));
        }

        if column == 0 && candidates.is_empty() {
            candidates.push(MonthLabel::from_date(start, column));
        }
    }

    candidates
}

/// Walk candidates left to right. A candidate closer than
/// [`MIN_LABEL_SPACING`] to a kept label replaces it only when its date is
/// strictly more recent; otherwise the candidate is dropped.
fn thin_fine(candidates: Vec<MonthLabel>) -> Vec<MonthLabel> {
    let mut kept: Vec<MonthLabel> = Vec::new();

    'candidates: for candidate in candidates {
        let mut i = 0;
        while i < kept.len() {
            if kept[i].column.abs_diff(candidate.column) < MIN_LABEL_SPACING {
                if candidate.date > kept[i].date {
                    kept.remove(i);
                    continue;
                }
                continue 'candidates;
            }
            i += 1;
        }
        kept.push(candidate);
    }

    kept
}

/// Keep the most recent candidate, then every remaining candidate (left to
/// right) that is at least three columns from the previously kept one.
fn thin_coarse(candidates: Vec<MonthLabel>) -> Vec<MonthLabel> {
    let Some(newest_idx) = candidates
        .iter()
        .enumerate()
        .fold(None::<(usize, NaiveDate)>, |best, (i, c)| match best {
            Some((_, date)) if c.date <= date => best,
            _ => Some((i, c.date)),
        })
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };

    let mut rest = candidates;
    let newest = rest.remove(newest_idx);
    rest.sort_by_key(|c| c.column);

    let spacing = COARSE_TARGET_SPACING.floor() as usize;
    let mut last_column = newest.column;
    let mut kept = vec![newest];

    for candidate in rest {
        if candidate.column.abs_diff(last_column) >= spacing {
            last_column = candidate.column;
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|c| c.column);
    kept
}
