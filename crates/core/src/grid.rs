//! Date grid generation.
//!
//! The heatmap shows a fixed number of columns. Each column stands for a
//! period of `time_scale` days and is identified by the first day of that
//! period. The grid always starts one week before the focus date.

use crate::error::{CoreError, CoreResult};
use chrono::{Days, NaiveDate};

/// Smallest number of days a column may represent.
pub const MIN_TIME_SCALE: u32 = 1;

/// Largest number of days a column may represent.
pub const MAX_TIME_SCALE: u32 = 30;

/// Time scales offered as one-click choices (day, 3 days, week).
pub const TIME_SCALE_PRESETS: [u32; 3] = [1, 3, 7];

/// Days between the first column and the focus date.
pub const FOCUS_LEAD_DAYS: u64 = 7;

/// Number of days represented by one grid column, within `[1, 30]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeScale(u32);

impl TimeScale {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` for values outside `[1, 30]`.
    pub fn new(days: u32) -> CoreResult<Self> {
        if (MIN_TIME_SCALE..=MAX_TIME_SCALE).contains(&days) {
            Ok(Self(days))
        } else {
            Err(CoreError::invalid_argument(format!(
                "time scale must be between {} and {} days, got {}",
                MIN_TIME_SCALE, MAX_TIME_SCALE, days
            )))
        }
    }

    /// Clamp any integer into the valid range; zero and negatives become 1.
    pub fn clamped(days: i64) -> Self {
        Self(days.clamp(MIN_TIME_SCALE as i64, MAX_TIME_SCALE as i64) as u32)
    }

    /// Interpret free-form user input. Unparsable input means one day.
    pub fn parse_clamped(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map(Self::clamped)
            .unwrap_or(Self(MIN_TIME_SCALE))
    }

    pub fn days(self) -> u32 {
        self.0
    }

    /// Whether this scale is one of [`TIME_SCALE_PRESETS`]. Front ends use
    /// it to highlight the matching preset button.
    pub fn is_preset(self) -> bool {
        TIME_SCALE_PRESETS.contains(&self.0)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self(MIN_TIME_SCALE)
    }
}

/// The ordered period-start dates shown as heatmap columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGrid {
    dates: Vec<NaiveDate>,
    time_scale: u32,
}

impl DateGrid {
    /// Build a grid of `column_count` dates spaced `time_scale` days apart,
    /// starting seven days before `focus`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when `time_scale` or
    /// `column_count` is zero, or when the range leaves chrono's date range.
    pub fn generate(focus: NaiveDate, time_scale: u32, column_count: usize) -> CoreResult<Self> {
        if time_scale == 0 {
            return Err(CoreError::invalid_argument("time scale must be positive"));
        }
        if column_count == 0 {
            return Err(CoreError::invalid_argument("column count must be positive"));
        }

        let out_of_range = || CoreError::invalid_argument("date grid exceeds the supported range");

        let start = focus
            .checked_sub_days(Days::new(FOCUS_LEAD_DAYS))
            .ok_or_else(out_of_range)?;

        let dates = (0..column_count as u64)
            .map(|i| {
                start
                    .checked_add_days(Days::new(i * time_scale as u64))
                    .ok_or_else(out_of_range)
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self { dates, time_scale })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of the column whose period contains `day`.
    pub fn column_of(&self, day: NaiveDate) -> Option<usize> {
        let first = *self.dates.first()?;
        let offset = (day - first).num_days();
        if offset < 0 {
            return None;
        }
        let column = (offset / self.time_scale as i64) as usize;
        (column < self.dates.len()).then_some(column)
    }
}

/// Direction of calendar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Back,
    Forward,
}

/// Move the focus date by one "page" of seven columns.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` if the result leaves chrono's date range.
pub fn shift_focus(
    focus: NaiveDate,
    direction: NavDirection,
    time_scale: u32,
) -> CoreResult<NaiveDate> {
    let step = Days::new(7 * time_scale as u64);
    let shifted = match direction {
        NavDirection::Back => focus.checked_sub_days(step),
        NavDirection::Forward => focus.checked_add_days(step),
    };
    shifted.ok_or_else(|| CoreError::invalid_argument("focus date out of range"))
}
