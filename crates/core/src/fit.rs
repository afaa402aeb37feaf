//! Column fitting.
//!
//! Works out how many date columns fit next to the sidebar and the project
//! label column without horizontal scrolling. All widths are CSS pixels.

use std::time::Duration;

/// Fewest columns the heatmap ever shows.
pub const MIN_COLUMNS: usize = 15;

/// Most columns the heatmap ever shows.
pub const MAX_COLUMNS: usize = 200;

/// Viewports at or below this width auto-collapse the sidebar.
pub const SIDEBAR_AUTO_COLLAPSE_WIDTH: u32 = 768;

/// Responsive layout band of a viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// Up to 480 px
    Phone,
    /// 481 to 768 px
    Tablet,
    /// 769 to 1024 px
    Laptop,
    /// Wider than 1024 px
    Desktop,
}

impl Breakpoint {
    pub fn for_width(viewport_width: u32) -> Self {
        match viewport_width {
            0..=480 => Breakpoint::Phone,
            481..=768 => Breakpoint::Tablet,
            769..=1024 => Breakpoint::Laptop,
            _ => Breakpoint::Desktop,
        }
    }

    /// Sidebar width when expanded.
    pub fn sidebar_width(self) -> u32 {
        match self {
            Breakpoint::Desktop => 280,
            _ => 260,
        }
    }

    /// Horizontal padding of the main content area (both sides).
    pub fn content_padding(self) -> u32 {
        match self {
            Breakpoint::Phone => 32,
            Breakpoint::Tablet => 48,
            Breakpoint::Laptop | Breakpoint::Desktop => 64,
        }
    }

    /// Width of the project name column.
    pub fn label_column_width(self) -> u32 {
        match self {
            Breakpoint::Phone | Breakpoint::Tablet => 160,
            Breakpoint::Laptop => 200,
            Breakpoint::Desktop => 250,
        }
    }

    pub fn min_column_width(self) -> u32 {
        match self {
            Breakpoint::Phone | Breakpoint::Tablet => 28,
            Breakpoint::Laptop | Breakpoint::Desktop => 32,
        }
    }
}

/// Widths that determine the column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub viewport_width: u32,
    pub sidebar_width: u32,
    pub content_padding: u32,
    pub label_column_width: u32,
    pub min_column_width: u32,
}

impl LayoutMetrics {
    /// Metrics for a viewport, following the responsive breakpoints.
    pub fn for_viewport(viewport_width: u32, sidebar_collapsed: bool) -> Self {
        let bp = Breakpoint::for_width(viewport_width);
        Self {
            viewport_width,
            sidebar_width: if sidebar_collapsed {
                0
            } else {
                bp.sidebar_width()
            },
            content_padding: bp.content_padding(),
            label_column_width: bp.label_column_width(),
            min_column_width: bp.min_column_width(),
        }
    }

    pub fn columns(&self) -> usize {
        fit(
            self.viewport_width,
            self.sidebar_width,
            self.content_padding,
            self.label_column_width,
            self.min_column_width,
        )
    }
}

/// Number of columns that fit, clamped to `[MIN_COLUMNS, MAX_COLUMNS]`.
///
/// A zero `min_column_width` means columns take no space, so the maximum
/// is returned.
pub fn fit(
    viewport_width: u32,
    sidebar_width: u32,
    content_padding: u32,
    reserved_label_column_width: u32,
    min_column_width: u32,
) -> usize {
    if min_column_width == 0 {
        return MAX_COLUMNS;
    }

    let available = viewport_width as i64
        - sidebar_width as i64
        - content_padding as i64
        - reserved_label_column_width as i64;
    let columns = available.div_euclid(min_column_width as i64);

    columns.clamp(MIN_COLUMNS as i64, MAX_COLUMNS as i64) as usize
}

/// Column count for a viewport width and sidebar state.
pub fn fit_viewport(viewport_width: u32, sidebar_collapsed: bool) -> usize {
    LayoutMetrics::for_viewport(viewport_width, sidebar_collapsed).columns()
}

pub fn should_auto_collapse_sidebar(viewport_width: u32) -> bool {
    viewport_width <= SIDEBAR_AUTO_COLLAPSE_WIDTH
}

/// Layout change that calls for a new column count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefitTrigger {
    /// The viewport was resized
    Resize,
    /// The sidebar was collapsed or expanded
    SidebarToggle,
}

impl RefitTrigger {
    /// How long a renderer should wait before refitting.
    ///
    /// The CLI fits once per run; this is for interactive front ends that
    /// refit on resize.
    ///
    /// The sidebar animation takes 300 ms; refitting earlier measures a
    /// half-collapsed sidebar.
    pub fn refit_delay(self) -> Duration {
        match self {
            RefitTrigger::Resize => Duration::from_millis(100),
            RefitTrigger::SidebarToggle => Duration::from_millis(350),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_bands() {
        assert_eq!(Breakpoint::for_width(320), Breakpoint::Phone);
        assert_eq!(Breakpoint::for_width(480), Breakpoint::Phone);
        assert_eq!(Breakpoint::for_width(481), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(768), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(1024), Breakpoint::Laptop);
        assert_eq!(Breakpoint::for_width(1025), Breakpoint::Desktop);
    }

    #[test]
    fn test_metrics_for_desktop() {
        let m = LayoutMetrics::for_viewport(1440, false);
        assert_eq!(m.sidebar_width, 280);
        assert_eq!(m.content_padding, 64);
        assert_eq!(m.label_column_width, 250);
        assert_eq!(m.min_column_width, 32);
    }

    #[test]
    fn test_metrics_for_tablet_and_laptop() {
        let tablet = LayoutMetrics::for_viewport(700, false);
        assert_eq!(
            (
                tablet.sidebar_width,
                tablet.content_padding,
                tablet.label_column_width,
                tablet.min_column_width
            ),
            (260, 48, 160, 28)
        );

        let laptop = LayoutMetrics::for_viewport(1000, false);
        assert_eq!(
            (
                laptop.sidebar_width,
                laptop.content_padding,
                laptop.label_column_width,
                laptop.min_column_width
            ),
            (260, 64, 200, 32)
        );
    }

    #[test]
    fn test_collapsed_sidebar_takes_no_width() {
        assert_eq!(LayoutMetrics::for_viewport(1440, true).sidebar_width, 0);
    }

    #[test]
    fn test_fit_desktop() {
        // (1440 - 280 - 64 - 250) / 32 = 26.4
        assert_eq!(fit_viewport(1440, false), 26);
        // (1440 - 64 - 250) / 32 = 35.2
        assert_eq!(fit_viewport(1440, true), 35);
    }

    #[test]
    fn test_fit_clamps_to_minimum() {
        assert_eq!(fit_viewport(1024, false), 15);
        assert_eq!(fit_viewport(800, false), 15);
        assert_eq!(fit_viewport(375, true), 15);
        assert_eq!(fit_viewport(0, false), 15);
    }

    #[test]
    fn test_fit_clamps_to_maximum() {
        assert_eq!(fit_viewport(8000, true), 200);
        assert_eq!(fit_viewport(u32::MAX, false), 200);
    }

    #[test]
    fn test_fit_always_within_bounds() {
        for width in (0..5000).step_by(37) {
            for collapsed in [false, true] {
                let columns = fit_viewport(width, collapsed);
                assert!((MIN_COLUMNS..=MAX_COLUMNS).contains(&columns));
            }
        }
        assert_eq!(fit(100, 0, 0, 0, 0), MAX_COLUMNS);
        assert_eq!(fit(0, u32::MAX, u32::MAX, u32::MAX, 1), MIN_COLUMNS);
    }

    #[test]
    fn test_auto_collapse() {
        assert!(should_auto_collapse_sidebar(768));
        assert!(!should_auto_collapse_sidebar(769));
    }

    #[test]
    fn test_refit_delays() {
        assert_eq!(RefitTrigger::Resize.refit_delay(), Duration::from_millis(100));
        assert_eq!(
            RefitTrigger::SidebarToggle.refit_delay(),
            Duration::from_millis(350)
        );
    }
}
