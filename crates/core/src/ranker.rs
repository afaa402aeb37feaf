//! Project ordering and visibility.
//!
//! Projects are ranked by their `order` field. Moving a project swaps its
//! order with whichever project holds the adjacent value. At most
//! [`PROJECTS_LIMIT`] projects may be visible; the cap is checked when a
//! project is created and when a hidden project is shown, never
//! retroactively.

use crate::error::{CoreError, CoreResult};
use crate::models::{PROJECTS_LIMIT, Project};

/// Direction of a rank move. `Up` means towards order 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    fn offset(self) -> i64 {
        match self {
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
        }
    }
}

/// Visibility state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn of(project: &Project) -> Self {
        if project.hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

pub fn visible(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| !p.hidden).collect()
}

pub fn hidden(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| p.hidden).collect()
}

pub fn visible_count(projects: &[Project]) -> usize {
    projects.iter().filter(|p| !p.hidden).count()
}

/// Projects by ascending `order`; equal orders keep their input order.
pub fn sorted(projects: &[Project]) -> Vec<&Project> {
    let mut out: Vec<&Project> = projects.iter().collect();
    out.sort_by_key(|p| p.order);
    out
}

/// Heatmap rows: visible projects in rank order.
pub fn rows(projects: &[Project]) -> Vec<&Project> {
    sorted(projects).into_iter().filter(|p| !p.hidden).collect()
}

/// Swap a project's order with the project holding `order ± 1`.
///
/// # Errors
///
/// Returns `CoreError::ProjectNotFound` for an unknown id and
/// `CoreError::AdjacentNotFound` when no other project holds the adjacent
/// order. Callers usually treat the latter as a no-op; nothing is changed
/// in either case.
pub fn move_adjacent(
    projects: &mut [Project],
    project_id: &str,
    direction: MoveDirection,
) -> CoreResult<()> {
    let idx = index_of(projects, project_id)?;
    let current = projects[idx].order;
    let wanted = current + direction.offset();

    let partner = projects
        .iter()
        .enumerate()
        .find(|(i, p)| *i != idx && p.order == wanted)
        .map(|(i, _)| i)
        .ok_or_else(|| CoreError::AdjacentNotFound {
            project_id: project_id.to_string(),
            wanted_order: wanted,
        })?;

    projects[idx].order = wanted;
    projects[partner].order = current;
    Ok(())
}

/// Flip a project between visible and hidden.
///
/// Hiding always succeeds. Showing is refused while [`PROJECTS_LIMIT`]
/// projects are already visible.
///
/// # Errors
///
/// Returns `CoreError::ProjectNotFound` for an unknown id and
/// `CoreError::LimitExceeded` when showing would break the cap; the
/// project stays hidden.
pub fn toggle_visibility(projects: &mut [Project], project_id: &str) -> CoreResult<Visibility> {
    let idx = index_of(projects, project_id)?;

    if projects[idx].hidden && !can_show_another(projects) {
        return Err(CoreError::LimitExceeded {
            limit: PROJECTS_LIMIT,
        });
    }

    projects[idx].hidden = !projects[idx].hidden;
    Ok(Visibility::of(&projects[idx]))
}

/// Whether one more project may become visible.
pub fn can_show_another(projects: &[Project]) -> bool {
    visible_count(projects) < PROJECTS_LIMIT
}

/// Whether a newly created project should start out hidden.
pub fn assign_default_hidden(current: &[Project]) -> bool {
    !can_show_another(current)
}

/// Renumber orders to `0..n` following the current ranking (stable on ties).
///
/// Returns true if any project's order changed.
pub fn normalize_order(projects: &mut [Project]) -> bool {
    let mut ranked: Vec<usize> = (0..projects.len()).collect();
    ranked.sort_by_key(|&i| projects[i].order);

    let mut changed = false;
    for (rank, idx) in ranked.into_iter().enumerate() {
        let rank = rank as i64;
        if projects[idx].order != rank {
            projects[idx].order = rank;
            changed = true;
        }
    }
    changed
}

fn index_of(projects: &[Project], project_id: &str) -> CoreResult<usize> {
    projects
        .iter()
        .position(|p| p.id == project_id)
        .ok_or_else(|| CoreError::ProjectNotFound {
            project_id: project_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project(id: &str, order: i64, hidden: bool) -> Project {
        Project::new(id, id, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .with_order(order)
            .with_hidden(hidden)
    }

    fn ids(projects: &[&Project]) -> Vec<String> {
        projects.iter().map(|p| p.id.clone()).collect()
    }

    fn many(visible: usize, hidden: usize) -> Vec<Project> {
        (0..visible + hidden)
            .map(|i| project(&format!("p{}", i), i as i64, i >= visible))
            .collect()
    }

    #[test]
    fn test_visible_and_hidden_partition() {
        let projects = vec![
            project("a", 0, false),
            project("b", 1, true),
            project("c", 2, false),
        ];
        assert_eq!(ids(&visible(&projects)), vec!["a", "c"]);
        assert_eq!(ids(&hidden(&projects)), vec!["b"]);
        assert_eq!(visible_count(&projects), 2);
    }

    #[test]
    fn test_sorted_is_stable() {
        let projects = vec![
            project("c", 2, false),
            project("a1", 0, false),
            project("b1", 1, false),
            project("a2", 0, false),
            project("b2", 1, true),
        ];
        assert_eq!(ids(&sorted(&projects)), vec!["a1", "a2", "b1", "b2", "c"]);
        assert_eq!(ids(&rows(&projects)), vec!["a1", "a2", "b1", "c"]);
    }

    #[test]
    fn test_move_up_swaps_with_previous() {
        let mut projects = vec![
            project("a", 0, false),
            project("b", 1, false),
            project("c", 2, false),
        ];
        move_adjacent(&mut projects, "c", MoveDirection::Up).unwrap();
        assert_eq!(ids(&sorted(&projects)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_down_then_up_restores_order() {
        let mut projects = vec![
            project("a", 0, false),
            project("b", 1, true),
            project("c", 2, false),
        ];
        let before = projects.clone();

        move_adjacent(&mut projects, "a", MoveDirection::Down).unwrap();
        assert_eq!(ids(&sorted(&projects)), vec!["b", "a", "c"]);
        move_adjacent(&mut projects, "a", MoveDirection::Up).unwrap();
        assert_eq!(projects, before);
    }

    #[test]
    fn test_move_past_the_ends_is_reported() {
        let mut projects = vec![project("a", 0, false), project("b", 1, false)];
        let before = projects.clone();

        let err = move_adjacent(&mut projects, "a", MoveDirection::Up).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AdjacentNotFound {
                wanted_order: -1,
                ..
            }
        ));
        assert!(matches!(
            move_adjacent(&mut projects, "b", MoveDirection::Down),
            Err(CoreError::AdjacentNotFound { .. })
        ));
        assert_eq!(projects, before);
    }

    #[test]
    fn test_move_across_gap_is_noop() {
        let mut projects = vec![project("a", 0, false), project("b", 5, false)];
        let before = projects.clone();
        assert!(move_adjacent(&mut projects, "b", MoveDirection::Up).is_err());
        assert_eq!(projects, before);
    }

    #[test]
    fn test_move_unknown_project() {
        let mut projects = vec![project("a", 0, false)];
        assert!(matches!(
            move_adjacent(&mut projects, "zzz", MoveDirection::Up),
            Err(CoreError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn test_hide_is_unconditional() {
        let mut projects = many(PROJECTS_LIMIT, 0);
        assert_eq!(
            toggle_visibility(&mut projects, "p0").unwrap(),
            Visibility::Hidden
        );
        assert!(projects[0].hidden);
    }

    #[test]
    fn test_show_refused_at_limit() {
        let mut projects = many(PROJECTS_LIMIT, 1);
        let hidden_id = format!("p{}", PROJECTS_LIMIT);

        let err = toggle_visibility(&mut projects, &hidden_id).unwrap_err();
        assert!(matches!(err, CoreError::LimitExceeded { limit: 8 }));
        assert!(projects[PROJECTS_LIMIT].hidden);
    }

    #[test]
    fn test_show_allowed_below_limit() {
        let mut projects = many(PROJECTS_LIMIT - 1, 1);
        let hidden_id = format!("p{}", PROJECTS_LIMIT - 1);
        assert_eq!(
            toggle_visibility(&mut projects, &hidden_id).unwrap(),
            Visibility::Visible
        );
        assert_eq!(visible_count(&projects), PROJECTS_LIMIT);
    }

    #[test]
    fn test_visible_count_never_exceeds_limit_through_toggles() {
        let mut projects = many(3, 9);
        let ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();

        // deterministic pseudo-random walk over toggles
        let mut seed = 17usize;
        for _ in 0..500 {
            seed = (seed * 31 + 7) % 1009;
            let id = &ids[seed % ids.len()];
            let _ = toggle_visibility(&mut projects, id);
            assert!(visible_count(&projects) <= PROJECTS_LIMIT);
        }
    }

    #[test]
    fn test_assign_default_hidden() {
        assert!(!assign_default_hidden(&many(PROJECTS_LIMIT - 1, 5)));
        assert!(assign_default_hidden(&many(PROJECTS_LIMIT, 0)));
        assert!(assign_default_hidden(&many(PROJECTS_LIMIT + 2, 0)));
    }

    #[test]
    fn test_normalize_order_repairs_gaps_and_duplicates() {
        let mut projects = vec![
            project("c", 9, false),
            project("a", 2, false),
            project("b", 2, true),
            project("d", 40, false),
        ];
        assert!(normalize_order(&mut projects));
        assert_eq!(ids(&sorted(&projects)), vec!["a", "b", "c", "d"]);
        let orders: Vec<i64> = sorted(&projects).iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);

        assert!(!normalize_order(&mut projects));
    }
}
