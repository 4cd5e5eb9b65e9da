//! Project maturity: the completed share of the action plan scaled to 0-5.
//!
//! The score is always recomputed from the full action list. It is never
//! adjusted incrementally, so it cannot drift from the action states.

use crate::action::{Action, ActionStatus};
use crate::types::round2;

/// Maximum maturity score.
pub const MATURITY_MAX: f64 = 5.0;

/// Compute the maturity score of an action plan.
///
/// Returns 0 for an empty plan, otherwise `completed / total * 5` rounded to
/// two decimals.
pub fn compute_maturity(actions: &[Action]) -> f64 {
    let completed = actions.iter().filter(|a| a.is_completed()).count();
    maturity_from_counts(completed, actions.len())
}

/// Compute the maturity score from bare statuses.
pub fn maturity_from_statuses(statuses: &[ActionStatus]) -> f64 {
    let completed = statuses
        .iter()
        .filter(|s| **s == ActionStatus::Completed)
        .count();
    maturity_from_counts(completed, statuses.len())
}

/// Compute the maturity score from counts.
pub fn maturity_from_counts(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(completed.min(total) as f64 / total as f64 * MATURITY_MAX)
}

/// Format a score as `X.XX/5.00`.
pub fn format_maturity(score: f64) -> String {
    format!("{score:.2}/{MATURITY_MAX:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::NewAction;

    fn actions(statuses: &[ActionStatus]) -> Vec<Action> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                Action::new(
                    format!("a{i}"),
                    "p1".to_string(),
                    NewAction {
                        measure: format!("Medida {i}"),
                        description: None,
                        responsible: None,
                        deadline: None,
                        priority: 3,
                        status: *status,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_plan_scores_zero() {
        assert_eq!(compute_maturity(&[]), 0.0);
        assert_eq!(maturity_from_statuses(&[]), 0.0);
    }

    #[test]
    fn test_half_completed_scores_two_and_a_half() {
        let plan = actions(&[ActionStatus::Completed, ActionStatus::Pending]);
        assert_eq!(compute_maturity(&plan), 2.5);
    }

    #[test]
    fn test_three_of_four_completed() {
        let plan = actions(&[
            ActionStatus::Completed,
            ActionStatus::Completed,
            ActionStatus::InProgress,
            ActionStatus::Completed,
        ]);
        assert_eq!(compute_maturity(&plan), 3.75);
    }

    #[test]
    fn test_in_progress_does_not_count() {
        let plan = actions(&[ActionStatus::InProgress, ActionStatus::InProgress]);
        assert_eq!(compute_maturity(&plan), 0.0);
    }

    #[test]
    fn test_all_completed_is_max() {
        let plan = actions(&[ActionStatus::Completed; 3]);
        assert_eq!(compute_maturity(&plan), MATURITY_MAX);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(maturity_from_counts(1, 3), 1.67);
        assert_eq!(maturity_from_counts(2, 3), 3.33);
    }

    #[test]
    fn test_is_idempotent() {
        let plan = actions(&[
            ActionStatus::Completed,
            ActionStatus::Pending,
            ActionStatus::Pending,
        ]);
        let first = compute_maturity(&plan);
        let second = compute_maturity(&plan);
        assert_eq!(first, second);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_maturity(0.0), "0.00/5.00");
        assert_eq!(format_maturity(3.75), "3.75/5.00");
    }
}
