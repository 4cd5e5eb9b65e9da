//! Action-plan entries and their status lifecycle.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::labels;
use crate::types::EntityId;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// All valid action status strings.
pub const VALID_ACTION_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Lowest accepted action priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest accepted action priority.
pub const MAX_PRIORITY: u8 = 5;

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: u8 = 3;

/// Progress of an action-plan entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ActionStatus {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            _ => Err(format!(
                "Invalid action status '{s}'. Must be one of: {}",
                VALID_ACTION_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
        }
    }

    pub fn label(&self) -> &'static str {
        labels::action_status_label(self.as_str())
    }
}

/// An action that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAction {
    pub measure: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: u8,
    #[serde(default)]
    pub status: ActionStatus,
}

/// Partial update of an action; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionUpdate {
    pub measure: Option<String>,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<u8>,
    pub status: Option<ActionStatus>,
}

/// An action-plan entry owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: EntityId,
    project_id: EntityId,
    pub measure: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: u8,
    pub status: ActionStatus,
}

impl Action {
    pub fn new(id: EntityId, project_id: EntityId, input: NewAction) -> Self {
        Self {
            id,
            project_id,
            measure: input.measure,
            description: input.description,
            responsible: input.responsible,
            deadline: input.deadline,
            priority: input.priority,
            status: input.status,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn is_completed(&self) -> bool {
        self.status == ActionStatus::Completed
    }

    pub fn apply_update(&mut self, update: ActionUpdate) {
        if let Some(measure) = update.measure {
            self.measure = measure;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(responsible) = update.responsible {
            self.responsible = Some(responsible);
        }
        if let Some(deadline) = update.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// Order used by the action-plan listing: status string ascending, then
/// priority descending.
///
/// Status compares by its stored string, so COMPLETED sorts before
/// IN_PROGRESS and PENDING, matching what the storage layer returns.
pub fn report_order(a: &Action, b: &Action) -> Ordering {
    a.status
        .as_str()
        .cmp(b.status.as_str())
        .then_with(|| b.priority.cmp(&a.priority))
}

/// Sort actions into [`report_order`]. Stable for equal keys.
pub fn sort_for_report(actions: &mut [Action]) {
    actions.sort_by(report_order);
}
