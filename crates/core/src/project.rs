//! The project aggregate.
//!
//! A [`Project`] owns its operators, risks and actions. Children are only
//! reachable through the aggregate so the derived fields stay consistent:
//! risk scores follow their factors, and the maturity score is recomputed on
//! every action mutation.

use serde::{Deserialize, Serialize};

use crate::action::{self, Action, ActionStatus, ActionUpdate, NewAction};
use crate::error::CoreError;
use crate::labels;
use crate::maturity::compute_maturity;
use crate::risk::{self, NewRisk, Risk, RiskUpdate};
use crate::types::{new_entity_id, EntityId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_IN_REVIEW: &str = "IN_REVIEW";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_ARCHIVED: &str = "ARCHIVED";

/// All valid project status strings.
pub const VALID_PROJECT_STATUSES: &[&str] =
    &[STATUS_DRAFT, STATUS_IN_REVIEW, STATUS_APPROVED, STATUS_ARCHIVED];

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InReview,
    Approved,
    Archived,
}

impl ProjectStatus {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_IN_REVIEW => Ok(Self::InReview),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_ARCHIVED => Ok(Self::Archived),
            _ => Err(format!(
                "Invalid project status '{s}'. Must be one of: {}",
                VALID_PROJECT_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::InReview => STATUS_IN_REVIEW,
            Self::Approved => STATUS_APPROVED,
            Self::Archived => STATUS_ARCHIVED,
        }
    }

    pub fn label(&self) -> &'static str {
        labels::project_status_label(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// Treatment-nature flags collected in the second wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingFlags {
    pub has_sensitive_data: bool,
    pub has_biometric_data: bool,
    pub has_profile_surveillance: bool,
    pub is_regulated_sector: bool,
    pub has_automated_decision: bool,
    pub has_minor_data: bool,
}

impl ProcessingFlags {
    /// The six checklist items in display order.
    pub fn checklist(&self) -> [(&'static str, bool); 6] {
        [
            ("Dados Sensíveis", self.has_sensitive_data),
            ("Dados Biométricos", self.has_biometric_data),
            ("Vigilância de Perfil", self.has_profile_surveillance),
            ("Setor Regulado", self.is_regulated_sector),
            ("Decisão Automatizada", self.has_automated_decision),
            ("Dados de Menores", self.has_minor_data),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternationalTransfer {
    pub enabled: bool,
    pub countries: Vec<String>,
    pub mechanism: Option<String>,
}

/// A processing purpose and the legal basis it relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Purpose {
    pub purpose: String,
    pub legal_basis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retention {
    pub period_months: Option<u32>,
    pub justification: Option<String>,
}

impl Retention {
    /// A zero period counts as unset.
    pub fn period(&self) -> Option<u32> {
        self.period_months.filter(|m| *m > 0)
    }
}

/// Names and roles printed in the approval blocks. The DPO block reuses
/// [`ProjectDetails::dpo_name`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatures {
    pub preparer_name: Option<String>,
    pub preparer_role: Option<String>,
    pub manager_name: Option<String>,
    pub manager_role: Option<String>,
}

/// Descriptive data of a project, everything except owned children and
/// derived scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub name: String,
    pub description: Option<String>,
    pub controller: String,
    pub dpo_name: String,
    pub dpo_email: Option<String>,
    pub flags: ProcessingFlags,
    pub data_categories: Vec<String>,
    pub collection_method: Option<String>,
    pub transfer: InternationalTransfer,
    pub purposes: Vec<Purpose>,
    pub retention: Retention,
    pub signatures: Signatures,
    pub status: ProjectStatus,
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// A third party processing data on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: EntityId,
    project_id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub operator_type: String,
    pub country: Option<String>,
}

impl Operator {
    pub fn new(id: EntityId, project_id: EntityId, input: NewOperator) -> Self {
        Self {
            id,
            project_id,
            name: input.name,
            operator_type: input.operator_type,
            country: input.country,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperator {
    pub name: String,
    #[serde(rename = "type")]
    pub operator_type: String,
    pub country: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    #[serde(flatten)]
    pub details: ProjectDetails,
    operators: Vec<Operator>,
    risks: Vec<Risk>,
    actions: Vec<Action>,
    maturity_score: f64,
}

impl Project {
    /// A fresh project with no children.
    pub fn new(id: EntityId, details: ProjectDetails) -> Self {
        Self {
            id,
            details,
            operators: Vec::new(),
            risks: Vec::new(),
            actions: Vec::new(),
            maturity_score: 0.0,
        }
    }

    /// Rebuild a project from loaded children.
    ///
    /// Fails with [`CoreError::Conflict`] if a child belongs to another
    /// project. The maturity score is recomputed from `actions`.
    pub fn restore(
        id: EntityId,
        details: ProjectDetails,
        operators: Vec<Operator>,
        risks: Vec<Risk>,
        actions: Vec<Action>,
    ) -> Result<Self, CoreError> {
        let foreign = operators
            .iter()
            .map(|o| o.project_id())
            .chain(risks.iter().map(|r| r.project_id()))
            .chain(actions.iter().map(|a| a.project_id()))
            .find(|owner| *owner != id);
        if let Some(owner) = foreign {
            return Err(CoreError::Conflict(format!(
                "Child entity belongs to project '{owner}', not '{id}'"
            )));
        }

        let mut project = Self {
            id,
            details,
            operators,
            risks,
            actions,
            maturity_score: 0.0,
        };
        project.recompute_maturity();
        Ok(project)
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn risks(&self) -> &[Risk] {
        &self.risks
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Derived maturity score in `[0, 5]`.
    pub fn maturity_score(&self) -> f64 {
        self.maturity_score
    }

    /// Replace every operator with the incoming list.
    ///
    /// Existing operators are dropped and each incoming one gets a new id,
    /// even when it matches an operator that was already there.
    pub fn replace_operators(&mut self, incoming: Vec<NewOperator>) -> &[Operator] {
        self.operators = incoming
            .into_iter()
            .map(|op| Operator::new(new_entity_id(), self.id.clone(), op))
            .collect();
        &self.operators
    }

    // -- risks --------------------------------------------------------------

    pub fn add_risk(&mut self, input: NewRisk) -> &Risk {
        self.risks.push(Risk::new(new_entity_id(), self.id.clone(), input));
        &self.risks[self.risks.len() - 1]
    }

    /// Add several risks at once, returning how many were added.
    pub fn add_risks(&mut self, inputs: impl IntoIterator<Item = NewRisk>) -> usize {
        let before = self.risks.len();
        for input in inputs {
            self.add_risk(input);
        }
        self.risks.len() - before
    }

    pub fn update_risk(&mut self, risk_id: &str, update: RiskUpdate) -> Result<&Risk, CoreError> {
        let risk = self
            .risks
            .iter_mut()
            .find(|r| r.id == risk_id)
            .ok_or_else(|| not_found("risk", risk_id))?;
        risk.apply_update(update);
        Ok(risk)
    }

    pub fn remove_risk(&mut self, risk_id: &str) -> Result<Risk, CoreError> {
        let index = self
            .risks
            .iter()
            .position(|r| r.id == risk_id)
            .ok_or_else(|| not_found("risk", risk_id))?;
        Ok(self.risks.remove(index))
    }

    // -- actions ------------------------------------------------------------

    pub fn add_action(&mut self, input: NewAction) -> &Action {
        self.actions.push(Action::new(new_entity_id(), self.id.clone(), input));
        self.recompute_maturity();
        &self.actions[self.actions.len() - 1]
    }

    /// Add several actions at once, recomputing maturity once at the end.
    pub fn add_actions(&mut self, inputs: impl IntoIterator<Item = NewAction>) -> usize {
        let before = self.actions.len();
        for input in inputs {
            self.actions.push(Action::new(new_entity_id(), self.id.clone(), input));
        }
        self.recompute_maturity();
        self.actions.len() - before
    }

    pub fn update_action(
        &mut self,
        action_id: &str,
        update: ActionUpdate,
    ) -> Result<&Action, CoreError> {
        let index = self.action_index(action_id)?;
        self.actions[index].apply_update(update);
        self.recompute_maturity();
        Ok(&self.actions[index])
    }

    pub fn set_action_status(
        &mut self,
        action_id: &str,
        status: ActionStatus,
    ) -> Result<&Action, CoreError> {
        self.update_action(
            action_id,
            ActionUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    pub fn remove_action(&mut self, action_id: &str) -> Result<Action, CoreError> {
        let index = self.action_index(action_id)?;
        let removed = self.actions.remove(index);
        self.recompute_maturity();
        Ok(removed)
    }

    /// Put risks and actions in the order the report lists them.
    pub fn sort_for_report(&mut self) {
        risk::sort_by_criticality(&mut self.risks);
        action::sort_for_report(&mut self.actions);
    }

    fn action_index(&self, action_id: &str) -> Result<usize, CoreError> {
        self.actions
            .iter()
            .position(|a| a.id == action_id)
            .ok_or_else(|| not_found("action", action_id))
    }

    fn recompute_maturity(&mut self) {
        self.maturity_score = compute_maturity(&self.actions);
    }
}

fn not_found(entity: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}
