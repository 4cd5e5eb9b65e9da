//! Boundary validation for write requests.
//!
//! The calculators assume pre-validated input; these DTOs are what the API
//! layer deserializes request bodies into before anything reaches the
//! aggregate.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::action::{ActionStatus, ActionUpdate, NewAction, DEFAULT_PRIORITY};
use crate::error::CoreError;
use crate::project::{
    InternationalTransfer, NewOperator, ProcessingFlags, Project, ProjectDetails, Purpose,
    Retention, Signatures,
};
use crate::risk::{NewRisk, RiskUpdate};
use crate::types::EntityId;

/// Run derived validation and map failures into [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Controller is required"))]
    pub controller: String,
    #[validate(length(min = 1, message = "DPO name is required"))]
    pub dpo_name: String,
    #[validate(email)]
    pub dpo_email: Option<String>,
    pub has_sensitive_data: bool,
    pub has_biometric_data: bool,
    pub has_profile_surveillance: bool,
    /// Treated as true unless explicitly false.
    pub is_regulated_sector: Option<bool>,
    pub has_automated_decision: bool,
    pub has_minor_data: bool,
    pub data_categories: Vec<String>,
    pub collection_method: Option<String>,
    pub has_international_transfer: bool,
    pub transfer_countries: Vec<String>,
    pub transfer_mechanism: Option<String>,
    pub purposes: Vec<Purpose>,
    pub retention_period_months: Option<u32>,
    pub retention_justification: Option<String>,
    pub preparer_name: Option<String>,
    pub preparer_role: Option<String>,
    pub manager_name: Option<String>,
    pub manager_role: Option<String>,
    pub operators: Vec<NewOperator>,
}

impl CreateProject {
    /// Validate and build a new project with its operators.
    pub fn into_project(self, id: EntityId) -> Result<Project, CoreError> {
        validate_input(&self)?;

        let details = ProjectDetails {
            name: self.name,
            description: self.description,
            controller: self.controller,
            dpo_name: self.dpo_name,
            dpo_email: self.dpo_email,
            flags: ProcessingFlags {
                has_sensitive_data: self.has_sensitive_data,
                has_biometric_data: self.has_biometric_data,
                has_profile_surveillance: self.has_profile_surveillance,
                is_regulated_sector: self.is_regulated_sector.unwrap_or(true),
                has_automated_decision: self.has_automated_decision,
                has_minor_data: self.has_minor_data,
            },
            data_categories: self.data_categories,
            collection_method: self.collection_method,
            transfer: InternationalTransfer {
                enabled: self.has_international_transfer,
                countries: self.transfer_countries,
                mechanism: self.transfer_mechanism,
            },
            purposes: self.purposes,
            retention: Retention {
                period_months: self.retention_period_months,
                justification: self.retention_justification,
            },
            signatures: Signatures {
                preparer_name: self.preparer_name,
                preparer_role: self.preparer_role,
                manager_name: self.manager_name,
                manager_role: self.manager_role,
            },
            status: Default::default(),
        };

        let mut project = Project::new(id, details);
        project.replace_operators(self.operators);
        Ok(project)
    }
}

// ---------------------------------------------------------------------------
// Risks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRisk {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Source is required"))]
    pub source: String,
    #[validate(range(min = 1, max = 5, message = "Impact must be between 1 and 5"))]
    pub impact: i64,
    #[validate(range(min = 1, max = 5, message = "Probability must be between 1 and 5"))]
    pub probability: i64,
    pub mitigation: Option<String>,
}

impl CreateRisk {
    pub fn into_new_risk(self) -> Result<NewRisk, CoreError> {
        validate_input(&self)?;
        Ok(NewRisk {
            description: self.description,
            source: self.source,
            impact: self.impact as u8,
            probability: self.probability as u8,
            mitigation: self.mitigation,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRisk {
    pub description: Option<String>,
    pub source: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Impact must be between 1 and 5"))]
    pub impact: Option<i64>,
    #[validate(range(min = 1, max = 5, message = "Probability must be between 1 and 5"))]
    pub probability: Option<i64>,
    pub mitigation: Option<String>,
}

impl UpdateRisk {
    pub fn into_update(self) -> Result<RiskUpdate, CoreError> {
        validate_input(&self)?;
        Ok(RiskUpdate {
            description: self.description,
            source: self.source,
            impact: self.impact.map(|v| v as u8),
            probability: self.probability.map(|v| v as u8),
            mitigation: self.mitigation,
        })
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAction {
    #[validate(length(min = 1, message = "Measure is required"))]
    pub measure: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i64>,
    pub status: Option<ActionStatus>,
}

impl CreateAction {
    pub fn into_new_action(self) -> Result<NewAction, CoreError> {
        validate_input(&self)?;
        Ok(NewAction {
            measure: self.measure,
            description: self.description,
            responsible: self.responsible,
            deadline: self.deadline,
            priority: self.priority.map_or(DEFAULT_PRIORITY, |p| p as u8),
            status: self.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAction {
    #[validate(length(min = 1, message = "Measure must not be empty"))]
    pub measure: Option<String>,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i64>,
    pub status: Option<ActionStatus>,
}

impl UpdateAction {
    pub fn into_update(self) -> Result<ActionUpdate, CoreError> {
        validate_input(&self)?;
        Ok(ActionUpdate {
            measure: self.measure,
            description: self.description,
            responsible: self.responsible,
            deadline: self.deadline,
            priority: self.priority.map(|p| p as u8),
            status: self.status,
        })
    }
}
