//! Decoding boundary between persistence and the domain model.
//!
//! Storage may return booleans as `true`, `"true"`, `1` or `"1"`, and array
//! fields as JSON-encoded text. Everything is normalized here, once, when a
//! record crosses into the core, so downstream code only ever sees typed
//! values. Decoding never fails on a malformed field: bad arrays become empty
//! lists and bad scalars fall back to their defaults.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::action::{Action, ActionStatus, NewAction, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
use crate::error::CoreError;
use crate::project::{
    InternationalTransfer, NewOperator, Operator, ProcessingFlags, Project, ProjectDetails,
    ProjectStatus, Purpose, Retention, Signatures,
};
use crate::risk::{NewRisk, Risk, MAX_FACTOR, MIN_FACTOR};
use crate::types::{new_entity_id, EntityId};

// ---------------------------------------------------------------------------
// Scalar decoders
// ---------------------------------------------------------------------------

/// Decode a loosely typed boolean.
///
/// `true`, any non-zero number and the strings `true`, `1`, `yes`, `on`
/// (case-insensitive) are true. Everything else, including null, is false.
pub fn loose_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Like [`loose_bool`], but a missing value yields `default`.
pub fn loose_bool_or(value: &Value, default: bool) -> bool {
    if value.is_null() {
        default
    } else {
        loose_bool(value)
    }
}

/// Decode a loosely typed integer (number or numeric string).
pub fn loose_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode an optional text field. Empty strings count as absent.
pub fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a date stored as ISO text (`2025-03-01` or a full timestamp) or as
/// epoch milliseconds.
pub fn loose_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Array decoders
// ---------------------------------------------------------------------------

/// Decode an array field stored either natively or as JSON text.
///
/// Anything that is not an array (after decoding the text form) yields an
/// empty list. Elements that do not decode as `T` are dropped.
pub fn loose_list<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Encode an array field for storage as JSON text.
pub fn encode_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// A project row as handed over by storage, joined with its children.
///
/// Every field is kept as a raw [`Value`] so that no representation quirk can
/// fail the whole record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredProject {
    pub id: Value,
    pub name: Value,
    pub description: Value,
    pub controller: Value,
    pub dpo_name: Value,
    pub dpo_email: Value,
    pub has_sensitive_data: Value,
    pub has_biometric_data: Value,
    pub has_profile_surveillance: Value,
    pub is_regulated_sector: Value,
    pub has_automated_decision: Value,
    pub has_minor_data: Value,
    pub data_categories: Value,
    pub collection_method: Value,
    pub has_international_transfer: Value,
    pub transfer_countries: Value,
    pub transfer_mechanism: Value,
    pub purposes: Value,
    pub retention_period_months: Value,
    pub retention_justification: Value,
    pub preparer_name: Value,
    pub preparer_role: Value,
    pub manager_name: Value,
    pub manager_role: Value,
    pub status: Value,
    pub operators: Value,
    pub risks: Value,
    pub actions: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredOperator {
    pub id: Value,
    pub name: Value,
    #[serde(rename = "type")]
    pub operator_type: Value,
    pub country: Value,
}

/// Stored risk. Any stored critical value or level is ignored and re-derived.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredRisk {
    pub id: Value,
    pub description: Value,
    pub source: Value,
    pub impact: Value,
    pub probability: Value,
    pub mitigation: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredAction {
    pub id: Value,
    pub measure: Value,
    pub description: Value,
    pub responsible: Value,
    pub deadline: Value,
    pub priority: Value,
    pub status: Value,
}

/// Clamp a stored factor into the matrix range. Missing factors count as 1.
fn factor(value: &Value) -> u8 {
    loose_int(value)
        .unwrap_or(i64::from(MIN_FACTOR))
        .clamp(i64::from(MIN_FACTOR), i64::from(MAX_FACTOR)) as u8
}

fn priority(value: &Value) -> u8 {
    loose_int(value)
        .unwrap_or(i64::from(DEFAULT_PRIORITY))
        .clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY)) as u8
}

fn entity_id(value: &Value) -> EntityId {
    loose_string(value).unwrap_or_else(new_entity_id)
}

fn text(value: &Value) -> String {
    loose_string(value).unwrap_or_default()
}

impl StoredOperator {
    pub fn into_operator(self, project_id: &str) -> Operator {
        Operator::new(
            entity_id(&self.id),
            project_id.to_string(),
            NewOperator {
                name: text(&self.name),
                operator_type: text(&self.operator_type),
                country: loose_string(&self.country),
            },
        )
    }
}

impl StoredRisk {
    pub fn to_new_risk(&self) -> NewRisk {
        NewRisk {
            description: text(&self.description),
            source: text(&self.source),
            impact: factor(&self.impact),
            probability: factor(&self.probability),
            mitigation: loose_string(&self.mitigation),
        }
    }

    pub fn into_risk(self, project_id: &str) -> Risk {
        let input = self.to_new_risk();
        Risk::new(entity_id(&self.id), project_id.to_string(), input)
    }
}

impl StoredAction {
    /// Unknown statuses decode as PENDING.
    pub fn to_new_action(&self) -> NewAction {
        let status = self
            .status
            .as_str()
            .and_then(|s| ActionStatus::from_str_value(s).ok())
            .unwrap_or_default();
        NewAction {
            measure: text(&self.measure),
            description: loose_string(&self.description),
            responsible: loose_string(&self.responsible),
            deadline: loose_date(&self.deadline),
            priority: priority(&self.priority),
            status,
        }
    }

    pub fn into_action(self, project_id: &str) -> Action {
        let input = self.to_new_action();
        Action::new(entity_id(&self.id), project_id.to_string(), input)
    }
}

impl StoredProject {
    /// Decode the descriptive part of the record.
    ///
    /// The regulated-sector flag defaults to true when absent; unknown
    /// statuses decode as DRAFT.
    pub fn details(&self) -> ProjectDetails {
        ProjectDetails {
            name: text(&self.name),
            description: loose_string(&self.description),
            controller: text(&self.controller),
            dpo_name: text(&self.dpo_name),
            dpo_email: loose_string(&self.dpo_email),
            flags: ProcessingFlags {
                has_sensitive_data: loose_bool(&self.has_sensitive_data),
                has_biometric_data: loose_bool(&self.has_biometric_data),
                has_profile_surveillance: loose_bool(&self.has_profile_surveillance),
                is_regulated_sector: loose_bool_or(&self.is_regulated_sector, true),
                has_automated_decision: loose_bool(&self.has_automated_decision),
                has_minor_data: loose_bool(&self.has_minor_data),
            },
            data_categories: loose_list(&self.data_categories),
            collection_method: loose_string(&self.collection_method),
            transfer: InternationalTransfer {
                enabled: loose_bool(&self.has_international_transfer),
                countries: loose_list(&self.transfer_countries),
                mechanism: loose_string(&self.transfer_mechanism),
            },
            purposes: loose_list::<Purpose>(&self.purposes),
            retention: Retention {
                period_months: loose_int(&self.retention_period_months)
                    .and_then(|m| u32::try_from(m).ok()),
                justification: loose_string(&self.retention_justification),
            },
            signatures: Signatures {
                preparer_name: loose_string(&self.preparer_name),
                preparer_role: loose_string(&self.preparer_role),
                manager_name: loose_string(&self.manager_name),
                manager_role: loose_string(&self.manager_role),
            },
            status: self
                .status
                .as_str()
                .and_then(|s| ProjectStatus::from_str_value(s).ok())
                .unwrap_or_default(),
        }
    }

    /// Decode the full record, children included.
    pub fn into_project(self) -> Result<Project, CoreError> {
        let id = entity_id(&self.id);
        let details = self.details();
        let operators = loose_list::<StoredOperator>(&self.operators)
            .into_iter()
            .map(|o| o.into_operator(&id))
            .collect();
        let risks = loose_list::<StoredRisk>(&self.risks)
            .into_iter()
            .map(|r| r.into_risk(&id))
            .collect();
        let actions = loose_list::<StoredAction>(&self.actions)
            .into_iter()
            .map(|a| a.into_action(&id))
            .collect();
        Project::restore(id, details, operators, risks, actions)
    }
}

/// Decode a stored project document.
pub fn project_from_json(text: &str) -> Result<Project, CoreError> {
    let stored: StoredProject = serde_json::from_str(text)
        .map_err(|e| CoreError::Validation(format!("Malformed project document: {e}")))?;
    stored.into_project()
}

/// Encode a project's own row in storage shape: array fields become JSON
/// text, children are left to their own tables.
pub fn encode_project_row(project: &Project) -> Value {
    let d = &project.details;
    json!({
        "id": project.id,
        "name": d.name,
        "description": d.description,
        "controller": d.controller,
        "dpoName": d.dpo_name,
        "dpoEmail": d.dpo_email,
        "hasSensitiveData": d.flags.has_sensitive_data,
        "hasBiometricData": d.flags.has_biometric_data,
        "hasProfileSurveillance": d.flags.has_profile_surveillance,
        "isRegulatedSector": d.flags.is_regulated_sector,
        "hasAutomatedDecision": d.flags.has_automated_decision,
        "hasMinorData": d.flags.has_minor_data,
        "dataCategories": encode_list(&d.data_categories),
        "collectionMethod": d.collection_method,
        "hasInternationalTransfer": d.transfer.enabled,
        "transferCountries": encode_list(&d.transfer.countries),
        "transferMechanism": d.transfer.mechanism,
        "purposes": encode_list(&d.purposes),
        "retentionPeriodMonths": d.retention.period_months,
        "retentionJustification": d.retention.justification,
        "preparerName": d.signatures.preparer_name,
        "preparerRole": d.signatures.preparer_role,
        "managerName": d.signatures.manager_name,
        "managerRole": d.signatures.manager_role,
        "status": d.status.as_str(),
        "maturityScore": project.maturity_score(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::risk::RiskLevel;

    #[test]
    fn test_loose_bool_accepts_storage_spellings() {
        assert!(loose_bool(&json!(true)));
        assert!(loose_bool(&json!(1)));
        assert!(loose_bool(&json!("true")));
        assert!(loose_bool(&json!("TRUE")));
        assert!(loose_bool(&json!("1")));
        assert!(!loose_bool(&json!(false)));
        assert!(!loose_bool(&json!(0)));
        assert!(!loose_bool(&json!("false")));
        assert!(!loose_bool(&json!("0")));
        assert!(!loose_bool(&json!(null)));
        assert!(!loose_bool(&json!([])));
    }

    #[test]
    fn test_loose_bool_or_default_only_for_missing() {
        assert!(loose_bool_or(&Value::Null, true));
        assert!(!loose_bool_or(&json!("false"), true));
    }

    #[test]
    fn test_loose_list_decodes_native_and_text_arrays() {
        let native: Vec<String> = loose_list(&json!(["health", "location"]));
        assert_eq!(native, vec!["health", "location"]);
        let text: Vec<String> = loose_list(&json!("[\"health\",\"gaming\"]"));
        assert_eq!(text, vec!["health", "gaming"]);
    }

    #[test]
    fn test_loose_list_recovers_to_empty() {
        assert!(loose_list::<String>(&json!("not json")).is_empty());
        assert!(loose_list::<String>(&json!("{\"a\":1}")).is_empty());
        assert!(loose_list::<String>(&json!(null)).is_empty());
        assert!(loose_list::<String>(&json!(42)).is_empty());
        assert!(loose_list::<String>(&json!("")).is_empty());
    }

    #[test]
    fn test_loose_list_drops_undecodable_elements() {
        let items: Vec<String> = loose_list(&json!(["a", 1, "b", null]));
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_loose_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(loose_date(&json!("2025-03-01")), Some(expected));
        assert_eq!(loose_date(&json!("2025-03-01T12:30:00.000Z")), Some(expected));
        assert_eq!(loose_date(&json!(1_740_830_400_000i64)), Some(expected));
        assert_eq!(loose_date(&json!("soon")), None);
    }

    #[test]
    fn test_encode_list_round_trips_through_loose_list() {
        let encoded = encode_list(&["Brasil".to_string(), "EUA".to_string()]);
        assert_eq!(encoded, "[\"Brasil\",\"EUA\"]");
        let decoded: Vec<String> = loose_list(&Value::String(encoded));
        assert_eq!(decoded, vec!["Brasil", "EUA"]);
    }

    #[test]
    fn test_sqlite_style_record_normalizes() {
        let stored = json!({
            "id": "p1",
            "name": "Cadastro",
            "controller": "Bet Co",
            "dpoName": "Ana",
            "hasSensitiveData": "true",
            "hasBiometricData": 1,
            "hasMinorData": "0",
            "dataCategories": "[\"identification\",\"biometric\"]",
            "transferCountries": "broken",
            "hasInternationalTransfer": 0,
            "purposes": "[{\"purpose\":\"KYC\",\"legalBasis\":\"LEGAL_OBLIGATION\"}]",
            "retentionPeriodMonths": "60",
            "status": "IN_REVIEW",
            "operators": [{"id": "o1", "name": "AWS", "type": "Cloud", "country": "EUA"}],
            "risks": [{"id": "r1", "description": "Vazamento", "source": "Ataque",
                       "impact": "5", "probability": 4, "criticalValue": 3, "level": "LOW"}],
            "actions": [
                {"id": "a1", "measure": "MFA", "priority": 5, "status": "COMPLETED",
                 "deadline": "2025-03-01T00:00:00.000Z"},
                {"id": "a2", "measure": "RBAC", "priority": "4", "status": "WEIRD"}
            ]
        });
        let project = project_from_json(&stored.to_string()).unwrap();
        let d = &project.details;

        assert!(d.flags.has_sensitive_data);
        assert!(d.flags.has_biometric_data);
        assert!(!d.flags.has_minor_data);
        assert!(d.flags.is_regulated_sector);
        assert_eq!(d.data_categories, vec!["identification", "biometric"]);
        assert!(d.transfer.countries.is_empty());
        assert_eq!(d.purposes[0].legal_basis, "LEGAL_OBLIGATION");
        assert_eq!(d.retention.period_months, Some(60));
        assert_eq!(d.status, ProjectStatus::InReview);

        assert_eq!(project.operators()[0].operator_type, "Cloud");
        assert_eq!(project.operators()[0].project_id(), "p1");

        let risk = &project.risks()[0];
        assert_eq!(risk.critical_value(), 20);
        assert_eq!(risk.level(), RiskLevel::Critical);

        assert_eq!(project.actions()[1].status, ActionStatus::Pending);
        assert_eq!(project.actions()[1].priority, 4);
        assert_eq!(project.maturity_score(), 2.5);
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let stored = json!({"name": "X", "risks": [{"description": "d", "impact": 9, "probability": -2}]});
        let project = project_from_json(&stored.to_string()).unwrap();
        assert!(!project.id.is_empty());
        let risk = &project.risks()[0];
        assert!(!risk.id.is_empty());
        assert_eq!(risk.impact(), MAX_FACTOR);
        assert_eq!(risk.probability(), MIN_FACTOR);
    }

    #[test]
    fn test_unparseable_document_is_rejected() {
        assert_matches!(project_from_json("not json"), Err(CoreError::Validation(_)));
        assert_matches!(project_from_json("42"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_encode_row_writes_arrays_as_text() {
        let stored = json!({"id": "p1", "name": "X", "dataCategories": ["health"]});
        let project = project_from_json(&stored.to_string()).unwrap();
        let row = encode_project_row(&project);
        assert_eq!(row["dataCategories"], "[\"health\"]");
        assert_eq!(row["transferCountries"], "[]");
        assert_eq!(row["isRegulatedSector"], true);
        assert_eq!(row["status"], "DRAFT");
    }
}
