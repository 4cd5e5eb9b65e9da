//! End-to-end: stored record -> normalization -> fallback generation ->
//! aggregate scoring.

use chrono::NaiveDate;
use serde_json::json;

use ripd_core::action::ActionStatus;
use ripd_core::normalize::project_from_json;
use ripd_core::risk::{summarize, RiskLevel};
use ripd_core::templates::{generate_default_actions, generate_default_risks};

fn sensitive_biometric_record() -> String {
    json!({
        "id": "p-42",
        "name": "Cadastro com biometria facial",
        "controller": "Bet Co",
        "dpoName": "Ana Souza",
        "hasSensitiveData": "true",
        "hasBiometricData": 1,
        "hasInternationalTransfer": "false",
        "hasMinorData": 0,
        "hasAutomatedDecision": null
    })
    .to_string()
}

#[test]
fn sensitive_and_biometric_project_gets_high_impact_fallbacks() {
    let project = project_from_json(&sensitive_biometric_record()).unwrap();
    let risks = generate_default_risks(&project);

    let leak = risks
        .iter()
        .find(|r| r.description == "Vazamento de dados pessoais sensíveis")
        .expect("sensitive data leak risk");
    assert_eq!(leak.impact, 5);

    let biometric = risks
        .iter()
        .find(|r| r.description.starts_with("Comprometimento de dados biométricos"))
        .expect("biometric compromise risk");
    assert_eq!(biometric.impact, 5);

    assert!(!risks.iter().any(|r| r.description.contains("transferência")));
    assert!(!risks.iter().any(|r| r.description.contains("crianças")));

    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let actions = generate_default_actions(&project, today);

    let encryption = actions
        .iter()
        .find(|a| a.description.as_deref().is_some_and(|d| d.contains("AES-256")))
        .expect("AES-256 encryption action");
    assert_eq!(encryption.priority, 5);

    let dpia = actions
        .iter()
        .find(|a| a.measure.contains("DPIA"))
        .expect("DPIA action");
    assert_eq!(dpia.priority, 5);
    assert_eq!(dpia.status, ActionStatus::Pending);
}

#[test]
fn generated_entries_flow_through_the_aggregate() {
    let mut project = project_from_json(&sensitive_biometric_record()).unwrap();
    let risks = generate_default_risks(&project);
    let actions =
        generate_default_actions(&project, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

    let added = project.add_risks(risks);
    assert_eq!(added, 5);
    project.add_actions(actions);
    assert_eq!(project.maturity_score(), 0.0);

    let first = project.actions()[0].id.clone();
    let second = project.actions()[1].id.clone();
    project.set_action_status(&first, ActionStatus::Completed).unwrap();
    project.set_action_status(&second, ActionStatus::Completed).unwrap();
    // 2 of 6 completed.
    assert_eq!(project.maturity_score(), 1.67);

    for risk in project.risks() {
        assert_eq!(
            u32::from(risk.critical_value()),
            u32::from(risk.impact()) * u32::from(risk.probability())
        );
    }

    let summary = summarize(project.risks());
    assert_eq!(summary.total, 5);
    // 15, 8, 10, 12, 12
    assert_eq!(summary.average_critical_value, 11.4);
    assert_eq!(summary.by_level.get(RiskLevel::High), 1);
    assert_eq!(summary.by_level.get(RiskLevel::Medium), 4);
}
