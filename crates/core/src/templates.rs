//! Deterministic risk and action templates.
//!
//! These rule tables are the offline fallback for generation: each project
//! flag appends a fixed set of entries and a baseline set is always added.
//! No randomness and no external calls, so the same project always yields
//! the same output.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::action::{ActionStatus, NewAction};
use crate::project::Project;
use crate::risk::NewRisk;

/// Days between the generation date and a generated action's deadline.
pub const DEFAULT_DEADLINE_DAYS: u64 = 30;

/// Responsible party used when a template does not name one.
pub const DEFAULT_RESPONSIBLE: &str = "TI / Segurança";

fn risk(description: &str, source: &str, impact: u8, probability: u8, mitigation: &str) -> NewRisk {
    NewRisk {
        description: description.to_string(),
        source: source.to_string(),
        impact,
        probability,
        mitigation: Some(mitigation.to_string()),
    }
}

/// Canned risks for a project.
///
/// The two baseline risks (unauthorized access, loss of availability) are
/// always appended after the flag-driven ones, without deduplication.
pub fn generate_default_risks(project: &Project) -> Vec<NewRisk> {
    let flags = &project.details.flags;
    let mut risks = Vec::new();

    if flags.has_sensitive_data {
        risks.push(risk(
            "Vazamento de dados pessoais sensíveis",
            "Acesso não autorizado ou falha de segurança",
            5,
            3,
            "Implementar criptografia, controle de acesso rigoroso e logs de auditoria",
        ));
        risks.push(risk(
            "Tratamento discriminatório indevido",
            "Algoritmos ou processos de decisão",
            4,
            2,
            "Revisão humana de decisões e análise de impacto discriminatório",
        ));
    }

    if project.details.transfer.enabled {
        risks.push(risk(
            "Insegurança na transferência internacional de dados",
            "Transferência para países sem nível adequado de proteção",
            4,
            3,
            "Utilizar Cláusulas Padrão Contratuais e verificar adequação do país destino",
        ));
    }

    if flags.has_biometric_data {
        risks.push(risk(
            "Comprometimento de dados biométricos (irreversível)",
            "Vazamento de banco de dados biométricos",
            5,
            2,
            "Armazenar apenas templates (hashes), nunca a imagem bruta, e usar criptografia forte",
        ));
    }

    if flags.has_minor_data {
        risks.push(risk(
            "Exposição indevida de dados de crianças/adolescentes",
            "Coleta excessiva ou falta de consentimento parental",
            5,
            3,
            "Coletar consentimento específico e destaque, minimizar dados coletados",
        ));
    }

    if flags.has_automated_decision {
        risks.push(risk(
            "Decisões automatizadas opacas ou injustas",
            "Algoritmos de IA ou Machine Learning",
            4,
            3,
            "Garantir transparência, explicabilidade e direito de revisão humana",
        ));
    }

    risks.push(risk(
        "Acesso não autorizado a dados pessoais",
        "Falha em autenticação ou controle de acesso",
        4,
        3,
        "Implementar MFA, política de senhas fortes e revisão periódica de acessos",
    ));
    risks.push(risk(
        "Perda de disponibilidade dos dados",
        "Falha técnica, desastre ou ransomware",
        4,
        3,
        "Backup regular com testes de restore e plano de recuperação de desastres",
    ));

    risks
}

/// Collects actions for one generation pass, skipping measures already added.
struct ActionPlanBuilder {
    deadline: Option<NaiveDate>,
    seen: HashSet<String>,
    actions: Vec<NewAction>,
}

impl ActionPlanBuilder {
    fn new(deadline: Option<NaiveDate>) -> Self {
        Self {
            deadline,
            seen: HashSet::new(),
            actions: Vec::new(),
        }
    }

    fn add(&mut self, measure: &str, description: &str, responsible: &str, priority: u8) {
        if !self.seen.insert(measure.to_string()) {
            return;
        }
        self.actions.push(NewAction {
            measure: measure.to_string(),
            description: Some(description.to_string()),
            responsible: Some(responsible.to_string()),
            deadline: self.deadline,
            priority,
            status: ActionStatus::Pending,
        });
    }
}

/// Deadline for generated actions: `today` plus `days`.
pub fn default_deadline(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days))
}

/// Canned action plan for a project.
///
/// Every action is PENDING with a deadline [`DEFAULT_DEADLINE_DAYS`] after
/// `today`. A measure never appears twice in the result.
pub fn generate_default_actions(project: &Project, today: NaiveDate) -> Vec<NewAction> {
    generate_default_actions_with_deadline(project, default_deadline(today, DEFAULT_DEADLINE_DAYS))
}

/// Same as [`generate_default_actions`] with an explicit deadline.
pub fn generate_default_actions_with_deadline(
    project: &Project,
    deadline: Option<NaiveDate>,
) -> Vec<NewAction> {
    let flags = &project.details.flags;
    let mut plan = ActionPlanBuilder::new(deadline);

    if flags.has_sensitive_data || flags.has_biometric_data {
        plan.add(
            "Criptografia de Dados Sensíveis",
            "Implementar criptografia AES-256 para dados em repouso e TLS 1.3 para dados em trânsito.",
            "TI / Engenharia",
            5,
        );
        plan.add(
            "Relatório de Impacto (DPIA)",
            "Elaborar e manter atualizado o Relatório de Impacto à Proteção de Dados Pessoais.",
            "DPO / Jurídico",
            5,
        );
    }

    if project.details.transfer.enabled {
        plan.add(
            "Cláusulas Padrão Contratuais",
            "Revisar contratos com operadores internacionais para incluir cláusulas padrão de proteção de dados.",
            "Jurídico",
            5,
        );
        plan.add(
            "Avaliação de Transferência (TIA)",
            "Realizar Transfer Impact Assessment para países de destino.",
            "DPO / Jurídico",
            4,
        );
    }

    if flags.has_automated_decision {
        plan.add(
            "Revisão Humana de Decisões",
            "Implementar processo para garantir intervenção humana quando solicitado pelo titular.",
            "Operações / Produto",
            4,
        );
    }

    if flags.has_minor_data {
        plan.add(
            "Gestão de Consentimento de Menores",
            "Implementar fluxo de coleta de consentimento verificado dos pais ou responsáveis.",
            "Produto / Jurídico",
            5,
        );
    }

    plan.add(
        "Controle de Acesso (RBAC)",
        "Implementar controle de acesso baseado em funções (Role-Based Access Control) com princípio do menor privilégio.",
        DEFAULT_RESPONSIBLE,
        4,
    );
    plan.add(
        "Autenticação Multifator (MFA)",
        "Exigir MFA para todos os acessos administrativos e a dados críticos.",
        DEFAULT_RESPONSIBLE,
        5,
    );
    plan.add(
        "Política de Retenção de Dados",
        "Configurar exclusão automática de dados após o fim do período de retenção legal/negocial.",
        "TI / Dados",
        3,
    );
    plan.add(
        "Treinamento em Proteção de Dados",
        "Realizar treinamento de conscientização sobre LGPD para todos os colaboradores envolvidos.",
        "RH / DPO",
        3,
    );

    plan.actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProcessingFlags, ProjectDetails};
    use crate::risk::{RiskLevel, Scored};

    fn project(flags: ProcessingFlags, transfer: bool) -> Project {
        let mut details = ProjectDetails {
            name: "Cadastro".into(),
            controller: "Bet Co".into(),
            dpo_name: "Ana".into(),
            flags,
            ..Default::default()
        };
        details.transfer.enabled = transfer;
        Project::new("p1".into(), details)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    #[test]
    fn test_no_flags_yields_only_baseline() {
        let p = project(ProcessingFlags::default(), false);
        let risks = generate_default_risks(&p);
        assert_eq!(risks.len(), 2);
        assert!(risks[0].description.contains("Acesso não autorizado"));
        assert!(risks[1].description.contains("disponibilidade"));

        let actions = generate_default_actions(&p, today());
        let measures: Vec<&str> = actions.iter().map(|a| a.measure.as_str()).collect();
        assert_eq!(
            measures,
            vec![
                "Controle de Acesso (RBAC)",
                "Autenticação Multifator (MFA)",
                "Política de Retenção de Dados",
                "Treinamento em Proteção de Dados",
            ]
        );
    }

    #[test]
    fn test_every_flag_adds_its_risks_before_baseline() {
        let flags = ProcessingFlags {
            has_sensitive_data: true,
            has_biometric_data: true,
            has_minor_data: true,
            has_automated_decision: true,
            ..Default::default()
        };
        let risks = generate_default_risks(&project(flags, true));
        assert_eq!(risks.len(), 8);
        assert!(risks[2].description.contains("transferência internacional"));
        assert!(risks[6].description.starts_with("Acesso não autorizado"));
    }

    #[test]
    fn test_baseline_risks_are_not_deduplicated_against_flag_risks() {
        let flags = ProcessingFlags {
            has_sensitive_data: true,
            ..Default::default()
        };
        let risks = generate_default_risks(&project(flags, false));
        // Sensitive-data leak already covers unauthorized access, the
        // baseline access risk is still appended.
        assert_eq!(risks.len(), 4);
        assert_eq!(
            risks.iter().filter(|r| r.source.contains("Acesso não autorizado")).count(),
            1
        );
        assert!(risks.iter().any(|r| r.description == "Acesso não autorizado a dados pessoais"));
    }

    #[test]
    fn test_generated_risks_score_like_any_risk() {
        let flags = ProcessingFlags {
            has_sensitive_data: true,
            ..Default::default()
        };
        let risks = generate_default_risks(&project(flags, false));
        assert_eq!(risks[0].score().critical_value, 15);
        assert_eq!(risks[0].score().level, RiskLevel::High);
        assert_eq!(risks[1].score().level, RiskLevel::Medium);
    }

    #[test]
    fn test_sensitive_and_biometric_do_not_duplicate_encryption() {
        let flags = ProcessingFlags {
            has_sensitive_data: true,
            has_biometric_data: true,
            ..Default::default()
        };
        let actions = generate_default_actions(&project(flags, false), today());
        let mut seen = HashSet::new();
        for action in &actions {
            assert!(seen.insert(action.measure.clone()), "duplicate {}", action.measure);
        }
        assert_eq!(actions.len(), 6);
    }

    #[test]
    fn test_all_flags_yield_unique_measures() {
        let flags = ProcessingFlags {
            has_sensitive_data: true,
            has_biometric_data: true,
            has_profile_surveillance: true,
            is_regulated_sector: true,
            has_automated_decision: true,
            has_minor_data: true,
        };
        let actions = generate_default_actions(&project(flags, true), today());
        let unique: HashSet<&str> = actions.iter().map(|a| a.measure.as_str()).collect();
        assert_eq!(unique.len(), actions.len());
        assert_eq!(actions.len(), 10);
    }

    #[test]
    fn test_actions_are_pending_with_thirty_day_deadline() {
        let actions =
            generate_default_actions(&project(ProcessingFlags::default(), false), today());
        let expected = NaiveDate::from_ymd_opt(2026, 2, 9);
        for action in &actions {
            assert_eq!(action.status, ActionStatus::Pending);
            assert_eq!(action.deadline, expected);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let flags = ProcessingFlags {
            has_minor_data: true,
            ..Default::default()
        };
        let p = project(flags, true);
        assert_eq!(generate_default_risks(&p), generate_default_risks(&p));
        assert_eq!(
            generate_default_actions(&p, today()),
            generate_default_actions(&p, today())
        );
    }
}
