//! Prompt construction for risk, action and chat requests.

use ripd_core::labels::data_category_label;
use ripd_core::project::Project;

use crate::provider::PromptRequest;

/// Sampling temperature for structured (JSON) generation.
pub const GENERATION_TEMPERATURE: f32 = 0.5;
/// Token budget for structured generation.
pub const GENERATION_MAX_TOKENS: u32 = 2048;
/// Sampling temperature for chat answers.
pub const CHAT_TEMPERATURE: f32 = 0.7;
/// Token budget for chat answers.
pub const CHAT_MAX_TOKENS: u32 = 1024;

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "Sim"
    } else {
        "Não"
    }
}

fn joined_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

/// Ask for 4 to 6 risks as a JSON array.
pub fn risk_prompt(project: &Project) -> PromptRequest {
    let details = &project.details;
    let flags = &details.flags;
    let categories: Vec<String> = details
        .data_categories
        .iter()
        .map(|c| data_category_label(c).to_string())
        .collect();
    let purposes: Vec<String> = details.purposes.iter().map(|p| p.purpose.clone()).collect();

    let prompt = format!(
        "Você é um analista de riscos de privacidade. Gere uma lista de riscos para o projeto: \"{name}\".
Contexto:
- Dados Sensíveis: {sensitive}
- Biométricos: {biometric}
- Menores: {minors}
- Decisões Automatizadas: {automated}
- Setor Regulado: {regulated}
- Transferência Internacional: {transfer}
- Categorias: {categories}
- Finalidades: {purposes}

Retorne APENAS um array JSON válido de objetos com:
- description: descrição clara do risco
- source: fonte do risco (ex: Processamento indevido)
- impact: 1 a 5
- probability: 1 a 5
- mitigation: sugestão de medida inicial

Gere entre 4 e 6 riscos relevantes.
Retorne SOMENTE o JSON, sem texto adicional.",
        name = details.name,
        sensitive = yes_no(flags.has_sensitive_data),
        biometric = yes_no(flags.has_biometric_data),
        minors = yes_no(flags.has_minor_data),
        automated = yes_no(flags.has_automated_decision),
        regulated = yes_no(flags.is_regulated_sector),
        transfer = yes_no(details.transfer.enabled),
        categories = joined_or(&categories, "não informadas"),
        purposes = joined_or(&purposes, "não informadas"),
    );

    PromptRequest::new(prompt, GENERATION_TEMPERATURE, GENERATION_MAX_TOKENS)
}

/// Ask for an action plan mitigating the project's current risks.
pub fn action_prompt(project: &Project) -> PromptRequest {
    let details = &project.details;
    let risks: Vec<String> = project
        .risks()
        .iter()
        .map(|r| r.description.clone())
        .collect();

    let prompt = format!(
        "Você é um gestor de segurança e privacidade. Gere um plano de ação para o projeto: \"{name}\".
Riscos identificados: {risks}
Contexto:
- Dados Sensíveis: {sensitive}
- Biométricos: {biometric}

Retorne APENAS um array JSON válido de objetos com:
- measure: Nome da medida (ex: MFA)
- description: O que deve ser feito
- responsible: Área responsável (ex: TI)
- priority: 1 a 5
- deadline: data limite no formato AAAA-MM-DD (opcional)

Gere medidas práticas para mitigar os riscos informados.
Retorne SOMENTE o JSON, sem texto adicional.",
        name = details.name,
        risks = joined_or(&risks, "nenhum risco mapeado"),
        sensitive = yes_no(details.flags.has_sensitive_data),
        biometric = yes_no(details.flags.has_biometric_data),
    );

    PromptRequest::new(prompt, GENERATION_TEMPERATURE, GENERATION_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripd_core::project::{ProjectDetails, Purpose};
    use ripd_core::risk::NewRisk;

    fn project() -> Project {
        let mut details = ProjectDetails {
            name: "Cadastro KYC".into(),
            controller: "Bet Co".into(),
            dpo_name: "Ana".into(),
            data_categories: vec!["biometric".into(), "custom".into()],
            purposes: vec![Purpose {
                purpose: "KYC".into(),
                legal_basis: "Obrigação legal".into(),
            }],
            ..Default::default()
        };
        details.flags.has_biometric_data = true;
        Project::new("p-1".into(), details)
    }

    #[test]
    fn test_risk_prompt_carries_project_context() {
        let request = risk_prompt(&project());
        assert!(request.prompt.contains("\"Cadastro KYC\""));
        assert!(request.prompt.contains("- Biométricos: Sim"));
        assert!(request.prompt.contains("- Dados Sensíveis: Não"));
        assert!(request.prompt.contains("Categorias: Biométrico, custom"));
        assert!(request.prompt.contains("Finalidades: KYC"));
        assert!(request.prompt.contains("entre 4 e 6 riscos"));
        assert_eq!(request.temperature, GENERATION_TEMPERATURE);
        assert_eq!(request.max_tokens, GENERATION_MAX_TOKENS);
        assert!(request.system.is_none());
    }

    #[test]
    fn test_action_prompt_lists_risks() {
        let mut project = project();
        project.add_risk(NewRisk {
            description: "Vazamento de biometria".into(),
            source: "Sistema".into(),
            impact: 5,
            probability: 2,
            mitigation: None,
        });
        let request = action_prompt(&project);
        assert!(request.prompt.contains("Riscos identificados: Vazamento de biometria"));
        assert!(request.prompt.contains("- measure:"));
    }

    #[test]
    fn test_action_prompt_without_risks() {
        let request = action_prompt(&project());
        assert!(request.prompt.contains("nenhum risco mapeado"));
    }
}
