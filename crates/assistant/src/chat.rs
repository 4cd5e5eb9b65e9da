//! DPO co-pilot chat.
//!
//! Builds a system prompt from the wizard state and forwards the user's
//! question to the model. Replies never fail: provider errors become short
//! user-facing messages in Portuguese.

use std::sync::Arc;

use serde::Deserialize;

use ripd_core::labels::{action_status_label, risk_level_label};
use ripd_core::project::Project;

use crate::error::ProviderError;
use crate::prompts::{yes_no, CHAT_MAX_TOKENS, CHAT_TEMPERATURE};
use crate::provider::{PromptRequest, TextGenerator};

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// Number of steps in the project wizard.
pub const STEP_COUNT: u8 = 6;

const STEP_NAMES: [&str; STEP_COUNT as usize] = [
    "Agentes e Projeto",
    "Natureza do Tratamento",
    "Ciclo de Vida",
    "Matriz de Riscos",
    "Plano de Ação",
    "Aprovações",
];

/// Name used for a step outside `1..=STEP_COUNT`.
pub const GENERIC_STEP_NAME: &str = "Preenchimento";

/// Display name of a 1-based wizard step.
pub fn step_name(step: u8) -> &'static str {
    match step {
        1..=STEP_COUNT => STEP_NAMES[usize::from(step - 1)],
        _ => GENERIC_STEP_NAME,
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

pub const NOT_CONFIGURED_REPLY: &str =
    "O assistente de IA não está configurado. Verifique a chave de API do provedor.";
pub const RATE_LIMITED_REPLY: &str =
    "Estamos com muitas requisições no momento. Por favor, aguarde alguns segundos e tente novamente.";
pub const UNAUTHORIZED_REPLY: &str =
    "A chave de API está inválida. Por favor, entre em contato com o administrador do sistema.";
pub const MODEL_UNAVAILABLE_REPLY: &str =
    "O modelo de IA não está disponível. Por favor, entre em contato com o suporte.";
pub const GENERIC_ERROR_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua pergunta. Por favor, tente novamente mais tarde.";
pub const EMPTY_REPLY: &str = "Desculpe, não consegui gerar uma resposta.";

/// User-facing message for a provider failure.
pub fn friendly_error(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::NotConfigured => NOT_CONFIGURED_REPLY,
        ProviderError::RateLimited => RATE_LIMITED_REPLY,
        ProviderError::Unauthorized => UNAUTHORIZED_REPLY,
        ProviderError::ModelUnavailable => MODEL_UNAVAILABLE_REPLY,
        ProviderError::Request(_) => GENERIC_ERROR_REPLY,
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskNote {
    pub description: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionNote {
    pub measure: String,
    pub status: String,
}

/// What the assistant knows about the project being edited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatContext {
    pub project_name: Option<String>,
    pub current_step: u8,
    pub has_sensitive_data: bool,
    pub has_biometric_data: bool,
    pub has_minor_data: bool,
    pub has_profile_surveillance: bool,
    pub risks: Vec<RiskNote>,
    pub actions: Vec<ActionNote>,
}

impl Default for ChatContext {
    fn default() -> Self {
        Self {
            project_name: None,
            current_step: 1,
            has_sensitive_data: false,
            has_biometric_data: false,
            has_minor_data: false,
            has_profile_surveillance: false,
            risks: Vec::new(),
            actions: Vec::new(),
        }
    }
}

impl ChatContext {
    /// Snapshot a project at the given wizard step.
    pub fn from_project(project: &Project, current_step: u8) -> Self {
        let flags = &project.details.flags;
        Self {
            project_name: Some(project.details.name.clone()),
            current_step,
            has_sensitive_data: flags.has_sensitive_data,
            has_biometric_data: flags.has_biometric_data,
            has_minor_data: flags.has_minor_data,
            has_profile_surveillance: flags.has_profile_surveillance,
            risks: project
                .risks()
                .iter()
                .map(|r| RiskNote {
                    description: r.description.clone(),
                    level: r.level().as_str().to_string(),
                })
                .collect(),
            actions: project
                .actions()
                .iter()
                .map(|a| ActionNote {
                    measure: a.measure.clone(),
                    status: a.status.as_str().to_string(),
                })
                .collect(),
        }
    }

    /// System prompt describing the project and the current step.
    pub fn system_prompt(&self) -> String {
        let name = self
            .project_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("sem nome");

        let risks = if self.risks.is_empty() {
            "Nenhum risco mapeado.".to_string()
        } else {
            self.risks
                .iter()
                .map(|r| format!("- {} (Nível: {})", r.description, risk_level_label(&r.level)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let actions = if self.actions.is_empty() {
            "Nenhum plano de ação.".to_string()
        } else {
            self.actions
                .iter()
                .map(|a| format!("- {} (Status: {})", a.measure, action_status_label(&a.status)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let step = self.current_step;
        format!(
            "Você é o DPO Co-Pilot, assistente especialista em LGPD e RIPD.
Projeto: \"{name}\"
Passo Atual: {step} / {STEP_COUNT} ({step_name})

Dados Atuais:
- Sensíveis: {sensitive}
- Biométricos: {biometric}
- Menores: {minors}
- Perfilamento: {profiling}

Riscos do Projeto:
{risks}

Ações Planejadas:
{actions}

Instruções:
- Responda de forma personalizada à pergunta do usuário.
- Use o contexto acima para enriquecer sua resposta.
- Se for uma pergunta teórica sobre LGPD, explique claramente.
- Se for sobre o preenchimento, sugira o que fazer neste passo {step}.
- Responda sempre em português brasileiro.",
            step_name = step_name(step),
            sensitive = yes_no(self.has_sensitive_data),
            biometric = yes_no(self.has_biometric_data),
            minors = yes_no(self.has_minor_data),
            profiling = yes_no(self.has_profile_surveillance),
        )
    }
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

/// Answers user questions about the RIPD being filled in.
#[derive(Clone, Default)]
pub struct ChatAssistant {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ChatAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// An assistant without a model; every reply is [`NOT_CONFIGURED_REPLY`].
    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    /// Answer `message`. Always returns text to show the user.
    pub async fn reply(&self, message: &str, context: &ChatContext) -> String {
        let Some(generator) = &self.generator else {
            tracing::warn!("Chat requested but no model is configured");
            return NOT_CONFIGURED_REPLY.to_string();
        };

        let request = PromptRequest::new(message, CHAT_TEMPERATURE, CHAT_MAX_TOKENS)
            .with_system(context.system_prompt());

        match generator.generate_text(&request).await {
            Ok(answer) if answer.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, step = context.current_step, "Chat generation failed");
                friendly_error(&e).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use ripd_core::action::{ActionStatus, NewAction};
    use ripd_core::project::ProjectDetails;
    use ripd_core::risk::NewRisk;

    /// Records the last request and answers with a fixed result.
    struct Recorder {
        answer: fn() -> Result<String, ProviderError>,
        last: Mutex<Option<PromptRequest>>,
    }

    impl Recorder {
        fn new(answer: fn() -> Result<String, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        async fn generate_text(&self, request: &PromptRequest) -> Result<String, ProviderError> {
            *self.last.lock().unwrap() = Some(request.clone());
            (self.answer)()
        }
    }

    #[test]
    fn test_step_names() {
        assert_eq!(step_name(1), "Agentes e Projeto");
        assert_eq!(step_name(4), "Matriz de Riscos");
        assert_eq!(step_name(6), "Aprovações");
        assert_eq!(step_name(0), GENERIC_STEP_NAME);
        assert_eq!(step_name(7), GENERIC_STEP_NAME);
    }

    #[test]
    fn test_context_from_project() {
        let mut details = ProjectDetails {
            name: "Onboarding".into(),
            ..Default::default()
        };
        details.flags.has_minor_data = true;
        let mut project = Project::new("p-1".into(), details);
        project.add_risk(NewRisk {
            description: "Exposição de menores".into(),
            source: "Cadastro".into(),
            impact: 5,
            probability: 3,
            mitigation: None,
        });
        project.add_action(NewAction {
            measure: "Consentimento parental".into(),
            description: None,
            responsible: None,
            deadline: None,
            priority: 5,
            status: ActionStatus::InProgress,
        });

        let context = ChatContext::from_project(&project, 4);
        let prompt = context.system_prompt();
        assert!(prompt.contains("Projeto: \"Onboarding\""));
        assert!(prompt.contains("Passo Atual: 4 / 6 (Matriz de Riscos)"));
        assert!(prompt.contains("- Menores: Sim"));
        assert!(prompt.contains("- Exposição de menores (Nível: Alto)"));
        assert!(prompt.contains("- Consentimento parental (Status: Em Andamento)"));
    }

    #[test]
    fn test_empty_context_prompt() {
        let prompt = ChatContext::default().system_prompt();
        assert!(prompt.contains("Projeto: \"sem nome\""));
        assert!(prompt.contains("Nenhum risco mapeado."));
        assert!(prompt.contains("Nenhum plano de ação."));
    }

    #[test]
    fn test_context_deserializes_from_wizard_payload() {
        let context: ChatContext = serde_json::from_str(
            r#"{"projectName": "X", "currentStep": 2, "hasSensitiveData": true,
                "risks": [{"description": "R", "level": "CRITICAL"}]}"#,
        )
        .unwrap();
        assert_eq!(context.current_step, 2);
        assert!(context.has_sensitive_data);
        assert_eq!(context.risks[0].level, "CRITICAL");
        assert!(context.actions.is_empty());
    }

    #[tokio::test]
    async fn test_reply_sends_system_prompt_and_message() {
        let recorder = Recorder::new(|| Ok("Use criptografia.".to_string()));
        let assistant = ChatAssistant::new(recorder.clone());
        let reply = assistant.reply("Como proteger?", &ChatContext::default()).await;
        assert_eq!(reply, "Use criptografia.");

        let request = recorder.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.prompt, "Como proteger?");
        assert!(request.system.unwrap().contains("DPO Co-Pilot"));
        assert_eq!(request.temperature, CHAT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_reply_maps_errors_to_friendly_messages() {
        let cases: [(fn() -> Result<String, ProviderError>, &str); 4] = [
            (|| Err(ProviderError::RateLimited), RATE_LIMITED_REPLY),
            (|| Err(ProviderError::Unauthorized), UNAUTHORIZED_REPLY),
            (|| Err(ProviderError::ModelUnavailable), MODEL_UNAVAILABLE_REPLY),
            (|| Err(ProviderError::Request("boom".into())), GENERIC_ERROR_REPLY),
        ];
        for (answer, expected) in cases {
            let assistant = ChatAssistant::new(Recorder::new(answer));
            let reply = assistant.reply("oi", &ChatContext::default()).await;
            assert_eq!(reply, expected);
        }
    }

    #[tokio::test]
    async fn test_blank_answer_becomes_apology() {
        let assistant = ChatAssistant::new(Recorder::new(|| Ok("  ".to_string())));
        assert_eq!(assistant.reply("oi", &ChatContext::default()).await, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_unconfigured_assistant() {
        let reply = ChatAssistant::unconfigured()
            .reply("oi", &ChatContext::default())
            .await;
        assert_eq!(reply, NOT_CONFIGURED_REPLY);
    }
}
