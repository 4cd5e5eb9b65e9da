//! Risk and action generation with an offline fallback.
//!
//! The service asks the model first. Any failure (no provider, provider
//! error, output that does not parse or parses to nothing) is logged and
//! replaced by the deterministic templates from `ripd_core::templates`, so a
//! caller always gets a usable list.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use ripd_core::action::NewAction;
use ripd_core::project::Project;
use ripd_core::risk::NewRisk;
use ripd_core::templates::{
    default_deadline, generate_default_actions_with_deadline, generate_default_risks,
    DEFAULT_DEADLINE_DAYS,
};

use crate::error::{GenerationError, ProviderError};
use crate::parse::{parse_actions, parse_risks};
use crate::prompts::{action_prompt, risk_prompt};
use crate::provider::TextGenerator;

/// Where a generated list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Model,
    Fallback,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

/// A generated list together with its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    pub items: Vec<T>,
    pub source: GenerationSource,
}

impl<T> Generated<T> {
    fn model(items: Vec<T>) -> Self {
        Self {
            items,
            source: GenerationSource::Model,
        }
    }

    fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            source: GenerationSource::Fallback,
        }
    }
}

/// Generates risks and actions for a project.
#[derive(Clone)]
pub struct GenerationService {
    generator: Option<Arc<dyn TextGenerator>>,
    deadline_days: u64,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            deadline_days: DEFAULT_DEADLINE_DAYS,
        }
    }

    /// A service without a model; every call uses the templates.
    pub fn offline() -> Self {
        Self {
            generator: None,
            deadline_days: DEFAULT_DEADLINE_DAYS,
        }
    }

    /// Days between the reference date and a generated action's deadline.
    pub fn with_deadline_days(mut self, days: u64) -> Self {
        self.deadline_days = days;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.generator.is_none()
    }

    /// Generate risks for `project`.
    pub async fn generate_risks(&self, project: &Project) -> Generated<NewRisk> {
        match self.model_risks(project).await {
            Ok(risks) => {
                tracing::info!(
                    project_id = %project.id,
                    count = risks.len(),
                    "Generated risks with model"
                );
                Generated::model(risks)
            }
            Err(e) => {
                log_failure(&project.id, "risks", &e);
                let risks = generate_default_risks(project);
                tracing::info!(
                    project_id = %project.id,
                    count = risks.len(),
                    "Using template risks"
                );
                Generated::fallback(risks)
            }
        }
    }

    /// Generate actions for `project`. Deadlines default to `today` plus the
    /// configured number of days.
    pub async fn generate_actions(
        &self,
        project: &Project,
        today: NaiveDate,
    ) -> Generated<NewAction> {
        let deadline = default_deadline(today, self.deadline_days);
        match self.model_actions(project, deadline).await {
            Ok(actions) => {
                tracing::info!(
                    project_id = %project.id,
                    count = actions.len(),
                    "Generated actions with model"
                );
                Generated::model(actions)
            }
            Err(e) => {
                log_failure(&project.id, "actions", &e);
                let actions = generate_default_actions_with_deadline(project, deadline);
                tracing::info!(
                    project_id = %project.id,
                    count = actions.len(),
                    "Using template actions"
                );
                Generated::fallback(actions)
            }
        }
    }

    fn generator(&self) -> Result<&Arc<dyn TextGenerator>, GenerationError> {
        self.generator
            .as_ref()
            .ok_or(GenerationError::Provider(ProviderError::NotConfigured))
    }

    async fn model_risks(&self, project: &Project) -> Result<Vec<NewRisk>, GenerationError> {
        let generator = self.generator()?;
        let text = generator.generate_text(&risk_prompt(project)).await?;
        parse_risks(&text)
    }

    async fn model_actions(
        &self,
        project: &Project,
        deadline: Option<NaiveDate>,
    ) -> Result<Vec<NewAction>, GenerationError> {
        let generator = self.generator()?;
        let text = generator.generate_text(&action_prompt(project)).await?;
        parse_actions(&text, deadline)
    }
}

fn log_failure(project_id: &str, kind: &str, error: &GenerationError) {
    match error {
        GenerationError::Provider(ProviderError::NotConfigured) => {
            tracing::debug!(project_id, kind, "No model configured");
        }
        _ => {
            tracing::warn!(
                project_id,
                kind,
                error = %error,
                "Model generation failed, falling back to templates"
            );
        }
    }
}
