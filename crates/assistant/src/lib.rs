//! Model-backed assistance for RIPD projects: risk and action generation
//! with a template fallback, and the DPO co-pilot chat.

pub mod chat;
pub mod error;
pub mod generation;
pub mod parse;
pub mod prompts;
pub mod provider;

pub use error::{GenerationError, ProviderError};
pub use generation::{Generated, GenerationService, GenerationSource};
pub use provider::{PromptRequest, TextGenerator};
