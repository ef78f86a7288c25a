//! Shared LLM service used by the handbook QA pipeline.
//!
//! Two logical profiles are configured at startup: **chat** (answer
//! generation) and **embedding** (query vectors). Each profile points at a
//! provider backend (OpenAI or Ollama) described by [`LlmModelConfig`].

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
