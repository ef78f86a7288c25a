//! Answer generation seam and its LLM-backed implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::{LlmServiceProfiles, ProviderError, services::ChatOverrides};

/// Produces an answer for a `(system, user)` prompt pair.
///
/// Object-safe so the orchestrator can hold `Arc<dyn AnswerGenerator>` and
/// tests can plug in a fake.
pub trait AnswerGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
        model_id: &'a str,
        temperature: f32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;
}

/// Chat completion through the service's **chat** profile.
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use ai_llm_service::{LlmServiceProfiles, config::default_config::profiles_from_env};
/// # use contextor::llm::{AnswerGenerator, LlmChat};
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (chat, embedding) = profiles_from_env()?;
/// let generator = LlmChat::new(Arc::new(LlmServiceProfiles::new(chat, embedding)));
/// let out = generator.generate("Be brief.", "When may I pass on the right?", "gpt-3.5-turbo", 0.0).await?;
/// println!("{out}");
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct LlmChat {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmChat {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl AnswerGenerator for LlmChat {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
        model_id: &'a str,
        temperature: f32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let overrides = ChatOverrides {
                model: Some(model_id),
                temperature: Some(temperature),
            };
            self.svc
                .chat(Some(system_prompt), user_prompt, overrides)
                .await
        })
    }
}
