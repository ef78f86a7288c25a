use ai_llm_service::ProviderError;
use std::{future::Future, pin::Pin};

/// Provider interface for query embedding.
///
/// Async because real providers (OpenAI, Ollama) perform HTTP requests.
/// Implement this trait to plug in another backend or an in-memory fake.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds `text` with the provider's embedding model.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, ProviderError>> + Send + 'a>>;

    /// Identifier of the embedding model, for logs.
    fn model_id(&self) -> &str;
}

pub mod llm_embedder;
