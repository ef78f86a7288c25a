//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmServiceProfiles, config::default_config::profiles_from_env};
//! use ai_llm_service::services::ChatOverrides;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (chat, embedding) = profiles_from_env()?;
//! let svc = Arc::new(LlmServiceProfiles::new(chat, embedding));
//!
//! let emb = svc.embed("How do I choose a lane?").await?;
//! println!("Embedding dim = {}", emb.len());
//!
//! let txt = svc.chat(Some("Be brief."), "Hello", ChatOverrides::default()).await?;
//! println!("{txt}");
//! # Ok(()) }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::ProviderError,
    services::{ChatOverrides, ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service that manages the **chat** and **embedding** profiles.
///
/// Internally caches Ollama/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Runs a chat completion on the **chat** profile.
    ///
    /// # Errors
    /// Returns [`ProviderError`] if client construction or the request fails.
    pub async fn chat(
        &self,
        system: Option<&str>,
        prompt: &str,
        overrides: ChatOverrides<'_>,
    ) -> Result<String, ProviderError> {
        match self.chat.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.chat).await?;
                cli.chat(system, prompt, overrides).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.chat).await?;
                cli.chat(system, prompt, overrides).await
            }
        }
    }

    /// Computes an embedding on the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`ProviderError`] if client construction or the request fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, ProviderError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, ProviderError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::ProviderErrorKind;

    fn openai(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(10),
        }
    }

    #[tokio::test]
    async fn caches_one_client_per_config() {
        let svc = LlmServiceProfiles::new(openai("gpt-3.5-turbo"), openai("text-embedding-ada-002"));
        let a = svc.get_or_init_openai(&svc.chat).await.unwrap();
        let b = svc.get_or_init_openai(&svc.chat).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let e = svc.get_or_init_openai(&svc.embedding).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &e));
        assert_eq!(svc.openai.read().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_config_is_reported_not_cached() {
        let mut broken = openai("gpt-3.5-turbo");
        broken.api_key = None;
        let svc = LlmServiceProfiles::new(broken, openai("text-embedding-ada-002"));
        let err = svc
            .chat(None, "hello", ChatOverrides::default())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::MissingApiKey));
        assert!(svc.openai.read().await.is_empty());
    }
}
