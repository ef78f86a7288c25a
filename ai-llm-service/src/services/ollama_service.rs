//! Lightweight Ollama service for chat and embeddings.
//!
//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat`       : chat completion (`stream=false`)
//! - `POST {endpoint}/api/embeddings` : embeddings retrieval
//!
//! Uses the universal [`LlmModelConfig`] and requires the provider to be
//! [`LlmProvider::Ollama`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{HttpError, ProviderError, ProviderErrorKind, make_snippet},
    services::ChatOverrides,
};

const PROVIDER: LlmProvider = LlmProvider::Ollama;

/// Thin client for Ollama.
///
/// Reuses a single HTTP client with the configured timeout.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not `Ollama`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - `Transport` if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, ProviderError> {
        if cfg.provider != PROVIDER {
            return Err(ProviderError::new(PROVIDER, ProviderErrorKind::InvalidProvider));
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ProviderError::new(PROVIDER, ProviderErrorKind::Transport(e)))?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{base}/api/chat");
        let url_embeddings = format!("{base}/api/embeddings");

        info!(model = %cfg.model, endpoint = %cfg.endpoint, "OllamaService initialized");

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a non-streaming chat request via `/api/chat`.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - `Transport`/`Timeout` for client errors
    /// - `Decode` if the response cannot be parsed
    /// - `EmptyChoices` if the reply has no message
    #[instrument(skip_all, fields(model = %overrides.model.unwrap_or(&self.cfg.model)))]
    pub async fn chat(
        &self,
        system: Option<&str>,
        prompt: &str,
        overrides: ChatOverrides<'_>,
    ) -> Result<String, ProviderError> {
        let started = Instant::now();
        let body = ChatRequest::new(&self.cfg, system, prompt, overrides);

        debug!(prompt_len = prompt.len(), "POST {}", self.url_chat);
        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_chat).await);
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Decode(format!("serde error: {e}; ensure `stream=false` is used")),
            )
        })?;

        let content = out
            .message
            .map(|m| m.content)
            .ok_or_else(|| ProviderError::new(PROVIDER, ProviderErrorKind::EmptyChoices))?;

        info!(latency_ms = started.elapsed().as_millis(), "chat completed");
        Ok(content)
    }

    /// Retrieves embeddings via `/api/embeddings`.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - `Transport`/`Timeout` for client errors
    /// - `Decode` if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_embeddings).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ embedding: number[] }}`"
                )),
            )
        })?;

        Ok(out.embedding)
    }

    fn transport(&self, e: reqwest::Error) -> ProviderError {
        ProviderError::transport(PROVIDER, e, self.cfg.timeout().as_secs())
    }

    async fn status_error(&self, resp: reqwest::Response, url: &str) -> ProviderError {
        let status = resp.status();
        let snippet = make_snippet(&resp.text().await.unwrap_or_default());
        error!(%status, %url, %snippet, "Ollama returned non-success status");
        ProviderError::new(
            PROVIDER,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
    }
}

/* ==========================
HTTP payloads & options
========================== */

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

impl<'a> ChatRequest<'a> {
    fn new(
        cfg: &'a LlmModelConfig,
        system: Option<&'a str>,
        prompt: &'a str,
        overrides: ChatOverrides<'a>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: overrides.model.unwrap_or(&cfg.model),
            messages,
            stream: false,
            options: ChatOptions {
                temperature: overrides.temperature.or(cfg.temperature),
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<OutMessage>,
}

#[derive(Debug, Deserialize)]
struct OutMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: None,
        }
    }

    #[test]
    fn rejects_foreign_provider() {
        let mut c = cfg();
        c.provider = LlmProvider::OpenAI;
        let err = OllamaService::new(c).err().unwrap();
        assert!(matches!(err.kind, ProviderErrorKind::InvalidProvider));
    }

    #[test]
    fn chat_request_shape() {
        let c = cfg();
        let req = ChatRequest::new(&c, None, "hi", ChatOverrides::default());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["stream"], false);
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["options"]["num_predict"], 256);
        assert!((v["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }
}
