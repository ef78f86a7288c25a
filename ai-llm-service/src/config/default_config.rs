//! Default LLM configs loaded from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by provider and role. Two roles are used by the handbook pipeline:
//!
//! - **Chat**      → answer generation
//! - **Embedding** → query embedding (must match the corpus embedding model)
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`openai` (default) or `ollama`)
//! - `LLM_MAX_TOKENS`   = optional max tokens to generate (u32)
//! - `LLM_TEMPERATURE`  = chat temperature (default `0.0`)
//! - `LLM_TIMEOUT_SECS` = request timeout (default 60)
//! - `GPT_MODEL`        = chat model (default `gpt-3.5-turbo`)
//! - `EMBEDDING_MODEL`  = embedding model (default `text-embedding-ada-002`)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` (mandatory)
//! - `OPENAI_URL`     (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Resolves `(chat, embedding)` profiles for the provider selected by `LLM_KIND`.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - any error of the provider-specific constructors
pub fn profiles_from_env() -> Result<(LlmModelConfig, LlmModelConfig), AiLlmError> {
    let kind = env_or("LLM_KIND", "openai");
    let provider = kind
        .parse::<LlmProvider>()
        .map_err(ConfigError::UnsupportedProvider)?;

    match provider {
        LlmProvider::OpenAI => Ok((config_openai_chat()?, config_openai_embedding()?)),
        LlmProvider::Ollama => Ok((config_ollama_chat()?, config_ollama_embedding()?)),
    }
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", &url)?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn temperature() -> Result<f32, AiLlmError> {
    let raw = env_or("LLM_TEMPERATURE", "0.0");
    match raw.trim().parse::<f32>() {
        Ok(t) if t.is_finite() && (0.0..=2.0).contains(&t) => Ok(t),
        _ => Err(ConfigError::InvalidNumber {
            var: "LLM_TEMPERATURE",
            reason: "expected float in 0.0..=2.0",
        }
        .into()),
    }
}

fn timeout_secs() -> Result<Option<u64>, AiLlmError> {
    Ok(Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60)))
}

/// Chat profile on the OpenAI API.
///
/// # Env
/// - `OPENAI_API_KEY` (required), `OPENAI_URL`, `GPT_MODEL`, `LLM_TEMPERATURE`,
///   `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("GPT_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(temperature()?),
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Embedding profile on the OpenAI API.
///
/// # Env
/// - `OPENAI_API_KEY` (required), `OPENAI_URL`, `EMBEDDING_MODEL`, `LLM_TIMEOUT_SECS`
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Chat profile on a local Ollama runtime.
///
/// # Env
/// - `OLLAMA_URL`/`OLLAMA_PORT` (required), `GPT_MODEL`, `LLM_TEMPERATURE`,
///   `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
pub fn config_ollama_chat() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("GPT_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(temperature()?),
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Embedding profile on a local Ollama runtime.
///
/// # Env
/// - `OLLAMA_URL`/`OLLAMA_PORT` (required), `EMBEDDING_MODEL` (required)
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}
