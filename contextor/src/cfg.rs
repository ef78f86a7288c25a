//! Runtime configuration loaded from environment variables.

use ai_llm_service::config::default_config::DEFAULT_CHAT_MODEL;

use crate::prompt::{DEFAULT_SYSTEM, PromptTemplate};
use crate::retry::RetryConfig;

/// Context window of the default chat model.
pub const CONTEXT_WINDOW: usize = 4096;
/// Tokens kept free for the model's answer.
pub const RESPONSE_MARGIN: usize = 500;
pub const DEFAULT_TOKEN_BUDGET: usize = CONTEXT_WINDOW - RESPONSE_MARGIN;
pub const DEFAULT_TOP_N: usize = 100;

/// Config bag for the QA pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    /// Model asked to answer; also passed as the chat override.
    pub chat_model: String,
    /// Model whose encoding is used for token counting.
    pub tokenizer_model: String,

    pub token_budget: usize,
    pub top_n: usize,
    pub temperature: f32,

    pub system_prompt: String,
    pub template: PromptTemplate,

    pub retry: RetryConfig,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tokenizer_model: DEFAULT_CHAT_MODEL.to_string(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            top_n: DEFAULT_TOP_N,
            temperature: 0.0,
            system_prompt: DEFAULT_SYSTEM.to_string(),
            template: PromptTemplate::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ContextorConfig {
    /// Build from environment variables, keeping defaults for anything unset
    /// or unparsable.
    ///
    /// `TOKENIZER_MODEL` falls back to `GPT_MODEL`, which is only right when
    /// the chat model is one the tokenizer knows; set it explicitly for Ollama.
    ///
    /// # Example
    /// ```
    /// # use contextor::cfg::ContextorConfig;
    /// let cfg = ContextorConfig::from_env();
    /// assert!(cfg.top_n >= 1);
    /// ```
    pub fn from_env() -> Self {
        let d = Self::default();
        let chat_model = env("GPT_MODEL", &d.chat_model);
        let tokenizer_model = env("TOKENIZER_MODEL", &chat_model);

        let retry = RetryConfig {
            max_retries: parse("LLM_MAX_RETRIES", d.retry.max_retries),
            initial_backoff_ms: parse("LLM_RETRY_INITIAL_MS", d.retry.initial_backoff_ms),
            backoff_multiplier: d.retry.backoff_multiplier,
            max_backoff_ms: parse("LLM_RETRY_MAX_MS", d.retry.max_backoff_ms),
        };

        Self {
            chat_model,
            tokenizer_model,
            token_budget: parse("TOKEN_BUDGET", d.token_budget),
            top_n: parse("RAG_TOP_N", d.top_n).max(1),
            temperature: parse("LLM_TEMPERATURE", d.temperature),
            retry,
            ..d
        }
    }

    /// `requested` when non-zero, the configured `top_n` otherwise.
    pub fn effective_top_n(&self, requested: usize) -> usize {
        if requested == 0 { self.top_n } else { requested }
    }
}

fn env(k: &str, dflt: &str) -> String {
    match std::env::var(k) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => dflt.to_string(),
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_handbook_service() {
        let c = ContextorConfig::default();
        assert_eq!(c.token_budget, 3596);
        assert_eq!(c.top_n, 100);
        assert_eq!(c.temperature, 0.0);
        assert_eq!(c.tokenizer_model, c.chat_model);
    }

    #[test]
    fn zero_top_n_uses_configured_value() {
        let c = ContextorConfig::default();
        assert_eq!(c.effective_top_n(0), 100);
        assert_eq!(c.effective_top_n(7), 7);
    }
}
