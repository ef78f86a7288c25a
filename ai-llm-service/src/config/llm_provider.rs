/// Represents the provider (backend) used for large language model (LLM) inference.
///
/// The handbook pipeline talks to two kinds of backends: the hosted OpenAI
/// API (the default) and a local Ollama runtime.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "ollama".parse().unwrap();
/// assert_eq!(p, LlmProvider::Ollama);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI REST API (`/v1/chat/completions`, `/v1/embeddings`).
    OpenAI,
    /// Local Ollama runtime (`/api/chat`, `/api/embeddings`).
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::OpenAI => f.write_str("OpenAI"),
            LlmProvider::Ollama => f.write_str("Ollama"),
        }
    }
}
