pub mod ollama_service;
pub mod open_ai_service;

/// Per-call overrides for a chat request; unset fields fall back to the
/// profile's [`LlmModelConfig`](crate::LlmModelConfig).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOverrides<'a> {
    pub model: Option<&'a str>,
    pub temperature: Option<f32>,
}
