//! Handbook QA gateway.
//!
//! [`Contextor::ask`] embeds the question, ranks the handbook corpus by cosine
//! similarity, packs the best passages into a token-budgeted prompt, asks the
//! chat model, and returns its answer verbatim.

pub mod cfg;
mod error;
pub mod llm;
pub mod prompt;
pub mod retry;
pub mod tokenizer;

mod api_types;

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::LlmServiceProfiles;
use corpus_store::{Corpus, EmbeddingsProvider, LlmEmbedder, RankedCandidate};
use tracing::{debug, info};

pub use api_types::{AskOptions, QaAnswer, UsedPassage};
pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use llm::{AnswerGenerator, LlmChat};

use retry::with_retry;

/// The question-answering pipeline.
///
/// Holds only shared immutable state, so one instance behind an `Arc` serves
/// any number of concurrent questions.
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use ai_llm_service::{LlmServiceProfiles, config::default_config::profiles_from_env};
/// # use contextor::{Contextor, ContextorConfig};
/// # use corpus_store::Corpus;
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let corpus = Arc::new(Corpus::load("data.json")?);
/// let (chat, embedding) = profiles_from_env()?;
/// let svc = Arc::new(LlmServiceProfiles::new(chat, embedding));
/// let qa = Contextor::from_services(corpus, svc, ContextorConfig::from_env())?;
/// println!("{}", qa.ask("When must I use headlights?").await?);
/// # Ok(()) }
/// ```
pub struct Contextor {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingsProvider>,
    generator: Arc<dyn AnswerGenerator>,
    cfg: ContextorConfig,
}

impl Contextor {
    /// Assembles the pipeline from explicit parts.
    ///
    /// # Errors
    /// [`ContextorError::UnsupportedModel`] if `cfg.tokenizer_model` has no encoding.
    pub fn new(
        corpus: Arc<Corpus>,
        embedder: Arc<dyn EmbeddingsProvider>,
        generator: Arc<dyn AnswerGenerator>,
        cfg: ContextorConfig,
    ) -> Result<Self, ContextorError> {
        tokenizer::ensure_supported(&cfg.tokenizer_model)?;
        info!(
            entries = corpus.len(),
            embedding_model = embedder.model_id(),
            chat_model = %cfg.chat_model,
            tokenizer_model = %cfg.tokenizer_model,
            token_budget = cfg.token_budget,
            top_n = cfg.top_n,
            "contextor ready"
        );
        Ok(Self {
            corpus,
            embedder,
            generator,
            cfg,
        })
    }

    /// Pipeline whose embedder and generator both go through `svc`.
    ///
    /// # Errors
    /// Same as [`Contextor::new`].
    pub fn from_services(
        corpus: Arc<Corpus>,
        svc: Arc<LlmServiceProfiles>,
        cfg: ContextorConfig,
    ) -> Result<Self, ContextorError> {
        let embedder = Arc::new(LlmEmbedder::new(svc.clone()));
        let generator = Arc::new(LlmChat::new(svc));
        Self::new(corpus, embedder, generator, cfg)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &ContextorConfig {
        &self.cfg
    }

    /// Answers `question` and returns only the model's text.
    ///
    /// # Errors
    /// See [`Contextor::ask_with_opts`].
    pub async fn ask(&self, question: &str) -> Result<String, ContextorError> {
        let qa = self.ask_with_opts(question, AskOptions::default()).await?;
        Ok(qa.answer)
    }

    /// Embeds `question` and ranks the corpus against it.
    ///
    /// # Errors
    /// - [`ContextorError::Upstream`] if embedding fails after retries
    /// - [`ContextorError::Store`] on a query/corpus dimension mismatch
    pub async fn retrieve(
        &self,
        question: &str,
        top_n: usize,
    ) -> Result<Vec<RankedCandidate>, ContextorError> {
        let started = Instant::now();
        let query_embedding =
            with_retry(&self.cfg.retry, "embed", || self.embedder.embed(question)).await?;
        debug!(
            dim = query_embedding.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "query embedded"
        );

        let ranked = self.corpus.rank(&query_embedding, top_n)?;
        debug!(
            candidates = ranked.len(),
            best = ranked.first().map(|c| c.score).unwrap_or(0.0),
            "corpus ranked"
        );
        Ok(ranked)
    }

    /// Answers `question` and reports the passages and prompt size used.
    ///
    /// `opts.top_n == 0` uses the configured `top_n`. The question is embedded
    /// and quoted in the prompt exactly as given.
    ///
    /// # Errors
    /// - [`ContextorError::EmptyQuestion`] for a blank question (no provider is called)
    /// - [`ContextorError::Upstream`] if embedding or generation fails after retries
    /// - [`ContextorError::Store`] on a query/corpus dimension mismatch
    /// - [`ContextorError::UnsupportedModel`] if the tokenizer model is unknown
    pub async fn ask_with_opts(
        &self,
        question: &str,
        opts: AskOptions,
    ) -> Result<QaAnswer, ContextorError> {
        if question.trim().is_empty() {
            return Err(ContextorError::EmptyQuestion);
        }
        let started = Instant::now();
        let top_n = self.cfg.effective_top_n(opts.top_n);

        let ranked = self.retrieve(question, top_n).await?;

        let prompt = prompt::assemble_prompt(
            &self.cfg.template,
            question,
            &ranked,
            &self.cfg.tokenizer_model,
            self.cfg.token_budget,
        )?;
        debug!(
            passages = prompt.passages_used,
            prompt_tokens = prompt.token_count,
            "prompt assembled"
        );

        let answer = with_retry(&self.cfg.retry, "chat", || {
            self.generator.generate(
                &self.cfg.system_prompt,
                &prompt.text,
                &self.cfg.chat_model,
                self.cfg.temperature,
            )
        })
        .await?;

        info!(
            top_n,
            passages = prompt.passages_used,
            prompt_tokens = prompt.token_count,
            latency_ms = started.elapsed().as_millis() as u64,
            "question answered"
        );

        let context = ranked
            .into_iter()
            .take(prompt.passages_used)
            .map(|c| UsedPassage {
                score: c.score,
                text: c.text,
            })
            .collect();

        Ok(QaAnswer {
            answer,
            context,
            prompt_tokens: prompt.token_count,
        })
    }
}
