use std::{env, error::Error, sync::Arc};

use ai_llm_service::{
    LlmServiceProfiles, config::default_config::profiles_from_env, telemetry,
};
use contextor::{Contextor, ContextorConfig};
use corpus_store::Corpus;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .try_init()?;

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let corpus_path = env::var("CORPUS_PATH").unwrap_or_else(|_| "data.json".to_string());
    let corpus = Arc::new(Corpus::load(&corpus_path)?);

    let (chat, embedding) = profiles_from_env()?;
    info!(
        provider = %chat.provider,
        chat_model = %chat.model,
        embedding_model = %embedding.model,
        "LLM profiles resolved"
    );
    let svc = Arc::new(LlmServiceProfiles::new(chat, embedding));

    let contextor = Contextor::from_services(corpus, svc, ContextorConfig::from_env())?;

    api::start(api::AppState::new(Arc::new(contextor))).await?;

    Ok(())
}
