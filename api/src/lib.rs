//! HTTP surface of the handbook QA service.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;
use crate::routes::{ask::ask_question_route::ask_question, health::health_route::health};

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:5000";

/// Builds the router with CORS open to any origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::any());

    Router::new()
        .route("/ask_question", post(ask_question))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `API_ADDRESS` until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`] if
/// serving fails.
pub async fn start(state: AppState) -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(|source| AppError::Bind {
            addr: host_url.clone(),
            source,
        })?;
    info!(address = %host_url, "API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{LlmProvider, ProviderError, ProviderErrorKind};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use contextor::{AnswerGenerator, Contextor, ContextorConfig};
    use corpus_store::{Corpus, CorpusEntry, EmbeddingsProvider};
    use serde_json::Value;
    use std::future::Future;
    use std::pin::Pin;
    use tower::ServiceExt;

    type BoxFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

    struct FixedEmbedder(Vec<f32>);

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFut<'a, Vec<f32>> {
            let v = self.0.clone();
            Box::pin(async move { Ok(v) })
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    struct Reply(Option<&'static str>);

    impl AnswerGenerator for Reply {
        fn generate<'a>(
            &'a self,
            _system_prompt: &'a str,
            _user_prompt: &'a str,
            _model_id: &'a str,
            _temperature: f32,
        ) -> BoxFut<'a, String> {
            Box::pin(async move {
                match self.0 {
                    Some(text) => Ok(text.to_string()),
                    None => Err(ProviderError::new(
                        LlmProvider::OpenAI,
                        ProviderErrorKind::EmptyChoices,
                    )),
                }
            })
        }
    }

    fn app(query: Vec<f32>, reply: Option<&'static str>) -> Router {
        let corpus = Corpus::from_entries(vec![
            CorpusEntry::new("Use the left lane to pass or turn left.", vec![1.0, 0.0]),
            CorpusEntry::new("Signal before changing lanes.", vec![0.1, 0.9]),
        ])
        .unwrap();
        let contextor = Contextor::new(
            Arc::new(corpus),
            Arc::new(FixedEmbedder(query)),
            Arc::new(Reply(reply)),
            ContextorConfig::default(),
        )
        .unwrap();
        router(Arc::new(AppState::new(Arc::new(contextor))))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask_question")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_corpus_size() {
        let res = app(vec![1.0, 0.0], Some("ok"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["status"], "ok");
        assert_eq!(v["data"]["corpus_entries"], 2);
    }

    #[tokio::test]
    async fn ask_returns_answer_and_context() {
        let res = app(vec![0.9, 0.1], Some("Use the left lane."))
            .oneshot(post_json(r#"{"question":"Which lane do I pass in?","top_n":1}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["data"]["answer"], "Use the left lane.");
        let ctx = v["data"]["context"].as_array().unwrap();
        assert_eq!(ctx.len(), 1);
        assert!(ctx[0]["preview"].as_str().unwrap().starts_with("Use the left lane"));
        assert!(v["data"]["prompt_tokens"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn blank_question_is_bad_request() {
        let res = app(vec![0.9, 0.1], Some("unused"))
            .oneshot(post_json(r#"{"question":"   "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let v = json_body(res).await;
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let res = app(vec![0.9, 0.1], Some("unused"))
            .oneshot(post_json(r#"{"question": "#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn generator_failure_is_bad_gateway() {
        let res = app(vec![0.9, 0.1], None)
            .oneshot(post_json(r#"{"question":"Which lane?"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(res).await["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_server_error() {
        let res = app(vec![1.0, 0.0, 0.0], Some("unused"))
            .oneshot(post_json(r#"{"question":"Which lane?"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["error"]["code"], "DIMENSION_MISMATCH");
    }
}
