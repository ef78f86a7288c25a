use std::sync::Arc;

use contextor::Contextor;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The QA pipeline, built once at startup around the loaded corpus.
    pub contextor: Arc<Contextor>,
}

impl AppState {
    pub fn new(contextor: Arc<Contextor>) -> Self {
        Self { contextor }
    }
}
