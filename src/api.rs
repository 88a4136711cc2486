//! HTTP API for chat sessions

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::ModelInfo;

use crate::chat::{ChatSettings, DemoOverrideTable, ResponseResolver, SessionManager};
use crate::llm::ModelRegistry;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub resolver: Arc<ResponseResolver>,
}

impl AppState {
    pub fn new(llm_registry: Arc<ModelRegistry>, settings: ChatSettings) -> Self {
        let overrides = Arc::new(DemoOverrideTable::builtin());
        if !overrides.is_empty() {
            tracing::info!(entries = overrides.len(), "Demo overrides loaded");
        }
        Self {
            sessions: Arc::new(SessionManager::new(settings)),
            resolver: Arc::new(ResponseResolver::new(overrides, llm_registry)),
        }
    }

    pub fn llm_registry(&self) -> &ModelRegistry {
        self.resolver.registry()
    }
}
