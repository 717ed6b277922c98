//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::infer::InferenceService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    inference: InferenceService,
}

impl AppState {
    /// Create a new application state with the provider picked from config
    pub fn new(config: Config) -> Self {
        let inference = InferenceService::from_config(&config.inference);
        Self::with_inference(config, inference)
    }

    /// Create application state with an explicit inference service
    pub fn with_inference(config: Config, inference: InferenceService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, inference }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the schema inference service
    pub fn inference(&self) -> &InferenceService {
        &self.inner.inference
    }
}
