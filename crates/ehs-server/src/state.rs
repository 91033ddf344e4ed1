use std::sync::Arc;

use ehs_llm::GenerationProvider;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

pub struct AppState {
    pub provider: Arc<dyn GenerationProvider>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
