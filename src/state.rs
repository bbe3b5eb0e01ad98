use std::sync::Arc;

use crate::{backend::Backend, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}
