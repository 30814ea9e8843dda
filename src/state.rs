//! Shared application state for all routes.

use crate::config::ServiceModel;
use crate::repository::BloggingRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Resolved once at startup, read-only afterwards.
    pub model: Arc<ServiceModel>,
    pub repository: Arc<BloggingRepository>,
}

impl AppState {
    pub fn new(model: ServiceModel, repository: BloggingRepository) -> Self {
        Self {
            model: Arc::new(model),
            repository: Arc::new(repository),
        }
    }
}
