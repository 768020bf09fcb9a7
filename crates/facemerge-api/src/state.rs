//! Application state.

use std::sync::Arc;

use facemerge_providers::ProviderResult;

use crate::config::{ApiConfig, AppConfig};
use crate::services::DetectionService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub detection: Arc<DetectionService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: AppConfig) -> ProviderResult<Self> {
        let detection = DetectionService::new(&config.providers)?;

        Ok(Self {
            config: config.api,
            detection: Arc::new(detection),
        })
    }
}
