use axum::Json;
use needs_core::{DemoModeGate, NeedsService, StorageMode, StoragePaths};
use std::sync::Arc;

use crate::error::ApiError;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NeedsService>,
    pub demo: Arc<DemoModeGate>,
}

impl AppState {
    pub fn new(paths: StoragePaths, demo_mode_only: bool) -> Self {
        Self {
            service: Arc::new(NeedsService::new(paths)),
            demo: Arc::new(DemoModeGate::new(demo_mode_only)),
        }
    }

    /// Storage mode for one request.
    ///
    /// A `demo_mode` query value wins over the gate unless the gate is locked.
    pub fn mode(&self, requested: Option<bool>) -> StorageMode {
        match requested {
            Some(demo_mode) if !self.demo.status().locked => demo_mode.into(),
            _ => self.demo.mode(),
        }
    }

    /// Runs a storage operation off the async runtime; file locks may block
    pub async fn run<T, F>(&self, op: F) -> Result<Json<T>, ApiError>
    where
        F: FnOnce(&NeedsService) -> needs_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| ApiError::Internal(format!("Storage task failed: {}", e)))?;
        Ok(Json(result?))
    }
}
