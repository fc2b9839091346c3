//! Process-wide demo-mode switch

use log::{info, warn};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

use crate::error::{NeedsError, Result};
use crate::router::StorageMode;

/// Snapshot of the gate, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoModeStatus {
    pub enabled: bool,
    /// True when the deployment pins demo mode on
    pub locked: bool,
}

/// Demo-mode flag shared by all requests.
///
/// `enabled` and `locked` sit behind one lock so readers never observe a torn pair.
#[derive(Debug)]
pub struct DemoModeGate {
    state: RwLock<DemoModeStatus>,
}

impl DemoModeGate {
    /// `demo_mode_only` locks the gate and forces it on
    pub fn new(demo_mode_only: bool) -> Self {
        Self {
            state: RwLock::new(DemoModeStatus {
                enabled: demo_mode_only,
                locked: demo_mode_only,
            }),
        }
    }

    pub fn status(&self) -> DemoModeStatus {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_enabled(&self) -> bool {
        self.status().enabled
    }

    pub fn mode(&self) -> StorageMode {
        self.status().enabled.into()
    }

    /// Updates the flag. Disabling a locked gate is refused.
    pub fn set_enabled(&self, enabled: bool) -> Result<DemoModeStatus> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.locked && !enabled {
            warn!("Rejected attempt to disable locked demo mode");
            return Err(NeedsError::PermissionDenied(
                "Demo mode is locked on for this deployment and cannot be disabled".to_string(),
            ));
        }
        if state.enabled != enabled {
            info!("Demo mode {}", if enabled { "enabled" } else { "disabled" });
        }
        state.enabled = enabled;
        Ok(*state)
    }
}

impl Default for DemoModeGate {
    fn default() -> Self {
        Self::new(false)
    }
}
