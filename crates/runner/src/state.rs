use std::sync::Arc;

use bh_core::config::models::EngineConfig;
use bh_core::engine::LocalEngine;
use bh_core::state::registry::ProcessRegistry;

/// Shared handler state.
///
/// The runner owns its process registry; it is never shared with an
/// orchestrator.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LocalEngine>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let registry = Arc::new(ProcessRegistry::new());
        Self {
            engine: Arc::new(LocalEngine::new(config, registry)),
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        self.engine.registry()
    }
}
