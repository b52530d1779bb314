//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! site itself is stateless; this only carries config and the optional
//! training-plan proxy client.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::training::TrainingPlanClient;

/// Clone is required by Axum; inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// `None` when `STUDIO_API_URL` is not configured.
    pub training: Option<Arc<TrainingPlanClient>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, training: Option<TrainingPlanClient>) -> Self {
        Self { config: Arc::new(config), training: training.map(Arc::new) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
