// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod model;

// Scoring sources (heuristics, community, AI judge) and shared arithmetic
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::analyze::ai_adapter;
pub use crate::api::{create_router, AppState};
pub use crate::engine::QualityScorer;
pub use crate::model::{QualityBand, QualityMetrics, ScoringContext};

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::config::{AiConfig, ScorerConfig};

/// Build the full router from config files/env (no metrics route).
pub fn app() -> anyhow::Result<Router> {
    let ai = AiConfig::load_default()?;
    let scorer_cfg = ScorerConfig::load_default()?;
    let scorer = QualityScorer::from_config(&ai, &scorer_cfg);
    info!(provider = scorer.ai_provider(), "router built");
    Ok(create_router(AppState {
        scorer: Arc::new(scorer),
    }))
}
