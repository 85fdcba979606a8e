use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::config::ConfidenceThresholds;
use crate::engine::QualityScorer;
use crate::model::{QualityBand, QualityMetrics, ScoringContext};

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<QualityScorer>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/quality/score", post(score))
        .route("/api/quality/feedback", post(feedback))
        .route("/api/quality/thresholds", get(thresholds))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResp {
    #[serde(flatten)]
    metrics: QualityMetrics,
    band: QualityBand,
    scored_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct FeedbackReq {
    metrics: QualityMetrics,
    #[serde(default)]
    upvotes: u32,
    #[serde(default)]
    downvotes: u32,
    #[serde(default)]
    views: u32,
}

#[derive(Serialize)]
struct ErrorResp {
    error: String,
}

fn unprocessable(msg: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResp { error: msg.into() }),
    )
        .into_response()
}

async fn score(State(state): State<AppState>, Json(ctx): Json<ScoringContext>) -> Response {
    if ctx.problem.trim().is_empty() || ctx.solution.trim().is_empty() {
        return unprocessable("problem and solution must be non-empty");
    }
    let metrics = state.scorer.score_knowledge_pair(&ctx).await;
    Json(ScoreResp {
        band: metrics.band(),
        metrics,
        scored_at: Utc::now(),
    })
    .into_response()
}

async fn feedback(State(state): State<AppState>, Json(body): Json<FeedbackReq>) -> Response {
    if let Some(field) = body.metrics.out_of_range_field() {
        return unprocessable(format!("metrics.{field} must be a finite value in [0,1]"));
    }
    debug!(
        upvotes = body.upvotes,
        downvotes = body.downvotes,
        views = body.views,
        "feedback request"
    );
    Json(state.scorer.update_with_community_feedback(
        &body.metrics,
        body.upvotes,
        body.downvotes,
        body.views,
    ))
    .into_response()
}

async fn thresholds(State(state): State<AppState>) -> Json<ConfidenceThresholds> {
    Json(state.scorer.thresholds())
}
