// tests/api_http.rs
//
// Router-level checks with an in-process oneshot; no network.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use knowledge_quality::ai_adapter::{DynAiClient, FailingClient, MockClient};
use knowledge_quality::config::ConfidenceThresholds;
use knowledge_quality::{create_router, AppState, QualityScorer};

fn router_with(client: DynAiClient) -> Router {
    create_router(AppState {
        scorer: Arc::new(QualityScorer::new(client, ConfidenceThresholds::default())),
    })
}

async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let v = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, v)
}

#[tokio::test]
async fn health_is_ok() {
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = router_with(Arc::new(FailingClient)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn score_returns_metrics_band_and_timestamp() {
    let (status, v) = call(
        router_with(Arc::new(MockClient::default())),
        "POST",
        "/api/quality/score",
        Some(json!({
            "problem": "How do I fix a null pointer error?",
            "solution": "First, check if the variable is null. Then add a guard clause.",
            "platform": "slack",
            "channelName": "dev",
            "upvotes": 4,
            "downvotes": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "confidenceScore",
        "qualityScore",
        "clarity",
        "completeness",
        "accuracy",
        "relevance",
        "actionability",
        "technicalDepth",
    ] {
        let x = v[key].as_f64().unwrap_or_else(|| panic!("missing {key}: {v}"));
        assert!((0.0..=1.0).contains(&x), "{key} = {x}");
    }
    assert!(v["autoValidated"].is_boolean());
    assert!(v["reasoning"].as_str().unwrap().starts_with("Mock rubric assessment"));
    assert!(["high", "medium", "low"].contains(&v["band"].as_str().unwrap()));
    assert!(v["scoredAt"].is_string());
}

#[tokio::test]
async fn score_survives_ai_failure() {
    let (status, v) = call(
        router_with(Arc::new(FailingClient)),
        "POST",
        "/api/quality/score",
        Some(json!({ "problem": "Why does npm fail?", "solution": "Run npm ci instead of npm install." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["reasoning"].as_str().unwrap().starts_with("Heuristic analysis"));
}

#[tokio::test]
async fn empty_problem_is_rejected() {
    let (status, v) = call(
        router_with(Arc::new(MockClient::default())),
        "POST",
        "/api/quality/score",
        Some(json!({ "problem": "  ", "solution": "Do the thing." })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(v["error"].is_string());
}

#[tokio::test]
async fn feedback_reblends_relevance() {
    let metrics = json!({
        "confidenceScore": 0.6, "qualityScore": 0.6, "clarity": 0.6, "completeness": 0.6,
        "accuracy": 0.6, "relevance": 0.5, "actionability": 0.6, "technicalDepth": 0.5,
        "reasoning": "Fallback scoring - AI unavailable", "autoValidated": false,
        "flags": [], "suggestedImprovements": []
    });
    let (status, v) = call(
        router_with(Arc::new(MockClient::default())),
        "POST",
        "/api/quality/feedback",
        Some(json!({ "metrics": metrics, "upvotes": 10, "downvotes": 0, "views": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((v["relevance"].as_f64().unwrap() - 0.7).abs() < 1e-9);
    assert!((v["accuracy"].as_f64().unwrap() - (0.7 * 0.6 + 0.3 * 0.9)).abs() < 1e-9);
    assert_eq!(v["reasoning"], json!("Fallback scoring - AI unavailable"));
}

#[tokio::test]
async fn feedback_rejects_out_of_range_metrics() {
    let metrics = json!({
        "confidenceScore": 3.0, "qualityScore": 0.9, "clarity": 0.9, "completeness": 0.9,
        "accuracy": -2.0, "relevance": 5.0, "actionability": 0.9, "technicalDepth": 0.9,
        "reasoning": "stored", "autoValidated": true,
        "flags": [], "suggestedImprovements": []
    });
    let (status, v) = call(
        router_with(Arc::new(MockClient::default())),
        "POST",
        "/api/quality/feedback",
        Some(json!({ "metrics": metrics, "upvotes": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(v["error"].as_str().unwrap().contains("confidenceScore"));
}

#[tokio::test]
async fn thresholds_endpoint_reports_defaults() {
    let (status, v) = call(
        router_with(Arc::new(MockClient::default())),
        "GET",
        "/api/quality/thresholds",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({ "high": 0.85, "medium": 0.7, "low": 0.5 }));
}
