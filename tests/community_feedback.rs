// tests/community_feedback.rs
//
// Community aggregation boundaries and the feedback re-blend.

use std::sync::Arc;

use knowledge_quality::ai_adapter::DisabledClient;
use knowledge_quality::analyze::aggregate;
use knowledge_quality::config::ConfidenceThresholds;
use knowledge_quality::{QualityScorer, ScoringContext};

fn scorer() -> QualityScorer {
    QualityScorer::new(Arc::new(DisabledClient), ConfidenceThresholds::default())
}

#[test]
fn zero_votes_is_neutral() {
    let s = aggregate(0, 0, 0);
    assert_eq!(s.relevance, 0.5);
    assert!(s.accuracy.is_none() && s.engagement.is_none() && s.popularity.is_none());
}

#[test]
fn eight_up_two_down() {
    let s = aggregate(8, 2, 50);
    assert!((s.relevance - 0.8).abs() < 1e-12);
    assert_eq!(s.accuracy, Some(0.7));
    assert_eq!(s.engagement, Some(1.0));
    assert_eq!(s.popularity, Some(0.5));
}

#[tokio::test]
async fn repeated_feedback_converges_geometrically() {
    let s = scorer();
    let ctx = ScoringContext::new(
        "How do I restart the server?",
        "Run systemctl restart app, then check the logs.",
    );
    let base = s.score_knowledge_pair(&ctx).await;
    let target = aggregate(20, 0, 300).relevance;
    assert_eq!(target, 1.0);
    assert!(base.relevance < target);

    let once = s.update_with_community_feedback(&base, 20, 0, 300);
    let twice = s.update_with_community_feedback(&once, 20, 0, 300);

    let gap0 = target - base.relevance;
    let gap1 = target - once.relevance;
    let gap2 = target - twice.relevance;
    assert!((gap1 - 0.6 * gap0).abs() < 1e-12);
    assert!((gap2 - 0.36 * gap0).abs() < 1e-12);
    assert!(gap2 > 0.0, "second update must not reach the raw signal");
    assert_ne!(once, twice, "feedback is not idempotent");

    // confidence drifts toward the community relevance with weight 0.2
    assert!(twice.confidence_score > once.confidence_score);
    assert!(twice.confidence_score < 1.0);
}

#[tokio::test]
async fn feedback_does_not_recompute_auto_validation() {
    let s = scorer();
    let ctx = ScoringContext::new("How?", "...");
    let mut base = s.score_knowledge_pair(&ctx).await;
    assert!(!base.auto_validated);

    // caller override survives the re-blend untouched
    base.auto_validated = true;
    let updated = s.update_with_community_feedback(&base, 0, 10, 10);
    assert!(updated.auto_validated);
    assert!(!s.thresholds().admits(&updated));
    assert_eq!(updated.flags, base.flags);
    assert_eq!(updated.reasoning, base.reasoning);
}
