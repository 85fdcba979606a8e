//! # Quality Engine
//! Fans a `ScoringContext` out to the AI judge, the heuristics and the community
//! signal, blends them into one `QualityMetrics`, and decides auto-validation.
//!
//! The service holds no mutable state: every call is independent and reentrant.
//! `score_knowledge_pair` never returns an error; a failed combine step falls back
//! to a heuristic + community result pinned at 0.6 quality/confidence.

use std::time::Instant;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::analyze::ai_adapter::{build_client_from_config, DynAiClient};
use crate::analyze::community::{self, CommunitySignal};
use crate::analyze::heuristics;
use crate::analyze::judge::AiJudge;
use crate::analyze::scoring::{
    self, blend, weighted_average, ACCURACY_SOURCES, ACTIONABILITY_SOURCES, CLARITY_SOURCES,
    COMPLETENESS_SOURCES, RELEVANCE_SOURCES, TECHNICAL_DEPTH_SOURCES,
};
use crate::config::{AiConfig, ConfidenceThresholds, ScorerConfig};
use crate::error::{CombineError, JudgeError};
use crate::metrics;
use crate::model::{PartialMetrics, QualityMetrics, ScoringContext};

pub const DEFAULT_REASONING: &str = "Automated quality assessment completed";
pub const FALLBACK_REASONING: &str = "Fallback scoring - AI unavailable";
const FALLBACK_SCORE: f64 = 0.6;
const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Consider adding more detail",
    "Add code examples if applicable",
];

/// Confidence adjustments.
const AGREEMENT_BASE: f64 = 0.7;
const AGREEMENT_SPAN: f64 = 0.3;
const FLAG_PENALTY_EACH: f64 = 0.1;
const FLAG_PENALTY_MAX: f64 = 0.3;
const COMMUNITY_BOOST: f64 = 0.1;
const COMMUNITY_BOOST_MIN_ACCURACY: f64 = 0.8;
const CONFIDENCE_FLOOR: f64 = 0.1;

/// Stateless scoring service. Cheap to share behind an `Arc`.
pub struct QualityScorer {
    judge: AiJudge,
    thresholds: ConfidenceThresholds,
}

impl QualityScorer {
    pub fn new(client: DynAiClient, thresholds: ConfidenceThresholds) -> Self {
        Self {
            judge: AiJudge::new(client),
            thresholds,
        }
    }

    /// Build from loaded config files (AI client chosen by `build_client_from_config`).
    pub fn from_config(ai: &AiConfig, scorer: &ScorerConfig) -> Self {
        let client = build_client_from_config(ai);
        info!(
            provider = client.provider_name(),
            configured = client.is_configured(),
            high = scorer.thresholds.high,
            medium = scorer.thresholds.medium,
            "quality scorer ready"
        );
        Self::new(client, scorer.thresholds)
    }

    pub fn thresholds(&self) -> ConfidenceThresholds {
        self.thresholds
    }

    pub fn ai_provider(&self) -> &'static str {
        self.judge.provider_name()
    }

    /// Score a knowledge pair. Always returns usable metrics.
    pub async fn score_knowledge_pair(&self, ctx: &ScoringContext) -> QualityMetrics {
        let started = Instant::now();
        let id = pair_id(ctx);

        // Fan-out: the judge is the only branch that actually suspends.
        let (ai, heuristic, community) = tokio::join!(
            self.judge.judge(ctx),
            async { heuristics::analyze(ctx) },
            async {
                let (up, down, views) = ctx.votes();
                community::aggregate(up, down, views)
            },
        );

        let ai = match ai {
            Ok(p) => p,
            Err(JudgeError::Unconfigured) => {
                debug!(%id, "AI judge not configured; scoring without it");
                PartialMetrics::default()
            }
            Err(e) => {
                warn!(%id, error = %e, kind = e.kind(), "AI judge failed; scoring without it");
                metrics::record_judge_failure(e.kind());
                PartialMetrics::default()
            }
        };

        let scored = match combine(&ai, &heuristic, &community, &self.thresholds) {
            Ok(m) => m,
            Err(e) => {
                warn!(%id, error = %e, "combine failed; using fallback scoring");
                metrics::record_fallback();
                fallback(ctx)
            }
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::record_scored(scored.auto_validated, elapsed_ms);
        info!(
            %id,
            quality = scored.quality_score,
            confidence = scored.confidence_score,
            auto_validated = scored.auto_validated,
            flags = scored.flags.len(),
            ai_used = !ai.is_empty(),
            elapsed_ms,
            "scored knowledge pair"
        );
        scored
    }

    /// Re-blend stored metrics with fresh vote/view counts. No AI call.
    ///
    /// `auto_validated` is passed through untouched; use
    /// `ConfidenceThresholds::admits` to re-check it if needed.
    pub fn update_with_community_feedback(
        &self,
        existing: &QualityMetrics,
        upvotes: u32,
        downvotes: u32,
        views: u32,
    ) -> QualityMetrics {
        let community = community::aggregate(upvotes, downvotes, views);
        let updated = blend_feedback(existing, &community);
        metrics::record_feedback_update();
        debug!(
            upvotes,
            downvotes,
            views,
            relevance = updated.relevance,
            accuracy = updated.accuracy,
            confidence = updated.confidence_score,
            "applied community feedback"
        );
        updated
    }
}

/// Merge the three source opinions. Fails only if a blended value is not finite.
pub fn combine(
    ai: &PartialMetrics,
    heuristic: &PartialMetrics,
    community: &CommunitySignal,
    thresholds: &ConfidenceThresholds,
) -> Result<QualityMetrics, CombineError> {
    let c = community.to_partial();

    let clarity = blend([ai.clarity, heuristic.clarity, c.clarity], CLARITY_SOURCES);
    let completeness = blend(
        [ai.completeness, heuristic.completeness, c.completeness],
        COMPLETENESS_SOURCES,
    );
    let accuracy = blend([ai.accuracy, heuristic.accuracy, c.accuracy], ACCURACY_SOURCES);
    let relevance = blend([ai.relevance, heuristic.relevance, c.relevance], RELEVANCE_SOURCES);
    let actionability = blend(
        [ai.actionability, heuristic.actionability, c.actionability],
        ACTIONABILITY_SOURCES,
    );
    let technical_depth = blend(
        [ai.technical_depth, heuristic.technical_depth, c.technical_depth],
        TECHNICAL_DEPTH_SOURCES,
    );

    let flags: Vec<String> = ai.flags.iter().chain(&heuristic.flags).cloned().collect();
    let quality_score = scoring::quality_score(
        Some(clarity),
        Some(completeness),
        Some(accuracy),
        Some(relevance),
        Some(actionability),
    );

    let agreement = scoring::source_agreement(&[ai, heuristic, &c]);
    let mut confidence = quality_score * (AGREEMENT_BASE + agreement * AGREEMENT_SPAN);
    confidence -= (flags.len() as f64 * FLAG_PENALTY_EACH).min(FLAG_PENALTY_MAX);
    if community
        .accuracy
        .is_some_and(|a| a > COMMUNITY_BOOST_MIN_ACCURACY)
    {
        confidence += COMMUNITY_BOOST;
    }
    let confidence_score = confidence.clamp(CONFIDENCE_FLOOR, 1.0);

    let mut out = QualityMetrics {
        confidence_score,
        quality_score,
        clarity,
        completeness,
        accuracy,
        relevance,
        actionability,
        technical_depth,
        reasoning: combine_reasoning(ai.reasoning.as_deref(), heuristic.reasoning.as_deref()),
        auto_validated: false,
        flags,
        suggested_improvements: ai.suggested_improvements.clone(),
    };

    for (field, v) in out.numeric_fields() {
        if !v.is_finite() {
            return Err(CombineError::NonFinite { field });
        }
    }

    out.auto_validated = thresholds.admits(&out);
    Ok(out)
}

/// Degraded result from heuristics + community only.
pub fn fallback(ctx: &ScoringContext) -> QualityMetrics {
    let h = heuristics::analyze(ctx);
    let (up, down, views) = ctx.votes();
    let c = community::aggregate(up, down, views);

    QualityMetrics {
        confidence_score: FALLBACK_SCORE,
        quality_score: FALLBACK_SCORE,
        clarity: h.clarity.unwrap_or(FALLBACK_SCORE),
        completeness: h.completeness.unwrap_or(FALLBACK_SCORE),
        accuracy: c.accuracy.unwrap_or(FALLBACK_SCORE),
        relevance: c.relevance,
        actionability: h.actionability.unwrap_or(FALLBACK_SCORE),
        technical_depth: h.technical_depth.unwrap_or(scoring::NEUTRAL),
        reasoning: FALLBACK_REASONING.to_string(),
        auto_validated: false,
        flags: h.flags,
        suggested_improvements: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Feedback re-blend: relevance 0.6/0.4, accuracy 0.7/0.3, confidence 0.8/0.2.
pub fn blend_feedback(existing: &QualityMetrics, community: &CommunitySignal) -> QualityMetrics {
    QualityMetrics {
        relevance: weighted_average(
            &[Some(existing.relevance), Some(community.relevance)],
            &[0.6, 0.4],
        ),
        accuracy: weighted_average(&[Some(existing.accuracy), community.accuracy], &[0.7, 0.3]),
        confidence_score: weighted_average(
            &[Some(existing.confidence_score), Some(community.relevance)],
            &[0.8, 0.2],
        ),
        ..existing.clone()
    }
}

fn combine_reasoning(ai: Option<&str>, heuristic: Option<&str>) -> String {
    let parts: Vec<&str> = [ai, heuristic]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        DEFAULT_REASONING.to_string()
    } else {
        parts.join(" | ")
    }
}

/// Short anonymized id for logs; raw pair text is never logged.
fn pair_id(ctx: &ScoringContext) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ctx.problem.as_bytes());
    hasher.update([0u8]);
    hasher.update(ctx.solution.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
