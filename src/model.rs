//! Input/output shapes of the quality scorer.
//!
//! `ScoringContext` is what callers hand in, `QualityMetrics` is the durable record they
//! store next to the knowledge pair. `PartialMetrics` is the per-source intermediate:
//! every dimension is an `Option` so "source had no opinion" never collapses into 0.0.

use serde::{Deserialize, Serialize};

/// Input for a single scoring call. Immutable for the duration of the call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringContext {
    pub problem: String,
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Length of the raw chat message the pair was extracted from (prompt context only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_code_examples: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u32>,
}

impl ScoringContext {
    pub fn new(problem: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            solution: solution.into(),
            ..Default::default()
        }
    }

    pub fn with_votes(mut self, upvotes: u32, downvotes: u32, views: u32) -> Self {
        self.upvotes = Some(upvotes);
        self.downvotes = Some(downvotes);
        self.views = Some(views);
        self
    }

    pub fn with_source(mut self, platform: impl Into<String>, channel: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self.channel_name = Some(channel.into());
        self
    }

    /// Community counters with the missing-means-zero default.
    pub fn votes(&self) -> (u32, u32, u32) {
        (
            self.upvotes.unwrap_or(0),
            self.downvotes.unwrap_or(0),
            self.views.unwrap_or(0),
        )
    }
}

/// Opinion of one scoring source. Fields a source does not report stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialMetrics {
    pub clarity: Option<f64>,
    pub completeness: Option<f64>,
    pub accuracy: Option<f64>,
    pub relevance: Option<f64>,
    pub actionability: Option<f64>,
    pub technical_depth: Option<f64>,
    /// Source-local quality estimate, used for agreement checks.
    pub quality_score: Option<f64>,
    pub reasoning: Option<String>,
    pub flags: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

impl PartialMetrics {
    /// `true` when the source contributed nothing at all (e.g. AI unavailable).
    pub fn is_empty(&self) -> bool {
        self.clarity.is_none()
            && self.completeness.is_none()
            && self.accuracy.is_none()
            && self.relevance.is_none()
            && self.actionability.is_none()
            && self.technical_depth.is_none()
            && self.quality_score.is_none()
            && self.reasoning.is_none()
            && self.flags.is_empty()
            && self.suggested_improvements.is_empty()
    }
}

/// Final scoring record attached 1:1 to a knowledge pair by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub confidence_score: f64,
    pub quality_score: f64,
    pub clarity: f64,
    pub completeness: f64,
    pub accuracy: f64,
    pub relevance: f64,
    pub actionability: f64,
    pub technical_depth: f64,
    pub reasoning: String,
    pub auto_validated: bool,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub suggested_improvements: Vec<String>,
}

impl QualityMetrics {
    pub fn band(&self) -> QualityBand {
        QualityBand::from_score(self.quality_score)
    }

    /// All eight numeric fields, labelled. Handy for bound checks and logging.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("confidenceScore", self.confidence_score),
            ("qualityScore", self.quality_score),
            ("clarity", self.clarity),
            ("completeness", self.completeness),
            ("accuracy", self.accuracy),
            ("relevance", self.relevance),
            ("actionability", self.actionability),
            ("technicalDepth", self.technical_depth),
        ]
    }

    /// First numeric field that is not a finite value in [0,1], if any.
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        self.numeric_fields()
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && (0.0..=1.0).contains(v)))
            .map(|(name, _)| name)
    }
}

/// Coarse display bucket for `qualityScore` (dashboard colour coding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    High,
    Medium,
    Low,
}

impl QualityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            QualityBand::High
        } else if score >= 0.6 {
            QualityBand::Medium
        } else {
            QualityBand::Low
        }
    }
}
