//! Scoring arithmetic shared by the judge, the combiner and the feedback updater.
//!
//! - rubric weights for the overall quality score (technical depth excluded)
//! - per-dimension source weights `(ai, heuristic, community)`
//! - weighted average over *present* values only
//! - source agreement from the variance of per-source quality scores

use crate::model::PartialMetrics;

/// Rubric weights for `qualityScore`; they sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RubricWeights {
    pub clarity: f64,
    pub completeness: f64,
    pub accuracy: f64,
    pub relevance: f64,
    pub actionability: f64,
}

pub const QUALITY_WEIGHTS: RubricWeights = RubricWeights {
    clarity: 0.20,
    completeness: 0.25,
    accuracy: 0.25,
    relevance: 0.15,
    actionability: 0.15,
};

/// Source weights per dimension, ordered `[ai, heuristic, community]`.
/// `None` means the source never reports that dimension.
pub type SourceWeights = [Option<f64>; 3];

pub const CLARITY_SOURCES: SourceWeights = [Some(0.7), Some(0.3), None];
pub const COMPLETENESS_SOURCES: SourceWeights = [Some(0.6), Some(0.4), None];
pub const ACCURACY_SOURCES: SourceWeights = [Some(0.4), Some(0.3), Some(0.3)];
pub const RELEVANCE_SOURCES: SourceWeights = [Some(0.5), None, Some(0.5)];
pub const ACTIONABILITY_SOURCES: SourceWeights = [Some(0.6), Some(0.4), None];
pub const TECHNICAL_DEPTH_SOURCES: SourceWeights = [Some(0.7), Some(0.3), None];

/// Value used when no source reports a dimension.
pub const NEUTRAL: f64 = 0.5;

/// Weighted mean over the values that are present. Missing values are dropped from
/// both numerator and denominator; no values at all yields `NEUTRAL`.
pub fn weighted_average(values: &[Option<f64>], weights: &[f64]) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    for (v, w) in values.iter().zip(weights) {
        if let Some(v) = v {
            total_weight += w;
            weighted_sum += v * w;
        }
    }
    if total_weight <= 0.0 {
        return NEUTRAL;
    }
    weighted_sum / total_weight
}

/// Blend one dimension across `[ai, heuristic, community]` using `sources`.
pub fn blend(values: [Option<f64>; 3], sources: SourceWeights) -> f64 {
    let mut vals = Vec::with_capacity(3);
    let mut weights = Vec::with_capacity(3);
    for (v, w) in values.into_iter().zip(sources) {
        if let Some(w) = w {
            vals.push(v);
            weights.push(w);
        }
    }
    weighted_average(&vals, &weights)
}

/// Rubric-weighted quality over five dimensions; a missing dimension counts as neutral.
pub fn quality_score(
    clarity: Option<f64>,
    completeness: Option<f64>,
    accuracy: Option<f64>,
    relevance: Option<f64>,
    actionability: Option<f64>,
) -> f64 {
    let w = QUALITY_WEIGHTS;
    clarity.unwrap_or(NEUTRAL) * w.clarity
        + completeness.unwrap_or(NEUTRAL) * w.completeness
        + accuracy.unwrap_or(NEUTRAL) * w.accuracy
        + relevance.unwrap_or(NEUTRAL) * w.relevance
        + actionability.unwrap_or(NEUTRAL) * w.actionability
}

/// Quality estimate of one source: its own `quality_score` if it attached one,
/// otherwise computed from whatever dimensions it reported.
pub fn source_quality(p: &PartialMetrics) -> f64 {
    p.quality_score.unwrap_or_else(|| {
        quality_score(
            p.clarity,
            p.completeness,
            p.accuracy,
            p.relevance,
            p.actionability,
        )
    })
}

/// Agreement in [0,1]: `1 - 4 * variance` of the non-empty sources' quality scores.
/// Fewer than two comparable scores gives the neutral 0.5.
pub fn source_agreement(sources: &[&PartialMetrics]) -> f64 {
    let scores: Vec<f64> = sources
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| source_quality(s))
        .filter(|q| *q > 0.0)
        .collect();
    if scores.len() < 2 {
        return 0.5;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance * 4.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let w = QUALITY_WEIGHTS;
        let sum = w.clarity + w.completeness + w.accuracy + w.relevance + w.actionability;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_values_are_excluded_not_zeroed() {
        // Only the heuristic reports: result equals its value, not 0.3 * value.
        let v = blend([None, Some(0.8), None], CLARITY_SOURCES);
        assert!((v - 0.8).abs() < 1e-12);

        // A real zero still counts.
        let v = blend([Some(0.0), Some(1.0), None], CLARITY_SOURCES);
        assert!((v - 0.3).abs() < 1e-12);
    }

    #[test]
    fn nothing_reported_is_neutral() {
        assert_eq!(blend([None, None, None], ACCURACY_SOURCES), NEUTRAL);
        assert_eq!(weighted_average(&[], &[]), NEUTRAL);
    }

    #[test]
    fn community_is_ignored_where_it_has_no_weight() {
        let v = blend([None, Some(0.4), Some(1.0)], COMPLETENESS_SOURCES);
        assert!((v - 0.4).abs() < 1e-12);
    }

    #[test]
    fn agreement_is_neutral_with_single_source() {
        let only = PartialMetrics {
            clarity: Some(0.9),
            ..Default::default()
        };
        let empty = PartialMetrics::default();
        assert_eq!(source_agreement(&[&empty, &only, &empty]), 0.5);
    }

    #[test]
    fn identical_sources_agree_fully() {
        let a = PartialMetrics {
            quality_score: Some(0.7),
            ..Default::default()
        };
        let b = a.clone();
        assert!((source_agreement(&[&a, &b]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn spread_sources_lower_agreement() {
        let lo = PartialMetrics {
            quality_score: Some(0.2),
            ..Default::default()
        };
        let hi = PartialMetrics {
            quality_score: Some(1.0),
            ..Default::default()
        };
        // mean 0.6, variance 0.16 -> 1 - 0.64
        assert!((source_agreement(&[&lo, &hi]) - 0.36).abs() < 1e-9);
    }
}
