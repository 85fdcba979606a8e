// src/config/scorer.rs
//! Scorer thresholds, loaded from `config/scorer.toml`:
//!
//! ```toml
//! [thresholds]
//! high = 0.85
//! medium = 0.70
//! low = 0.50
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::model::QualityMetrics;

pub const DEFAULT_SCORER_CONFIG_PATH: &str = "config/scorer.toml";
pub const ENV_SCORER_CONFIG_PATH: &str = "SCORER_CONFIG_PATH";

/// Minimum accuracy/completeness for auto-validation.
const MIN_ACCURACY: f64 = 0.8;
const MIN_COMPLETENESS: f64 = 0.7;

fn default_high() -> f64 {
    0.85
}
fn default_medium() -> f64 {
    0.70
}
fn default_low() -> f64 {
    0.50
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for auto-validation.
    #[serde(default = "default_high")]
    pub high: f64,
    /// Minimum quality for auto-validation.
    #[serde(default = "default_medium")]
    pub medium: f64,
    /// Not part of the gate; kept for callers that bucket confidence.
    #[serde(default = "default_low")]
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
        }
    }
}

impl ConfidenceThresholds {
    /// Auto-validation gate: every condition must hold.
    pub fn admits(&self, m: &QualityMetrics) -> bool {
        m.confidence_score >= self.high
            && m.quality_score >= self.medium
            && m.flags.is_empty()
            && m.accuracy >= MIN_ACCURACY
            && m.completeness >= MIN_COMPLETENESS
    }

    fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !(0.0..=1.0).contains(&self.high) {
            self.high = d.high;
        }
        if !(0.0..=1.0).contains(&self.medium) {
            self.medium = d.medium;
        }
        if !(0.0..=1.0).contains(&self.low) {
            self.low = d.low;
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub thresholds: ConfidenceThresholds,
}

impl ScorerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading scorer config from {}", path.display()))?;
        let mut cfg: ScorerConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing scorer config {}", path.display()))?;
        cfg.thresholds = cfg.thresholds.sanitized();
        Ok(cfg)
    }

    /// $SCORER_CONFIG_PATH, then config/scorer.toml, then built-in defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_SCORER_CONFIG_PATH) {
            return Self::load_from_file(PathBuf::from(p));
        }
        let p = PathBuf::from(DEFAULT_SCORER_CONFIG_PATH);
        if p.exists() {
            return Self::load_from_file(&p);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing() -> QualityMetrics {
        QualityMetrics {
            confidence_score: 0.9,
            quality_score: 0.8,
            clarity: 0.9,
            completeness: 0.8,
            accuracy: 0.85,
            relevance: 0.8,
            actionability: 0.8,
            technical_depth: 0.5,
            reasoning: "x".into(),
            auto_validated: false,
            flags: vec![],
            suggested_improvements: vec![],
        }
    }

    #[test]
    fn gate_requires_every_condition() {
        let t = ConfidenceThresholds::default();
        assert!(t.admits(&passing()));

        let mut m = passing();
        m.confidence_score = 0.84;
        assert!(!t.admits(&m));

        let mut m = passing();
        m.quality_score = 0.69;
        assert!(!t.admits(&m));

        let mut m = passing();
        m.flags.push("Outdated information".into());
        assert!(!t.admits(&m));

        let mut m = passing();
        m.accuracy = 0.79;
        assert!(!t.admits(&m));

        let mut m = passing();
        m.completeness = 0.69;
        assert!(!t.admits(&m));
    }

    #[test]
    fn gate_is_inclusive_at_thresholds() {
        let mut m = passing();
        m.confidence_score = 0.85;
        m.quality_score = 0.7;
        m.accuracy = 0.8;
        m.completeness = 0.7;
        assert!(ConfidenceThresholds::default().admits(&m));
    }

    #[test]
    fn toml_partial_and_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("scorer.toml");
        fs::write(&p, "[thresholds]\nhigh = 0.9\nmedium = 7.0\n").unwrap();
        let cfg = ScorerConfig::load_from_file(&p).unwrap();
        assert_eq!(cfg.thresholds.high, 0.9);
        assert_eq!(cfg.thresholds.medium, 0.70);
        assert_eq!(cfg.thresholds.low, 0.50);
    }

    #[serial_test::serial]
    #[test]
    fn missing_file_uses_defaults() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_SCORER_CONFIG_PATH);

        let cfg = ScorerConfig::load_default().unwrap();
        assert_eq!(cfg, ScorerConfig::default());

        env::set_current_dir(&old).unwrap();
    }
}
