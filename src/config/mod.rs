// src/config/mod.rs
pub mod ai;
pub mod scorer;

pub use ai::AiConfig;
pub use scorer::{ConfidenceThresholds, ScorerConfig};
