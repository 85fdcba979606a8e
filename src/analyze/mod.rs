// src/analyze/mod.rs
//! Scoring sources and the arithmetic that blends them.
//!
//! - `heuristics`: deterministic text analysis
//! - `community`:  votes/views signal
//! - `judge`:      AI rubric judge on top of `ai_adapter`
//! - `scoring`:    weights, weighted averages, agreement

pub mod ai_adapter;
pub mod community;
pub mod heuristics;
pub mod judge;
pub mod scoring;

pub use crate::analyze::community::{aggregate, CommunitySignal};
pub use crate::analyze::heuristics::analyze;
pub use crate::analyze::judge::AiJudge;
