// src/error.rs
//! Error taxonomy of the scorer. None of these reach callers of
//! `QualityScorer::score_knowledge_pair`; they are logged and converted.

use thiserror::Error;

/// Why the AI rubric judge produced no opinion.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("LLM capability not configured")]
    Unconfigured,
    #[error("LLM transport failed: {0}")]
    Transport(String),
    #[error("LLM returned HTTP {0}")]
    Status(u16),
    #[error("LLM returned an empty response")]
    EmptyResponse,
    #[error("LLM response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("LLM response has unusable shape: {0}")]
    Shape(String),
}

impl JudgeError {
    /// Short label for metrics/log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            JudgeError::Unconfigured => "unconfigured",
            JudgeError::Transport(_) => "transport",
            JudgeError::Status(_) => "status",
            JudgeError::EmptyResponse => "empty",
            JudgeError::Parse(_) => "parse",
            JudgeError::Shape(_) => "shape",
        }
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(s) => JudgeError::Status(s.as_u16()),
            None => JudgeError::Transport(e.to_string()),
        }
    }
}

/// Failure inside the combine step; triggers the fallback path.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("combined value for `{field}` is not finite")]
    NonFinite { field: &'static str },
}
