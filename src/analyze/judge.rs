//! AI rubric judge: one structured prompt, one JSON answer, six 0–1 scores.
//!
//! Any failure (unconfigured client, transport, bad JSON, wrong shape) is returned as
//! `JudgeError`; the combiner turns it into "no opinion". Scores are clamped into
//! [0,1] here so a sloppy model answer cannot push a blended value out of range.

use serde::Deserialize;

use crate::analyze::ai_adapter::DynAiClient;
use crate::analyze::scoring;
use crate::error::JudgeError;
use crate::model::{PartialMetrics, ScoringContext};

pub const SYSTEM_PROMPT: &str = "You are a quality assessment expert. Analyze the given problem-solution pair and respond with valid JSON only.";

/// Rubric answer as the model is asked to return it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RubricResponse {
    clarity: f64,
    completeness: f64,
    accuracy: f64,
    relevance: f64,
    actionability: f64,
    technical_depth: f64,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    suggested_improvements: Vec<String>,
}

pub struct AiJudge {
    client: DynAiClient,
}

impl AiJudge {
    pub fn new(client: DynAiClient) -> Self {
        Self { client }
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn judge(&self, ctx: &ScoringContext) -> Result<PartialMetrics, JudgeError> {
        if !self.client.is_configured() {
            return Err(JudgeError::Unconfigured);
        }
        let prompt = build_prompt(ctx);
        let raw = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        parse_response(&raw)
    }
}

/// Rubric prompt embedding the pair and its provenance.
pub fn build_prompt(ctx: &ScoringContext) -> String {
    let platform = ctx.platform.as_deref().unwrap_or("unknown");
    let channel = ctx.channel_name.as_deref().unwrap_or("unknown");

    let mut extra = String::new();
    if let Some(sc) = ctx.source_context.as_deref().filter(|s| !s.trim().is_empty()) {
        extra.push_str(&format!("Context: {sc}\n"));
    }
    if let Some(len) = ctx.message_length {
        extra.push_str(&format!("Original message length: {len} characters\n"));
    }
    if ctx.has_links == Some(true) {
        extra.push_str("The original message contains links.\n");
    }

    format!(
        r#"Analyze this problem-solution pair for quality and provide detailed scoring:

Problem: "{problem}"
Solution: "{solution}"
Source: {platform} - {channel}
{extra}
Rate each aspect from 0.0 to 1.0 and provide reasoning:

1. Clarity: Is the problem clearly stated and solution easy to understand?
2. Completeness: Does the solution fully address the problem?
3. Accuracy: Is the solution technically correct and current?
4. Relevance: How relevant is this solution to the stated problem?
5. Actionability: Can someone follow this solution to solve their problem?
6. Technical Depth: How detailed and thorough is the technical content?

Also identify any flags or issues:
- Outdated information
- Security concerns
- Missing context
- Incomplete solution
- Unclear instructions

Respond with JSON in this format:
{{
  "clarity": 0.8,
  "completeness": 0.9,
  "accuracy": 0.85,
  "relevance": 0.95,
  "actionability": 0.8,
  "technicalDepth": 0.7,
  "reasoning": "Detailed explanation of scoring",
  "flags": ["any issues found"],
  "suggestedImprovements": ["specific suggestions"]
}}"#,
        problem = ctx.problem,
        solution = ctx.solution,
    )
}

/// Parse a model answer into a partial result with its own quality score attached.
pub fn parse_response(raw: &str) -> Result<PartialMetrics, JudgeError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(JudgeError::EmptyResponse);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(JudgeError::Shape("expected a JSON object".into()));
    }
    let r: RubricResponse =
        serde_json::from_value(value).map_err(|e| JudgeError::Shape(e.to_string()))?;

    let clarity = clamp01(r.clarity);
    let completeness = clamp01(r.completeness);
    let accuracy = clamp01(r.accuracy);
    let relevance = clamp01(r.relevance);
    let actionability = clamp01(r.actionability);

    Ok(PartialMetrics {
        clarity: Some(clarity),
        completeness: Some(completeness),
        accuracy: Some(accuracy),
        relevance: Some(relevance),
        actionability: Some(actionability),
        technical_depth: Some(clamp01(r.technical_depth)),
        quality_score: Some(scoring::quality_score(
            Some(clarity),
            Some(completeness),
            Some(accuracy),
            Some(relevance),
            Some(actionability),
        )),
        reasoning: r
            .reasoning
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        flags: non_blank(r.flags),
        suggested_improvements: non_blank(r.suggested_improvements),
    })
}

/// Models sometimes wrap JSON in a ```json fence despite being told not to.
fn strip_code_fence(raw: &str) -> &str {
    let t = raw.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
