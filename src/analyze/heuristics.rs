//! Deterministic text heuristics over the problem/solution strings.
//!
//! Signals (all case-insensitive):
//! - clarity:        problem length, interrogative word, problem-indicating term
//! - completeness:   solution length, sequencing/list, code marker, causal language
//! - technicalDepth: 0.1 per technical noun occurrence
//! - actionability:  action verb, shell/tool command marker, sequencing/list
//!
//! No I/O and no randomness: the same strings always give the same scores.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{PartialMetrics, ScoringContext};

pub const FLAG_SOLUTION_TOO_BRIEF: &str = "Solution too brief";
pub const FLAG_PROBLEM_UNCLEAR: &str = "Problem unclear";
pub const FLAG_NOT_ACTIONABLE: &str = "Not actionable";
pub const FLAG_INCOMPLETE_SOLUTION: &str = "Incomplete solution";

static RE_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(how|what|why|when|where|which)\b").expect("question regex"));
static RE_SPECIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(error|bug|issue|problem|failed|not working)\b").expect("specific regex")
});
static RE_STEP_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(step|first|then|next|finally)\b").expect("step regex"));
static RE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.|\n\d+\.|\n-\s").expect("list regex"));
static RE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```|`[^`]+`|\bcode\b").expect("code regex"));
static RE_EXPLANATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(because|reason|explanation|why)\b").expect("explanation regex")
});
static RE_TECH_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(function|method|class|variable|array|object|API|database|server|client|configuration|implementation)\b",
    )
    .expect("technical terms regex")
});
static RE_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(install|run|execute|create|add|remove|update|configure|set|use|try|check)\b")
        .expect("action regex")
});
static RE_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$|npm|pip|git|cd |mkdir|touch|ls |cp |mv ").expect("command regex")
});

/// Analyze the pair and return clarity/completeness/technicalDepth/actionability,
/// flags and a one-line reasoning. Never fails.
pub fn analyze(ctx: &ScoringContext) -> PartialMetrics {
    let problem = ctx.problem.as_str();
    let solution = ctx.solution.as_str();
    let problem_len = problem.chars().count();
    let solution_len = solution.chars().count();

    let has_question = RE_QUESTION.is_match(problem);
    let is_specific = RE_SPECIFIC.is_match(problem);
    let clarity: f64 = (if problem_len > 20 { 0.3_f64 } else { 0.1 }
        + if has_question { 0.3 } else { 0.0 }
        + if is_specific { 0.4 } else { 0.2 })
    .min(1.0);

    let has_steps = RE_STEP_WORDS.is_match(solution) || RE_LIST.is_match(solution);
    let has_code = ctx.has_code_examples.unwrap_or(false) || RE_CODE.is_match(solution);
    let has_explanation = RE_EXPLANATION.is_match(solution);
    let completeness: f64 = (if solution_len > 50 { 0.3_f64 } else { 0.1 }
        + if has_steps { 0.3 } else { 0.1 }
        + if has_code { 0.2 } else { 0.0 }
        + if has_explanation { 0.2 } else { 0.0 })
    .min(1.0);

    let technical_terms = RE_TECH_TERMS.find_iter(solution).count();
    let technical_depth = (technical_terms as f64 * 0.1).min(1.0);

    let has_action = RE_ACTION.is_match(solution);
    let has_command = RE_COMMAND.is_match(solution);
    let actionability: f64 = (if has_action { 0.4_f64 } else { 0.1 }
        + if has_command { 0.3 } else { 0.0 }
        + if has_steps { 0.3 } else { 0.1 })
    .min(1.0);

    let mut flags = Vec::new();
    if solution_len < 30 {
        flags.push(FLAG_SOLUTION_TOO_BRIEF.to_string());
    }
    if problem_len < 10 {
        flags.push(FLAG_PROBLEM_UNCLEAR.to_string());
    }
    if !has_action && !has_code {
        flags.push(FLAG_NOT_ACTIONABLE.to_string());
    }
    if solution.contains("TODO") || solution.contains("...") {
        flags.push(FLAG_INCOMPLETE_SOLUTION.to_string());
    }

    let reasoning = format!(
        "Heuristic analysis: Problem clarity {:.0}%, Solution completeness {:.0}%",
        clarity * 100.0,
        completeness * 100.0
    );

    PartialMetrics {
        clarity: Some(clarity),
        completeness: Some(completeness),
        technical_depth: Some(technical_depth),
        actionability: Some(actionability),
        reasoning: Some(reasoning),
        flags,
        ..Default::default()
    }
}
