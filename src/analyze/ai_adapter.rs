//! AI adapter: the LLM capability as a trait object plus concrete providers.
//!
//! The judge only needs "given a system + user prompt, return JSON text or fail".
//! Which provider backs that is decided once, from `AiConfig` and the environment.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ai::AiConfig;
use crate::error::JudgeError;

/// Boxed future returned by `AiClient::complete`.
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, JudgeError>> + Send + 'a>>;

/// LLM capability used by the rubric judge.
pub trait AiClient: Send + Sync {
    /// Send one chat completion that must answer with a JSON object.
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str) -> CompletionFuture<'a>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
    /// `false` when there is no usable backend (no credentials, disabled).
    fn is_configured(&self) -> bool {
        true
    }
}

/// Convenient alias used by callers.
pub type DynAiClient = Arc<dyn AiClient>;

/// Factory: build a client according to config and environment variables.
///
/// * `AI_TEST_MODE=mock`  → deterministic mock returning a fixed rubric JSON.
/// * `AI_TEST_MODE=error` → client that always fails with a transport error.
/// * `enabled == false` or no API key → disabled client.
/// * otherwise the OpenAI provider.
pub fn build_client_from_config(config: &AiConfig) -> DynAiClient {
    match std::env::var("AI_TEST_MODE").ok().as_deref() {
        Some("mock") => return Arc::new(MockClient::default()),
        Some("error") => return Arc::new(FailingClient),
        _ => {}
    }

    if !config.enabled {
        return Arc::new(DisabledClient);
    }

    match config.provider.as_str() {
        "openai" if !config.api_key.is_empty() => match OpenAiProvider::new(config) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                warn!(error = %e, "failed to build OpenAI client; AI judge disabled");
                Arc::new(DisabledClient)
            }
        },
        "openai" => Arc::new(DisabledClient),
        other => {
            warn!(provider = other, "unsupported AI provider; AI judge disabled");
            Arc::new(DisabledClient)
        }
    }
}

// ------------------------------------------------------------
// OpenAI
// ------------------------------------------------------------

/// OpenAI Chat Completions with `response_format = json_object`.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(config: &AiConfig) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .user_agent("knowledge-quality/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    async fn complete_impl(&self, system: &str, prompt: &str) -> Result<String, JudgeError> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: &'static str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
            response_format: ResponseFormat,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            #[serde(default)]
            content: Option<String>,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.1,
            max_tokens: 800,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16()));
        }

        let body: Resp = resp.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or(JudgeError::EmptyResponse)
    }
}

impl AiClient for OpenAiProvider {
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(self.complete_impl(system, prompt))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Disabled / test doubles
// ------------------------------------------------------------

/// Used when AI is disabled or credentials are missing.
pub struct DisabledClient;

impl AiClient for DisabledClient {
    fn complete<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async { Err(JudgeError::Unconfigured) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
    fn is_configured(&self) -> bool {
        false
    }
}

/// Returns a fixed response body for every prompt.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl MockClient {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new(
            r#"{"clarity":0.8,"completeness":0.8,"accuracy":0.8,"relevance":0.8,"actionability":0.8,"technicalDepth":0.6,"reasoning":"Mock rubric assessment","flags":[],"suggestedImprovements":["Add a short example (mock)"]}"#,
        )
    }
}

impl AiClient for MockClient {
    fn complete<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> CompletionFuture<'a> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Always fails, as a timed-out or rate-limited provider would.
pub struct FailingClient;

impl AiClient for FailingClient {
    fn complete<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async { Err(JudgeError::Transport("simulated provider failure".into())) })
    }
    fn provider_name(&self) -> &'static str {
        "failing"
    }
}
