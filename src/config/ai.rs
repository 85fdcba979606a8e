// src/config/ai.rs
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";
pub const ENV_AI_CONFIG_PATH: &str = "AI_CONFIG_PATH";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// Only "openai" is wired; anything else disables the judge.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            endpoint: default_endpoint(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading AI config from {}", path.display()))?;
        let mut cfg: AiConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing AI config {}", path.display()))?;

        cfg.provider = cfg.provider.trim().to_lowercase();

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "openai" => env::var(ENV_OPENAI_API_KEY).unwrap_or_default(),
                other => bail!("Unsupported provider in config: {other}"),
            };
        }

        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = default_timeout_secs();
        }

        Ok(cfg)
    }

    /// Config purely from the environment: enabled iff `OPENAI_API_KEY` is set.
    pub fn from_env() -> Self {
        let api_key = env::var(ENV_OPENAI_API_KEY).unwrap_or_default();
        Self {
            enabled: !api_key.trim().is_empty(),
            api_key,
            ..Self::default()
        }
    }

    /// Load using env var + fallbacks:
    /// 1) $AI_CONFIG_PATH
    /// 2) config/ai.json
    /// 3) environment only
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_AI_CONFIG_PATH) {
            return Self::load_from_file(PathBuf::from(p));
        }
        let p = PathBuf::from(DEFAULT_AI_CONFIG_PATH);
        if p.exists() {
            return Self::load_from_file(&p);
        }
        Ok(Self::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn resolves_env_key_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ai.json");
        fs::write(&p, r#"{"enabled": true, "provider": " OpenAI ", "api_key": "ENV"}"#).unwrap();

        env::set_var(ENV_OPENAI_API_KEY, "sk-test");
        let cfg = AiConfig::load_from_file(&p).unwrap();
        env::remove_var(ENV_OPENAI_API_KEY);

        assert!(cfg.enabled);
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.api_key, "sk-test");
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[serial_test::serial]
    #[test]
    fn env_only_config_follows_key_presence() {
        env::remove_var(ENV_OPENAI_API_KEY);
        assert!(!AiConfig::from_env().enabled);
        env::set_var(ENV_OPENAI_API_KEY, "sk-abc");
        assert!(AiConfig::from_env().enabled);
        env::remove_var(ENV_OPENAI_API_KEY);
    }

    #[test]
    fn unknown_provider_with_env_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ai.json");
        fs::write(&p, r#"{"enabled": true, "provider": "claude", "api_key": "env"}"#).unwrap();
        assert!(AiConfig::load_from_file(&p).is_err());
    }
}
