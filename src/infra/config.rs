// src/infra/config.rs — Configuration loading (TOML) and credentials (environment)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::TubePulseError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub advisor: AdvisorConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Token ceiling for the channel-tips prompt.
    pub tips_max_tokens: u32,
    /// Token ceiling for the free-text tools (titles, hooks, scripts).
    pub tool_max_tokens: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.7,
            tips_max_tokens: 1024,
            tool_max_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Long-poll timeout passed to getUpdates, in seconds.
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the static dev server.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8081 }
    }
}

impl Config {
    /// Load `./config.toml`, falling back to defaults when absent.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Process-wide credentials, read once from the environment at startup and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub bot_token: Option<String>,
    pub youtube_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            bot_token: non_empty_var("BOT_TOKEN"),
            youtube_api_key: non_empty_var("YOUTUBE_API_KEY"),
            groq_api_key: non_empty_var("GROQ_API_KEY"),
        }
    }

    /// The bot cannot start without its session token. The two API keys are
    /// optional: their features degrade to explanatory messages instead.
    pub fn require_bot_token(&self) -> Result<&str, TubePulseError> {
        self.bot_token
            .as_deref()
            .ok_or_else(|| TubePulseError::Config("BOT_TOKEN is not set".into()))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.advisor.model, "llama-3.3-70b-versatile");
        assert_eq!(config.advisor.tips_max_tokens, 1024);
        assert_eq!(config.advisor.tool_max_tokens, 2048);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.advisor.temperature, 0.7);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_missing_bot_token_is_config_error() {
        let creds = Credentials::default();
        assert!(matches!(
            creds.require_bot_token(),
            Err(TubePulseError::Config(_))
        ));
    }
}
