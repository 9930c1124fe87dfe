// src/advisor/mod.rs — Groq-backed growth advisor (OpenAI-compatible API)
//
// The advisor never crashes the conversation: every failure path collapses
// to a displayable string that stands in for the advice text.

pub mod prompts;

use std::time::Duration;

use crate::infra::config::AdvisorConfig;

pub use prompts::PromptKind;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of an advisor call. `Degraded` carries the user-facing
/// explanation standing in for the advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    Ok(String),
    Degraded(String),
}

impl Advice {
    /// Collapse to the text shown in chat.
    pub fn into_text(self) -> String {
        match self {
            Advice::Ok(text) | Advice::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Advice::Degraded(_))
    }
}

pub struct Advisor {
    client: reqwest::Client,
    api_key: Option<String>,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(api_key: Option<String>, config: AdvisorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    /// Run one chat completion over the prepared prompt. Fixed model and
    /// temperature; the token ceiling depends on the prompt kind.
    pub async fn advise(&self, kind: PromptKind, prompt: String) -> Advice {
        let Some(api_key) = self.api_key.as_deref() else {
            return Advice::Degraded(
                "Groq API key is missing. Добавьте GROQ_API_KEY, чтобы включить AI-стратегии."
                    .into(),
            );
        };

        let max_tokens = match kind {
            PromptKind::ChannelTips => self.config.tips_max_tokens,
            _ => self.config.tool_max_tokens,
        };
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.config.temperature,
            "max_tokens": max_tokens,
        });

        let response = match self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Advice::Degraded(format!("❌ Ошибка соединения с Groq: {e}")),
        };

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Advice::Degraded(format!("❌ Ошибка Groq API: {detail}"));
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                let content = body["choices"][0]["message"]["content"]
                    .as_str()
                    .unwrap_or("")
                    .to_string();
                Advice::Ok(content)
            }
            Err(e) => Advice::Degraded(format!("❌ Ошибка соединения с Groq: {e}")),
        }
    }
}
