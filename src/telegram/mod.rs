// src/telegram/mod.rs — Telegram Bot API transport (long polling)
//
// Uses the Telegram Bot API (https://core.telegram.org/bots/api).

pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::infra::errors::TubePulseError;
use types::{InlineKeyboard, Message, TelegramResponse, Update};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound render primitive the conversation layer talks through.
/// A trait so dispatch tests can record sends without a network.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a message, returning its ID for later edits.
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<i64, TubePulseError>;

    /// Replace the text/keyboard of a previously sent message in place.
    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), TubePulseError>;
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(bot_token: String, poll_timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            poll_timeout_secs,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{TELEGRAM_API_BASE}/bot{}/{method}", self.bot_token)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TubePulseError> {
        let response: TelegramResponse<T> = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TubePulseError::Telegram(e.to_string()))?
            .json()
            .await
            .map_err(|e| TubePulseError::Telegram(e.to_string()))?;

        if !response.ok {
            return Err(TubePulseError::Telegram(
                response
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }
        response
            .result
            .ok_or_else(|| TubePulseError::Telegram(format!("{method} returned no result")))
    }

    /// Drop any queued webhook updates before long polling starts.
    pub async fn delete_webhook(&self) -> Result<(), TubePulseError> {
        let _: bool = self
            .call(
                "deleteWebhook",
                serde_json::json!({ "drop_pending_updates": true }),
                CALL_TIMEOUT,
            )
            .await?;
        Ok(())
    }

    /// Long-poll for the next batch of updates past `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TubePulseError> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        // The read timeout must outlast the server-side long-poll window.
        self.call(
            "getUpdates",
            body,
            Duration::from_secs(self.poll_timeout_secs + 5),
        )
        .await
    }

    /// Ack a callback query so the client stops showing its spinner.
    pub async fn answer_callback(&self, callback_id: &str) -> Result<(), TubePulseError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                serde_json::json!({ "callback_query_id": callback_id }),
                CALL_TIMEOUT,
            )
            .await?;
        Ok(())
    }

    fn message_body(
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<serde_json::Value, TubePulseError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)
                .map_err(|e| TubePulseError::Telegram(e.to_string()))?;
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<i64, TubePulseError> {
        let body = Self::message_body(chat_id, text, keyboard)?;
        let message: Message = self.call("sendMessage", body, CALL_TIMEOUT).await?;
        Ok(message.message_id)
    }

    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), TubePulseError> {
        let mut body = Self::message_body(chat_id, text, keyboard)?;
        body["message_id"] = serde_json::json!(message_id);
        let _: Message = self.call("editMessageText", body, CALL_TIMEOUT).await?;
        Ok(())
    }
}
