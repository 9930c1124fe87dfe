// src/bot/mod.rs — Bot runtime: long-polling loop and update mapping

pub mod dispatch;
pub mod render;
pub mod session;

use std::time::Duration;

use crate::advisor::Advisor;
use crate::infra::config::{Config, Credentials};
use crate::telegram::{types::Update, TelegramClient};
use crate::youtube::YouTubeClient;
use dispatch::{ChatEvent, Dispatcher, MenuAction};

/// Start the bot and poll until the process is stopped.
///
/// Updates are handled to completion in arrival order, so events for one
/// chat are strictly sequential and session state needs no locking.
pub async fn run(config: &Config, credentials: &Credentials) -> anyhow::Result<()> {
    let bot_token = credentials.require_bot_token()?.to_string();
    let telegram = TelegramClient::new(bot_token, config.telegram.poll_timeout_secs);

    telegram.delete_webhook().await?;
    tracing::info!("bot started, long polling for updates");

    let youtube = YouTubeClient::new(credentials.youtube_api_key.clone());
    let advisor = Advisor::new(credentials.groq_api_key.clone(), config.advisor.clone());
    let mut dispatcher = Dispatcher::new(telegram.clone(), youtube, advisor);

    let mut offset = 0i64;
    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("getUpdates failed: {e}");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            // Ack callbacks up front so the client drops its spinner even
            // if handling ends in a rendered error.
            if let Some(cb) = &update.callback_query {
                if let Err(e) = telegram.answer_callback(&cb.id).await {
                    tracing::debug!("answerCallbackQuery failed: {e}");
                }
            }

            let Some(event) = map_update(update) else {
                continue;
            };
            if let Err(e) = dispatcher.handle(event).await {
                tracing::warn!("update handling failed: {e}");
            }
        }
    }
}

/// Lift a raw Telegram update into a conversation event. Returns None for
/// update kinds the state machine has no contract for.
pub fn map_update(update: Update) -> Option<ChatEvent> {
    if let Some(cb) = update.callback_query {
        let message = cb.message?;
        let action = MenuAction::parse(cb.data.as_deref()?)?;
        return Some(ChatEvent::Selection {
            chat_id: message.chat.id,
            message_id: message.message_id,
            action,
        });
    }

    let message = update.message?;
    let chat_id = message.chat.id;
    let text = message.text?;
    let trimmed = text.trim();
    if trimmed == "/start" || trimmed.starts_with("/start ") {
        return Some(ChatEvent::Start { chat_id });
    }
    // Other slash commands are not part of the conversation contract.
    if trimmed.starts_with('/') {
        return None;
    }
    Some(ChatEvent::Text { chat_id, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::types::{CallbackQuery, Chat, Message, User};

    fn message(chat_id: i64, text: &str) -> Message {
        Message {
            message_id: 1,
            chat: Chat { id: chat_id },
            from: None,
            text: Some(text.to_string()),
        }
    }

    fn update_with_message(text: &str) -> Update {
        Update {
            update_id: 1,
            message: Some(message(10, text)),
            callback_query: None,
        }
    }

    #[test]
    fn test_map_start_command() {
        assert!(matches!(
            map_update(update_with_message("/start")),
            Some(ChatEvent::Start { chat_id: 10 })
        ));
        assert!(matches!(
            map_update(update_with_message("/start deep-link")),
            Some(ChatEvent::Start { .. })
        ));
    }

    #[test]
    fn test_map_other_commands_are_dropped() {
        assert!(map_update(update_with_message("/help")).is_none());
    }

    #[test]
    fn test_map_free_text() {
        match map_update(update_with_message("@MrBeast")) {
            Some(ChatEvent::Text { chat_id, text }) => {
                assert_eq!(chat_id, 10);
                assert_eq!(text, "@MrBeast");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_map_callback_selection() {
        let update = Update {
            update_id: 2,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "cb".into(),
                from: User {
                    id: 1,
                    username: None,
                    first_name: None,
                },
                message: Some(message(20, "menu")),
                data: Some("action_tool_hooks".into()),
            }),
        };
        match map_update(update) {
            Some(ChatEvent::Selection {
                chat_id, action, ..
            }) => {
                assert_eq!(chat_id, 20);
                assert_eq!(action, MenuAction::ToolHooks);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_map_callback_without_data_is_dropped() {
        let update = Update {
            update_id: 3,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "cb".into(),
                from: User {
                    id: 1,
                    username: None,
                    first_name: None,
                },
                message: Some(message(20, "menu")),
                data: None,
            }),
        };
        assert!(map_update(update).is_none());
    }
}
