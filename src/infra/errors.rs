// src/infra/errors.rs — Error types for tubepulse

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubePulseError {
    // Resolver errors (user-correctable)
    #[error("empty channel query")]
    EmptyQuery,

    #[error("no channel matched the query")]
    ChannelNotFound,

    #[error("channel statistics unavailable")]
    StatsUnavailable,

    #[error("YouTube API key not configured")]
    MissingApiKey,

    // Provider transport / HTTP failures (never retried)
    #[error("provider request failed: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TubePulseError {
    /// Russian text shown in chat when a flow aborts on this error.
    /// The Display impl stays English for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => {
                "Пустой запрос. Пожалуйста, отправьте ссылку или @username.".into()
            }
            Self::ChannelNotFound => {
                "Не удалось найти канал по этому запросу. Проверьте правильность ссылки или @username."
                    .into()
            }
            Self::StatsUnavailable => {
                "Не удалось получить статистику канала (данные отсутствуют).".into()
            }
            Self::MissingApiKey => {
                "YouTube API key is missing. Аналитика канала временно недоступна.".into()
            }
            Self::Provider {
                status: Some(status),
                ..
            } => format!("Ошибка YouTube API: Код {status}"),
            Self::Provider { status: None, .. } => {
                "Произошла ошибка при соединении с YouTube API.".into()
            }
            _ => "Произошла ошибка. Попробуйте ещё раз позже.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_user_message_carries_status() {
        let err = TubePulseError::Provider {
            status: Some(403),
            message: "quota exceeded".into(),
        };
        assert_eq!(err.user_message(), "Ошибка YouTube API: Код 403");
    }

    #[test]
    fn test_transport_user_message_has_no_status() {
        let err = TubePulseError::Provider {
            status: None,
            message: "connection reset".into(),
        };
        assert!(err.user_message().contains("соединении"));
    }
}
