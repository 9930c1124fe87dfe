// src/bot/session.rs — Per-chat conversation sessions

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::youtube::ChannelStats;

/// Which user input the conversation is currently waiting for. The intent
/// travels inside the state, so it can never be set (or cleared) separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Awaiting {
    #[default]
    None,
    ChannelReference {
        intent: Intent,
    },
    TitleList,
    HookTopic,
    ScriptIdea,
}

/// What a channel-reference prompt is for: plain analytics, or analytics
/// piped straight into the AI strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Analyze,
    AiTips,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub chat_id: i64,
    pub awaiting: Awaiting,
    /// Query behind the last successful resolution, for follow-up actions.
    pub last_query: Option<String>,
    pub last_stats: Option<ChannelStats>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new(chat_id: i64) -> Self {
        let now = Utc::now();
        Self {
            chat_id,
            awaiting: Awaiting::None,
            last_query: None,
            last_stats: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.awaiting == Awaiting::None
    }
}

/// In-memory session store keyed by chat ID. Each session is exclusively
/// owned by its key; the sequential update loop guarantees at most one
/// in-flight event per chat.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat_id: i64) -> Option<&Session> {
        self.sessions.get(&chat_id)
    }

    /// Fetch the session for a chat, creating it on first contact.
    pub fn entry(&mut self, chat_id: i64) -> &mut Session {
        self.sessions
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id))
    }

    /// Arm the state machine for the next free-text message.
    pub fn expect(&mut self, chat_id: i64, awaiting: Awaiting) {
        let session = self.entry(chat_id);
        session.awaiting = awaiting;
        session.updated_at = Utc::now();
    }

    /// Reset to idle. Cached stats survive so the quick-AI follow-up can
    /// reuse them.
    pub fn clear(&mut self, chat_id: i64) {
        if let Some(session) = self.sessions.get_mut(&chat_id) {
            session.awaiting = Awaiting::None;
            session.updated_at = Utc::now();
        }
    }

    /// Remember the last successful resolution for follow-up actions.
    pub fn remember_stats(&mut self, chat_id: i64, query: String, stats: ChannelStats) {
        let session = self.entry(chat_id);
        session.last_query = Some(query);
        session.last_stats = Some(stats);
        session.updated_at = Utc::now();
    }

    /// Cached stats, valid only while the query still matches the one they
    /// were resolved for.
    pub fn cached_stats(&self, chat_id: i64, query: &str) -> Option<&ChannelStats> {
        self.sessions
            .get(&chat_id)
            .filter(|s| s.last_query.as_deref() == Some(query))
            .and_then(|s| s.last_stats.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ChannelStats {
        ChannelStats {
            name: "c".into(),
            subscriber_count: 1,
            view_count: 2,
            video_count: 3,
            latest_video: None,
        }
    }

    #[test]
    fn test_entry_creates_idle_session() {
        let mut store = SessionStore::new();
        assert!(store.get(1).is_none());
        assert!(store.entry(1).is_idle());
    }

    #[test]
    fn test_clear_drops_awaiting_and_intent_together() {
        let mut store = SessionStore::new();
        store.expect(
            1,
            Awaiting::ChannelReference {
                intent: Intent::AiTips,
            },
        );
        assert!(!store.get(1).unwrap().is_idle());

        store.clear(1);
        let session = store.get(1).unwrap();
        assert_eq!(session.awaiting, Awaiting::None);
    }

    #[test]
    fn test_clear_keeps_cached_stats() {
        let mut store = SessionStore::new();
        store.remember_stats(1, "@c".into(), stats());
        store.expect(1, Awaiting::TitleList);
        store.clear(1);
        assert!(store.cached_stats(1, "@c").is_some());
    }

    #[test]
    fn test_cached_stats_requires_matching_query() {
        let mut store = SessionStore::new();
        store.remember_stats(1, "@c".into(), stats());
        assert!(store.cached_stats(1, "@c").is_some());
        assert!(store.cached_stats(1, "@other").is_none());
        assert!(store.cached_stats(2, "@c").is_none());
    }
}
