// src/bot/dispatch.rs — Conversation state machine
//
// Two event kinds drive the flow: menu selections (callback payloads) and
// free-text messages. A selection always re-arms the session first; a text
// message is processed against the current state and the session then
// deterministically returns to idle.

use crate::advisor::{prompts, Advisor, PromptKind};
use crate::bot::render;
use crate::bot::session::{Awaiting, Intent, SessionStore};
use crate::infra::errors::TubePulseError;
use crate::telegram::ChatTransport;
use crate::util::truncate_str;
use crate::youtube::YouTubeClient;

/// Telegram caps callback payloads at 64 bytes; "ai_gen_" leaves 57 for the query.
const QUICK_GEN_PREFIX: &str = "ai_gen_";
const QUICK_GEN_QUERY_BUDGET: usize = 57;

/// Menu selections arriving as opaque callback payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    AnalyzeChannel,
    AiTipsPrompt,
    ToolTitles,
    ToolHooks,
    ToolScript,
    MainMenu,
    Cancel,
    /// Follow-up from the stats card; carries the original query verbatim.
    QuickAiGen(String),
}

impl MenuAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "action_analyze_channel" => Some(Self::AnalyzeChannel),
            "action_ai_tips_prompt" => Some(Self::AiTipsPrompt),
            "action_tool_titles" => Some(Self::ToolTitles),
            "action_tool_hooks" => Some(Self::ToolHooks),
            "action_tool_script" => Some(Self::ToolScript),
            "action_main_menu" => Some(Self::MainMenu),
            "action_cancel" => Some(Self::Cancel),
            _ => data
                .strip_prefix(QUICK_GEN_PREFIX)
                .map(|q| Self::QuickAiGen(q.to_string())),
        }
    }

    /// Callback payload for a keyboard button.
    pub fn data(&self) -> String {
        match self {
            Self::AnalyzeChannel => "action_analyze_channel".into(),
            Self::AiTipsPrompt => "action_ai_tips_prompt".into(),
            Self::ToolTitles => "action_tool_titles".into(),
            Self::ToolHooks => "action_tool_hooks".into(),
            Self::ToolScript => "action_tool_script".into(),
            Self::MainMenu => "action_main_menu".into(),
            Self::Cancel => "action_cancel".into(),
            Self::QuickAiGen(query) => format!(
                "{QUICK_GEN_PREFIX}{}",
                truncate_str(query, QUICK_GEN_QUERY_BUDGET)
            ),
        }
    }
}

/// One incoming conversation event, lifted out of the transport's update format.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The /start command.
    Start { chat_id: i64 },
    /// A menu selection, with the menu message it was attached to.
    Selection {
        chat_id: i64,
        message_id: i64,
        action: MenuAction,
    },
    /// Free-form message text.
    Text { chat_id: i64, text: String },
}

pub struct Dispatcher<T: ChatTransport> {
    transport: T,
    youtube: YouTubeClient,
    advisor: Advisor,
    sessions: SessionStore,
}

impl<T: ChatTransport> Dispatcher<T> {
    pub fn new(transport: T, youtube: YouTubeClient, advisor: Advisor) -> Self {
        Self {
            transport,
            youtube,
            advisor,
            sessions: SessionStore::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    /// Handle one event to completion. Transport errors bubble up to the
    /// polling loop, which logs and moves on; resolver and advisor failures
    /// are rendered, never raised.
    pub async fn handle(&mut self, event: ChatEvent) -> Result<(), TubePulseError> {
        match event {
            ChatEvent::Start { chat_id } => self.handle_start(chat_id).await,
            ChatEvent::Selection {
                chat_id,
                message_id,
                action,
            } => self.handle_selection(chat_id, message_id, action).await,
            ChatEvent::Text { chat_id, text } => self.handle_text(chat_id, text).await,
        }
    }

    async fn handle_start(&mut self, chat_id: i64) -> Result<(), TubePulseError> {
        self.sessions.clear(chat_id);
        self.transport
            .send(chat_id, render::WELCOME, Some(render::main_menu()))
            .await?;
        Ok(())
    }

    async fn handle_selection(
        &mut self,
        chat_id: i64,
        message_id: i64,
        action: MenuAction,
    ) -> Result<(), TubePulseError> {
        match action {
            MenuAction::MainMenu => {
                self.sessions.clear(chat_id);
                self.transport
                    .edit(chat_id, message_id, render::MENU_RETURN, Some(render::main_menu()))
                    .await
            }
            MenuAction::Cancel => {
                self.sessions.clear(chat_id);
                self.transport
                    .edit(chat_id, message_id, render::CANCELLED, Some(render::main_menu()))
                    .await
            }
            MenuAction::AnalyzeChannel => {
                self.prompt_channel_reference(chat_id, message_id, Intent::Analyze)
                    .await
            }
            MenuAction::AiTipsPrompt => {
                self.prompt_channel_reference(chat_id, message_id, Intent::AiTips)
                    .await
            }
            MenuAction::ToolTitles => {
                self.prompt_tool(chat_id, message_id, Awaiting::TitleList, render::TITLES_PROMPT)
                    .await
            }
            MenuAction::ToolHooks => {
                self.prompt_tool(chat_id, message_id, Awaiting::HookTopic, render::HOOKS_PROMPT)
                    .await
            }
            MenuAction::ToolScript => {
                self.prompt_tool(chat_id, message_id, Awaiting::ScriptIdea, render::SCRIPT_PROMPT)
                    .await
            }
            MenuAction::QuickAiGen(query) => self.quick_ai_gen(chat_id, message_id, &query).await,
        }
    }

    async fn prompt_channel_reference(
        &mut self,
        chat_id: i64,
        message_id: i64,
        intent: Intent,
    ) -> Result<(), TubePulseError> {
        self.sessions
            .expect(chat_id, Awaiting::ChannelReference { intent });
        self.transport
            .edit(
                chat_id,
                message_id,
                render::ANALYZE_PROMPT,
                Some(render::cancel_keyboard()),
            )
            .await
    }

    async fn prompt_tool(
        &mut self,
        chat_id: i64,
        message_id: i64,
        awaiting: Awaiting,
        prompt: &str,
    ) -> Result<(), TubePulseError> {
        self.sessions.expect(chat_id, awaiting);
        self.transport
            .edit(chat_id, message_id, prompt, Some(render::cancel_keyboard()))
            .await
    }

    async fn handle_text(&mut self, chat_id: i64, text: String) -> Result<(), TubePulseError> {
        let text = text.trim().to_string();
        let awaiting = self.sessions.entry(chat_id).awaiting;
        match awaiting {
            // Free text while idle belongs to other features, not this one.
            Awaiting::None => Ok(()),
            Awaiting::ChannelReference { intent } => {
                self.sessions.clear(chat_id);
                self.process_channel_reference(chat_id, &text, intent).await
            }
            Awaiting::TitleList => {
                self.sessions.clear(chat_id);
                self.run_tool(
                    chat_id,
                    render::TITLES_PROGRESS,
                    render::TITLES_HEADER,
                    PromptKind::TitleAb,
                    prompts::title_ab(&text),
                )
                .await
            }
            Awaiting::HookTopic => {
                self.sessions.clear(chat_id);
                self.run_tool(
                    chat_id,
                    render::HOOKS_PROGRESS,
                    render::HOOKS_HEADER,
                    PromptKind::HookTopic,
                    prompts::hook_topic(&text),
                )
                .await
            }
            Awaiting::ScriptIdea => {
                self.sessions.clear(chat_id);
                self.run_tool(
                    chat_id,
                    render::SCRIPT_PROGRESS,
                    render::SCRIPT_HEADER,
                    PromptKind::ScriptIdea,
                    prompts::script_idea(&text),
                )
                .await
            }
        }
    }

    async fn process_channel_reference(
        &mut self,
        chat_id: i64,
        query: &str,
        intent: Intent,
    ) -> Result<(), TubePulseError> {
        let progress_id = self.transport.send(chat_id, render::CONNECTING, None).await?;

        let stats = match self.youtube.resolve(query).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("channel resolution failed: {e}");
                self.transport
                    .edit(
                        chat_id,
                        progress_id,
                        &render::error_text(&e.user_message()),
                        Some(render::back_keyboard()),
                    )
                    .await?;
                return Ok(());
            }
        };

        match intent {
            Intent::Analyze => {
                let card = render::stats_card(&stats);
                let keyboard = render::stats_keyboard(query);
                self.sessions.remember_stats(chat_id, query.to_string(), stats);
                self.transport
                    .edit(chat_id, progress_id, &card, Some(keyboard))
                    .await
            }
            Intent::AiTips => {
                self.transport
                    .edit(chat_id, progress_id, render::GENERATING_TIPS, None)
                    .await?;
                let advice = self
                    .advisor
                    .advise(PromptKind::ChannelTips, prompts::channel_tips(&stats))
                    .await;
                let text = render::ai_strategy_text(&stats.name, &advice.into_text());
                self.transport
                    .edit(chat_id, progress_id, &text, Some(render::back_keyboard()))
                    .await
            }
        }
    }

    async fn run_tool(
        &mut self,
        chat_id: i64,
        progress: &str,
        header: &str,
        kind: PromptKind,
        prompt: String,
    ) -> Result<(), TubePulseError> {
        let wait_id = self.transport.send(chat_id, progress, None).await?;
        let advice = self.advisor.advise(kind, prompt).await;
        let text = format!("{header}\n\n{}", advice.into_text());
        self.transport
            .edit(chat_id, wait_id, &text, Some(render::back_keyboard()))
            .await
    }

    /// Quick-AI follow-up from the stats card. Reuses the stats cached at
    /// render time while the payload still matches; otherwise resolves the
    /// reference again.
    async fn quick_ai_gen(
        &mut self,
        chat_id: i64,
        message_id: i64,
        query: &str,
    ) -> Result<(), TubePulseError> {
        self.transport
            .edit(chat_id, message_id, render::GENERATING_QUICK, None)
            .await?;

        let cached = self.sessions.cached_stats(chat_id, query).cloned();
        let stats = match cached {
            Some(stats) => stats,
            None => match self.youtube.resolve(query).await {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!("channel resolution failed: {e}");
                    self.transport
                        .edit(
                            chat_id,
                            message_id,
                            &render::quick_error_text(&e.user_message()),
                            Some(render::back_keyboard()),
                        )
                        .await?;
                    return Ok(());
                }
            },
        };

        let advice = self
            .advisor
            .advise(PromptKind::ChannelTips, prompts::channel_tips(&stats))
            .await;
        let text = render::ai_strategy_text(&stats.name, &advice.into_text());
        self.transport
            .edit(chat_id, message_id, &text, Some(render::back_keyboard()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_action_round_trip() {
        let actions = [
            MenuAction::AnalyzeChannel,
            MenuAction::AiTipsPrompt,
            MenuAction::ToolTitles,
            MenuAction::ToolHooks,
            MenuAction::ToolScript,
            MenuAction::MainMenu,
            MenuAction::Cancel,
            MenuAction::QuickAiGen("@MrBeast".into()),
        ];
        for action in actions {
            assert_eq!(MenuAction::parse(&action.data()), Some(action.clone()));
        }
    }

    #[test]
    fn test_menu_action_rejects_unknown() {
        assert_eq!(MenuAction::parse("action_unknown"), None);
        assert_eq!(MenuAction::parse(""), None);
    }

    #[test]
    fn test_quick_gen_payload_stays_within_limit() {
        let query = "a".repeat(200);
        let data = MenuAction::QuickAiGen(query).data();
        assert!(data.len() <= 64);
    }
}
