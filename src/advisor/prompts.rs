// src/advisor/prompts.rs — Prompt templates for the growth advisor
//
// Templates are deterministic: same payload, same prompt. The response
// language is pinned to Russian because that is what the bot's audience
// reads, whatever language the input arrives in.

use crate::youtube::ChannelStats;

/// Which advice feature a prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ChannelTips,
    TitleAb,
    HookTopic,
    ScriptIdea,
}

const RUSSIAN_ONLY: &str = "СТРОГОЕ ПРАВИЛО: ОТВЕЧАЙ ИСКЛЮЧИТЕЛЬНО НА РУССКОМ ЯЗЫКЕ.";

/// Growth tips grounded in the channel's real statistics.
pub fn channel_tips(stats: &ChannelStats) -> String {
    let mut prompt = format!(
        "You are an elite YouTube growth expert. Analyze this channel briefly:\n\
         Channel: {}\n\
         Subscribers: {}\n\
         Total Views: {}\n\
         Videos given: {}\n",
        stats.name, stats.subscriber_count, stats.view_count, stats.video_count
    );
    if let Some(latest) = &stats.latest_video {
        prompt.push_str(&format!(
            "Latest video: '{}' with {} views.\n",
            latest.title, latest.view_count
        ));
    }
    prompt.push_str(
        "\nProvide 3 highly specific, actionable tips in Russian to grow this specific channel right now. \
         Use formatting (bold, emojis) to make it easy to read in Telegram.",
    );
    prompt
}

/// A/B comparison of candidate video titles.
pub fn title_ab(titles: &str) -> String {
    format!(
        "You are a YouTube CTR and psychology expert.\n\
         Analyze these titles for a video and determine which will get the highest click-through rate:\n\n\
         {titles}\n\n\
         {RUSSIAN_ONLY}\n\n\
         Provide your analysis formatted in Markdown.\n\
         1. Declare the WINNER clearly.\n\
         2. Give a CTR prediction out of 100 for each.\n\
         3. Explain the psychological triggers.\n\
         4. Provide ONE new 'God-Tier' title that is even better."
    )
}

/// Three opening hooks for the first seconds of a video on `topic`.
pub fn hook_topic(topic: &str) -> String {
    format!(
        "You are a high-retention YouTube Shorts and Video scriptwriter.\n\
         Video Topic: \"{topic}\"\n\n\
         {RUSSIAN_ONLY}\n\n\
         Generate 3 distinct, high-impact verbal hooks for the first 3-5 seconds of this video.\n\
         Format in Markdown:\n\
         - **Hook 1 (The Question/Curiosity Gap)**\n\
         - **Hook 2 (The Negative Statement/Shock)**\n\
         - **Hook 3 (The Ultra-Specific Value Promise)**\n\
         Include brief visual direction for each (e.g., [Camera rapidly zooms in])."
    )
}

/// Full production plan for a raw video idea.
pub fn script_idea(idea: &str) -> String {
    format!(
        "You are a legendary YouTube Producer and Scriptwriter who has helped creators gain millions of views.\n\
         I have an idea for a video. You need to turn it into a complete, ready-to-shoot production plan.\n\n\
         Topic / Idea: \"{idea}\"\n\n\
         СТРОГОЕ ПРАВИЛО: ОТВЕЧАЙ ИСКЛЮЧИТЕЛЬНО НА РУССКОМ ЯЗЫКЕ (включая сценарии, хуки и инструкции).\n\n\
         Create a highly structured production guide in Markdown format. Use emojis and bold text. \
         It MUST contain these exact sections:\n\
         # 🎬 1. Идея и Угол подачи (Curiosity gap)\n\
         # 💥 2. Топ-3 Кликбейтных названия\n\
         # 🖼️ 3. Идея Превью (Thumbnail)\n\
         # 🪝 4. 5-секундный вирусный хук (Сценарий дословно)\n\
         # 📜 5. Структура сценария (3 Акта)\n\
         # ⏱️ 6. Точка удержания (Pattern interrupt)\n\
         # 📢 7. Призыв к действию (CTA)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::LatestVideo;

    fn stats(latest: Option<LatestVideo>) -> ChannelStats {
        ChannelStats {
            name: "Test Channel".into(),
            subscriber_count: 1_000,
            view_count: 50_000,
            video_count: 42,
            latest_video: latest,
        }
    }

    #[test]
    fn test_channel_tips_embeds_stats() {
        let prompt = channel_tips(&stats(None));
        assert!(prompt.contains("Channel: Test Channel"));
        assert!(prompt.contains("Subscribers: 1000"));
        assert!(prompt.contains("Total Views: 50000"));
        assert!(!prompt.contains("Latest video:"));
    }

    #[test]
    fn test_channel_tips_includes_latest_when_present() {
        let latest = LatestVideo {
            title: "Big Release".into(),
            view_count: 777,
            like_count: 10,
            url: "https://youtu.be/x".into(),
        };
        let prompt = channel_tips(&stats(Some(latest)));
        assert!(prompt.contains("Latest video: 'Big Release' with 777 views."));
    }

    #[test]
    fn test_title_ab_embeds_lines_verbatim() {
        let prompt = title_ab("Title A\nTitle B");
        assert!(prompt.contains("Title A\nTitle B"));
        assert!(prompt.contains("Declare the WINNER"));
        assert!(prompt.contains("CTR prediction out of 100"));
        assert!(prompt.contains("ONE new 'God-Tier' title"));
    }

    #[test]
    fn test_hook_topic_requests_three_hooks() {
        let prompt = hook_topic("как выучить Rust");
        assert!(prompt.contains("Video Topic: \"как выучить Rust\""));
        assert!(prompt.contains("Hook 1"));
        assert!(prompt.contains("Hook 3"));
    }

    #[test]
    fn test_script_idea_has_all_sections() {
        let prompt = script_idea("обзор гаджета");
        for n in 1..=7 {
            assert!(prompt.contains(&format!("{n}. ")), "missing section {n}");
        }
    }

    #[test]
    fn test_all_free_text_templates_pin_russian() {
        assert!(title_ab("x").contains("НА РУССКОМ ЯЗЫКЕ"));
        assert!(hook_topic("x").contains("НА РУССКОМ ЯЗЫКЕ"));
        assert!(script_idea("x").contains("НА РУССКОМ ЯЗЫКЕ"));
    }
}
