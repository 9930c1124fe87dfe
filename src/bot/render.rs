// src/bot/render.rs — User-facing texts and keyboards (Russian UI, HTML parse mode)

use crate::bot::dispatch::MenuAction;
use crate::telegram::types::{InlineButton, InlineKeyboard};
use crate::util::{escape_html, format_count};
use crate::youtube::ChannelStats;

pub const WEB_APP_URL: &str = "https://example.com/";

pub const WELCOME: &str = "👋 <b>Добро пожаловать в Channel Analytics Pro Bot!</b>\n\n\
    Я работаю <u>напрямую с реальными API</u> вашего YouTube и Groq.\n\
    Отправьте мне ссылку на канал и я выдам всю настоящую статистику.\n\n\
    <i>Выберите действие ниже:</i>";

pub const MENU_RETURN: &str = "👋 Вы вернулись в главное меню.\nВыберите действие:";

pub const CANCELLED: &str =
    "❌ <i>Действие отменено.</i>\n\nВыберите действие в меню:";

pub const ANALYZE_PROMPT: &str = "🔍 <b>Анализ канала</b>\n\n\
    Пожалуйста, отправьте мне ссылку на YouTube канал или его @username \
    (например: <code>@MrBeast</code> или <code>https://youtube.com/@MrBeast</code>).";

pub const TITLES_PROMPT: &str = "⚖️ <b>A/B Тестер Названий</b>\n\n\
    Отправьте мне 2-3 варианта названий для вашего нового видео (желательно каждое с новой строки), \
    и мой ИИ определит, какое из них принесет наибольший CTR (кликабельность).";

pub const HOOKS_PROMPT: &str = "🪝 <b>Генератор Вирусных Хуков</b>\n\n\
    Отправьте мне тему или предварительное название вашего будущего видео, и я напишу 3 убойных \
    содержательных сценария для первых 5 секунд, чтобы удержать максимальное количество зрителей.";

pub const SCRIPT_PROMPT: &str = "🎬 <b>Генератор Сценариев Pro</b>\n\n\
    Кратко опишите задумку вашего видео (о чем оно). Наш Producer AI выдаст:\n\
    • Лучшее название и идею превью\n\
    • Вирусный хук дословно\n\
    • Структуру сценария на основе удержания";

pub const CONNECTING: &str = "⏳ <i>Подключаюсь к YouTube API...</i>";

pub const GENERATING_TIPS: &str =
    "⏳ <i>YouTube данные получены. Генерирую стратегию через Groq...</i>";

pub const GENERATING_QUICK: &str =
    "⏳ <i>Генерирую персональную AI-стратегию через Groq API...</i>";

pub const TITLES_PROGRESS: &str = "⏳ <i>Анализирую психологию и CTR ваших вариантов...</i>";

pub const HOOKS_PROGRESS: &str = "⏳ <i>Пишу сценарии вирусных хуков...</i>";

pub const SCRIPT_PROGRESS: &str =
    "⏳ <i>Генерирую 'Masterpiece' продакшен план... Это займет около 10 секунд.</i>";

pub const TITLES_HEADER: &str = "⚖️ <b>Результаты A/B Теста:</b>";

pub const HOOKS_HEADER: &str = "🪝 <b>Ваши Хуки:</b>";

pub const SCRIPT_HEADER: &str = "🎬 <b>Генератор Сценариев Pro:</b>";

pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![InlineButton::callback(
            "📊 Анализ канала",
            MenuAction::AnalyzeChannel.data(),
        )])
        .row(vec![
            InlineButton::callback("⚖️ A/B Тест Названий", MenuAction::ToolTitles.data()),
            InlineButton::callback("🪝 Вирусные Хуки", MenuAction::ToolHooks.data()),
        ])
        .row(vec![InlineButton::callback(
            "🎬 Генератор Сценариев Pro",
            MenuAction::ToolScript.data(),
        )])
        .row(vec![InlineButton::link("🌍 Открыть Web-App", WEB_APP_URL)])
}

pub fn back_keyboard() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![InlineButton::callback(
        "⬅️ Назад в меню",
        MenuAction::MainMenu.data(),
    )])
}

pub fn cancel_keyboard() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![InlineButton::callback(
        "❌ Отмена",
        MenuAction::Cancel.data(),
    )])
}

/// Keyboard under the stats card: quick AI follow-up carrying the query,
/// plus the way back.
pub fn stats_keyboard(query: &str) -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![InlineButton::callback(
            "🧠 Получить AI Стратегию (Groq)",
            MenuAction::QuickAiGen(query.to_string()).data(),
        )])
        .row(vec![InlineButton::callback(
            "⬅️ Назад",
            MenuAction::MainMenu.data(),
        )])
}

/// The analytics card for a resolved channel.
pub fn stats_card(stats: &ChannelStats) -> String {
    let mut text = format!(
        "📊 <b>Реальная аналитика канала:</b> {}\n\n\
         👥 <b>Подписчики:</b> {}\n\
         👁 <b>Просмотры:</b> {}\n\
         🎬 <b>Всего видео:</b> {}\n",
        escape_html(&stats.name),
        format_count(stats.subscriber_count),
        format_count(stats.view_count),
        format_count(stats.video_count),
    );

    if let Some(latest) = &stats.latest_video {
        text.push_str(&format!(
            "\n🔥 <b>Последний релиз:</b>\n\
             <i>Название:</i> {}\n\
             <i>Просмотры:</i> {}\n\
             <i>Лайки:</i> {} (Удержание/Вовлеченность ~{:.1}%)\n\
             🔗 {}\n",
            escape_html(&latest.title),
            format_count(latest.view_count),
            format_count(latest.like_count),
            latest.engagement_rate(),
            latest.url,
        ));
    }
    text
}

pub fn ai_strategy_text(channel_name: &str, advice: &str) -> String {
    format!(
        "🤖 <b>AI Стратегия для {}</b>\n\n{advice}",
        escape_html(channel_name)
    )
}

pub fn error_text(message: &str) -> String {
    format!("❌ <b>Ошибка:</b> {message}")
}

pub fn quick_error_text(message: &str) -> String {
    format!("❌ Ошибка YouTube API при генерации: {message}")
}
