//! Chat front end
//!
//! Turns a chat message into one preference or recommendation operation and
//! renders the outcome as Telegram MarkdownV2 text. Nothing here talks to a
//! chat platform; a transport forwards the user's text and sends back
//! [`Reply::text`], offering [`Reply::actions`] as buttons when it can.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppError,
    models::{Category, ClearDecision, ClearOutcome, RecommendationResult, SetOutcome},
    services::{preferences::PreferenceManager, recommendations::Recommender},
};

pub mod command;
pub mod markdown;

pub use command::Command;
use markdown::{bold, escape_markdown_v2 as escape, italic};

pub const PARSE_MODE: &str = "MarkdownV2";

/// A suggested follow-up the transport may render as a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyAction {
    pub label: String,
    pub command: String,
}

/// Text to send back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ReplyAction>,
}

impl Reply {
    /// Already-formatted MarkdownV2
    fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: PARSE_MODE,
            disable_web_page_preview: false,
            actions: Vec::new(),
        }
    }

    /// Plain text, escaped for MarkdownV2
    fn plain(text: &str) -> Self {
        Self::markdown(escape(text))
    }

    fn with_actions(mut self, actions: Vec<ReplyAction>) -> Self {
        self.actions = actions;
        self
    }

    fn without_link_preview(mut self) -> Self {
        self.disable_web_page_preview = true;
        self
    }
}

fn usage_text() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "👋 Welcome!\n\n\
         Use these commands:\n\
         /set <title/artist> - Add a taste preference\n\
         /list - Show your preferences\n\
         /remove <title/artist> - Remove one preference\n\
         /clear - Delete all your preferences\n\
         /recommend <type> - Get suggestions ({})\n\n\
         Examples:\n\
         /set Nirvana\n\
         /recommend music\n\
         /recommend movies",
        categories
    )
}

/// Routes parsed commands to the preference manager and recommender
pub struct CommandHandler {
    preferences: Arc<PreferenceManager>,
    recommender: Arc<Recommender>,
}

impl CommandHandler {
    pub fn new(preferences: Arc<PreferenceManager>, recommender: Arc<Recommender>) -> Self {
        Self {
            preferences,
            recommender,
        }
    }

    /// Handles one chat message from `user_id`. Never fails: errors become
    /// user-facing replies.
    pub async fn handle(&self, user_id: &str, text: &str) -> Reply {
        let command = Command::parse(text);
        tracing::debug!(user_id = %user_id, command = ?command, "Handling command");

        match command {
            Command::Start | Command::Help => Reply::plain(&usage_text()),
            Command::Set(text) if text.is_empty() => {
                Reply::plain("❗ Usage: /set <title/artist/film>")
            }
            Command::Set(text) => match self.preferences.set_preference(user_id, &text).await {
                Ok(SetOutcome::Added { text }) => {
                    Reply::markdown(format!("✅ Preference added: {}", bold(&text)))
                }
                Ok(SetOutcome::AlreadyPresent { .. }) => {
                    Reply::plain("⚠️ Preference already present.")
                }
                Err(e) => render_error(e),
            },
            Command::List => render_list(&self.preferences.list_preferences(user_id).await),
            Command::Remove(text) if text.is_empty() => {
                Reply::plain("❗ Usage: /remove <title/artist/film>")
            }
            Command::Remove(text) => {
                match self.preferences.remove_preference(user_id, &text).await {
                    Ok(removed) => {
                        Reply::markdown(format!("🗑️ Preference removed: {}", bold(&removed)))
                    }
                    Err(e) => render_error(e),
                }
            }
            Command::Clear => {
                self.preferences.request_clear(user_id);
                Reply::markdown(format!(
                    "⚠️ Are you sure you want to delete {} your preferences?",
                    bold("all")
                ))
                .with_actions(vec![
                    ReplyAction {
                        label: "✅ Confirm deletion".to_string(),
                        command: "/confirm".to_string(),
                    },
                    ReplyAction {
                        label: "❌ Cancel".to_string(),
                        command: "/cancel".to_string(),
                    },
                ])
            }
            Command::Confirm => self.resolve_clear(user_id, ClearDecision::Confirm).await,
            Command::Cancel => self.resolve_clear(user_id, ClearDecision::Cancel).await,
            Command::Recommend(category) => {
                match self.recommender.recommend(user_id, &category).await {
                    Ok(result) => render_recommendations(&result),
                    Err(e) => render_error(e),
                }
            }
            Command::Unknown(_) => {
                Reply::plain("❓ Unknown command. Use /help to see the available commands.")
            }
        }
    }

    async fn resolve_clear(&self, user_id: &str, decision: ClearDecision) -> Reply {
        match self.preferences.confirm_clear(user_id, decision).await {
            Ok(ClearOutcome::Cleared { .. }) => {
                Reply::plain("🗑️ All preferences have been deleted.")
            }
            Ok(ClearOutcome::NothingToClear) => Reply::plain("ℹ️ No preferences to delete."),
            Ok(ClearOutcome::Cancelled) => Reply::plain("❎ Operation cancelled."),
            Err(e) => render_error(e),
        }
    }
}

fn render_list(preferences: &[String]) -> Reply {
    if preferences.is_empty() {
        return Reply::plain("📭 You have not added any preferences yet. Use /set to start.");
    }

    let lines = preferences
        .iter()
        .map(|p| format!("\\- {}", escape(p)))
        .collect::<Vec<_>>()
        .join("\n");

    Reply::markdown(format!("🎨 {}\n\n{}", bold("Your current preferences:"), lines))
}

fn render_recommendations(result: &RecommendationResult) -> Reply {
    if result.is_empty() {
        return Reply::plain("⚠️ No suggestions found.");
    }

    let mut message = format!("🎯 {} {}:\n\n", bold("Suggestions for"), italic(&result.query));
    for item in &result.items {
        message.push_str(&format!(
            "🎬 {}\n{}\n",
            bold(&item.name),
            escape(item.description_or_placeholder())
        ));
        if let Some(link) = &item.link {
            message.push_str(&format!("🔗 {}\n", escape(link)));
        }
        message.push('\n');
    }

    Reply::markdown(message.trim_end()).without_link_preview()
}

fn render_error(error: AppError) -> Reply {
    match error {
        AppError::EmptyInput => Reply::plain("❗ Please provide a title or artist."),
        AppError::NotFound(_) => Reply::plain("⚠️ Preference not found."),
        AppError::InvalidCategory(_) => Reply::plain(
            "❗ Invalid type. Use: music, movies or books\nExample: /recommend music",
        ),
        AppError::NoPreferences => {
            Reply::plain("❗ You have not set any preferences yet. Use /set first.")
        }
        AppError::NoPendingConfirmation => {
            Reply::plain("ℹ️ There is no pending deletion. Use /clear first.")
        }
        AppError::RecommendationService(message) => Reply::plain(&format!("Error: {}", message)),
        AppError::Storage(_) | AppError::Internal(_) => {
            tracing::error!(error = %error, "Command failed");
            Reply::plain("❗ Something went wrong, please try again later.")
        }
    }
}
