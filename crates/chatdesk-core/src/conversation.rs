//! Conversation summaries and client-side filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ConversationId;
use crate::status::ConversationStatus;

/// Maximum length of a conversation title derived from a message.
const MAX_TITLE_CHARS: usize = 50;

/// Maximum length of the last-message preview.
const MAX_PREVIEW_CHARS: usize = 100;

/// Cached copy of a backend conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned identifier.
    pub id: ConversationId,

    /// Conversation title.
    pub title: String,

    /// Lifecycle status.
    pub status: ConversationStatus,

    /// When the conversation was created.
    pub created_at: DateTime<Utc>,

    /// When the conversation last changed.
    pub updated_at: DateTime<Utc>,

    /// Number of messages exchanged.
    pub message_count: u32,

    /// Preview of the latest message.
    pub last_message: Option<String>,
}

impl Conversation {
    /// Create a conversation from the first user message of an exchange.
    pub fn started_with(id: ConversationId, first_message: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title_from_content(first_message),
            status: ConversationStatus::Active,
            created_at: now,
            updated_at: now,
            message_count: 0,
            last_message: None,
        }
    }

    /// Record a new message in the summary.
    pub fn record_message(&mut self, content: &str) {
        self.message_count += 1;
        self.last_message = Some(truncate_chars(content, MAX_PREVIEW_CHARS));
        self.updated_at = Utc::now();
    }
}

/// Derive a title from the first message of a conversation.
pub fn title_from_content(content: &str) -> String {
    let first_line = content.trim().lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "New conversation".to_string();
    }
    truncate_chars(first_line, MAX_TITLE_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Client-side search and status filter for the conversation list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    /// Case-insensitive substring matched against the title.
    pub query: String,
    /// Only show conversations with this status (`None` = all).
    pub status: Option<ConversationStatus>,
}

impl ConversationFilter {
    /// Returns true if the conversation passes the filter.
    pub fn matches(&self, conversation: &Conversation) -> bool {
        if let Some(status) = self.status {
            if conversation.status != status {
                return false;
            }
        }

        let query = self.query.trim();
        query.is_empty()
            || conversation
                .title
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    /// Filter a list, preserving order.
    pub fn apply<'a>(&self, conversations: &'a [Conversation]) -> Vec<&'a Conversation> {
        conversations.iter().filter(|c| self.matches(c)).collect()
    }

    /// Cycle the status filter: all -> active -> archived -> deleted -> all.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(ConversationStatus::Active),
            Some(ConversationStatus::Active) => Some(ConversationStatus::Archived),
            Some(ConversationStatus::Archived) => Some(ConversationStatus::Deleted),
            Some(ConversationStatus::Deleted) => None,
        };
    }
}
