//! Chat message types for conversation history.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::ids::{ConversationId, MessageId};

/// Maximum message length accepted by the backend, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// User message (input/prompt).
    User,
    /// Assistant message (response).
    Assistant,
    /// System message (notices).
    System,
    /// Failed exchange surfaced in the transcript.
    Error,
}

/// Message intent, influencing how the backend answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    General,
    Coding,
    Translation,
}

const CODING_KEYWORDS: &[&str] = &[
    "code", "coding", "programming", "develop", "developer", "software",
    "python", "javascript", "react", "django", "fastapi", "nodejs", "express",
    "sql", "database", "mysql", "postgresql", "mongodb", "redis",
    "algorithm", "function", "class", "method", "variable", "array", "object",
    "loop", "condition", "if", "else", "try", "catch", "exception",
    "api", "endpoint", "route", "middleware", "authentication", "jwt",
    "debug", "error", "bug", "fix", "troubleshoot", "stack trace",
    "framework", "library", "package", "import", "export",
    "html", "css", "scss", "tailwind", "bootstrap",
    "git", "github", "version control", "commit", "merge",
    "docker", "kubernetes", "deployment", "ci/cd", "testing",
];

const TRANSLATION_KEYWORDS: &[&str] = &[
    "translate", "translation", "language", "lingua", "idioma",
    "français", "french", "spanish", "español", "deutsch", "german",
    "chinese", "mandarin", "japanese", "hindi", "arabic", "portuguese",
    "italian", "russian", "korean", "turkish", "dutch", "swedish",
    "meaning", "interpret", "localize", "localization",
];

const QUESTION_PATTERNS: &[&str] = &[
    "how to", "how do i", "how can i", "help me", "explain",
    "what is", "what are", "why does", "why is",
];

const BUILD_TERMS: &[&str] = &[
    "implement", "create", "build", "make", "write",
    "syntax", "logic", "structure", "pattern",
];

impl Intent {
    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Coding => "coding",
            Self::Translation => "translation",
        }
    }

    /// Parse a wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "general" => Some(Self::General),
            "coding" => Some(Self::Coding),
            "translation" => Some(Self::Translation),
            _ => None,
        }
    }

    /// Guess the intent the backend will assign to `content`.
    ///
    /// Keyword matching is substring based, so short keywords such as `if`
    /// also match inside longer words.
    pub fn detect(content: &str) -> Self {
        let lower = content.trim().to_lowercase();
        if lower.is_empty() {
            return Self::General;
        }

        if CODING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Self::Coding;
        }
        if TRANSLATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Self::Translation;
        }
        if QUESTION_PATTERNS.iter().any(|p| lower.contains(p))
            && BUILD_TERMS.iter().any(|t| lower.contains(t))
        {
            return Self::Coding;
        }

        Self::General
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check user input before it is sent.
///
/// Returns the trimmed content that goes on the wire.
pub fn validate_content(content: &str) -> Result<&str, ChatError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ChatError::InvalidInput(
            "message content cannot be empty".to_string(),
        ));
    }

    let length = trimmed.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(ChatError::MessageTooLong {
            length,
            max: MAX_MESSAGE_LENGTH,
        });
    }

    Ok(trimmed)
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server id, or a temporary id while unconfirmed.
    pub id: MessageId,
    /// Role of this message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Intent tag, when known.
    pub intent: Option<Intent>,
    /// Backend processing time in seconds (assistant messages only).
    pub processing_time: Option<f64>,
    /// True while an optimistic message awaits confirmation.
    pub pending: bool,
}

impl ChatMessage {
    /// Create a new chat message.
    pub fn new(id: MessageId, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
            intent: None,
            processing_time: None,
            pending: false,
        }
    }

    /// Create an optimistic user message with a temporary id.
    pub fn optimistic(content: impl Into<String>, intent: Option<Intent>) -> Self {
        Self {
            intent,
            pending: true,
            ..Self::new(MessageId::temporary(), ChatRole::User, content)
        }
    }

    /// Create an assistant message.
    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, ChatRole::Assistant, content)
    }

    /// Create an error entry for the transcript.
    pub fn error(error: &ChatError) -> Self {
        Self::new(MessageId::temporary(), ChatRole::Error, error.user_message())
    }
}

/// Successful reply to a sent message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Assistant's answer.
    pub reply: String,
    /// Conversation the exchange belongs to (new or existing).
    pub conversation_id: ConversationId,
    /// Server id of the stored message.
    pub message_id: MessageId,
    /// Intent the backend used.
    pub intent: Intent,
    /// Backend processing time in seconds.
    pub processing_time: f64,
    /// Response metadata (tokens used, model name, ...).
    pub metadata: BTreeMap<String, serde_json::Value>,
}
