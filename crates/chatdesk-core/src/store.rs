//! Chat state and its transition function.
//!
//! [`apply`] is a pure function from `(state, action)` to the next state.
//! [`Store`] owns the current state and applies dispatched actions one at a
//! time, so every mutation goes through the same code path.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatReply, ChatRole};
use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::ids::{ConversationId, MessageId};
use crate::status::ServiceStatus;

/// Client-side rate limit as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Seconds until the oldest request leaves the window.
    pub reset_in_secs: u64,
}

impl RateLimitSnapshot {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Everything the chat screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    /// Known conversations, most recently active first.
    pub conversations: Vec<Conversation>,
    /// Conversation the message list belongs to (`None` = new conversation).
    pub active_conversation: Option<ConversationId>,
    /// Messages of the active conversation.
    pub messages: Vec<ChatMessage>,
    /// Current input buffer.
    pub input: String,
    /// A send is in flight.
    pub is_sending: bool,
    /// The assistant is taking long enough to show a typing indicator.
    pub is_typing: bool,
    /// Error shown in the banner.
    pub error: Option<ChatError>,
    /// Last known service health.
    pub service_status: ServiceStatus,
    /// Last known rate-limit snapshot.
    pub rate_limit: Option<RateLimitSnapshot>,
    /// Content of the last failed send, for the retry action.
    pub last_failed_input: Option<String>,
    /// Conversations created by this client that no server listing has
    /// included yet. They survive a reload that omits them.
    pub unlisted: BTreeSet<ConversationId>,
}

impl ChatState {
    /// Returns true if a new message may be sent right now.
    pub fn can_send(&self) -> bool {
        !self.is_sending && !self.rate_limit.is_some_and(|r| r.is_exhausted())
    }

    /// The active conversation summary, if it is in the list.
    pub fn active(&self) -> Option<&Conversation> {
        let id = self.active_conversation?;
        self.conversations.iter().find(|c| c.id == id)
    }
}

/// State transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// An optimistic user message was created and the request issued.
    SendStarted { message: ChatMessage },
    /// No response yet after the typing delay.
    TypingStarted,
    /// The server answered the message with `temp_id`.
    SendSucceeded { temp_id: MessageId, reply: ChatReply },
    /// The message with `temp_id` could not be delivered.
    SendFailed { temp_id: MessageId, error: ChatError },
    /// The message was refused before any request was made.
    SendRejected(ChatError),
    /// Switch the message list to another conversation.
    SelectConversation(Option<ConversationId>),
    /// Start a fresh conversation.
    NewConversation,
    /// Conversation list fetched from the server.
    ConversationsLoaded(Vec<Conversation>),
    /// Conversation removed on the server.
    ConversationDeleted(ConversationId),
    /// Input buffer edited.
    InputChanged(String),
    /// Health check result.
    ServiceStatusChanged(ServiceStatus),
    /// Rate window snapshot refreshed.
    RateLimitUpdated(RateLimitSnapshot),
    /// Show an error in the banner.
    ErrorRaised(ChatError),
    /// Dismiss the banner.
    ErrorCleared,
}

/// Compute the next state.
pub fn apply(mut state: ChatState, action: ChatAction) -> ChatState {
    match action {
        ChatAction::SendStarted { message } => {
            state.messages.push(message);
            state.error = None;
            state.input.clear();
            state.last_failed_input = None;
            state.is_sending = true;
            state.is_typing = false;
        }
        ChatAction::TypingStarted => {
            state.is_typing = state.is_sending;
        }
        ChatAction::SendSucceeded { temp_id, reply } => {
            state.is_sending = false;
            state.is_typing = false;
            state.error = None;

            let Some(pos) = state.messages.iter().position(|m| m.id == temp_id) else {
                // The user switched away while the request was in flight: the
                // list is updated but the visible transcript is left alone.
                if record_exchange(&mut state.conversations, &reply, None) {
                    state.unlisted.insert(reply.conversation_id);
                }
                return state;
            };

            let optimistic = state.messages.remove(pos);
            if record_exchange(&mut state.conversations, &reply, Some(&optimistic.content)) {
                state.unlisted.insert(reply.conversation_id);
            }

            let confirmed = ChatMessage {
                pending: false,
                intent: Some(reply.intent),
                ..optimistic
            };
            let mut assistant = ChatMessage::assistant(reply.message_id, reply.reply);
            assistant.intent = Some(reply.intent);
            assistant.processing_time = Some(reply.processing_time);

            state.messages.insert(pos, confirmed);
            state.messages.insert(pos + 1, assistant);
            state.active_conversation = Some(reply.conversation_id);
        }
        ChatAction::SendFailed { temp_id, error } => {
            state.is_sending = false;
            state.is_typing = false;

            if let Some(pos) = state.messages.iter().position(|m| m.id == temp_id) {
                let optimistic = state.messages.remove(pos);
                state.last_failed_input = Some(optimistic.content);
                state.messages.push(ChatMessage::error(&error));
            }
            state.error = Some(error);
        }
        ChatAction::SendRejected(error) => {
            state.error = Some(error);
        }
        ChatAction::SelectConversation(id) => {
            state.active_conversation = id;
            state.messages.clear();
            state.error = None;
            state.is_typing = false;
        }
        ChatAction::NewConversation => {
            return apply(state, ChatAction::SelectConversation(None));
        }
        ChatAction::ConversationsLoaded(loaded) => {
            for conversation in &loaded {
                state.unlisted.remove(&conversation.id);
            }
            let unlisted = &state.unlisted;
            let local: Vec<Conversation> = state
                .conversations
                .into_iter()
                .filter(|c| unlisted.contains(&c.id))
                .collect();
            state.conversations = local.into_iter().chain(loaded).collect();
        }
        ChatAction::ConversationDeleted(id) => {
            state.conversations.retain(|c| c.id != id);
            state.unlisted.remove(&id);
            if state.active_conversation == Some(id) {
                state.active_conversation = None;
                state.messages.clear();
            }
        }
        ChatAction::InputChanged(input) => {
            state.input = input;
        }
        ChatAction::ServiceStatusChanged(status) => {
            state.service_status = status;
        }
        ChatAction::RateLimitUpdated(snapshot) => {
            state.rate_limit = Some(snapshot);
        }
        ChatAction::ErrorRaised(error) => {
            state.error = Some(error);
        }
        ChatAction::ErrorCleared => {
            state.error = None;
        }
    }
    state
}

/// Update the conversation list after a successful exchange.
///
/// `user_content` is `None` when the optimistic message is no longer visible;
/// a new conversation is then titled after the reply. Returns true if the
/// conversation was not in the list before.
fn record_exchange(
    conversations: &mut Vec<Conversation>,
    reply: &ChatReply,
    user_content: Option<&str>,
) -> bool {
    let existing = conversations.iter().position(|c| c.id == reply.conversation_id);
    let created = existing.is_none();
    let mut conversation = match existing {
        Some(pos) => conversations.remove(pos),
        None => Conversation::started_with(
            reply.conversation_id,
            user_content.unwrap_or(&reply.reply),
        ),
    };

    if let Some(content) = user_content {
        conversation.record_message(content);
    }
    conversation.record_message(&reply.reply);
    conversations.insert(0, conversation);
    created
}

/// Owns the chat state and applies dispatched actions.
#[derive(Debug, Default)]
pub struct Store {
    state: ChatState,
}

impl Store {
    /// Create a store with an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Apply an action.
    pub fn dispatch(&mut self, action: ChatAction) {
        let state = std::mem::take(&mut self.state);
        self.state = apply(state, action);
    }

    /// Content to resend for the retry action.
    pub fn retry_content(&self) -> Option<&str> {
        self.state.last_failed_input.as_deref()
    }

    /// Number of messages with the given role.
    pub fn count_role(&self, role: ChatRole) -> usize {
        self.state.messages.iter().filter(|m| m.role == role).count()
    }
}
