//! Chatdesk Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Terminal rendering
//! - Runtime specifics
//!
//! It also holds the chat reducer, so every state transition can be tested
//! without a UI or a server.

pub mod chat;
pub mod content;
pub mod conversation;
pub mod error;
pub mod ids;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use chat::{validate_content, ChatMessage, ChatReply, ChatRole, Intent, MAX_MESSAGE_LENGTH};
pub use content::{split_segments, Segment};
pub use conversation::{Conversation, ConversationFilter};
pub use error::{ChatError, ErrorCode, FieldError};
pub use ids::{ConversationId, MessageId};
pub use status::{ConversationStatus, ServiceStatus};
pub use store::{apply, ChatAction, ChatState, RateLimitSnapshot, Store};
