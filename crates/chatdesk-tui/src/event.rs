//! Commands sent from the UI thread to the backend.
//!
//! The other direction carries `ChatAction`s, which the UI applies to its
//! store.

use chatdesk_core::{ConversationId, Intent};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// Send a message.
    Send {
        content: String,
        conversation_id: Option<ConversationId>,
        intent: Option<Intent>,
    },

    /// Reload the conversation list.
    RefreshConversations,

    /// Delete a conversation on the server.
    DeleteConversation(ConversationId),

    /// Run a health check now.
    CheckHealth,

    /// Shut the backend down.
    Quit,
}
