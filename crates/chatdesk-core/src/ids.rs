//! Newtype wrappers for identifiers to ensure type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix for client-assigned message ids.
const TEMP_PREFIX: &str = "temp-";

/// Server-assigned identifier for a Conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(i64);

impl ConversationId {
    /// Create a new ConversationId from the server value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw server value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier for a Message.
///
/// Messages confirmed by the server carry the server id. Optimistic messages
/// carry a temporary id until the server responds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    /// Id assigned by the backend.
    Server(i64),
    /// Id assigned by the client before confirmation.
    Temporary(String),
}

impl MessageId {
    /// Generate a new random temporary id.
    pub fn temporary() -> Self {
        Self::Temporary(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()))
    }

    /// Returns true if this id was assigned by the client.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{}", id),
            Self::Temporary(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self::Server(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_id_generate() {
        let id1 = MessageId::temporary();
        let id2 = MessageId::temporary();
        assert_ne!(id1, id2);
        assert!(id1.is_temporary());
        assert!(id1.to_string().starts_with("temp-"));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", ConversationId::new(123)), "123");
        assert_eq!(format!("{}", MessageId::from(456)), "456");
        assert!(!MessageId::from(456).is_temporary());
    }
}
