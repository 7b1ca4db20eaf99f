//! Status enums for Conversations and the chatbot service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a Conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Conversation is open and listed.
    #[default]
    Active,
    /// Conversation was archived by the user.
    Archived,
    /// Conversation was deleted.
    Deleted,
}

impl ConversationStatus {
    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of the chatbot service as seen by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No health check has completed yet.
    #[default]
    Unknown,
    /// All backend services report healthy.
    Healthy,
    /// At least one backend service is unhealthy.
    Degraded,
    /// The health check failed or the service reported an unknown state.
    Down,
}

impl ServiceStatus {
    /// Map the `status` field of a health report.
    pub fn from_report(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "healthy" => Self::Healthy,
            "degraded" => Self::Degraded,
            _ => Self::Down,
        }
    }

    /// Returns true if messages can be expected to go through.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_status_from_report() {
        assert_eq!(ServiceStatus::from_report("healthy"), ServiceStatus::Healthy);
        assert_eq!(ServiceStatus::from_report("Degraded"), ServiceStatus::Degraded);
        assert_eq!(ServiceStatus::from_report("configured_fallback"), ServiceStatus::Down);
        assert!(!ServiceStatus::Unknown.is_available());
    }
}
