//! JSON bodies exchanged with the chatbot API.
//!
//! These mirror the backend's snake_case payloads and are converted into
//! `chatdesk-core` types at the boundary.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chatdesk_core::{
    ChatReply, Conversation, ConversationId, ConversationStatus, Intent, MessageId, ServiceStatus,
};

/// `POST /chat/` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestBody<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "is_empty_map")]
    pub metadata: &'a BTreeMap<String, Value>,
}

fn is_empty_map(map: &&BTreeMap<String, Value>) -> bool {
    map.is_empty()
}

/// `POST /chat/` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseBody {
    pub reply: String,
    pub conversation_id: i64,
    pub message_id: i64,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl From<ChatResponseBody> for ChatReply {
    fn from(body: ChatResponseBody) -> Self {
        Self {
            reply: body.reply,
            conversation_id: ConversationId::new(body.conversation_id),
            message_id: MessageId::Server(body.message_id),
            intent: body.intent,
            processing_time: body.processing_time,
            metadata: body.metadata,
        }
    }
}

/// `GET /health` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthBody {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, Value>,
}

/// Backend health as reported by `GET /health`.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// Mapped service status.
    pub status: ServiceStatus,
    /// Status string exactly as reported.
    pub raw_status: String,
    pub version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Dependent services and their state (`database`, `redis`, ...).
    pub services: BTreeMap<String, String>,
}

impl From<HealthBody> for HealthReport {
    fn from(body: HealthBody) -> Self {
        Self {
            status: ServiceStatus::from_report(&body.status),
            timestamp: body.timestamp.as_deref().and_then(parse_timestamp),
            version: body.version,
            services: body
                .services
                .into_iter()
                .map(|(name, state)| (name, value_to_string(state)))
                .collect(),
            raw_status: body.status,
        }
    }
}

/// `GET /chat/status` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStatusBody {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, Value>,
}

/// Public description of the chat service.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatServiceInfo {
    pub status: String,
    pub service: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Feature flags; non-boolean values count as enabled when truthy.
    pub features: BTreeMap<String, bool>,
}

impl From<ChatStatusBody> for ChatServiceInfo {
    fn from(body: ChatStatusBody) -> Self {
        Self {
            timestamp: body.timestamp.as_deref().and_then(parse_timestamp),
            features: body
                .features
                .into_iter()
                .map(|(name, value)| (name, is_truthy(&value)))
                .collect(),
            status: body.status,
            service: body.service,
            version: body.version,
        }
    }
}

/// `GET /chat/conversations` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationsBody {
    #[serde(default)]
    pub conversations: Vec<ConversationBody>,
    /// Informational note, e.g. while listing is not yet available.
    #[serde(default)]
    pub message: Option<String>,
}

/// A conversation summary as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationBody {
    #[serde(alias = "conversation_id")]
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<ConversationStatus>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ConversationBody> for Conversation {
    fn from(body: ConversationBody) -> Self {
        let status = match (body.status, body.is_active) {
            (Some(status), _) => status,
            (None, Some(false)) => ConversationStatus::Archived,
            (None, _) => ConversationStatus::Active,
        };
        let created_at = body
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        let updated_at = body
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(created_at);

        Self {
            id: ConversationId::new(body.id),
            title: body
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "New conversation".to_string()),
            status,
            created_at,
            updated_at,
            message_count: body.message_count,
            last_message: body.last_message,
        }
    }
}

/// Error envelope written by the backend's exception handlers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    /// String message, or an object `{ error, message, retry_after }`.
    #[serde(default)]
    pub error: Option<Value>,
    /// FastAPI default shape: a string, or a list of validation items.
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// One entry of a FastAPI validation error list.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationItem {
    #[serde(default)]
    pub loc: Vec<Value>,
    #[serde(default)]
    pub msg: String,
}

/// Parse an RFC 3339 timestamp, or a naive ISO timestamp taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_omits_empty_fields() {
        let metadata = BTreeMap::new();
        let body = ChatRequestBody {
            content: "hello",
            conversation_id: None,
            intent: None,
            metadata: &metadata,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"content": "hello"}));

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!("tui"));
        let body = ChatRequestBody {
            content: "hello",
            conversation_id: Some(7),
            intent: Some(Intent::Coding),
            metadata: &metadata,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "content": "hello",
                "conversation_id": 7,
                "intent": "coding",
                "metadata": {"source": "tui"}
            })
        );
    }

    #[test]
    fn test_response_into_reply() {
        let body: ChatResponseBody = serde_json::from_value(json!({
            "reply": "Use python-jose.",
            "conversation_id": 123,
            "message_id": 456,
            "intent": "coding",
            "processing_time": 1.234,
            "metadata": {"tokens_used": 150, "model": "deepseek-chat"}
        }))
        .unwrap();

        let reply = ChatReply::from(body);
        assert_eq!(reply.conversation_id, ConversationId::new(123));
        assert_eq!(reply.message_id, MessageId::Server(456));
        assert_eq!(reply.intent, Intent::Coding);
        assert_eq!(reply.metadata["tokens_used"], json!(150));
    }

    #[test]
    fn test_health_report() {
        let body: HealthBody = serde_json::from_value(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T12:30:00.123456",
            "version": "2.0.0",
            "services": {"database": "healthy", "redis": "disabled"}
        }))
        .unwrap();

        let report = HealthReport::from(body);
        assert_eq!(report.status, ServiceStatus::Healthy);
        assert_eq!(report.version.as_deref(), Some("2.0.0"));
        assert!(report.timestamp.is_some());
        assert_eq!(report.services["redis"], "disabled");
    }

    #[test]
    fn test_conversations_coming_soon() {
        let body: ConversationsBody = serde_json::from_value(json!({
            "user_id": 1,
            "conversations": [],
            "message": "Conversation history feature coming soon"
        }))
        .unwrap();
        assert!(body.conversations.is_empty());
        assert!(body.message.is_some());

        let body: ConversationsBody = serde_json::from_value(json!({"user_id": 1})).unwrap();
        assert!(body.conversations.is_empty());
    }

    #[test]
    fn test_conversation_body_aliases() {
        let body: ConversationBody = serde_json::from_value(json!({
            "conversation_id": 9,
            "title": "JWT in FastAPI",
            "message_count": 4,
            "last_message": "thanks",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:05:00"
        }))
        .unwrap();

        let conversation = Conversation::from(body);
        assert_eq!(conversation.id, ConversationId::new(9));
        assert_eq!(conversation.status, ConversationStatus::Active);
        assert_eq!(conversation.message_count, 4);
        assert!(conversation.updated_at > conversation.created_at);
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-05-01T12:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T12:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
