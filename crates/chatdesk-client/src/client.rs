//! Chat API client.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chatdesk_core::{
    validate_content, ChatError, ChatReply, Conversation, ConversationId, Intent,
    RateLimitSnapshot,
};

use crate::auth::TokenProvider;
use crate::classify::classify_response;
use crate::config::ClientConfig;
use crate::rate_limit::RateWindow;
use crate::retry::RetryPolicy;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::wire::{
    ChatRequestBody, ChatResponseBody, ChatServiceInfo, ChatStatusBody, ConversationsBody,
    HealthBody, HealthReport,
};

/// Client for the chatbot API.
///
/// Owns the rate window, so one instance should be shared (behind an `Arc`)
/// by everything that sends messages on behalf of the same user.
pub struct ChatClient<T = HttpTransport> {
    transport: T,
    tokens: Arc<dyn TokenProvider>,
    config: ClientConfig,
    rate_window: Mutex<RateWindow>,
    retry: RetryPolicy,
}

impl ChatClient<HttpTransport> {
    /// Create a client that talks HTTP to `config.base_url`.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ChatError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout)?;
        Ok(Self::with_transport(transport, config, tokens))
    }
}

impl<T: Transport> ChatClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T, config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            rate_window: Mutex::new(RateWindow::new(config.requests_per_minute)),
            retry: RetryPolicy::new(config.max_attempts, config.base_delay),
            transport,
            tokens,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns true if a bearer token is currently available.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.bearer_token().is_some()
    }

    /// Send a user message and wait for the assistant's reply.
    ///
    /// Input is validated and the local rate window consulted before any
    /// network call. Server and network failures are retried with backoff.
    pub async fn send_message(
        &self,
        content: &str,
        conversation_id: Option<ConversationId>,
        intent: Option<Intent>,
        metadata: &BTreeMap<String, Value>,
    ) -> Result<ChatReply, ChatError> {
        let content = validate_content(content)?;
        self.window().acquire()?;

        info!(
            conversation_id = ?conversation_id.map(|id| id.get()),
            intent = ?intent,
            length = content.chars().count(),
            "Sending message"
        );

        let body = ChatRequestBody {
            content,
            conversation_id: conversation_id.map(|id| id.get()),
            intent,
            metadata,
        };
        let body = serde_json::to_value(&body).map_err(|e| ChatError::Unknown(e.to_string()))?;

        let response = self.call(Method::Post, "/chat/", Some(body)).await?;
        let reply: ChatReply = decode::<ChatResponseBody>(&response)?.into();

        info!(
            conversation_id = reply.conversation_id.get(),
            message_id = %reply.message_id,
            processing_time = reply.processing_time,
            "Reply received"
        );
        Ok(reply)
    }

    /// Backend health.
    pub async fn health(&self) -> Result<HealthReport, ChatError> {
        let response = self.call(Method::Get, "/health", None).await?;
        Ok(decode::<HealthBody>(&response)?.into())
    }

    /// Public chat service description.
    pub async fn chat_status(&self) -> Result<ChatServiceInfo, ChatError> {
        let response = self.call(Method::Get, "/chat/status", None).await?;
        Ok(decode::<ChatStatusBody>(&response)?.into())
    }

    /// Conversations of the current user.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ChatError> {
        let response = self.call(Method::Get, "/chat/conversations", None).await?;
        let body: ConversationsBody = decode(&response)?;
        if let Some(note) = &body.message {
            debug!(note = %note, "Conversation listing note");
        }
        Ok(body.conversations.into_iter().map(Conversation::from).collect())
    }

    /// Delete a conversation.
    pub async fn delete_conversation(&self, id: ConversationId) -> Result<(), ChatError> {
        let path = format!("/chat/conversations/{}", id);
        self.call(Method::Delete, &path, None).await?;
        info!(conversation_id = id.get(), "Conversation deleted");
        Ok(())
    }

    /// Current rate window state, without recording a request.
    pub fn rate_limit_snapshot(&self) -> RateLimitSnapshot {
        self.window().snapshot()
    }

    fn window(&self) -> MutexGuard<'_, RateWindow> {
        // The window holds plain data, so a poisoned lock is still usable.
        self.rate_window
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run one logical request through the retry loop and return the
    /// successful response.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ChatError> {
        let body = &body;
        self.retry
            .run(move |attempt| async move {
                let mut request = ApiRequest::new(method, path, Uuid::new_v4().to_string())
                    .with_bearer(self.tokens.bearer_token());
                if let Some(body) = body {
                    request = request.with_body(body.clone());
                }
                let correlation_id = request.correlation_id.clone();

                let response = match self.transport.execute(request).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(
                            method = %method,
                            path = %path,
                            attempt,
                            correlation_id = %correlation_id,
                            error = %e,
                            "Request failed"
                        );
                        return Err(ChatError::from(e));
                    }
                };

                if response.is_success() {
                    return Ok(response);
                }

                let error = classify_response(response.status, &response.body, response.retry_after);
                warn!(
                    method = %method,
                    path = %path,
                    attempt,
                    status = response.status,
                    code = %error.code(),
                    correlation_id = %correlation_id,
                    server_correlation_id = response.correlation_id.as_deref().unwrap_or("-"),
                    "Request rejected"
                );
                Err(error)
            })
            .await
    }
}

fn decode<B: DeserializeOwned>(response: &ApiResponse) -> Result<B, ChatError> {
    serde_json::from_str(&response.body).map_err(|e| {
        warn!(status = response.status, error = %e, "Undecodable response body");
        ChatError::Unknown(format!("invalid response body: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatdesk_core::{ErrorCode, MessageId, ServiceStatus, MAX_MESSAGE_LENGTH};
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::auth::StaticToken;
    use crate::error::TransportError;
    use crate::mock::MockTransport;

    fn reply_body(conversation_id: i64, message_id: i64) -> Value {
        json!({
            "reply": "Hello! How can I help?",
            "conversation_id": conversation_id,
            "message_id": message_id,
            "intent": "general",
            "processing_time": 0.42,
            "metadata": {"model": "deepseek-chat"}
        })
    }

    fn client_with(transport: MockTransport, config: ClientConfig) -> ChatClient<MockTransport> {
        ChatClient::with_transport(transport, config, Arc::new(StaticToken::new("token-123")))
    }

    fn client(transport: MockTransport) -> ChatClient<MockTransport> {
        client_with(transport, ClientConfig::default())
    }

    async fn send(client: &ChatClient<MockTransport>, content: &str) -> Result<ChatReply, ChatError> {
        client
            .send_message(content, None, None, &BTreeMap::new())
            .await
    }

    #[tokio::test]
    async fn test_rejects_invalid_input_without_network() {
        let client = client(MockTransport::new());

        let err = send(&client, "   ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let long = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = send(&client, &long).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MessageTooLong);

        assert_eq!(client.transport().request_count(), 0);
        assert_eq!(client.rate_limit_snapshot().remaining, 60);
    }

    #[tokio::test]
    async fn test_send_message() {
        let client = client(MockTransport::new().respond(200, reply_body(12, 34)));

        let reply = client
            .send_message(
                "  hi there  ",
                Some(ConversationId::new(12)),
                Some(Intent::General),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(reply.conversation_id, ConversationId::new(12));
        assert_eq!(reply.message_id, MessageId::Server(34));
        assert_eq!(reply.reply, "Hello! How can I help?");

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/chat/");
        assert_eq!(requests[0].bearer.as_deref(), Some("token-123"));
        assert_eq!(
            requests[0].body,
            Some(json!({"content": "hi there", "conversation_id": 12, "intent": "general"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_server_error_once() {
        let transport = MockTransport::new()
            .respond(500, json!({"error": "boom"}))
            .respond(200, reply_body(1, 2));
        let client = client(transport);
        let started = Instant::now();

        let reply = send(&client, "hello").await.unwrap();
        assert_eq!(reply.message_id, MessageId::Server(2));
        assert_eq!(started.elapsed(), Duration::from_secs(1));

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_ne!(requests[0].correlation_id, requests[1].correlation_id);
        // One logical call, one slot in the window.
        assert_eq!(client.rate_limit_snapshot().remaining, 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_server_errors() {
        let transport = MockTransport::new()
            .respond(503, json!({}))
            .respond(503, json!({}))
            .respond(503, json!({}))
            .respond(200, reply_body(1, 2));
        let client = client(transport);

        let err = send(&client, "hello").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServiceError);
        assert_eq!(client.transport().request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_surface_after_retries() {
        let transport = MockTransport::new()
            .fail(TransportError::Timeout)
            .fail(TransportError::Timeout)
            .fail(TransportError::Timeout);
        let client = client(transport);

        assert_eq!(send(&client, "hello").await.unwrap_err(), ChatError::Timeout);
        assert_eq!(client.transport().request_count(), 3);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let transport = MockTransport::new()
            .respond(401, json!({"error": "Invalid token", "status_code": 401}))
            .respond(200, reply_body(1, 2));
        let client = client(transport);

        let err = send(&client, "hello").await.unwrap_err();
        assert_eq!(err, ChatError::Unauthorized("Invalid token".to_string()));
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_server_rate_limit() {
        let transport = MockTransport::new().respond(
            429,
            json!({"error": {"error": "Rate limit exceeded", "retry_after": 60}}),
        );
        let client = client(transport);

        let err = send(&client, "hello").await.unwrap_err();
        assert_eq!(err, ChatError::RateLimited { retry_after_secs: 60 });
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_rate_limit_fails_fast() {
        let transport = MockTransport::new()
            .respond(200, reply_body(1, 1))
            .respond(200, reply_body(1, 2))
            .respond(200, reply_body(1, 3));
        let config = ClientConfig {
            requests_per_minute: 2,
            ..ClientConfig::default()
        };
        let client = client_with(transport, config);

        send(&client, "one").await.unwrap();
        send(&client, "two").await.unwrap();

        let err = send(&client, "three").await.unwrap_err();
        assert_eq!(err, ChatError::RateLimited { retry_after_secs: 60 });
        assert_eq!(client.transport().request_count(), 2);
        assert!(client.rate_limit_snapshot().is_exhausted());

        tokio::time::advance(Duration::from_secs(60)).await;
        let reply = send(&client, "three").await.unwrap();
        assert_eq!(reply.message_id, MessageId::Server(3));
        assert_eq!(client.transport().request_count(), 3);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let client = client(MockTransport::new().respond(200, json!({"unexpected": true})));
        let err = send(&client, "hello").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownError);
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let transport = MockTransport::new().respond(
            200,
            json!({
                "status": "degraded",
                "timestamp": "2024-05-01T12:00:00",
                "version": "2.0.0",
                "services": {"database": "healthy", "redis": "unhealthy"}
            }),
        );
        let client = client(transport);

        let report = client.health().await.unwrap();
        assert_eq!(report.status, ServiceStatus::Degraded);
        assert_eq!(client.transport().requests()[0].path, "/health");
        // Health checks do not count against the send window.
        assert_eq!(client.rate_limit_snapshot().remaining, 60);
    }

    #[tokio::test]
    async fn test_chat_status() {
        let transport = MockTransport::new().respond(
            200,
            json!({
                "status": "operational",
                "service": "chatbot",
                "version": "2.0.0",
                "uptime": "running",
                "features": {"coding_assistance": true, "translation": true, "redis": false}
            }),
        );
        let client = client(transport);

        let info = client.chat_status().await.unwrap();
        assert_eq!(info.service.as_deref(), Some("chatbot"));
        assert_eq!(info.features.get("translation"), Some(&true));
        assert_eq!(info.features.get("redis"), Some(&false));
    }

    #[tokio::test]
    async fn test_list_conversations_coming_soon() {
        let transport = MockTransport::new().respond(
            200,
            json!({"user_id": 7, "conversations": [], "message": "Conversation history feature coming soon"}),
        );
        let client = client(transport);

        assert!(client.list_conversations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_conversation() {
        let transport = MockTransport::new().respond(200, json!({"message": "deleted"}));
        let client = client(transport);

        client.delete_conversation(ConversationId::new(5)).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(requests[0].path, "/chat/conversations/5");
    }
}
