use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chatdesk_client::{Anonymous, ChatClient, ClientConfig, StaticToken};
use chatdesk_core::{ChatError, ConversationId, ErrorCode, Intent, MessageId, ServiceStatus};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_delay: Duration::from_millis(10),
        ..ClientConfig::new(format!("{}/api/", server.uri()))
    }
}

fn client(server: &MockServer) -> ChatClient {
    ChatClient::new(config(server), Arc::new(StaticToken::new("secret"))).unwrap()
}

#[tokio::test]
async fn test_send_message_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(header("Authorization", "Bearer secret"))
        .and(header_exists("X-Correlation-ID"))
        .and(body_json(json!({
            "content": "Translate hello to French",
            "intent": "translation"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Bonjour",
            "conversation_id": 3,
            "message_id": 11,
            "intent": "translation",
            "processing_time": 0.8,
            "metadata": {"model": "deepseek-chat"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server)
        .send_message(
            "Translate hello to French",
            None,
            Some(Intent::Translation),
            &BTreeMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(reply.reply, "Bonjour");
    assert_eq!(reply.conversation_id, ConversationId::new(3));
    assert_eq!(reply.message_id, MessageId::Server(11));
}

#[tokio::test]
async fn test_unauthorized_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Not authenticated",
            "status_code": 401,
            "correlation_id": "c-1",
            "timestamp": "2024-05-01T12:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(config(&server), Arc::new(Anonymous)).unwrap();
    let err = client
        .send_message("hi", None, None, &BTreeMap::new())
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Unauthorized("Not authenticated".to_string()));
}

#[tokio::test]
async fn test_rate_limited_uses_header_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "17")
                .set_body_json(json!({"error": "Too many requests", "status_code": 429})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message("hi", None, None, &BTreeMap::new())
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::RateLimited { retry_after_secs: 17 });
}

#[tokio::test]
async fn test_validation_error_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "intent"], "msg": "invalid enum value", "type": "enum"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message("hi", None, None, &BTreeMap::new())
        .await
        .unwrap_err();

    let ChatError::Validation { fields, .. } = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(fields[0].field, "body.intent");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ServiceError);
}

#[tokio::test]
async fn test_health_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T12:00:00.000001",
            "version": "2.0.0",
            "services": {"database": "healthy", "redis": "healthy"}
        })))
        .mount(&server)
        .await;

    let report = client(&server).health().await.unwrap();
    assert_eq!(report.status, ServiceStatus::Healthy);
    assert_eq!(report.services.len(), 2);
}

#[tokio::test]
async fn test_conversations_coming_soon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 1,
            "conversations": [],
            "message": "Conversation history feature coming soon"
        })))
        .mount(&server)
        .await;

    assert!(client(&server).list_conversations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/chat/conversations/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_conversation(ConversationId::new(8))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ClientConfig {
        timeout: Duration::from_millis(50),
        max_attempts: 1,
        ..config(&server)
    };
    let client = ChatClient::new(config, Arc::new(Anonymous)).unwrap();

    assert_eq!(client.chat_status().await.unwrap_err(), ChatError::Timeout);
}
