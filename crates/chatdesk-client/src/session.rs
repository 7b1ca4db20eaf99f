//! Chat session: drives the client and reports progress as store actions.
//!
//! A [`ChatSession`] never touches the chat state directly. Every outcome
//! is sent as a [`ChatAction`] to whoever owns the store (the UI thread),
//! which keeps all mutation on one code path.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use chatdesk_core::{
    validate_content, ChatAction, ChatError, ChatMessage, ChatReply, ConversationId, Intent,
    ServiceStatus,
};

use crate::client::ChatClient;
use crate::schedule::ScheduledTask;
use crate::transport::{HttpTransport, Transport};

/// Sends messages and background checks on behalf of one user.
pub struct ChatSession<T = HttpTransport> {
    client: Arc<ChatClient<T>>,
    actions: mpsc::UnboundedSender<ChatAction>,
    typing_delay: Duration,
    metadata: BTreeMap<String, Value>,
}

impl<T: Transport + 'static> ChatSession<T> {
    pub fn new(client: Arc<ChatClient<T>>, actions: mpsc::UnboundedSender<ChatAction>) -> Self {
        Self {
            typing_delay: client.config().typing_delay,
            client,
            actions,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach metadata to every message sent through this session.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn client(&self) -> &Arc<ChatClient<T>> {
        &self.client
    }

    fn emit(&self, action: ChatAction) {
        if self.actions.send(action).is_err() {
            debug!("Action receiver dropped");
        }
    }

    /// Send a message with optimistic display.
    ///
    /// Emits `SendStarted`, then `TypingStarted` if the reply takes longer
    /// than the typing delay, then `SendSucceeded` or `SendFailed`, and
    /// finally the refreshed rate-limit snapshot. Invalid input emits
    /// `SendRejected` only; no optimistic message is shown for it.
    pub async fn send(
        &self,
        content: &str,
        conversation_id: Option<ConversationId>,
        intent: Option<Intent>,
    ) -> Result<ChatReply, ChatError> {
        let content = match validate_content(content) {
            Ok(content) => content,
            Err(e) => {
                self.emit(ChatAction::SendRejected(e.clone()));
                return Err(e);
            }
        };

        let message = ChatMessage::optimistic(content, intent);
        let temp_id = message.id.clone();
        self.emit(ChatAction::SendStarted { message });

        let typing = {
            let actions = self.actions.clone();
            ScheduledTask::once(self.typing_delay, async move {
                let _ = actions.send(ChatAction::TypingStarted);
            })
        };

        let result = self
            .client
            .send_message(content, conversation_id, intent, &self.metadata)
            .await;
        typing.cancel();

        match &result {
            Ok(reply) => self.emit(ChatAction::SendSucceeded {
                temp_id,
                reply: reply.clone(),
            }),
            Err(e) => {
                warn!(code = %e.code(), error = %e, "Send failed");
                self.emit(ChatAction::SendFailed {
                    temp_id,
                    error: e.clone(),
                });
            }
        }
        self.emit(ChatAction::RateLimitUpdated(self.client.rate_limit_snapshot()));

        result
    }

    /// Reload the conversation list.
    pub async fn refresh_conversations(&self) -> Result<(), ChatError> {
        match self.client.list_conversations().await {
            Ok(conversations) => {
                debug!(count = conversations.len(), "Conversations loaded");
                self.emit(ChatAction::ConversationsLoaded(conversations));
                Ok(())
            }
            Err(e) => {
                self.emit(ChatAction::ErrorRaised(e.clone()));
                Err(e)
            }
        }
    }

    /// Delete a conversation on the server and drop it locally.
    pub async fn delete_conversation(&self, id: ConversationId) -> Result<(), ChatError> {
        match self.client.delete_conversation(id).await {
            Ok(()) => {
                self.emit(ChatAction::ConversationDeleted(id));
                Ok(())
            }
            Err(e) => {
                self.emit(ChatAction::ErrorRaised(e.clone()));
                Err(e)
            }
        }
    }

    /// Check backend health. Failures are logged and reported as `Down`.
    pub async fn check_health(&self) -> ServiceStatus {
        let status = match self.client.health().await {
            Ok(report) => report.status,
            Err(e) => {
                warn!(code = %e.code(), error = %e, "Health check failed");
                ServiceStatus::Down
            }
        };
        self.emit(ChatAction::ServiceStatusChanged(status));
        status
    }

    /// Publish the current rate-limit snapshot.
    pub fn publish_rate_limit(&self) {
        self.emit(ChatAction::RateLimitUpdated(self.client.rate_limit_snapshot()));
    }

    /// Poll health every `health_interval`, starting now. Ticks without a
    /// bearer token are skipped.
    pub fn spawn_health_polling(self: &Arc<Self>) -> ScheduledTask {
        let session = Arc::clone(self);
        ScheduledTask::every(self.client.config().health_interval, move || {
            let session = Arc::clone(&session);
            async move {
                if session.client.is_authenticated() {
                    session.check_health().await;
                } else {
                    debug!("Not authenticated, skipping health check");
                }
            }
        })
    }

    /// Publish the rate-limit snapshot every `rate_limit_refresh`, so the
    /// countdown advances while the user is idle.
    pub fn spawn_rate_limit_refresh(self: &Arc<Self>) -> ScheduledTask {
        let session = Arc::clone(self);
        ScheduledTask::every(self.client.config().rate_limit_refresh, move || {
            let session = Arc::clone(&session);
            async move {
                session.publish_rate_limit();
            }
        })
    }
}
