//! Background task driving the chat session.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use chatdesk_client::{ChatClient, ChatSession, ClientConfig, TokenProvider};
use chatdesk_core::ChatAction;

use crate::event::BackendCommand;

/// Run the backend loop.
///
/// This function runs in a separate thread with its own tokio runtime.
/// Sends and list operations are spawned so a slow request never blocks
/// later commands; every outcome reaches the UI as a `ChatAction`.
pub async fn run_backend(
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
    ui_tx: mpsc::UnboundedSender<ChatAction>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) {
    info!(base_url = %config.base_url, "Starting chat backend");

    let client = match ChatClient::new(config, tokens) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to create chat client");
            let _ = ui_tx.send(ChatAction::ErrorRaised(e));
            return;
        }
    };

    let session = Arc::new(ChatSession::new(client, ui_tx).with_metadata("source", json!("tui")));

    // Both tasks stop when dropped at the end of this function.
    let _health = session.spawn_health_polling();
    let _rate_limit = session.spawn_rate_limit_refresh();

    {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            let _ = session.refresh_conversations().await;
        });
    }

    while let Some(cmd) = cmd_rx.recv().await {
        debug!(command = ?cmd, "Backend command");
        let session = Arc::clone(&session);
        match cmd {
            BackendCommand::Quit => {
                info!("Received quit command, shutting down backend");
                break;
            }
            BackendCommand::Send {
                content,
                conversation_id,
                intent,
            } => {
                tokio::spawn(async move {
                    let _ = session.send(&content, conversation_id, intent).await;
                });
            }
            BackendCommand::RefreshConversations => {
                tokio::spawn(async move {
                    let _ = session.refresh_conversations().await;
                });
            }
            BackendCommand::DeleteConversation(id) => {
                tokio::spawn(async move {
                    let _ = session.delete_conversation(id).await;
                });
            }
            BackendCommand::CheckHealth => {
                tokio::spawn(async move {
                    session.check_health().await;
                });
            }
        }
    }

    info!("Backend shutdown complete");
}
