//! Chatdesk CLI - Command line interface for the chatbot API.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chatdesk_client::{
    Anonymous, ChatClient, ChatServiceInfo, ClientConfig, EnvToken, HealthReport, StaticToken,
    TokenProvider,
};
use chatdesk_core::{split_segments, ChatReply, ConversationId, Intent, Segment};

/// Chatdesk CLI - talk to the chatbot API from the shell
#[derive(Parser)]
#[command(name = "chatdesk")]
#[command(about = "CLI for the Chatdesk chatbot API", long_about = None)]
#[command(version)]
struct Cli {
    /// API base URL, including the /api prefix
    #[arg(short, long, env = "CHATDESK_BASE_URL", default_value = "http://localhost:8001/api")]
    url: String,

    /// Bearer token (read from CHATDESK_TOKEN when omitted)
    #[arg(long)]
    token: Option<String>,

    /// Send requests without credentials
    #[arg(long, conflicts_with = "token")]
    anonymous: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "CHATDESK_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message and print the reply
    Send {
        /// Message content
        content: String,

        /// Continue an existing conversation
        #[arg(short, long)]
        conversation: Option<i64>,

        /// Intent: general, coding or translation (detected when omitted)
        #[arg(short, long, value_parser = parse_intent)]
        intent: Option<Intent>,

        /// Extra metadata as key=value (repeatable)
        #[arg(short, long = "meta", value_parser = parse_meta)]
        meta: Vec<(String, String)>,
    },

    /// Show backend health
    Health,

    /// Show chat service status and features
    Status,

    /// Manage conversations
    #[command(subcommand)]
    Conversations(ConversationCommands),

    /// Show the intent the backend would assign to a message
    Intent {
        /// Message content
        content: String,
    },
}

#[derive(Subcommand)]
enum ConversationCommands {
    /// List conversations
    List,

    /// Delete a conversation
    Delete {
        /// Conversation ID
        id: i64,
    },
}

fn parse_intent(value: &str) -> Result<Intent, String> {
    Intent::parse(value)
        .ok_or_else(|| format!("unknown intent '{}' (general, coding, translation)", value))
}

fn parse_meta(value: &str) -> Result<(String, String), String> {
    let (key, val) = value
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", value))?;
    if key.trim().is_empty() {
        return Err("metadata key cannot be empty".to_string());
    }
    Ok((key.trim().to_string(), val.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Intent { content } = &cli.command {
        println!("{}", Intent::detect(content));
        return Ok(());
    }

    let tokens: Arc<dyn TokenProvider> = match (&cli.token, cli.anonymous) {
        (Some(token), _) => Arc::new(StaticToken::new(token.clone())),
        (None, true) => Arc::new(Anonymous),
        (None, false) => Arc::new(EnvToken::new("CHATDESK_TOKEN")),
    };
    let config = ClientConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..ClientConfig::new(cli.url.clone())
    };
    debug!(base_url = %config.base_url, "Using API");
    let client = ChatClient::new(config, tokens)?;

    match cli.command {
        Commands::Send {
            content,
            conversation,
            intent,
            meta,
        } => {
            let intent = intent.unwrap_or_else(|| Intent::detect(&content));
            let metadata: BTreeMap<String, Value> = meta
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let reply = client
                .send_message(
                    &content,
                    conversation.map(ConversationId::new),
                    Some(intent),
                    &metadata,
                )
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply_json(&reply))?);
            } else {
                print_reply(&reply);
            }
        }
        Commands::Health => {
            let report = client.health().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&health_json(&report))?);
            } else {
                print_health(&report);
            }
        }
        Commands::Status => {
            let info = client.chat_status().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status_json(&info))?);
            } else {
                print_status(&info);
            }
        }
        Commands::Conversations(ConversationCommands::List) => {
            let conversations = client.list_conversations().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&conversations)?);
                return Ok(());
            }
            println!("Conversations ({}):", conversations.len());
            println!("{:<8}  {:<9}  {:<6}  {:<19}  {}", "ID", "STATUS", "MSGS", "UPDATED", "TITLE");
            println!("{}", "-".repeat(80));
            for c in conversations {
                println!(
                    "{:<8}  {:<9}  {:<6}  {:<19}  {}",
                    c.id.get(),
                    c.status.as_str(),
                    c.message_count,
                    c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    c.title
                );
            }
        }
        Commands::Conversations(ConversationCommands::Delete { id }) => {
            client.delete_conversation(ConversationId::new(id)).await?;
            println!("Conversation {} deleted", id);
        }
        Commands::Intent { .. } => {}
    }

    Ok(())
}

fn print_reply(reply: &ChatReply) {
    for segment in split_segments(&reply.reply) {
        match segment {
            Segment::Text(text) => println!("{}\n", text),
            Segment::Code { language, code } => {
                println!("```{}", language.unwrap_or_default());
                println!("{}", code);
                println!("```\n");
            }
        }
    }
    eprintln!(
        "[conversation {} | message {} | {} | {:.2}s]",
        reply.conversation_id, reply.message_id, reply.intent, reply.processing_time
    );
}

fn reply_json(reply: &ChatReply) -> Value {
    json!({
        "reply": reply.reply,
        "conversation_id": reply.conversation_id,
        "message_id": reply.message_id,
        "intent": reply.intent,
        "processing_time": reply.processing_time,
        "metadata": reply.metadata,
    })
}

fn print_status(info: &ChatServiceInfo) {
    println!("Service:  {}", info.service.as_deref().unwrap_or("-"));
    println!("Status:   {}", info.status);
    println!("Version:  {}", info.version.as_deref().unwrap_or("-"));
    if let Some(ts) = info.timestamp {
        println!("Time:     {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }
    if !info.features.is_empty() {
        println!("Features:");
        for (name, enabled) in &info.features {
            println!("  {:<24} {}", name, if *enabled { "on" } else { "off" });
        }
    }
}

fn status_json(info: &ChatServiceInfo) -> Value {
    json!({
        "status": info.status,
        "service": info.service,
        "version": info.version,
        "timestamp": info.timestamp,
        "features": info.features,
    })
}

fn print_health(report: &HealthReport) {
    println!("Status:   {} ({})", report.status, report.raw_status);
    println!("Version:  {}", report.version.as_deref().unwrap_or("-"));
    if let Some(ts) = report.timestamp {
        println!("Time:     {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }
    if !report.services.is_empty() {
        println!("Services:");
        for (name, state) in &report.services {
            println!("  {:<16} {}", name, state);
        }
    }
}

fn health_json(report: &HealthReport) -> Value {
    json!({
        "status": report.status,
        "raw_status": report.raw_status,
        "version": report.version,
        "timestamp": report.timestamp,
        "services": report.services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent() {
        assert_eq!(parse_intent("Coding"), Ok(Intent::Coding));
        assert!(parse_intent("poetry").is_err());
    }

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("source=cli"),
            Ok(("source".to_string(), "cli".to_string()))
        );
        assert_eq!(
            parse_meta("query=a=b"),
            Ok(("query".to_string(), "a=b".to_string()))
        );
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "chatdesk",
            "send",
            "hello",
            "--conversation",
            "3",
            "--intent",
            "translation",
            "--meta",
            "source=cli",
        ])
        .unwrap();
        match cli.command {
            Commands::Send {
                content,
                conversation,
                intent,
                meta,
            } => {
                assert_eq!(content, "hello");
                assert_eq!(conversation, Some(3));
                assert_eq!(intent, Some(Intent::Translation));
                assert_eq!(meta.len(), 1);
            }
            _ => panic!("expected send"),
        }

        let cli = Cli::try_parse_from(["chatdesk", "conversations", "delete", "9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Conversations(ConversationCommands::Delete { id: 9 })
        ));
    }

    #[test]
    fn test_status_json() {
        let info = ChatServiceInfo {
            status: "operational".to_string(),
            service: Some("chatbot".to_string()),
            version: None,
            timestamp: None,
            features: BTreeMap::from([("coding".to_string(), true)]),
        };
        assert_eq!(
            status_json(&info),
            json!({
                "status": "operational",
                "service": "chatbot",
                "version": null,
                "timestamp": null,
                "features": {"coding": true},
            })
        );
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["chatdesk", "conversations", "list", "--json"]).unwrap();
        assert!(cli.json);
        let cli = Cli::try_parse_from(["chatdesk", "status", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_token_conflicts_with_anonymous() {
        assert!(Cli::try_parse_from(["chatdesk", "--token", "t", "--anonymous", "health"]).is_err());
    }
}
