//! Chatdesk Terminal UI.
//!
//! A terminal chat client for the Chatdesk assistant API.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

use chatdesk_client::{Anonymous, ClientConfig, EnvToken, StaticToken, TokenProvider};
use chatdesk_core::ChatAction;

mod app;
mod backend;
mod event;
mod render;
mod state;

use app::App;
use event::BackendCommand;

#[derive(Parser)]
#[command(name = "chatdesk-tui")]
#[command(about = "Chatdesk terminal chat client")]
#[command(version)]
struct Cli {
    /// Chatbot API base URL, including the /api prefix
    #[arg(long, env = "CHATDESK_BASE_URL", default_value = "http://localhost:8001/api")]
    base_url: String,

    /// Bearer token (read from CHATDESK_TOKEN on every request when omitted)
    #[arg(long)]
    token: Option<String>,

    /// Send requests without credentials
    #[arg(long, conflicts_with = "token")]
    anonymous: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "CHATDESK_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Messages allowed per rolling minute
    #[arg(long, env = "CHATDESK_RATE_LIMIT", default_value = "60")]
    rate_limit: u32,

    /// Health check interval in seconds
    #[arg(long, env = "CHATDESK_HEALTH_INTERVAL", default_value = "30")]
    health_interval: u64,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            requests_per_minute: self.rate_limit,
            health_interval: Duration::from_secs(self.health_interval.max(1)),
            ..ClientConfig::new(self.base_url.clone())
        }
    }

    fn tokens(&self) -> Arc<dyn TokenProvider> {
        match (&self.token, self.anonymous) {
            (Some(token), _) => Arc::new(StaticToken::new(token.clone())),
            (None, true) => Arc::new(Anonymous),
            (None, false) => Arc::new(EnvToken::new("CHATDESK_TOKEN")),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Log to a file so output does not interfere with the terminal.
    let log_file = std::fs::File::create("/tmp/chatdesk-tui.log").ok();
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter("chatdesk_tui=debug,chatdesk_client=debug")
            .with_ansi(false)
            .init();
    }

    let cli = Cli::parse();
    let config = cli.client_config();
    let tokens = cli.tokens();

    info!(base_url = %config.base_url, "Starting chat TUI");

    // Channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<ChatAction>();
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // Background thread with its own tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    let bg_handle = std::thread::spawn(move || {
        rt.block_on(backend::run_backend(config, tokens, ui_tx, cmd_rx));
    });

    // Enters alternate screen and raw mode
    let terminal = ratatui::init();

    let mut app = App::new(ui_rx, cmd_tx);
    let result = app.run(terminal);

    ratatui::restore();

    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
