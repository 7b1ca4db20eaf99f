//! Chatdesk client library.
//!
//! Talks to the chatbot REST API and turns every outcome into
//! `chatdesk-core` types:
//! - [`ChatClient`]: validation, local rate limiting, retries with backoff
//!   and error classification over a pluggable [`Transport`]
//! - [`ChatSession`]: optimistic sends, typing indicator and background
//!   polling, reported as `ChatAction`s

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;
pub mod schedule;
pub mod session;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod mock;

pub use auth::{Anonymous, EnvToken, StaticToken, TokenProvider};
pub use client::ChatClient;
pub use config::ClientConfig;
pub use error::TransportError;
pub use rate_limit::RateWindow;
pub use retry::RetryPolicy;
pub use schedule::ScheduledTask;
pub use session::ChatSession;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use wire::{ChatServiceInfo, HealthReport};
