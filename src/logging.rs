/*
 * Responsibility
 * - tracing subscriber の初期化 (RUST_LOG / EnvFilter)
 * - アプリ側から使う Logger (channel 付き、構造化 context を受け取る)
 * - Logger は AppState / Request に明示的に注入する (global singleton は持たない)
 */
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared handle to the application logger.
pub type SharedLogger = Arc<dyn Logger>;

/// Structured logger handed to request handling code.
///
/// `context` is free-form JSON attached to the record (exception traces,
/// auth metadata, ...).
pub trait Logger: fmt::Debug + Send + Sync {
    fn log(&self, level: Level, message: &str, context: &Value);

    fn debug(&self, message: &str, context: &Value) {
        self.log(Level::DEBUG, message, context);
    }

    fn info(&self, message: &str, context: &Value) {
        self.log(Level::INFO, message, context);
    }

    fn warn(&self, message: &str, context: &Value) {
        self.log(Level::WARN, message, context);
    }

    fn error(&self, message: &str, context: &Value) {
        self.log(Level::ERROR, message, context);
    }
}

/// Forwards records to the global `tracing` subscriber, tagged with a channel.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    channel: String,
}

impl TracingLogger {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn shared(channel: impl Into<String>) -> SharedLogger {
        Arc::new(Self::new(channel))
    }

    #[cfg(test)]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str, context: &Value) {
        let channel = self.channel.as_str();
        // tracing macros need the level at compile time
        match level {
            Level::TRACE => tracing::trace!(channel, %context, "{message}"),
            Level::DEBUG => tracing::debug!(channel, %context, "{message}"),
            Level::INFO => tracing::info!(channel, %context, "{message}"),
            Level::WARN => tracing::warn!(channel, %context, "{message}"),
            _ => tracing::error!(channel, %context, "{message}"),
        }
    }
}

pub fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,request_ctx=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
