//! Error types for the Brand Brain client.

use thiserror::Error;

/// Result type alias for client operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors surfaced by the API client and configuration loading.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The service rejected the API key (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx status. `message` is the server's `detail` when it sent one.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Short label for log lines, distinguishing the failure classes the
    /// conversation view collapses into one message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Server { .. } => "server",
            Self::Transport(_) => "network",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}
