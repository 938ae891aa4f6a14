//! Error types for the coin bot

use thiserror::Error;

/// Result type for coin bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Coin bot error types
#[derive(Debug, Error)]
pub enum BotError {
    /// Game state payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Broker communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unexpected message on a known topic
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Serialization(err.to_string())
    }
}
