//! Transport abstraction for broker clients
//!
//! A transport publishes and subscribes. Inbound messages are not pulled
//! through the trait: each implementation hands out an
//! `mpsc::Receiver<InboundMessage>` when it is created, fed by its own
//! background task.

use async_trait::async_trait;
use coin_bot_core::Result;

/// A message delivered by the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Payload as text, lossy, truncated for log lines
    pub fn preview(&self, max_chars: usize) -> String {
        String::from_utf8_lossy(&self.payload)
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Trait for publish/subscribe transports
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribe to a topic filter (may contain `+` wildcards)
    async fn subscribe(&self, filter: &str) -> Result<()>;

    /// Publish a payload on a topic
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}
