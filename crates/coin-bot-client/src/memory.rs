//! In-process transport
//!
//! Records everything published and lets callers inject inbound messages.
//! Used to drive sessions without a broker.

use async_trait::async_trait;
use coin_bot_core::{BotError, Result};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

use crate::transport::{InboundMessage, Transport};

pub struct MemoryTransport {
    inbound_tx: mpsc::Sender<InboundMessage>,
    published: Mutex<Vec<InboundMessage>>,
    subscriptions: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Create a transport and the receiver for injected inbound messages
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<InboundMessage>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        let transport = Self {
            inbound_tx,
            published: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
        };
        (transport, inbound_rx)
    }

    /// Deliver a message as if it came from the broker
    pub async fn deliver(&self, topic: &str, payload: impl Into<Vec<u8>>) -> Result<()> {
        self.inbound_tx
            .send(InboundMessage::new(topic, payload))
            .await
            .map_err(|_| BotError::Transport("Inbound receiver dropped".into()))
    }

    /// Everything published so far, in order
    pub async fn published(&self) -> Vec<InboundMessage> {
        self.published.lock().await.clone()
    }

    /// Published messages on one topic, payloads as text
    pub async fn published_on(&self, topic: &str) -> Vec<String> {
        self.published
            .lock()
            .await
            .iter()
            .filter(|m| m.topic == topic)
            .map(|m| String::from_utf8_lossy(&m.payload).into_owned())
            .collect()
    }

    pub async fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().await.clone()
    }

    /// Wait until at least `count` messages were published on `topic`
    ///
    /// Returns what was published on that topic, possibly fewer than
    /// `count` if `timeout` elapsed first.
    pub async fn wait_for(&self, topic: &str, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let seen = self.published_on(topic).await;
            if seen.len() >= count || tokio::time::Instant::now() >= deadline {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn subscribe(&self, filter: &str) -> Result<()> {
        self.subscriptions.lock().await.push(filter.to_string());
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.published
            .lock()
            .await
            .push(InboundMessage::new(topic, payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_delivers() {
        let (transport, mut rx) = MemoryTransport::new(4);

        transport.subscribe("games/L/scores").await.unwrap();
        transport.publish("games/L/P/move", b"UP".to_vec()).await.unwrap();
        transport.deliver("games/L/P/game_state", "{}").await.unwrap();

        assert_eq!(transport.subscriptions().await, vec!["games/L/scores"]);
        assert_eq!(transport.published_on("games/L/P/move").await, vec!["UP"]);
        assert_eq!(rx.recv().await.unwrap().topic, "games/L/P/game_state");
    }

    #[tokio::test]
    async fn test_deliver_after_receiver_dropped() {
        let (transport, rx) = MemoryTransport::new(1);
        drop(rx);
        assert!(transport.deliver("games/L/lobby", "hi").await.is_err());
    }
}
