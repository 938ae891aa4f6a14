//! Move publisher

use coin_bot_core::{Move, Result, Topic};
use std::sync::Arc;
use tracing::info;

use crate::transport::Transport;

/// Publishes one player's moves on `games/{lobby}/{player}/move`
pub struct MovePublisher {
    transport: Arc<dyn Transport>,
    topic: String,
}

impl MovePublisher {
    pub fn new(transport: Arc<dyn Transport>, lobby: &str, player: &str) -> Self {
        let topic = Topic::Move {
            lobby: lobby.to_string(),
            player: player.to_string(),
        }
        .to_string();
        Self { transport, topic }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish a decision; returns whether anything was sent
    ///
    /// `None` publishes nothing.
    pub async fn publish(&self, decision: Option<Move>) -> Result<bool> {
        let Some(mv) = decision else {
            info!(topic = %self.topic, "No valid move was calculated, nothing published");
            return Ok(false);
        };

        self.transport
            .publish(&self.topic, mv.as_str().as_bytes().to_vec())
            .await?;
        info!(topic = %self.topic, %mv, "Move published");
        Ok(true)
    }
}
