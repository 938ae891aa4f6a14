//! Per-player decision agent

use coin_bot_core::policy::GRID_CENTER;
use coin_bot_core::{GameState, Move, MovePolicy, PolicyKind, Position};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::pacing::Pacer;
use crate::publisher::MovePublisher;

/// Knobs shared by every agent in a session
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub policy: PolicyKind,
    /// Target for the straight-line policy when no coin is reachable
    pub fallback: Position,
    /// Minimum spacing between two published moves of one player
    pub move_interval: Duration,
    /// State messages buffered per player before new ones are dropped
    pub queue_depth: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            fallback: GRID_CENTER,
            move_interval: Duration::from_millis(500),
            queue_depth: 16,
        }
    }
}

/// What happened to one state message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Move decided and handed to the transport
    Published(Move),
    /// Policy found nothing to do
    NoMove,
    /// Payload could not be decoded
    Skipped,
    /// Move decided but the transport rejected it
    PublishFailed(Move),
}

/// Runs decode, decide, pace and publish for one player
pub struct PlayerAgent {
    player: String,
    policy: Box<dyn MovePolicy>,
    publisher: MovePublisher,
    pacer: Pacer,
}

impl PlayerAgent {
    pub fn new(
        player: impl Into<String>,
        policy: Box<dyn MovePolicy>,
        publisher: MovePublisher,
        pacer: Pacer,
    ) -> Self {
        Self {
            player: player.into(),
            policy,
            publisher,
            pacer,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Handle one state payload; never fails, failures are logged
    pub async fn handle(&mut self, payload: &[u8]) -> Outcome {
        let state = match GameState::decode(payload) {
            Ok(state) => state,
            Err(e) => {
                warn!(player = %self.player, "Skipping state message: {}", e);
                return Outcome::Skipped;
            }
        };
        debug!(
            player = %self.player,
            position = %state.position,
            coins = ?state.coins,
            walls = state.walls.len(),
            "Game state decoded"
        );

        let decision = self.policy.decide(&state);
        match decision {
            Some(mv) => {
                info!(player = %self.player, policy = self.policy.name(), %mv, "Decided move");
                self.pacer.ready().await;
            }
            None => {
                info!(player = %self.player, policy = self.policy.name(), "Policy returned no move");
            }
        }

        match (self.publisher.publish(decision).await, decision) {
            (Ok(_), Some(mv)) => Outcome::Published(mv),
            (Ok(_), None) => Outcome::NoMove,
            (Err(e), Some(mv)) => {
                error!(player = %self.player, %mv, "Failed to publish move: {}", e);
                Outcome::PublishFailed(mv)
            }
            (Err(e), None) => {
                error!(player = %self.player, "Publisher failed without a move: {}", e);
                Outcome::NoMove
            }
        }
    }

    /// Process state payloads one at a time until the channel closes
    pub async fn run(mut self, mut states: mpsc::Receiver<Vec<u8>>) {
        while let Some(payload) = states.recv().await {
            self.handle(&payload).await;
        }
        debug!(player = %self.player, "State channel closed, agent exiting");
    }
}
