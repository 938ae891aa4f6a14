//! Inbound message routing
//!
//! The dispatcher owns the inbound receiver and:
//! - forwards state messages to the matching player's agent queue
//! - logs lobby, start/stop and score traffic
//! - ignores state for players this session does not control

use coin_bot_core::{LobbyCommand, Topic};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::transport::InboundMessage;

const PREVIEW_CHARS: usize = 200;

/// Routes broker traffic for one lobby
pub struct Dispatcher {
    lobby: String,
    agents: HashMap<String, mpsc::Sender<Vec<u8>>>,
}

impl Dispatcher {
    pub fn new(lobby: impl Into<String>) -> Self {
        Self {
            lobby: lobby.into(),
            agents: HashMap::new(),
        }
    }

    /// Attach a player's state queue
    pub fn add_player(&mut self, player: impl Into<String>, states: mpsc::Sender<Vec<u8>>) {
        self.agents.insert(player.into(), states);
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    /// Route one inbound message
    ///
    /// A full agent queue drops the new state rather than blocking the
    /// other players; the next snapshot supersedes it anyway.
    pub fn route(&self, msg: InboundMessage) {
        debug!(
            "[Broker→Bot] topic={} len={} payload={}",
            msg.topic,
            msg.payload.len(),
            msg.preview(PREVIEW_CHARS)
        );

        let Some(topic) = Topic::parse(&msg.topic) else {
            debug!("Ignoring message on unknown topic {}", msg.topic);
            return;
        };
        if topic.lobby() != self.lobby {
            debug!("Ignoring message for lobby {}", topic.lobby());
            return;
        }

        match topic {
            Topic::GameState { player, .. } => match self.agents.get(&player) {
                Some(tx) => match tx.try_send(msg.payload) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        warn!(player = %player, "Agent busy, dropping state message");
                    }
                    Err(TrySendError::Closed(_)) => {
                        warn!(player = %player, "Agent stopped, dropping state message");
                    }
                },
                None => debug!(player = %player, "State for a player this session does not control"),
            },
            Topic::Start { .. } => {
                let text = String::from_utf8_lossy(&msg.payload);
                match text.parse::<LobbyCommand>() {
                    Ok(cmd) => info!(lobby = %self.lobby, "Lobby command: {}", cmd),
                    Err(e) => warn!(lobby = %self.lobby, "{}", e),
                }
            }
            Topic::Scores { .. } => match serde_json::from_slice::<serde_json::Value>(&msg.payload) {
                Ok(scores) => info!(lobby = %self.lobby, "Scores: {}", scores),
                Err(_) => info!(lobby = %self.lobby, "Scores: {}", msg.preview(PREVIEW_CHARS)),
            },
            Topic::Lobby { .. } => {
                info!(lobby = %self.lobby, "Lobby: {}", msg.preview(PREVIEW_CHARS));
            }
            Topic::Move { player, .. } => {
                debug!(player = %player, "Move echo: {}", msg.preview(PREVIEW_CHARS));
            }
        }
    }

    /// Route inbound messages until the transport closes the channel
    ///
    /// Dropping the dispatcher on return closes every agent queue, so the
    /// agents finish their backlog and exit.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) {
        while let Some(msg) = inbound.recv().await {
            self.route(msg);
        }
        debug!(lobby = %self.lobby, "Inbound channel closed, dispatcher exiting");
    }
}
