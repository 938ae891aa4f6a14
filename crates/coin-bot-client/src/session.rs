//! Session context and lobby bootstrap

use coin_bot_core::topic::{self, NEW_GAME, validate_segment};
use coin_bot_core::{BotError, LobbyCommand, NewGame, Result, Topic};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::agent::{AgentSettings, PlayerAgent};
use crate::config::{BotConfig, PlayerSpec};
use crate::dispatcher::Dispatcher;
use crate::pacing::Pacer;
use crate::publisher::MovePublisher;
use crate::transport::{InboundMessage, Transport};

/// Identifiers fixed for the lifetime of a session
#[derive(Debug, Clone)]
pub struct SessionContext {
    lobby: String,
    players: Vec<PlayerSpec>,
}

impl SessionContext {
    pub fn new(lobby: impl Into<String>, players: Vec<PlayerSpec>) -> Result<Self> {
        let lobby = lobby.into();
        validate_segment("Lobby", &lobby)?;
        if players.is_empty() {
            return Err(BotError::Config("At least one player is required".into()));
        }
        let mut seen = HashSet::new();
        for player in &players {
            validate_segment("Player", &player.name)?;
            if !seen.insert(player.name.clone()) {
                return Err(BotError::Config(format!("Duplicate player name: {}", player.name)));
            }
        }
        Ok(Self { lobby, players })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(config.lobby.clone(), config.players.clone())
    }

    pub fn lobby(&self) -> &str {
        &self.lobby
    }

    pub fn players(&self) -> &[PlayerSpec] {
        &self.players
    }

    /// Subscribe, register every player, wait `start_delay`, send START
    pub async fn bootstrap(&self, transport: &dyn Transport, start_delay: Duration) -> Result<()> {
        let lobby = self.lobby.clone();
        let filters = [
            Topic::Lobby { lobby: lobby.clone() }.to_string(),
            topic::all_game_states(&lobby),
            Topic::Scores { lobby: lobby.clone() }.to_string(),
        ];
        for filter in &filters {
            transport.subscribe(filter).await?;
            info!("Subscribed to {}", filter);
        }

        for player in &self.players {
            let announcement = NewGame {
                lobby_name: lobby.clone(),
                team_name: player.team.clone(),
                player_name: player.name.clone(),
            };
            transport.publish(NEW_GAME, announcement.to_payload()?).await?;
            info!(lobby = %lobby, team = %player.team, player = %player.name, "Registered player");
        }

        tokio::time::sleep(start_delay).await;
        self.send_command(transport, LobbyCommand::Start).await
    }

    /// Publish START or STOP for this lobby
    pub async fn send_command(&self, transport: &dyn Transport, command: LobbyCommand) -> Result<()> {
        let topic = Topic::Start {
            lobby: self.lobby.clone(),
        };
        transport
            .publish(&topic.to_string(), command.as_str().as_bytes().to_vec())
            .await?;
        info!(lobby = %self.lobby, "Sent {}", command);
        Ok(())
    }

    /// Spawn one agent task per player and return the dispatcher feeding them
    pub fn spawn_agents(&self, transport: Arc<dyn Transport>, settings: &AgentSettings) -> Dispatcher {
        let mut dispatcher = Dispatcher::new(self.lobby.clone());
        for player in &self.players {
            let (tx, rx) = mpsc::channel(settings.queue_depth.max(1));
            let agent = PlayerAgent::new(
                player.name.clone(),
                settings.policy.build(settings.fallback),
                MovePublisher::new(transport.clone(), &self.lobby, &player.name),
                Pacer::new(settings.move_interval),
            );
            tokio::spawn(agent.run(rx));
            dispatcher.add_player(player.name.clone(), tx);
        }
        dispatcher
    }
}

/// Run a session until the transport's inbound channel closes
pub async fn run_session(
    context: SessionContext,
    transport: Arc<dyn Transport>,
    inbound: mpsc::Receiver<InboundMessage>,
    settings: AgentSettings,
    start_delay: Duration,
) -> Result<()> {
    let dispatcher = context.spawn_agents(transport.clone(), &settings);
    let routing = tokio::spawn(dispatcher.run(inbound));

    context.bootstrap(transport.as_ref(), start_delay).await?;
    info!(
        lobby = %context.lobby(),
        players = context.players().len(),
        policy = ?settings.policy,
        "Session started"
    );

    routing
        .await
        .map_err(|e| BotError::Transport(format!("Dispatcher task failed: {}", e)))
}
