//! Bot configuration
//!
//! Loaded from an optional TOML file, then broker settings are overridden
//! from `BROKER_ADDRESS`, `BROKER_PORT`, `USER_NAME` and `PASSWORD`. Those
//! variables may also come from a `credentials.env` file in the working
//! directory; the process environment takes precedence over the file.

use coin_bot_core::policy::GRID_CENTER;
use coin_bot_core::{BotError, PolicyKind, Position, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::agent::AgentSettings;
use crate::session::SessionContext;

/// Optional dotenv file with broker credentials
pub const CREDENTIALS_FILE: &str = "credentials.env";

/// Broker connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker host (default: localhost)
    pub host: String,
    /// Broker port (default: 8883)
    pub port: u16,
    /// Use TLS (default: true)
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// MQTT client identifier (default: Player1)
    pub client_id: String,
    /// Keep-alive interval in seconds (default: 60)
    pub keep_alive_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 8883,
            tls: true,
            username: None,
            password: None,
            client_id: "Player1".into(),
            keep_alive_secs: 60,
        }
    }
}

/// One controlled player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub team: String,
}

impl PlayerSpec {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
        }
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub broker: BrokerConfig,
    /// Lobby to join (default: TestLobby)
    pub lobby: String,
    /// Players controlled by this process
    pub players: Vec<PlayerSpec>,
    pub policy: PolicyKind,
    /// Straight-line policy fallback target
    pub grid_center: Position,
    /// Minimum time between two moves of one player
    pub move_interval_ms: u64,
    /// Wait between registering players and sending START
    pub start_delay_ms: u64,
    /// Buffered state messages per player
    pub queue_depth: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            lobby: "TestLobby".into(),
            players: vec![PlayerSpec::new("Player1", "ATeam")],
            policy: PolicyKind::default(),
            grid_center: GRID_CENTER,
            move_interval_ms: 500,
            start_delay_ms: 1000,
            queue_depth: 16,
        }
    }
}

impl BotConfig {
    /// Parse from TOML text; missing keys take defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BotError::Config(e.to_string()))
    }

    /// Load from an optional file, apply `credentials.env` and the process
    /// environment, validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Path::new(CREDENTIALS_FILE), |key| std::env::var(key).ok())
    }

    /// [`BotConfig::load`] with an explicit credentials file and environment
    ///
    /// A missing credentials file is not an error. Keys found by `env`
    /// override the same keys in the file.
    pub fn load_with<F>(path: Option<&Path>, credentials: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    BotError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let file = read_env_file(credentials)?;
        config.apply_env(|key| env(key).or_else(|| file.get(key).cloned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override broker settings from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BROKER_ADDRESS") {
            self.broker.host = host;
        }
        if let Some(port) = lookup("BROKER_PORT") {
            self.broker.port = port
                .trim()
                .parse()
                .map_err(|_| BotError::Config(format!("Invalid BROKER_PORT: {:?}", port)))?;
        }
        if let Some(user) = lookup("USER_NAME") {
            self.broker.username = Some(user);
        }
        if let Some(password) = lookup("PASSWORD") {
            self.broker.password = Some(password);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        SessionContext::from_config(self)?;

        if self.queue_depth == 0 {
            return Err(BotError::Config("queue_depth must be at least 1".into()));
        }
        if self.broker.username.is_some() != self.broker.password.is_some() {
            return Err(BotError::Config(
                "Broker username and password must be set together".into(),
            ));
        }
        Ok(())
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            policy: self.policy,
            fallback: self.grid_center,
            move_interval: Duration::from_millis(self.move_interval_ms),
            queue_depth: self.queue_depth,
        }
    }
}

/// Read `KEY=VALUE` pairs from a dotenv file without touching the process
/// environment; a missing file yields no pairs
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    match dotenvy::from_path_iter(path) {
        Ok(pairs) => pairs
            .map(|pair| {
                pair.map_err(|e| BotError::Config(format!("Invalid {}: {}", path.display(), e)))
            })
            .collect(),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(BotError::Config(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}
