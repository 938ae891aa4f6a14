//! Lobby wire messages
//!
//! Registration goes out as JSON on the global `new_game` topic.
//! Start and stop are plain text on the lobby's start topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BotError, Result};

/// Announcement that registers one player into a lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub lobby_name: String,
    pub team_name: String,
    pub player_name: String,
}

impl NewGame {
    /// Serialize to JSON bytes
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Into::into)
    }
}

/// Command sent on the lobby start topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyCommand {
    Start,
    Stop,
}

impl LobbyCommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            LobbyCommand::Start => "START",
            LobbyCommand::Stop => "STOP",
        }
    }
}

impl fmt::Display for LobbyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LobbyCommand {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "START" => Ok(LobbyCommand::Start),
            "STOP" => Ok(LobbyCommand::Stop),
            other => Err(BotError::Protocol(format!("Unknown lobby command: {}", other))),
        }
    }
}
