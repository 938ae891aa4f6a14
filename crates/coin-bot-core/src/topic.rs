//! Broker topic addressing scheme
//!
//! ```text
//! new_game                              player registration
//! games/{lobby}/lobby                   lobby chatter
//! games/{lobby}/start                   START / STOP
//! games/{lobby}/scores                  score board
//! games/{lobby}/{player}/game_state     state for one player
//! games/{lobby}/{player}/move           move from one player
//! ```

use crate::error::{BotError, Result};

/// Global registration topic
pub const NEW_GAME: &str = "new_game";

const ROOT: &str = "games";

/// A parsed topic within the `games/` tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Lobby { lobby: String },
    Start { lobby: String },
    Scores { lobby: String },
    GameState { lobby: String, player: String },
    Move { lobby: String, player: String },
}

impl Topic {
    /// Parse a concrete topic string; unknown shapes yield `None`
    pub fn parse(topic: &str) -> Option<Topic> {
        let parts: Vec<&str> = topic.split('/').collect();
        match parts.as_slice() {
            [ROOT, lobby, "lobby"] => Some(Topic::Lobby { lobby: lobby.to_string() }),
            [ROOT, lobby, "start"] => Some(Topic::Start { lobby: lobby.to_string() }),
            [ROOT, lobby, "scores"] => Some(Topic::Scores { lobby: lobby.to_string() }),
            [ROOT, lobby, player, "game_state"] => Some(Topic::GameState {
                lobby: lobby.to_string(),
                player: player.to_string(),
            }),
            [ROOT, lobby, player, "move"] => Some(Topic::Move {
                lobby: lobby.to_string(),
                player: player.to_string(),
            }),
            _ => None,
        }
    }

    pub fn lobby(&self) -> &str {
        match self {
            Topic::Lobby { lobby }
            | Topic::Start { lobby }
            | Topic::Scores { lobby }
            | Topic::GameState { lobby, .. }
            | Topic::Move { lobby, .. } => lobby,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::Lobby { lobby } => write!(f, "{ROOT}/{lobby}/lobby"),
            Topic::Start { lobby } => write!(f, "{ROOT}/{lobby}/start"),
            Topic::Scores { lobby } => write!(f, "{ROOT}/{lobby}/scores"),
            Topic::GameState { lobby, player } => write!(f, "{ROOT}/{lobby}/{player}/game_state"),
            Topic::Move { lobby, player } => write!(f, "{ROOT}/{lobby}/{player}/move"),
        }
    }
}

/// Subscription filter matching every player's state in a lobby
pub fn all_game_states(lobby: &str) -> String {
    format!("{ROOT}/{lobby}/+/game_state")
}

/// Check a lobby or player name is usable as a single topic level
pub fn validate_segment(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BotError::Config(format!("{} name is empty", kind)));
    }
    if name.contains(['/', '+', '#']) {
        return Err(BotError::Config(format!(
            "{} name {:?} contains a topic separator or wildcard",
            kind, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let topics = [
            Topic::Lobby { lobby: "L".into() },
            Topic::Start { lobby: "L".into() },
            Topic::Scores { lobby: "L".into() },
            Topic::GameState { lobby: "L".into(), player: "P1".into() },
            Topic::Move { lobby: "L".into(), player: "P1".into() },
        ];
        for topic in topics {
            assert_eq!(Topic::parse(&topic.to_string()), Some(topic.clone()));
            assert_eq!(topic.lobby(), "L");
        }
    }

    #[test]
    fn test_known_strings() {
        let state = Topic::GameState { lobby: "TestLobby".into(), player: "Player1".into() };
        assert_eq!(state.to_string(), "games/TestLobby/Player1/game_state");
        assert_eq!(all_game_states("TestLobby"), "games/TestLobby/+/game_state");
        assert_eq!(
            Topic::Move { lobby: "TestLobby".into(), player: "Player2".into() }.to_string(),
            "games/TestLobby/Player2/move"
        );
    }

    #[test]
    fn test_unknown_topics() {
        assert_eq!(Topic::parse(NEW_GAME), None);
        assert_eq!(Topic::parse("games/L"), None);
        assert_eq!(Topic::parse("games/L/P/unknown"), None);
        assert_eq!(Topic::parse("other/L/start"), None);
    }

    #[test]
    fn test_validate_segment() {
        assert!(validate_segment("Player", "Player1").is_ok());
        assert!(validate_segment("Player", "").is_err());
        assert!(validate_segment("Lobby", "a/b").is_err());
        assert!(validate_segment("Lobby", "a+").is_err());
        assert!(validate_segment("Lobby", "#").is_err());
    }
}
