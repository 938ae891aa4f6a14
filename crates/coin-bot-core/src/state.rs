//! Game state snapshots and the state decoder

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{BotError, Result};
use crate::grid::Position;

/// Number of coin slots carried by each state message
pub const COIN_SLOTS: usize = 3;

/// One snapshot of what a player can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Where the player stands
    pub position: Position,
    /// Visible coins in slot order, empty slots skipped
    pub coins: Vec<Position>,
    /// Impassable cells
    pub walls: HashSet<Position>,
}

/// Wire shape of a state message
///
/// `{"currentPosition": [r, c], "coin1": [r, c] | null, ..., "walls": [[r, c], ...]}`
#[derive(Debug, Deserialize)]
struct StatePayload {
    #[serde(rename = "currentPosition")]
    current_position: Position,
    #[serde(default, deserialize_with = "coin_slot")]
    coin1: Option<Position>,
    #[serde(default, deserialize_with = "coin_slot")]
    coin2: Option<Position>,
    #[serde(default, deserialize_with = "coin_slot")]
    coin3: Option<Position>,
    walls: Vec<Position>,
}

/// A coin slot is empty when absent, `null` or `[]`
fn coin_slot<'de, D>(deserializer: D) -> std::result::Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<i32>> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some([]) => Ok(None),
        Some(&[row, col]) => Ok(Some(Position::new(row, col))),
        Some(other) => Err(de::Error::invalid_length(
            other.len(),
            &"an empty list or a [row, col] pair",
        )),
    }
}

impl GameState {
    pub fn new(
        position: Position,
        coins: impl IntoIterator<Item = Position>,
        walls: impl IntoIterator<Item = Position>,
    ) -> Self {
        Self {
            position,
            coins: coins.into_iter().take(COIN_SLOTS).collect(),
            walls: walls.into_iter().collect(),
        }
    }

    /// Decode a state message from raw payload bytes
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| BotError::Decode(format!("Payload is not UTF-8: {}", e)))?;
        let raw: StatePayload =
            serde_json::from_str(text).map_err(|e| BotError::Decode(e.to_string()))?;

        Ok(Self {
            position: raw.current_position,
            coins: [raw.coin1, raw.coin2, raw.coin3]
                .into_iter()
                .flatten()
                .collect(),
            walls: raw.walls.into_iter().collect(),
        })
    }

    pub fn is_wall(&self, pos: &Position) -> bool {
        self.walls.contains(pos)
    }
}
