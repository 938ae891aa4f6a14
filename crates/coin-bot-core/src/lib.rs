//! # coin-bot-core
//!
//! Core types for the coin-collecting game bot.
//!
//! This crate holds everything that does not touch the network:
//! - Grid positions and the four cardinal moves
//! - Game state snapshots and their decoder
//! - Move policies
//! - Broker topic scheme and lobby messages

pub mod error;
pub mod grid;
pub mod policy;
pub mod protocol;
pub mod state;
pub mod topic;

pub use error::{BotError, Result};
pub use grid::{Move, Position};
pub use policy::{GreedyPolicy, MovePolicy, PolicyKind, StraightLinePolicy};
pub use protocol::{LobbyCommand, NewGame};
pub use state::GameState;
pub use topic::Topic;
