//! Coin bot client runtime
//!
//! This crate turns broker traffic into moves:
//! - [`Transport`] is the publish/subscribe seam a broker client implements
//! - [`Dispatcher`] routes inbound messages to one [`PlayerAgent`] per player
//! - each agent decodes state, asks its policy, paces and publishes the move
//! - [`SessionContext`] registers players with the lobby and starts the game

pub mod agent;
pub mod config;
pub mod dispatcher;
pub mod memory;
pub mod pacing;
pub mod publisher;
pub mod session;
pub mod transport;

pub use agent::{AgentSettings, Outcome, PlayerAgent};
pub use config::{BotConfig, BrokerConfig, PlayerSpec};
pub use dispatcher::Dispatcher;
pub use memory::MemoryTransport;
pub use pacing::Pacer;
pub use publisher::MovePublisher;
pub use session::{SessionContext, run_session};
pub use transport::{InboundMessage, Transport};
