//! coin-bot: plays the coin-collecting game over MQTT
//!
//! Usage: `coin-bot [CONFIG_PATH]`
//!
//! Without a config file the defaults are used. Broker settings can be
//! overridden with `BROKER_ADDRESS`, `BROKER_PORT`, `USER_NAME` and
//! `PASSWORD`, either in the process environment or in a `credentials.env`
//! file in the working directory. Log filtering follows `RUST_LOG`
//! (default: info).

use anyhow::{Context, Result};
use coin_bot_client::{BotConfig, SessionContext, Transport, run_session};
use coin_bot_mqtt::MqttTransport;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Time allowed for the DISCONNECT to reach the broker
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = BotConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    info!(
        "Starting coin-bot: lobby {}, {} player(s), policy {:?}",
        config.lobby,
        config.players.len(),
        config.policy
    );

    let context = SessionContext::from_config(&config)?;
    let (mqtt, inbound, event_loop) = MqttTransport::connect(&config.broker, config.queue_depth * 4);
    let transport: Arc<dyn Transport> = Arc::new(mqtt.clone());

    let outcome = tokio::select! {
        result = run_session(
            context,
            transport,
            inbound,
            config.agent_settings(),
            config.start_delay(),
        ) => {
            info!("Broker connection closed");
            result.context("Session failed")
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, disconnecting");
            Ok(())
        }
    };

    mqtt.shutdown(event_loop, SHUTDOWN_GRACE).await;
    outcome
}
