//! MQTT transport for the coin bot
//!
//! Wraps a `rumqttc` client. A background task polls the event loop,
//! forwards every incoming publish to the session's inbound channel and
//! logs connection, subscription and publish acknowledgements.

use async_trait::async_trait;
use coin_bot_client::{BrokerConfig, InboundMessage, Transport};
use coin_bot_core::{BotError, Result};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Requests buffered between the client handle and the event loop
const REQUEST_CAPACITY: usize = 64;

/// Back-off after a connection error before polling again
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// MQTT-backed transport
#[derive(Clone)]
pub struct MqttTransport {
    client: AsyncClient,
    qos: QoS,
}

impl MqttTransport {
    /// Create the client and spawn its event loop task
    ///
    /// The connection is established by the event loop; the returned
    /// receiver yields every message published on a subscribed topic.
    pub fn connect(
        config: &BrokerConfig,
        inbound_capacity: usize,
    ) -> (Self, mpsc::Receiver<InboundMessage>, JoinHandle<()>) {
        let (client, eventloop) = AsyncClient::new(mqtt_options(config), REQUEST_CAPACITY);
        let (inbound_tx, inbound_rx) = mpsc::channel(inbound_capacity.max(1));

        info!(
            "Connecting to MQTT broker at {}:{} (tls: {})",
            config.host, config.port, config.tls
        );
        let handle = tokio::spawn(event_loop_task(eventloop, inbound_tx));

        let transport = Self {
            client,
            qos: QoS::AtMostOnce,
        };
        (transport, inbound_rx, handle)
    }

    /// Ask the broker to close the connection
    ///
    /// Only queues the request; the event loop still has to run for the
    /// DISCONNECT packet to reach the broker.
    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| BotError::Transport(format!("Disconnect failed: {}", e)))
    }

    /// Disconnect and give the event loop `grace` to flush before aborting it
    ///
    /// Returns true if the event loop stopped on its own.
    pub async fn shutdown(&self, mut event_loop: JoinHandle<()>, grace: Duration) -> bool {
        if let Err(e) = self.disconnect().await {
            debug!("{}", e);
        }
        match tokio::time::timeout(grace, &mut event_loop).await {
            Ok(_) => true,
            Err(_) => {
                warn!("MQTT event loop still running after {:?}, aborting", grace);
                event_loop.abort();
                false
            }
        }
    }
}

fn mqtt_options(config: &BrokerConfig) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.max(5)));

    if let (Some(user), Some(password)) = (&config.username, &config.password) {
        options.set_credentials(user.clone(), password.clone());
    }
    if config.tls {
        options.set_transport(rumqttc::Transport::tls_with_default_config());
    }
    options
}

#[async_trait]
impl Transport for MqttTransport {
    async fn subscribe(&self, filter: &str) -> Result<()> {
        self.client
            .subscribe(filter, self.qos)
            .await
            .map_err(|e| BotError::Transport(format!("Subscribe to {} failed: {}", filter, e)))
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, self.qos, false, payload)
            .await
            .map_err(|e| BotError::Transport(format!("Publish to {} failed: {}", topic, e)))
    }
}

/// Poll the event loop and forward incoming publishes
///
/// Exits when the inbound receiver is dropped or once our DISCONNECT has
/// been written.
async fn event_loop_task(mut eventloop: EventLoop, inbound_tx: mpsc::Sender<InboundMessage>) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let msg = InboundMessage::new(publish.topic, publish.payload.to_vec());
                if inbound_tx.send(msg).await.is_err() {
                    debug!("Inbound receiver dropped, MQTT event loop exiting");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!("CONNACK received with code {:?}", ack.code);
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                debug!("Subscribed: {} {:?}", ack.pkid, ack.return_codes);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                warn!("Broker sent DISCONNECT");
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                info!("DISCONNECT sent, MQTT event loop exiting");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                if inbound_tx.is_closed() {
                    break;
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
