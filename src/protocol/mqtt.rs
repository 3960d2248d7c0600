// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker connection feeding a [`ShellySubscriber`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelly_mqtt::command::{Command, RelayCommand};
//! use shelly_mqtt::event::EventBus;
//! use shelly_mqtt::protocol::MqttConnection;
//! use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
//! use shelly_mqtt::ShellySubscriber;
//!
//! # async fn example() -> shelly_mqtt::Result<()> {
//! let bus = EventBus::new();
//! let mut events = bus.subscribe();
//! let subscriber = Arc::new(ShellySubscriber::builder(Arc::new(bus.clone())).build()?);
//!
//! let connection = MqttConnection::builder()
//!     .host("mqtt.local")
//!     .credentials("shelly", "secret")
//!     .build(Arc::clone(&subscriber))
//!     .await?;
//!
//! let relay = DeviceId::new("ABC123", ShellyDeviceType::Shelly1).property("0");
//! connection
//!     .publish(&RelayCommand::On.to_message(subscriber.parser(), &relay)?)
//!     .await?;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::command::CommandMessage;
use crate::error::ProtocolError;
use crate::subscriber::ShellySubscriber;

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the client's outgoing request queue.
const REQUEST_QUEUE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Clone)]
struct ConnectionSettings {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    keep_alive: Duration,
    connect_timeout: Duration,
    client_id: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            credentials: None,
            keep_alive: DEFAULT_KEEP_ALIVE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            client_id: None,
        }
    }
}

impl ConnectionSettings {
    fn client_id(&self) -> String {
        self.client_id
            .clone()
            .unwrap_or_else(|| format!("shelly_mqtt-{}", Uuid::new_v4().simple()))
    }

    fn mqtt_options(&self, client_id: &str) -> MqttOptions {
        let mut options = MqttOptions::new(client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        if let Some(credentials) = &self.credentials {
            options.set_credentials(&credentials.username, &credentials.password);
        }
        options
    }
}

/// A live connection to the broker the Shelly devices report to.
///
/// Every publish received under the subscriber's topic filter is handed to
/// [`ShellySubscriber::process_message`]. Clones share the same client.
#[derive(Clone)]
pub struct MqttConnection {
    shared: Arc<Shared>,
}

struct Shared {
    client: AsyncClient,
    connected: AtomicBool,
    subscriber: Arc<ShellySubscriber>,
}

impl Shared {
    fn deliver(&self, topic: &str, payload: &[u8]) {
        let payload = (!payload.is_empty()).then_some(payload);
        let changed = self.subscriber.process_message(topic, payload);
        tracing::trace!(topic = %topic, changed, "Delivered MQTT message");
    }
}

impl MqttConnection {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> MqttConnectionBuilder {
        MqttConnectionBuilder::default()
    }

    /// Returns `true` while the broker session is up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Returns the subscriber messages are delivered to.
    #[must_use]
    pub fn subscriber(&self) -> &Arc<ShellySubscriber> {
        &self.shared.subscriber
    }

    /// Publishes an encoded command.
    ///
    /// The device acknowledges by reporting its new state, which comes back
    /// through the subscriber like any other message.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Mqtt`] if the request cannot be queued.
    pub async fn publish(&self, command: &CommandMessage) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %command.topic, payload = %command.payload, "Sending command");
        self.shared
            .client
            .publish(
                command.topic.as_str(),
                QoS::AtLeastOnce,
                false,
                command.payload.as_bytes().to_vec(),
            )
            .await?;
        Ok(())
    }

    /// Ends the broker session.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Mqtt`] if the request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!("Closing MQTT connection");
        self.shared.client.disconnect().await?;
        self.shared.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl std::fmt::Debug for MqttConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttConnection")
            .field("connected", &self.is_connected())
            .field("subscriber", &self.shared.subscriber)
            .finish()
    }
}

/// Builder for [`MqttConnection`].
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use shelly_mqtt::protocol::MqttConnection;
/// use shelly_mqtt::state::ValueUpdate;
/// use shelly_mqtt::ShellySubscriber;
///
/// # async fn example() -> shelly_mqtt::Result<()> {
/// let subscriber = ShellySubscriber::builder(Arc::new(|update: &ValueUpdate| {
///     println!("{}: {}", update.label, update.value);
/// }))
/// .build()?;
///
/// let _connection = MqttConnection::builder()
///     .host("10.0.0.2")
///     .keep_alive(Duration::from_secs(60))
///     .connect_timeout(Duration::from_secs(3))
///     .client_id("living-room-hub")
///     .build(Arc::new(subscriber))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttConnectionBuilder {
    settings: ConnectionSettings,
}

impl MqttConnectionBuilder {
    /// Sets the broker host. Required.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.settings.host = host.into();
        self
    }

    /// Sets the broker port (default 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.settings.port = port;
        self
    }

    /// Authenticates with a username and password.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.settings.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Sets the MQTT keep-alive interval (default 30 s).
    #[must_use]
    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.settings.keep_alive = interval;
        self
    }

    /// Sets how long to wait for the broker's ConnAck (default 10 s).
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connect_timeout = timeout;
        self
    }

    /// Sets a fixed client id instead of a generated one.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.settings.client_id = Some(client_id.into());
        self
    }

    /// Connects, waits for the session and subscribes to the subscriber's
    /// topic filter.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InvalidAddress`] if no host is set
    /// - [`ProtocolError::ConnectionFailed`] if the broker does not accept the
    ///   session within the connect timeout
    /// - [`ProtocolError::Mqtt`] if the subscription cannot be queued
    pub async fn build(
        self,
        subscriber: Arc<ShellySubscriber>,
    ) -> Result<MqttConnection, ProtocolError> {
        let settings = self.settings;
        if settings.host.is_empty() {
            return Err(ProtocolError::InvalidAddress("no broker host given".to_string()));
        }

        let client_id = settings.client_id();
        let (client, event_loop) =
            AsyncClient::new(settings.mqtt_options(&client_id), REQUEST_QUEUE);
        let connection = MqttConnection {
            shared: Arc::new(Shared {
                client,
                connected: AtomicBool::new(false),
                subscriber,
            }),
        };

        let (session_tx, session_rx) = oneshot::channel();
        tokio::spawn(run_event_loop(
            event_loop,
            Arc::clone(&connection.shared),
            session_tx,
        ));

        match tokio::time::timeout(settings.connect_timeout, session_rx).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "{}:{} closed the connection before accepting the session",
                    settings.host, settings.port
                )));
            }
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "no ConnAck from {}:{} within {:?}",
                    settings.host, settings.port, settings.connect_timeout
                )));
            }
        }
        tracing::info!(
            host = %settings.host,
            port = settings.port,
            client_id = %client_id,
            "Connected to MQTT broker"
        );

        let filter = connection.shared.subscriber.topic_filter();
        connection
            .shared
            .client
            .subscribe(filter.as_str(), QoS::AtLeastOnce)
            .await?;
        tracing::debug!(filter = %filter, "Subscribed");

        Ok(connection)
    }
}

/// Polls the client until the session ends, delivering every publish.
///
/// `session_tx` fires on the first ConnAck. It is dropped unfired if the loop
/// ends before that.
async fn run_event_loop(
    mut event_loop: EventLoop,
    shared: Arc<Shared>,
    session_tx: oneshot::Sender<()>,
) {
    let mut session_tx = Some(session_tx);
    loop {
        let event = match event_loop.poll().await {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(error = %error, "MQTT connection lost");
                break;
            }
        };
        match event {
            Event::Incoming(Packet::Publish(publish)) => {
                shared.deliver(&publish.topic, &publish.payload);
            }
            Event::Incoming(Packet::ConnAck(ack)) => {
                tracing::debug!(code = ?ack.code, "Session accepted");
                shared.connected.store(true, Ordering::Release);
                if let Some(tx) = session_tx.take() {
                    let _ = tx.send(());
                }
            }
            Event::Incoming(Packet::Disconnect) => {
                tracing::info!("Broker closed the session");
                break;
            }
            _ => {}
        }
    }
    shared.connected.store(false, Ordering::Release);
}
