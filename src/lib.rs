// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `shelly_mqtt` - decode Shelly MQTT traffic into deduplicated state changes.
//!
//! Shelly devices publish their state on topics such as
//! `shellies/shellyht-E01234/sensor/temperature`. This library parses those
//! topics into a device identity, decodes the payload with a processor for
//! the device family and forwards a value to the host application only when
//! it differs from the last one seen.
//!
//! # Supported Devices
//!
//! - Shelly 1, Shelly 2, Shelly 2.5 (relays, power meter, roller mode)
//! - Shelly Dimmer, Shelly Dimmer 2
//! - Shelly H&T
//! - Shelly Door/Window, Shelly Door/Window 2
//! - Shelly 1 Mini Gen3 (JSON-RPC notifications)
//!
//! # Quick Start
//!
//! ## Feeding messages by hand
//!
//! ```
//! use std::sync::Arc;
//!
//! use shelly_mqtt::ShellySubscriber;
//! use shelly_mqtt::state::ValueUpdate;
//!
//! # fn main() -> shelly_mqtt::Result<()> {
//! let subscriber = ShellySubscriber::builder(Arc::new(|update: &ValueUpdate| {
//!     println!("{} {} = {}", update.property_id, update.label, update.value);
//! }))
//! .build()?;
//!
//! // Forward whatever your MQTT client receives under `shellies/#`
//! subscriber.process_message("shellies/shellyswitch25-AB12/roller/0/pos", Some(b"73"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Built-in MQTT connection
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelly_mqtt::event::{EventBus, ShellyEvent};
//! use shelly_mqtt::protocol::MqttConnection;
//! use shelly_mqtt::ShellySubscriber;
//!
//! #[tokio::main]
//! async fn main() -> shelly_mqtt::Result<()> {
//!     let bus = EventBus::new();
//!     let mut events = bus.subscribe();
//!
//!     let subscriber = ShellySubscriber::builder(Arc::new(bus.clone())).build()?;
//!     let _connection = MqttConnection::builder()
//!         .host("192.168.1.50")
//!         .build(Arc::new(subscriber))
//!         .await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if let ShellyEvent::ValueChanged(update) = event {
//!             println!("{}: {}", update.label, update.value);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `mqtt` (default): the [`protocol`] module with a rumqttc-based broker
//!   connection. Without it the crate only decodes and encodes.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command;
pub mod error;
pub mod event;
pub mod processor;
#[cfg(feature = "mqtt")]
#[cfg_attr(docsrs, doc(cfg(feature = "mqtt")))]
pub mod protocol;
pub mod state;
mod subscriber;
pub mod topic;
pub mod types;

pub use command::{Command, CommandMessage, DimmerCommand, RelayCommand, RollerCommand};
pub use error::{Error, ParseError, ProtocolError, RegistryError, Result, ValueError};
pub use event::{EventBus, ShellyEvent, ValueUpdateSink};
pub use processor::{MessageProcessor, ProcessorRegistry};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttConnection, MqttConnectionBuilder};
pub use state::{ChangeDetector, PropertyValue, ValueKind, ValueUpdate};
pub use subscriber::{ShellySubscriber, ShellySubscriberBuilder};
pub use topic::{ParsedTopic, TopicParser, property_key};
pub use types::{DeviceId, DevicePropertyId, DeviceTypeRegistry, Percentage, RollerState, ShellyDeviceType};
