// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly command encoding.
//!
//! Commands are the inverse of message processing: they turn an intent on a
//! device property into the MQTT topic and payload the device listens on.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Device types |
//! |-------------|---------|--------------|
//! | [`RelayCommand`] | Switch a relay or light | Shelly 1, 2, 2.5, Dimmer, Dimmer 2, 1 Mini Gen3 |
//! | [`RollerCommand`] | Move a roller shutter | Shelly 2, 2.5 |
//! | [`DimmerCommand`] | Set brightness (0-100) | Dimmer, Dimmer 2 |
//!
//! Gen1 devices take plain text on `<property>/command`; Gen3 devices take a
//! JSON-RPC request on `<device>/rpc`.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::command::{Command, RelayCommand};
//! use shelly_mqtt::topic::TopicParser;
//! use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
//!
//! let parser = TopicParser::default();
//! let relay = DeviceId::new("ABC123", ShellyDeviceType::Shelly1).property("0");
//!
//! let message = RelayCommand::On.to_message(&parser, &relay)?;
//! assert_eq!(message.topic, "shellies/shelly1-ABC123/relay/0/command");
//! assert_eq!(message.payload, "on");
//! # Ok::<(), shelly_mqtt::error::ValueError>(())
//! ```

mod dimmer;
mod relay;
mod roller;
mod rpc;

pub use dimmer::DimmerCommand;
pub use relay::RelayCommand;
pub use roller::RollerCommand;
pub use rpc::RpcRequest;

use crate::error::ValueError;
use crate::topic::TopicParser;
use crate::types::{DevicePropertyId, ShellyDeviceType};

/// An encoded command ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    /// The topic to publish on.
    pub topic: String,
    /// The message body.
    pub payload: String,
}

/// A command that can be sent to a Shelly device property.
pub trait Command {
    /// Returns the device types that accept this command.
    fn supported_device_types(&self) -> &'static [ShellyDeviceType];

    /// Returns the topic the command is published on.
    fn topic(&self, parser: &TopicParser, property_id: &DevicePropertyId) -> String;

    /// Returns the payload for a command published on `topic`.
    fn payload(&self, property_id: &DevicePropertyId, topic: &str) -> String;

    /// Encodes the command for `property_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnsupportedDeviceType`] if the property's device
    /// does not accept this command.
    fn to_message(
        &self,
        parser: &TopicParser,
        property_id: &DevicePropertyId,
    ) -> Result<CommandMessage, ValueError> {
        let device_type = property_id.device_id().device_type();
        if !self.supported_device_types().contains(&device_type) {
            return Err(ValueError::UnsupportedDeviceType(device_type));
        }
        let topic = self.topic(parser, property_id);
        let payload = self.payload(property_id, &topic);
        Ok(CommandMessage { topic, payload })
    }
}
