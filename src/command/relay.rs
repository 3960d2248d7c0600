// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay on/off commands.

use crate::command::{Command, RpcRequest};
use crate::topic::TopicParser;
use crate::types::{DevicePropertyId, ShellyDeviceType};

/// Command to switch a relay or light.
///
/// Dimmers are switched on their `light` channel, the Gen3 Mini through a
/// `Switch.Set` RPC request.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{Command, RelayCommand};
/// use shelly_mqtt::topic::TopicParser;
/// use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
///
/// let parser = TopicParser::default();
/// let light = DeviceId::new("D1", ShellyDeviceType::ShellyDimmer).property("0");
///
/// let message = RelayCommand::from(false).to_message(&parser, &light)?;
/// assert_eq!(message.topic, "shellies/shellydimmer-D1/light/0/command");
/// assert_eq!(message.payload, "off");
/// # Ok::<(), shelly_mqtt::error::ValueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayCommand {
    /// Turn the relay on.
    On,
    /// Turn the relay off.
    Off,
}

impl RelayCommand {
    /// Returns `true` for [`RelayCommand::On`].
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the Gen1 text payload.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    fn property_type(device_type: ShellyDeviceType) -> &'static str {
        match device_type {
            ShellyDeviceType::ShellyDimmer | ShellyDeviceType::ShellyDimmer2 => "light",
            _ => "relay",
        }
    }
}

impl From<bool> for RelayCommand {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl Command for RelayCommand {
    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[
            ShellyDeviceType::Shelly1,
            ShellyDeviceType::Shelly2,
            ShellyDeviceType::Shelly25,
            ShellyDeviceType::ShellyDimmer,
            ShellyDeviceType::ShellyDimmer2,
            ShellyDeviceType::Shelly1MiniGen3,
        ]
    }

    fn topic(&self, parser: &TopicParser, property_id: &DevicePropertyId) -> String {
        let device_id = property_id.device_id();
        match device_id.device_type() {
            ShellyDeviceType::Shelly1MiniGen3 => parser.create_rpc_topic(device_id),
            device_type => {
                parser.create_command_topic(property_id, Self::property_type(device_type))
            }
        }
    }

    fn payload(&self, property_id: &DevicePropertyId, topic: &str) -> String {
        match property_id.device_id().device_type() {
            ShellyDeviceType::Shelly1MiniGen3 => RpcRequest::switch_set(topic, 0, self.is_on()).to_json(),
            _ => self.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceId;

    #[test]
    fn gen1_relay_topics() {
        let parser = TopicParser::default();
        let cases = [
            (ShellyDeviceType::Shelly1, "shellies/shelly1-X/relay/0/command"),
            (ShellyDeviceType::Shelly2, "shellies/shellyswitch-X/relay/0/command"),
            (ShellyDeviceType::Shelly25, "shellies/shellyswitch25-X/relay/0/command"),
            (ShellyDeviceType::ShellyDimmer, "shellies/shellydimmer-X/light/0/command"),
            (ShellyDeviceType::ShellyDimmer2, "shellies/shellydimmer2-X/light/0/command"),
        ];
        for (device_type, topic) in cases {
            let property = DeviceId::new("X", device_type).property("0");
            let message = RelayCommand::On.to_message(&parser, &property).unwrap();
            assert_eq!(message.topic, topic);
            assert_eq!(message.payload, "on");
        }
    }

    #[test]
    fn gen3_uses_rpc() {
        let parser = TopicParser::default();
        let property = DeviceId::new("543204547d88", ShellyDeviceType::Shelly1MiniGen3).property("0");
        let message = RelayCommand::Off.to_message(&parser, &property).unwrap();

        assert_eq!(message.topic, "shellies/shelly1minig3-543204547d88/rpc");
        let body: serde_json::Value = serde_json::from_str(&message.payload).unwrap();
        assert_eq!(body["method"], "Switch.Set");
        assert_eq!(body["src"], "shellies/shelly1minig3-543204547d88/rpc/response");
        assert_eq!(body["params"]["id"], 0);
        assert_eq!(body["params"]["on"], false);
    }

    #[test]
    fn from_bool() {
        assert_eq!(RelayCommand::from(true), RelayCommand::On);
        assert!(!RelayCommand::from(false).is_on());
    }
}
