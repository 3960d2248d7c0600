// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimming level command.

use crate::command::Command;
use crate::processor::DIMMING_LEVEL_KEY;
use crate::topic::TopicParser;
use crate::types::{DevicePropertyId, Percentage, ShellyDeviceType};

/// Light channel driven by the dimming level property.
const DIMMED_LIGHT_KEY: &str = "0";

/// Command to set the brightness of a Shelly Dimmer.
///
/// A level of zero turns the light off, any other level turns it on. The
/// dimming level property (key `1`) addresses light `0`.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{Command, DimmerCommand};
/// use shelly_mqtt::topic::TopicParser;
/// use shelly_mqtt::types::{DeviceId, Percentage, ShellyDeviceType};
///
/// let parser = TopicParser::default();
/// let light = DeviceId::new("D1", ShellyDeviceType::ShellyDimmer2).property("0");
///
/// let message = DimmerCommand::new(Percentage::new(40)?).to_message(&parser, &light)?;
/// assert_eq!(message.topic, "shellies/shellydimmer2-D1/light/0/command");
/// assert_eq!(message.payload, r#"{"brightness":40,"turn":"on"}"#);
/// # Ok::<(), shelly_mqtt::error::ValueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimmerCommand {
    level: Percentage,
}

impl DimmerCommand {
    /// Creates a command setting the given level.
    #[must_use]
    pub const fn new(level: Percentage) -> Self {
        Self { level }
    }

    /// Returns the requested level.
    #[must_use]
    pub const fn level(&self) -> Percentage {
        self.level
    }
}

impl From<Percentage> for DimmerCommand {
    fn from(level: Percentage) -> Self {
        Self::new(level)
    }
}

impl Command for DimmerCommand {
    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::ShellyDimmer, ShellyDeviceType::ShellyDimmer2]
    }

    fn topic(&self, parser: &TopicParser, property_id: &DevicePropertyId) -> String {
        if property_id.local_key() == DIMMING_LEVEL_KEY {
            let light = property_id.device_id().property(DIMMED_LIGHT_KEY);
            return parser.create_command_topic(&light, "light");
        }
        parser.create_command_topic(property_id, "light")
    }

    fn payload(&self, _property_id: &DevicePropertyId, _topic: &str) -> String {
        let turn = if self.level.is_nonzero() { "on" } else { "off" };
        serde_json::json!({
            "brightness": self.level.value(),
            "turn": turn,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceId;

    #[test]
    fn zero_level_turns_off() {
        let property = DeviceId::new("D1", ShellyDeviceType::ShellyDimmer).property("0");
        let message = DimmerCommand::new(Percentage::MIN)
            .to_message(&TopicParser::default(), &property)
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&message.payload).unwrap();
        assert_eq!(body["brightness"], 0);
        assert_eq!(body["turn"], "off");
    }

    #[test]
    fn dimming_level_property_addresses_light_zero() {
        let property = DeviceId::new("D1", ShellyDeviceType::ShellyDimmer).property(DIMMING_LEVEL_KEY);
        let message = DimmerCommand::new(Percentage::MAX)
            .to_message(&TopicParser::default(), &property)
            .unwrap();
        assert_eq!(message.topic, "shellies/shellydimmer-D1/light/0/command");
    }

    #[test]
    fn relays_are_not_dimmable() {
        let property = DeviceId::new("X", ShellyDeviceType::Shelly1).property("0");
        assert!(DimmerCommand::new(Percentage::MAX)
            .to_message(&TopicParser::default(), &property)
            .is_err());
    }
}
