// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly 2 and Shelly 2.5 in relay or roller mode.

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::ParsedTopic;
use crate::types::{DevicePropertyId, RollerState, ShellyDeviceType};

use super::{MessageProcessor, device_label, parse_float, parse_integer, parse_on_off};

/// Decodes the relay, power meter and roller topics of the two-channel
/// switches.
///
/// | Topic | Value |
/// |-------|-------|
/// | `relay/<n>` | relay on/off |
/// | `relay/<n>/power` | instantaneous power in W |
/// | `roller/0` | `open`, `close` or `stop` |
/// | `roller/0/pos` | position in percent |
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchProcessor;

impl SwitchProcessor {
    fn relay(
        topic: &ParsedTopic,
        property_id: DevicePropertyId,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        match topic.facet() {
            None => Ok(parse_on_off(payload)
                .map(|is_on| {
                    let label = device_label(topic, &format!("Relay{}", property_id.local_key()));
                    ValueUpdate::now(property_id, ValueKind::RelayState, is_on, label)
                })
                .into_iter()
                .collect()),
            Some("power") => {
                let watts = parse_float("power", payload)?;
                Ok(vec![ValueUpdate::now(
                    property_id,
                    ValueKind::Power,
                    watts,
                    device_label(topic, "Power"),
                )])
            }
            Some(_) => Ok(Vec::new()),
        }
    }

    fn roller(
        topic: &ParsedTopic,
        property_id: DevicePropertyId,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        match topic.facet() {
            None => {
                let state: RollerState = payload.trim().parse()?;
                Ok(vec![ValueUpdate::now(
                    property_id,
                    ValueKind::RollerState,
                    state,
                    device_label(topic, "Roller State"),
                )])
            }
            Some("pos") => {
                let position = parse_integer("roller position", payload)?;
                Ok(vec![ValueUpdate::now(
                    property_id,
                    ValueKind::RollerPosition,
                    position,
                    device_label(topic, "Roller Position"),
                )])
            }
            Some(_) => Ok(Vec::new()),
        }
    }
}

impl MessageProcessor for SwitchProcessor {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::Shelly2, ShellyDeviceType::Shelly25]
    }

    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        let Some(property_id) = topic.property_id() else {
            return Ok(Vec::new());
        };
        match topic.property_type() {
            "relay" => Self::relay(topic, property_id, payload),
            "roller" => Self::roller(topic, property_id, payload),
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PropertyValue;
    use crate::topic::TopicParser;

    fn decode(topic: &str, payload: &str) -> Result<Vec<ValueUpdate>, ParseError> {
        let parsed = TopicParser::default().parse(topic).unwrap();
        SwitchProcessor.process_message(&parsed, payload)
    }

    #[test]
    fn relay_state_per_channel() {
        let updates = decode("shellies/shellyswitch25-AB12/relay/1", "on").unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].property_id.local_key(), "1");
        assert_eq!(updates[0].value, PropertyValue::Bool(true));
        assert_eq!(updates[0].label, "shelly25-AB12: Relay1");
    }

    #[test]
    fn relay_power() {
        let updates = decode("shellies/shellyswitch25-AB12/relay/0/power", "42.75").unwrap();
        assert_eq!(updates[0].kind, ValueKind::Power);
        assert_eq!(updates[0].property_id.local_key(), "0");
        assert_eq!(updates[0].value, PropertyValue::Float(42.75));
        assert_eq!(updates[0].label, "shelly25-AB12: Power");
    }

    #[test]
    fn relay_energy_and_command_ignored() {
        assert!(decode("shellies/shellyswitch25-AB12/relay/0/energy", "1234").unwrap().is_empty());
        assert!(decode("shellies/shellyswitch25-AB12/relay/0/command", "on").unwrap().is_empty());
    }

    #[test]
    fn roller_state_and_position_share_key() {
        let state = decode("shellies/shellyswitch25-AB12/roller/0", "close").unwrap();
        assert_eq!(state[0].kind, ValueKind::RollerState);
        assert_eq!(state[0].value, PropertyValue::Roller(RollerState::Closing));
        assert_eq!(state[0].label, "shelly25-AB12: Roller State");

        let position = decode("shellies/shellyswitch25-AB12/roller/0/pos", "73").unwrap();
        assert_eq!(position[0].kind, ValueKind::RollerPosition);
        assert_eq!(position[0].value, PropertyValue::Integer(73));
        assert_eq!(position[0].property_id, state[0].property_id);
    }

    #[test]
    fn shelly2_uses_same_decoder() {
        let updates = decode("shellies/shellyswitch-XY/roller/0", "stop").unwrap();
        assert_eq!(updates[0].value, PropertyValue::Roller(RollerState::Stopped));
        assert_eq!(updates[0].label, "shelly2-XY: Roller State");
    }

    #[test]
    fn malformed_values_fail() {
        assert!(decode("shellies/shellyswitch25-AB12/roller/0", "sideways").is_err());
        assert!(decode("shellies/shellyswitch25-AB12/roller/0/pos", "half").is_err());
        assert!(decode("shellies/shellyswitch25-AB12/relay/0/power", "NaN").is_err());
    }
}
