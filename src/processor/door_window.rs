// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly Door/Window and Door/Window 2 contact sensors.

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::ParsedTopic;
use crate::types::ShellyDeviceType;

use super::{MessageProcessor, parse_integer};

/// Tilt reading sent when the sensor cannot measure the angle.
pub const UNKNOWN_TILT_ANGLE: i64 = -1;

/// Decodes `sensor/state` (`open`/`close`), `sensor/battery` and
/// `sensor/tilt`.
///
/// A tilt of [`UNKNOWN_TILT_ANGLE`] is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoorWindowProcessor;

impl MessageProcessor for DoorWindowProcessor {
    fn name(&self) -> &'static str {
        "door_window"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[
            ShellyDeviceType::ShellyDoorWindow,
            ShellyDeviceType::ShellyDoorWindow2,
        ]
    }

    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        if topic.property_type() != "sensor" {
            return Ok(Vec::new());
        }
        let Some(property_id) = topic.property_id() else {
            return Ok(Vec::new());
        };

        let update = match property_id.local_key() {
            "state" => {
                let is_open = match payload.trim() {
                    "open" => true,
                    "close" => false,
                    _ => return Ok(Vec::new()),
                };
                ValueUpdate::now(property_id, ValueKind::WindowState, is_open, "Window State")
            }
            "battery" => {
                let percent = parse_integer("battery", payload)?;
                ValueUpdate::now(property_id, ValueKind::BatteryLevel, percent, "Battery Level")
            }
            "tilt" => {
                let degrees = parse_integer("tilt", payload)?;
                if degrees == UNKNOWN_TILT_ANGLE {
                    tracing::trace!(property = %property_id, "Tilt angle unknown");
                    return Ok(Vec::new());
                }
                ValueUpdate::now(property_id, ValueKind::WindowTiltAngle, degrees, "Tilt Angle")
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![update])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PropertyValue;
    use crate::topic::TopicParser;

    fn decode(topic: &str, payload: &str) -> Result<Vec<ValueUpdate>, ParseError> {
        let parsed = TopicParser::default().parse(topic).unwrap();
        DoorWindowProcessor.process_message(&parsed, payload)
    }

    #[test]
    fn window_state() {
        let open = decode("shellies/shellydw2-C0FFEE/sensor/state", "open").unwrap();
        assert_eq!(open[0].kind, ValueKind::WindowState);
        assert_eq!(open[0].value, PropertyValue::Bool(true));
        assert_eq!(open[0].label, "Window State");

        let closed = decode("shellies/shellydw-C0FFEE/sensor/state", "close").unwrap();
        assert_eq!(closed[0].value, PropertyValue::Bool(false));
    }

    #[test]
    fn state_is_case_sensitive() {
        assert!(decode("shellies/shellydw-C0FFEE/sensor/state", "OPEN").unwrap().is_empty());
    }

    #[test]
    fn tilt_angle() {
        let updates = decode("shellies/shellydw2-C0FFEE/sensor/tilt", "15").unwrap();
        assert_eq!(updates[0].kind, ValueKind::WindowTiltAngle);
        assert_eq!(updates[0].value, PropertyValue::Integer(15));
        assert_eq!(updates[0].label, "Tilt Angle");
    }

    #[test]
    fn unknown_tilt_suppressed() {
        assert!(decode("shellies/shellydw2-C0FFEE/sensor/tilt", "-1").unwrap().is_empty());
    }

    #[test]
    fn battery() {
        let updates = decode("shellies/shellydw-C0FFEE/sensor/battery", "99").unwrap();
        assert_eq!(updates[0].kind, ValueKind::BatteryLevel);
        assert_eq!(updates[0].value, PropertyValue::Integer(99));
    }

    #[test]
    fn lux_and_vibration_ignored() {
        assert!(decode("shellies/shellydw2-C0FFEE/sensor/lux", "120").unwrap().is_empty());
        assert!(decode("shellies/shellydw2-C0FFEE/sensor/vibration", "0").unwrap().is_empty());
    }
}
