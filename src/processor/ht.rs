// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly H&T temperature and humidity sensor.

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::ParsedTopic;
use crate::types::ShellyDeviceType;

use super::{MessageProcessor, parse_float, parse_integer};

/// Decodes `sensor/temperature` (°C), `sensor/humidity` (%) and
/// `sensor/battery` (%).
#[derive(Debug, Clone, Copy, Default)]
pub struct HtProcessor;

impl MessageProcessor for HtProcessor {
    fn name(&self) -> &'static str {
        "ht"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::ShellyHt]
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
            "temperature" => {
                let celsius = parse_float("temperature", payload)?;
                ValueUpdate::now(property_id, ValueKind::Temperature, celsius, "Temperature")
            }
            "humidity" => {
                let percent = parse_float("humidity", payload)?;
                ValueUpdate::now(property_id, ValueKind::Humidity, percent, "Humidity")
            }
            "battery" => {
                let percent = parse_integer("battery", payload)?;
                ValueUpdate::now(property_id, ValueKind::BatteryLevel, percent, "Battery Level")
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![update])
    }
}
