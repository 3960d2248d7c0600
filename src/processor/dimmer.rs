// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly Dimmer and Dimmer 2.

use serde::Deserialize;

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::ParsedTopic;
use crate::types::{DevicePropertyId, ShellyDeviceType};

use super::{MessageProcessor, device_label, parse_on_off};

/// Property key the dimming level is reported under.
pub const DIMMING_LEVEL_KEY: &str = "1";

/// Status document published on `light/<n>/status`.
///
/// Shelly sends more fields (`mode`, `transition`, ...); only these two are
/// decoded.
#[derive(Debug, Clone, Deserialize)]
struct LightStatus {
    ison: bool,
    brightness: u8,
}

/// Decodes light on/off and the JSON status document of the dimmers.
///
/// The status document yields two values: the on/off state on the light's
/// own key and the brightness on key [`DIMMING_LEVEL_KEY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DimmerProcessor;

impl DimmerProcessor {
    fn relay_update(topic: &ParsedTopic, property_id: DevicePropertyId, is_on: bool) -> ValueUpdate {
        let label = device_label(topic, &format!("Relay{}", property_id.local_key()));
        ValueUpdate::now(property_id, ValueKind::RelayState, is_on, label)
    }
}

impl MessageProcessor for DimmerProcessor {
    fn name(&self) -> &'static str {
        "dimmer"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::ShellyDimmer, ShellyDeviceType::ShellyDimmer2]
    }

    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        if topic.property_type() != "light" {
            return Ok(Vec::new());
        }
        let Some(property_id) = topic.property_id() else {
            return Ok(Vec::new());
        };

        match topic.facet() {
            None => Ok(parse_on_off(payload)
                .map(|is_on| Self::relay_update(topic, property_id, is_on))
                .into_iter()
                .collect()),
            Some("status") => {
                let status: LightStatus = serde_json::from_str(payload)?;
                let level = topic.device_id().property(DIMMING_LEVEL_KEY);
                Ok(vec![
                    Self::relay_update(topic, property_id, status.ison),
                    ValueUpdate::now(
                        level,
                        ValueKind::DimmingLevel,
                        i64::from(status.brightness),
                        device_label(topic, "Brightness"),
                    ),
                ])
            }
            Some(_) => Ok(Vec::new()),
        }
    }
}
