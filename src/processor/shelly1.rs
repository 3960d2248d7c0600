// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly 1 relay.

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::ParsedTopic;
use crate::types::ShellyDeviceType;

use super::{MessageProcessor, device_label, parse_on_off};

/// Decodes `relay/<n>` on/off messages of the Shelly 1.
///
/// Command echoes (`relay/<n>/command`) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shelly1Processor;

impl MessageProcessor for Shelly1Processor {
    fn name(&self) -> &'static str {
        "shelly1"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::Shelly1]
    }

    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        if topic.property_type() != "relay" || topic.facet().is_some() {
            return Ok(Vec::new());
        }
        let (Some(property_id), Some(is_on)) = (topic.property_id(), parse_on_off(payload)) else {
            return Ok(Vec::new());
        };
        Ok(vec![ValueUpdate::now(
            property_id,
            ValueKind::RelayState,
            is_on,
            device_label(topic, "Relay"),
        )])
    }
}
