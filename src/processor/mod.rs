// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payload decoders for each Shelly device family.
//!
//! A [`MessageProcessor`] turns one parsed topic and its payload into zero or
//! more [`ValueUpdate`]s. Processors never touch state: the subscriber feeds
//! their output through the change detector. Which processor handles which
//! device type is decided by the [`ProcessorRegistry`].
//!
//! | Processor | Device types |
//! |-----------|--------------|
//! | [`Shelly1Processor`] | Shelly 1 |
//! | [`SwitchProcessor`] | Shelly 2, Shelly 2.5 |
//! | [`DimmerProcessor`] | Shelly Dimmer, Shelly Dimmer 2 |
//! | [`HtProcessor`] | Shelly H&T |
//! | [`DoorWindowProcessor`] | Shelly Door/Window, Shelly Door/Window 2 |
//! | [`RpcProcessor`] | Shelly 1 Mini Gen3 |

mod dimmer;
mod door_window;
mod ht;
mod registry;
mod rpc;
mod shelly1;
mod switch;

pub use dimmer::{DIMMING_LEVEL_KEY, DimmerProcessor};
pub use door_window::{DoorWindowProcessor, UNKNOWN_TILT_ANGLE};
pub use ht::HtProcessor;
pub use registry::{ProcessorRegistry, ProcessorRegistryBuilder};
pub use rpc::RpcProcessor;
pub use shelly1::Shelly1Processor;
pub use switch::SwitchProcessor;

use crate::error::ParseError;
use crate::state::ValueUpdate;
use crate::topic::ParsedTopic;
use crate::types::ShellyDeviceType;

/// Decoder for the messages of one or more device types.
pub trait MessageProcessor: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str;

    /// Returns the device types this processor handles.
    fn supported_device_types(&self) -> &'static [ShellyDeviceType];

    /// Decodes one message.
    ///
    /// Topics the processor does not care about yield an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the payload of a recognised topic is
    /// malformed.
    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError>;
}

/// Parses a Gen1 on/off payload, ignoring case.
///
/// Anything else yields `None`.
pub(crate) fn parse_on_off(payload: &str) -> Option<bool> {
    let payload = payload.trim();
    if payload.eq_ignore_ascii_case("on") {
        Some(true)
    } else if payload.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

/// Parses a finite floating point reading.
pub(crate) fn parse_float(field: &str, payload: &str) -> Result<f64, ParseError> {
    let value: f64 = payload
        .trim()
        .parse()
        .map_err(|e| ParseError::invalid_value(field, format!("{e}: {payload:?}")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::invalid_value(
            field,
            format!("not a finite number: {payload:?}"),
        ))
    }
}

/// Parses a whole number reading.
pub(crate) fn parse_integer(field: &str, payload: &str) -> Result<i64, ParseError> {
    payload
        .trim()
        .parse()
        .map_err(|e| ParseError::invalid_value(field, format!("{e}: {payload:?}")))
}

/// Label prefixed with the device id, e.g. `shelly25-ABC: Power`.
pub(crate) fn device_label(topic: &ParsedTopic, name: &str) -> String {
    format!("{}: {name}", topic.device_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_off_ignores_case_and_whitespace() {
        assert_eq!(parse_on_off("on"), Some(true));
        assert_eq!(parse_on_off("ON"), Some(true));
        assert_eq!(parse_on_off("Off\n"), Some(false));
        assert_eq!(parse_on_off("toggle"), None);
        assert_eq!(parse_on_off(""), None);
    }

    #[test]
    fn float_rejects_non_finite() {
        assert_eq!(parse_float("temperature", "21.5").unwrap(), 21.5);
        assert_eq!(parse_float("temperature", " -3 ").unwrap(), -3.0);
        assert!(parse_float("temperature", "NaN").is_err());
        assert!(parse_float("temperature", "inf").is_err());
        assert!(parse_float("temperature", "warm").is_err());
    }

    #[test]
    fn integer_is_strict() {
        assert_eq!(parse_integer("battery", "87").unwrap(), 87);
        assert_eq!(parse_integer("tilt", "-1").unwrap(), -1);
        assert!(parse_integer("battery", "87.5").is_err());
        assert!(parse_integer("battery", "").is_err());
    }
}
