// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `shelly_mqtt` library.
//!
//! Only assembly-time failures ([`RegistryError`]) and transport failures
//! ([`ProtocolError`]) surface to callers as `Err`. Per-message failures
//! ([`ParseError`]) are produced by processors and consumed by the
//! subscriber, which logs and drops the offending message.

use thiserror::Error;

use crate::types::ShellyDeviceType;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A registry could not be assembled.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A command value was rejected.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors raised while assembling the device type or processor registries.
///
/// These are configuration errors: they must prevent the adapter from
/// starting rather than being logged and ignored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two processors claim the same device type.
    #[error("more than one message processor registered for device type {0}")]
    DuplicateProcessor(ShellyDeviceType),

    /// A device type was listed twice.
    #[error("device type {0} registered twice")]
    DuplicateDeviceType(ShellyDeviceType),
}

/// Errors raised while decoding a device payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

impl ParseError {
    pub(crate) fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors related to command values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u16,
    },

    /// The device type has no such controllable facet.
    #[error("device type {0} does not support this command")]
    UnsupportedDeviceType(ShellyDeviceType),
}

/// Errors related to the MQTT connection.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
