// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded property values.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::{DevicePropertyId, RollerState};

/// The semantic channel a value belongs to.
///
/// One property key can carry several channels: a roller's motion state and
/// its position are both reported under key `0`. State is tracked per
/// `(property, kind)` so channels never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ValueKind {
    /// Relay or light on/off.
    RelayState,
    /// Dimmer brightness in percent.
    DimmingLevel,
    /// Roller motion state.
    RollerState,
    /// Roller position in percent.
    RollerPosition,
    /// Instantaneous power in Watts.
    Power,
    /// Temperature in degrees Celsius.
    Temperature,
    /// Relative humidity in percent.
    Humidity,
    /// Battery level in percent.
    BatteryLevel,
    /// Window open (`true`) or closed.
    WindowState,
    /// Window tilt angle in degrees.
    WindowTiltAngle,
}

impl ValueKind {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RelayState => "relay_state",
            Self::DimmingLevel => "dimming_level",
            Self::RollerState => "roller_state",
            Self::RollerPosition => "roller_position",
            Self::Power => "power",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::BatteryLevel => "battery_level",
            Self::WindowState => "window_state",
            Self::WindowTiltAngle => "window_tilt_angle",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded property value.
///
/// Equality is value equality, so two readings of `21.5` compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PropertyValue {
    /// On/off, open/closed.
    Bool(bool),
    /// Whole numbers (percentages, angles).
    Integer(i64),
    /// Measurements.
    Float(f64),
    /// Roller motion state.
    Roller(RollerState),
}

impl PropertyValue {
    /// Returns the boolean value, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer value, if this is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float value, if this is one.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the roller state, if this is one.
    #[must_use]
    pub fn as_roller(&self) -> Option<RollerState> {
        match self {
            Self::Roller(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Roller(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<RollerState> for PropertyValue {
    fn from(value: RollerState) -> Self {
        Self::Roller(value)
    }
}

/// One decoded value of one device property.
///
/// Message processors produce these; the change detector forwards them to
/// the value update sink when they differ from the stored value.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ValueUpdate {
    /// The property the value belongs to.
    pub property_id: DevicePropertyId,
    /// The channel within the property.
    pub kind: ValueKind,
    /// The decoded value.
    pub value: PropertyValue,
    /// When the value was observed.
    pub timestamp: DateTime<Utc>,
    /// Human readable label.
    pub label: String,
}

impl ValueUpdate {
    /// Creates a value update observed now.
    #[must_use]
    pub fn now(
        property_id: DevicePropertyId,
        kind: ValueKind,
        value: impl Into<PropertyValue>,
        label: impl Into<String>,
    ) -> Self {
        Self::at(property_id, kind, value, Utc::now(), label)
    }

    /// Creates a value update observed at the given time.
    #[must_use]
    pub fn at(
        property_id: DevicePropertyId,
        kind: ValueKind,
        value: impl Into<PropertyValue>,
        timestamp: DateTime<Utc>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            property_id,
            kind,
            value: value.into(),
            timestamp,
            label: label.into(),
        }
    }
}
