// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device and device property identifiers.

use std::fmt;

use super::ShellyDeviceType;

/// Identifies one physical Shelly unit.
///
/// The external id is the part of the topic device segment after the `-`
/// (usually derived from the MAC address). Two ids are equal iff both the
/// external id and the device type match.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
///
/// let id = DeviceId::new("E01234", ShellyDeviceType::ShellyHt);
/// assert_eq!(id.external_id(), "E01234");
/// assert_eq!(id.to_string(), "shellyht-E01234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DeviceId {
    external_id: String,
    device_type: ShellyDeviceType,
}

impl DeviceId {
    /// Creates a new device identifier.
    #[must_use]
    pub fn new(external_id: impl Into<String>, device_type: ShellyDeviceType) -> Self {
        Self {
            external_id: external_id.into(),
            device_type,
        }
    }

    /// Returns the external (vendor) id.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Returns the device type.
    #[must_use]
    pub fn device_type(&self) -> ShellyDeviceType {
        self.device_type
    }

    /// Creates the id of one property of this device.
    #[must_use]
    pub fn property(&self, local_key: impl Into<String>) -> DevicePropertyId {
        DevicePropertyId::new(self.clone(), local_key)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.device_type, self.external_id)
    }
}

/// Identifies one observable or controllable facet of a device.
///
/// The local key is a flat string: relay indices (`"0"`) and named sensor
/// channels (`"temperature"`) share the same key space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DevicePropertyId {
    device_id: DeviceId,
    local_key: String,
}

impl DevicePropertyId {
    /// Creates a new device property identifier.
    #[must_use]
    pub fn new(device_id: DeviceId, local_key: impl Into<String>) -> Self {
        Self {
            device_id,
            local_key: local_key.into(),
        }
    }

    /// Returns the owning device.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the key of the property within its device.
    #[must_use]
    pub fn local_key(&self) -> &str {
        &self.local_key
    }
}

impl fmt::Display for DevicePropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.local_key)
    }
}
