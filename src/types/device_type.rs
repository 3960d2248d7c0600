// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly device types and the registry used to resolve wire prefixes.

use std::fmt;

use crate::error::RegistryError;

/// A Shelly product family.
///
/// Each family has a canonical type name and a wire prefix, the part of the
/// MQTT device segment before the `-` (e.g. `shellyswitch25` in
/// `shellies/shellyswitch25-E01234/relay/0`).
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::ShellyDeviceType;
///
/// let ty = ShellyDeviceType::Shelly25;
/// assert_eq!(ty.type_name(), "shelly25");
/// assert_eq!(ty.wire_prefix(), "shellyswitch25");
/// assert_eq!(ty.topic_prefix(), "shellyswitch25-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ShellyDeviceType {
    /// Shelly 1 single relay.
    Shelly1,
    /// Shelly 2 dual relay / roller.
    Shelly2,
    /// Shelly 2.5 dual relay / roller with power metering.
    Shelly25,
    /// Shelly Dimmer.
    ShellyDimmer,
    /// Shelly Dimmer 2.
    ShellyDimmer2,
    /// Shelly H&T humidity and temperature sensor.
    ShellyHt,
    /// Shelly Door/Window sensor.
    ShellyDoorWindow,
    /// Shelly Door/Window 2 sensor.
    ShellyDoorWindow2,
    /// Shelly 1 Mini (third generation, RPC based).
    Shelly1MiniGen3,
}

impl ShellyDeviceType {
    /// All known device types.
    pub const ALL: [Self; 9] = [
        Self::Shelly1,
        Self::Shelly2,
        Self::Shelly25,
        Self::ShellyDimmer,
        Self::ShellyDimmer2,
        Self::ShellyHt,
        Self::ShellyDoorWindow,
        Self::ShellyDoorWindow2,
        Self::Shelly1MiniGen3,
    ];

    /// Returns the canonical type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Shelly1 => "shelly1",
            Self::Shelly2 => "shelly2",
            Self::Shelly25 => "shelly25",
            Self::ShellyDimmer => "shellydimmer",
            Self::ShellyDimmer2 => "shellydimmer2",
            Self::ShellyHt => "shellyht",
            Self::ShellyDoorWindow => "shelly-door-window",
            Self::ShellyDoorWindow2 => "shelly-door-window-2",
            Self::Shelly1MiniGen3 => "shelly1-mini-gen3",
        }
    }

    /// Returns the prefix used in the device segment of MQTT topics.
    #[must_use]
    pub const fn wire_prefix(&self) -> &'static str {
        match self {
            Self::Shelly1 => "shelly1",
            Self::Shelly2 => "shellyswitch",
            Self::Shelly25 => "shellyswitch25",
            Self::ShellyDimmer => "shellydimmer",
            Self::ShellyDimmer2 => "shellydimmer2",
            Self::ShellyHt => "shellyht",
            Self::ShellyDoorWindow => "shellydw",
            Self::ShellyDoorWindow2 => "shellydw2",
            Self::Shelly1MiniGen3 => "shelly1minig3",
        }
    }

    /// Returns the canonical topic prefix: the wire prefix followed by `-`.
    #[must_use]
    pub const fn topic_prefix(&self) -> &'static str {
        match self {
            Self::Shelly1 => "shelly1-",
            Self::Shelly2 => "shellyswitch-",
            Self::Shelly25 => "shellyswitch25-",
            Self::ShellyDimmer => "shellydimmer-",
            Self::ShellyDimmer2 => "shellydimmer2-",
            Self::ShellyHt => "shellyht-",
            Self::ShellyDoorWindow => "shellydw-",
            Self::ShellyDoorWindow2 => "shellydw2-",
            Self::Shelly1MiniGen3 => "shelly1minig3-",
        }
    }
}

impl fmt::Display for ShellyDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Lookup table from wire prefixes and type names to device types.
///
/// The registry is an explicit value rather than a global so that tests and
/// deployments can restrict the set of recognised families. It is immutable
/// once built and can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::{DeviceTypeRegistry, ShellyDeviceType};
///
/// let registry = DeviceTypeRegistry::default();
/// assert_eq!(registry.by_prefix("shellyht"), Some(ShellyDeviceType::ShellyHt));
/// assert_eq!(registry.by_prefix("tasmota"), None);
/// ```
#[derive(Debug, Clone)]
pub struct DeviceTypeRegistry {
    types: Vec<ShellyDeviceType>,
}

impl DeviceTypeRegistry {
    /// Creates a registry containing the given device types.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDeviceType`] if a type is listed
    /// twice.
    pub fn new(types: impl IntoIterator<Item = ShellyDeviceType>) -> Result<Self, RegistryError> {
        let mut registered: Vec<ShellyDeviceType> = Vec::new();
        for ty in types {
            if registered.contains(&ty) {
                return Err(RegistryError::DuplicateDeviceType(ty));
            }
            registered.push(ty);
        }
        Ok(Self { types: registered })
    }

    /// Looks up a device type by its wire prefix (exact, case-sensitive).
    #[must_use]
    pub fn by_prefix(&self, prefix: &str) -> Option<ShellyDeviceType> {
        self.types
            .iter()
            .copied()
            .find(|ty| ty.wire_prefix() == prefix)
    }

    /// Looks up a device type by its canonical type name (exact, case-sensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ShellyDeviceType> {
        self.types.iter().copied().find(|ty| ty.type_name() == name)
    }

    /// Returns the canonical topic prefix of a registered type.
    ///
    /// Returns `None` if the type is not part of this registry.
    #[must_use]
    pub fn prefix_of(&self, ty: ShellyDeviceType) -> Option<String> {
        self.contains(ty).then(|| ty.topic_prefix().to_string())
    }

    /// Returns `true` if the type is part of this registry.
    #[must_use]
    pub fn contains(&self, ty: ShellyDeviceType) -> bool {
        self.types.contains(&ty)
    }

    /// Returns the registered types in registration order.
    #[must_use]
    pub fn types(&self) -> &[ShellyDeviceType] {
        &self.types
    }
}

impl Default for DeviceTypeRegistry {
    fn default() -> Self {
        Self {
            types: ShellyDeviceType::ALL.to_vec(),
        }
    }
}
