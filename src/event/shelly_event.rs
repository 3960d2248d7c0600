// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events broadcast by the [`EventBus`](super::EventBus).

use crate::state::ValueUpdate;
use crate::types::DeviceId;

/// An event observed on the Shelly topic tree.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ShellyEvent {
    /// The first message from a device was received.
    DeviceDiscovered {
        /// The discovered device.
        device_id: DeviceId,
    },

    /// A property value changed.
    ValueChanged(ValueUpdate),
}

impl ShellyEvent {
    /// Returns the device this event concerns.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::DeviceDiscovered { device_id } => device_id,
            Self::ValueChanged(update) => update.property_id.device_id(),
        }
    }

    /// Returns the value update, if this is a value change.
    #[must_use]
    pub fn as_value_update(&self) -> Option<&ValueUpdate> {
        match self {
            Self::ValueChanged(update) => Some(update),
            Self::DeviceDiscovered { .. } => None,
        }
    }
}

impl From<ValueUpdate> for ShellyEvent {
    fn from(update: ValueUpdate) -> Self {
        Self::ValueChanged(update)
    }
}
