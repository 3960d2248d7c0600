// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity and value types for Shelly devices.
//!
//! # Types
//!
//! - [`ShellyDeviceType`] - Product family with type name and wire prefix
//! - [`DeviceTypeRegistry`] - Prefix and name lookup for a set of families
//! - [`DeviceId`] - External id plus device type
//! - [`DevicePropertyId`] - Device id plus local property key
//! - [`RollerState`] - Roller motion state
//! - [`Percentage`] - Value in the range 0-100

mod device_id;
mod device_type;
mod percentage;
mod roller;

pub use device_id::{DeviceId, DevicePropertyId};
pub use device_type::{DeviceTypeRegistry, ShellyDeviceType};
pub use percentage::Percentage;
pub use roller::RollerState;
