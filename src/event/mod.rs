// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivery of changed values to the host application.
//!
//! The host receives changes through a [`ValueUpdateSink`]. Any
//! `Fn(&ValueUpdate) + Send + Sync` closure is a sink; for async consumers
//! the [`EventBus`] fans [`ShellyEvent`]s out over a tokio broadcast channel.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::event::{EventBus, ShellyEvent, ValueUpdateSink};
//! use shelly_mqtt::state::{ValueKind, ValueUpdate};
//! use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let property = DeviceId::new("E01234", ShellyDeviceType::ShellyHt).property("humidity");
//! bus.set_value(&ValueUpdate::now(property, ValueKind::Humidity, 48.0, "Humidity"));
//!
//! assert!(matches!(rx.try_recv(), Ok(ShellyEvent::ValueChanged(_))));
//! ```

mod event_bus;
mod shelly_event;
mod sink;

pub use event_bus::EventBus;
pub use shelly_event::ShellyEvent;
pub use sink::ValueUpdateSink;
