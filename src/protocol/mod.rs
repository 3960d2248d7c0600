// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport.
//!
//! [`MqttConnection`] subscribes to the Shelly topic tree on a broker, feeds
//! every received message to a [`ShellySubscriber`](crate::ShellySubscriber)
//! and publishes encoded [`CommandMessage`](crate::command::CommandMessage)s.

mod mqtt;

pub use mqtt::{MqttConnection, MqttConnectionBuilder};
