// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting Shelly events.

use tokio::sync::broadcast;

use crate::state::ValueUpdate;
use crate::types::DeviceId;

use super::{ShellyEvent, ValueUpdateSink};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Value update sink that broadcasts events to multiple async subscribers.
///
/// Each subscriber gets its own copy of each event. A subscriber that falls
/// more than the capacity behind loses the oldest events and receives
/// `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use shelly_mqtt::event::{EventBus, ValueUpdateSink};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// // Hand a clone to the subscriber; both share one channel.
/// let sink: Arc<dyn ValueUpdateSink> = Arc::new(bus.clone());
/// # drop(sink);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellyEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus buffering at most `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShellyEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Without subscribers the event is discarded.
    pub fn publish(&self, event: ShellyEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }

    /// Publishes an event and returns how many subscribers received it.
    #[must_use]
    pub fn publish_counted(&self, event: ShellyEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueUpdateSink for EventBus {
    fn set_value(&self, update: &ValueUpdate) {
        self.publish(ShellyEvent::ValueChanged(update.clone()));
    }

    fn device_discovered(&self, device_id: &DeviceId) {
        self.publish(ShellyEvent::DeviceDiscovered {
            device_id: device_id.clone(),
        });
    }
}
