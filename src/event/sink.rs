// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value update sink trait.

use crate::state::ValueUpdate;
use crate::types::DeviceId;

/// Receiver of changed property values.
///
/// Implementations are called from whichever thread delivered the MQTT
/// message and must be safe to call concurrently.
pub trait ValueUpdateSink: Send + Sync {
    /// Called once per value transition.
    fn set_value(&self, update: &ValueUpdate);

    /// Called the first time a message from a device is seen.
    fn device_discovered(&self, device_id: &DeviceId) {
        let _ = device_id;
    }
}

impl<F> ValueUpdateSink for F
where
    F: Fn(&ValueUpdate) + Send + Sync,
{
    fn set_value(&self, update: &ValueUpdate) {
        self(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ValueKind;
    use crate::types::ShellyDeviceType;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn closure_is_a_sink() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sink: Arc<dyn ValueUpdateSink> = Arc::new(move |_: &ValueUpdate| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let device = DeviceId::new("A1", ShellyDeviceType::Shelly1);
        sink.device_discovered(&device);
        sink.set_value(&ValueUpdate::now(
            device.property("0"),
            ValueKind::RelayState,
            true,
            "A1: Relay0",
        ));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
