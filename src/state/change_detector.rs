// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publish-on-change gate in front of the value update sink.

use std::sync::Arc;

use crate::event::ValueUpdateSink;

use super::{StateKey, StateStore, ValueUpdate};

/// Forwards value updates to a sink only when the value actually changed.
///
/// At most one notification is produced per transition; repeated identical
/// readings never reach the sink.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use shelly_mqtt::state::{ChangeDetector, ValueKind, ValueUpdate};
/// use shelly_mqtt::types::{DeviceId, ShellyDeviceType};
///
/// let count = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&count);
/// let detector = ChangeDetector::new(Arc::new(move |_: &ValueUpdate| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// let property = DeviceId::new("E01234", ShellyDeviceType::ShellyHt).property("temperature");
/// let reading = ValueUpdate::now(property, ValueKind::Temperature, 21.5, "Temperature");
///
/// assert!(detector.set_value(reading.clone()));
/// assert!(!detector.set_value(reading));
/// assert_eq!(count.load(Ordering::SeqCst), 1);
/// ```
pub struct ChangeDetector {
    store: StateStore,
    sink: Arc<dyn ValueUpdateSink>,
}

impl ChangeDetector {
    /// Creates a change detector with an empty store.
    #[must_use]
    pub fn new(sink: Arc<dyn ValueUpdateSink>) -> Self {
        Self {
            store: StateStore::new(),
            sink,
        }
    }

    /// Applies an update and forwards it to the sink if the value changed.
    ///
    /// The sink is called while the property's slot is locked, so the sink
    /// sees the transitions of one property in store order and its last value
    /// always matches the store. A sink must not feed updates back into the
    /// detector from within [`ValueUpdateSink::set_value`].
    ///
    /// Returns `true` if the sink was notified.
    pub fn set_value(&self, update: ValueUpdate) -> bool {
        let key = StateKey::new(update.property_id.clone(), update.kind);
        let changed = self
            .store
            .set_value_then(&key, update.value, update.timestamp, |_| {
                tracing::debug!(
                    property = %update.property_id,
                    kind = %update.kind,
                    value = %update.value,
                    "Value changed"
                );
                self.sink.set_value(&update);
            });

        if !changed {
            tracing::trace!(
                property = %update.property_id,
                kind = %update.kind,
                value = %update.value,
                "Value unchanged"
            );
        }
        changed
    }

    /// Returns the underlying state store.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Returns the sink updates are forwarded to.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn ValueUpdateSink> {
        &self.sink
    }
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("tracked", &self.store.len())
            .finish_non_exhaustive()
    }
}
