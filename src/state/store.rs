// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state of all observed device properties.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::types::DevicePropertyId;

use super::{PropertyCell, PropertyState, PropertyValue, ValueKind};

/// Key of one state slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    /// The property.
    pub property_id: DevicePropertyId,
    /// The channel within the property.
    pub kind: ValueKind,
}

impl StateKey {
    /// Creates a new state key.
    #[must_use]
    pub fn new(property_id: DevicePropertyId, kind: ValueKind) -> Self {
        Self { property_id, kind }
    }
}

/// Last-known values of all observed properties.
///
/// Slots are created lazily on the first value and live as long as the
/// store. The map lock is held only to find or insert a slot; the
/// comparison itself runs under the slot's own lock, so unrelated
/// properties never wait on each other's updates.
#[derive(Debug, Default)]
pub struct StateStore {
    slots: RwLock<HashMap<StateKey, Arc<PropertyCell<PropertyValue>>>>,
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value and reports whether it changed.
    ///
    /// The first value of a slot always counts as a change.
    pub fn set_value(
        &self,
        key: &StateKey,
        value: PropertyValue,
        timestamp: DateTime<Utc>,
    ) -> bool {
        self.slot(key).set(value, timestamp)
    }

    /// Stores a value and runs `on_change` under the slot lock if it changed.
    ///
    /// See [`PropertyCell::set_then`].
    pub fn set_value_then<F>(
        &self,
        key: &StateKey,
        value: PropertyValue,
        timestamp: DateTime<Utc>,
        on_change: F,
    ) -> bool
    where
        F: FnOnce(&PropertyState<PropertyValue>),
    {
        self.slot(key).set_then(value, timestamp, on_change)
    }

    /// Returns the current state of a slot.
    #[must_use]
    pub fn get(&self, key: &StateKey) -> Option<PropertyState<PropertyValue>> {
        let slot = self.slots.read().get(key).cloned();
        slot.and_then(|cell| cell.get())
    }

    /// Returns the number of slots with a known value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns `true` if no value has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn slot(&self, key: &StateKey) -> Arc<PropertyCell<PropertyValue>> {
        if let Some(cell) = self.slots.read().get(key) {
            return Arc::clone(cell);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}
