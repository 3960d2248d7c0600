// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known-value cell for a single property.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// The last observed value of a property and when it was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyState<T> {
    /// The observed value.
    pub value: T,
    /// When the value was observed.
    pub timestamp: DateTime<Utc>,
}

/// A property's last-value slot.
///
/// The slot is `Unknown` until the first value arrives, then `Known(value)`.
/// [`set`](Self::set) compares and replaces under one lock, so concurrent
/// producers for the same property can never both observe the same previous
/// value or leave a torn state behind.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use shelly_mqtt::state::PropertyCell;
///
/// let cell = PropertyCell::new();
/// assert!(cell.set(21.5, Utc::now()));   // first value
/// assert!(!cell.set(21.5, Utc::now()));  // same value
/// assert!(cell.set(22.0, Utc::now()));   // transition
/// ```
#[derive(Debug)]
pub struct PropertyCell<T> {
    last: Mutex<Option<PropertyState<T>>>,
}

impl<T: PartialEq + Clone> PropertyCell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Stores `value` if it differs from the current value.
    ///
    /// Returns `true` if the value changed (including the first value).
    /// An identical value leaves the stored state, timestamp included,
    /// untouched.
    pub fn set(&self, value: T, timestamp: DateTime<Utc>) -> bool {
        self.set_then(value, timestamp, |_| {})
    }

    /// Like [`set`](Self::set), but runs `on_change` with the new state
    /// before the cell is unlocked.
    ///
    /// Transitions of one cell are therefore observed by `on_change` in the
    /// order they were stored. `on_change` must not write to the same cell.
    pub fn set_then<F>(&self, value: T, timestamp: DateTime<Utc>, on_change: F) -> bool
    where
        F: FnOnce(&PropertyState<T>),
    {
        let mut last = self.last.lock();
        if last.as_ref().is_some_and(|state| state.value == value) {
            return false;
        }
        on_change(&*last.insert(PropertyState { value, timestamp }));
        true
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn get(&self) -> Option<PropertyState<T>> {
        self.last.lock().clone()
    }

    /// Returns `true` if no value has been observed yet.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.last.lock().is_none()
    }
}

impl<T: PartialEq + Clone> Default for PropertyCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn starts_unknown() {
        let cell: PropertyCell<bool> = PropertyCell::new();
        assert!(cell.is_unknown());
        assert!(cell.get().is_none());
    }

    #[test]
    fn first_value_is_change_even_if_falsy() {
        let cell = PropertyCell::new();
        assert!(cell.set(0.0, ts(1)));
        assert!(!cell.is_unknown());

        let cell = PropertyCell::new();
        assert!(cell.set(false, ts(1)));
    }

    #[test]
    fn identical_value_is_silent_and_keeps_timestamp() {
        let cell = PropertyCell::new();
        assert!(cell.set(5_i64, ts(1)));
        assert!(!cell.set(5_i64, ts(2)));
        assert_eq!(
            cell.get(),
            Some(PropertyState {
                value: 5,
                timestamp: ts(1)
            })
        );
    }

    #[test]
    fn different_value_replaces_wholesale() {
        let cell = PropertyCell::new();
        cell.set(5_i64, ts(1));
        assert!(cell.set(6_i64, ts(2)));
        assert_eq!(
            cell.get(),
            Some(PropertyState {
                value: 6,
                timestamp: ts(2)
            })
        );
    }

    #[test]
    fn set_then_runs_only_on_change() {
        let cell = PropertyCell::new();
        let mut seen = Vec::new();
        cell.set_then(1_i64, ts(1), |state| seen.push(state.value));
        cell.set_then(1_i64, ts(2), |state| seen.push(state.value));
        cell.set_then(2_i64, ts(3), |state| seen.push(state.value));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn set_then_sees_stored_state() {
        let cell = PropertyCell::new();
        let mut timestamp = None;
        cell.set_then(true, ts(7), |state| timestamp = Some(state.timestamp));
        assert_eq!(timestamp, Some(ts(7)));
    }

    #[test]
    fn return_to_previous_value_is_a_change() {
        let cell = PropertyCell::new();
        assert!(cell.set(true, ts(1)));
        assert!(cell.set(false, ts(2)));
        assert!(cell.set(true, ts(3)));
    }
}
