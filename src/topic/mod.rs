// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly MQTT topic parsing.
//!
//! Shelly devices publish on topics of the form
//! `shellies/<prefix>-<id>/<property type>/<rest>`. Three shapes occur:
//!
//! ```text
//! shellies/shelly1-E01234/relay/0            indexed, sub-path "0"
//! shellies/shellydimmer-E0/light/0/status    indexed, sub-path "0/status"
//! shellies/shellyht-E01234/sensor/humidity   un-indexed, sub-path "humidity"
//! shellies/shelly1minig3-X/events/rpc        RPC, sub-path ""
//! ```
//!
//! The [`TopicParser`] turns such a topic into a [`ParsedTopic`];
//! [`property_key`] derives the property identity from the sub-path.

mod parser;

pub use parser::{DEFAULT_ROOT_TOPIC, ParsedTopic, TopicForm, TopicParser};

/// Derives the local property key from a sub-path.
///
/// Absent or empty sub-paths yield no key. Otherwise the first `/`-separated
/// segment is the key; anything after it is routing context for the message
/// processor and not part of the property identity.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::topic::property_key;
///
/// assert_eq!(property_key(Some("temperature")), Some("temperature"));
/// assert_eq!(property_key(Some("0/temperature")), Some("0"));
/// assert_eq!(property_key(Some("")), None);
/// assert_eq!(property_key(None), None);
/// ```
#[must_use]
pub fn property_key(sub_path: Option<&str>) -> Option<&str> {
    let sub_path = sub_path?;
    let key = sub_path.split_once('/').map_or(sub_path, |(first, _)| first);
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_indexed_share_key() {
        assert_eq!(property_key(Some("0")), property_key(Some("0/temperature")));
    }

    #[test]
    fn deep_sub_path_keeps_first_segment() {
        assert_eq!(property_key(Some("0/status/extra")), Some("0"));
    }

    #[test]
    fn empty_first_segment_yields_no_key() {
        assert_eq!(property_key(Some("/x")), None);
    }
}
