// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly topic grammar.

use crate::types::{DeviceId, DevicePropertyId, DeviceTypeRegistry};

use super::property_key;

/// Default root of all Shelly topics.
pub const DEFAULT_ROOT_TOPIC: &str = "shellies/";

/// Property type under which RPC capable devices publish their events.
const RPC_PROPERTY_TYPE: &str = "events";

/// First remainder segment of the RPC event channel.
const RPC_SEGMENT: &str = "rpc";

/// Property types that are addressed by name and never carry an index.
const DEFAULT_UNINDEXED_PROPERTY_TYPES: [&str; 1] = ["sensor"];

/// Which grammar variant matched a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicForm {
    /// `<root>/<prefix>-<id>/events/rpc[/<suffix>]`.
    Rpc,
    /// `<root>/<prefix>-<id>/<type>/<index>[/<rest>]`.
    Indexed {
        /// The numeric index segment, verbatim.
        index: String,
    },
    /// `<root>/<prefix>-<id>/<type>/<name>`.
    Named,
}

/// The normalized identity of a Shelly topic.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::topic::{TopicForm, TopicParser};
/// use shelly_mqtt::types::ShellyDeviceType;
///
/// let parser = TopicParser::default();
/// let parsed = parser.parse("shellies/shellyswitch25-E01234/roller/0/pos").unwrap();
///
/// assert_eq!(parsed.device_id().external_id(), "E01234");
/// assert_eq!(parsed.device_id().device_type(), ShellyDeviceType::Shelly25);
/// assert_eq!(parsed.property_type(), "roller");
/// assert_eq!(parsed.sub_path(), "0/pos");
/// assert_eq!(parsed.facet(), Some("pos"));
/// assert_eq!(parsed.form(), &TopicForm::Indexed { index: "0".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopic {
    device_id: DeviceId,
    property_type: String,
    sub_path: String,
    form: TopicForm,
}

impl ParsedTopic {
    /// Returns the device that published the message.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the property class segment (`relay`, `sensor`, `roller`, ...).
    #[must_use]
    pub fn property_type(&self) -> &str {
        &self.property_type
    }

    /// Returns everything after the property type.
    ///
    /// For the RPC form this is the suffix after `rpc`, which is empty when
    /// the topic ends at `rpc`.
    #[must_use]
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Returns the grammar variant that matched.
    #[must_use]
    pub fn form(&self) -> &TopicForm {
        &self.form
    }

    /// Returns the local property key derived from the sub-path.
    #[must_use]
    pub fn property_key(&self) -> Option<&str> {
        property_key(Some(&self.sub_path))
    }

    /// Returns the property id derived from the sub-path.
    #[must_use]
    pub fn property_id(&self) -> Option<DevicePropertyId> {
        self.property_key().map(|key| self.device_id.property(key))
    }

    /// Returns the part of the sub-path after the property key.
    ///
    /// `0/pos` yields `pos`, `0` and `temperature` yield `None`.
    #[must_use]
    pub fn facet(&self) -> Option<&str> {
        self.sub_path
            .split_once('/')
            .map(|(_, facet)| facet)
            .filter(|facet| !facet.is_empty())
    }
}

/// Parses Shelly topics against a [`DeviceTypeRegistry`].
///
/// The parser is immutable and can be shared between threads.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::topic::TopicParser;
///
/// let parser = TopicParser::default();
///
/// // RPC channel itself: present but empty
/// assert_eq!(
///     parser.sub_topic_of("shellies/shelly1minig3-X/events/rpc").as_deref(),
///     Some("")
/// );
/// // Unknown device family: absent
/// assert_eq!(parser.sub_topic_of("shellies/tasmota-X/relay/0"), None);
/// ```
#[derive(Debug, Clone)]
pub struct TopicParser {
    root: String,
    registry: DeviceTypeRegistry,
    unindexed_property_types: Vec<String>,
}

impl TopicParser {
    /// Creates a parser for the default `shellies/` root.
    #[must_use]
    pub fn new(registry: DeviceTypeRegistry) -> Self {
        Self {
            root: DEFAULT_ROOT_TOPIC.to_string(),
            registry,
            unindexed_property_types: DEFAULT_UNINDEXED_PROPERTY_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Sets the root topic. A trailing `/` is added if missing.
    ///
    /// An empty root matches topics that start directly with the device
    /// segment, e.g. `shellyht-E01234/sensor/temperature`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        let mut root = root.into();
        if !root.is_empty() && !root.ends_with('/') {
            root.push('/');
        }
        self.root = root;
        self
    }

    /// Adds a property type that is always parsed with the un-indexed form.
    #[must_use]
    pub fn with_unindexed_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.unindexed_property_types.push(property_type.into());
        self
    }

    /// Returns the root topic, including the trailing `/`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the device type registry used for prefix lookups.
    #[must_use]
    pub fn registry(&self) -> &DeviceTypeRegistry {
        &self.registry
    }

    /// Returns the subscription filter covering the whole family.
    #[must_use]
    pub fn topic_filter(&self) -> String {
        format!("{}#", self.root)
    }

    /// Parses a topic.
    ///
    /// Returns `None` if the topic does not belong to a registered Shelly
    /// device or matches none of the grammar variants.
    #[must_use]
    pub fn parse(&self, topic: &str) -> Option<ParsedTopic> {
        let (device_id, property_type, remainder) = self.split_header(topic)?;
        let (form, sub_path) = self.match_remainder(property_type, remainder)?;
        Some(ParsedTopic {
            device_id,
            property_type: property_type.to_string(),
            sub_path,
            form,
        })
    }

    /// Extracts the device id from a topic.
    #[must_use]
    pub fn device_id_from_topic(&self, topic: &str) -> Option<DeviceId> {
        self.split_header(topic).map(|(device_id, _, _)| device_id)
    }

    /// Extracts the property type segment from a topic.
    #[must_use]
    pub fn device_property_type<'t>(&self, topic: &'t str) -> Option<&'t str> {
        self.split_header(topic)
            .map(|(_, property_type, _)| property_type)
    }

    /// Extracts the sub-path of a topic.
    ///
    /// Distinguishes a present-but-empty sub-path (`Some("")`, the RPC
    /// channel itself) from a topic that does not parse at all (`None`).
    #[must_use]
    pub fn sub_topic_of(&self, topic: &str) -> Option<String> {
        self.parse(topic).map(|parsed| parsed.sub_path)
    }

    /// Extracts the device property id from a topic.
    #[must_use]
    pub fn device_property_id_from_topic(&self, topic: &str) -> Option<DevicePropertyId> {
        self.parse(topic).and_then(|parsed| parsed.property_id())
    }

    /// Builds the state topic of a property, e.g. `shellies/shelly1-X/relay/0`.
    ///
    /// Uses the canonical topic prefix of the device type regardless of
    /// whether the type is part of this parser's registry.
    #[must_use]
    pub fn create_topic(&self, property_id: &DevicePropertyId, property_type: &str) -> String {
        let device_id = property_id.device_id();
        format!(
            "{}{}{}/{}/{}",
            self.root,
            device_id.device_type().topic_prefix(),
            device_id.external_id(),
            property_type,
            property_id.local_key()
        )
    }

    /// Builds the command topic of a property, e.g. `shellies/shelly1-X/relay/0/command`.
    #[must_use]
    pub fn create_command_topic(
        &self,
        property_id: &DevicePropertyId,
        property_type: &str,
    ) -> String {
        format!("{}/command", self.create_topic(property_id, property_type))
    }

    /// Builds the RPC request topic of a device, e.g. `shellies/shelly1minig3-X/rpc`.
    #[must_use]
    pub fn create_rpc_topic(&self, device_id: &DeviceId) -> String {
        format!(
            "{}{}{}/{RPC_SEGMENT}",
            self.root,
            device_id.device_type().topic_prefix(),
            device_id.external_id()
        )
    }

    /// Splits `<root><prefix>-<id>/<type>/<remainder>`.
    fn split_header<'t>(&self, topic: &'t str) -> Option<(DeviceId, &'t str, &'t str)> {
        let rest = topic.strip_prefix(self.root.as_str())?;
        let (device_segment, rest) = rest.split_once('/')?;

        // External ids never contain `-`, wire prefixes may not either.
        let (prefix, external_id) = device_segment.rsplit_once('-')?;
        if prefix.is_empty() || !is_word(external_id) {
            tracing::trace!(topic = %topic, "Malformed device segment");
            return None;
        }

        let Some(device_type) = self.registry.by_prefix(prefix) else {
            tracing::trace!(topic = %topic, prefix = %prefix, "Unknown device type prefix");
            return None;
        };

        let (property_type, remainder) = rest.split_once('/')?;
        if !is_word(property_type) {
            return None;
        }

        Some((
            DeviceId::new(external_id, device_type),
            property_type,
            remainder,
        ))
    }

    /// Applies the RPC, indexed and un-indexed patterns in that order.
    fn match_remainder(&self, property_type: &str, remainder: &str) -> Option<(TopicForm, String)> {
        if property_type == RPC_PROPERTY_TYPE {
            if remainder == RPC_SEGMENT {
                return Some((TopicForm::Rpc, String::new()));
            }
            if let Some(suffix) = remainder
                .strip_prefix(RPC_SEGMENT)
                .and_then(|s| s.strip_prefix('/'))
            {
                return Some((TopicForm::Rpc, suffix.to_string()));
            }
        }

        if !self.is_unindexed(property_type) {
            let (index, rest) = remainder.split_once('/').unwrap_or((remainder, ""));
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                let sub_path = if rest.is_empty() {
                    index.to_string()
                } else {
                    format!("{index}/{rest}")
                };
                return Some((
                    TopicForm::Indexed {
                        index: index.to_string(),
                    },
                    sub_path,
                ));
            }
        }

        if remainder.is_empty() {
            return None;
        }
        Some((TopicForm::Named, remainder.to_string()))
    }

    fn is_unindexed(&self, property_type: &str) -> bool {
        self.unindexed_property_types
            .iter()
            .any(|t| t == property_type)
    }
}

impl Default for TopicParser {
    fn default() -> Self {
        Self::new(DeviceTypeRegistry::default())
    }
}

/// Returns `true` for a non-empty run of `[A-Za-z0-9_]`.
fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShellyDeviceType;

    fn parser() -> TopicParser {
        TopicParser::default()
    }

    fn device(id: &str, ty: ShellyDeviceType) -> DeviceId {
        DeviceId::new(id, ty)
    }

    #[test]
    fn extract_device_property_id() {
        let p = parser();
        assert_eq!(
            p.device_property_id_from_topic("shellies/shellyht-E01234/sensor/temperature"),
            Some(device("E01234", ShellyDeviceType::ShellyHt).property("temperature"))
        );
        assert_eq!(
            p.device_property_id_from_topic("shellies/shellyht-E01234/relay/0/temperature"),
            Some(device("E01234", ShellyDeviceType::ShellyHt).property("0"))
        );
        assert_eq!(
            p.device_property_id_from_topic("shellies/shelly1-E01234/relay/0"),
            Some(device("E01234", ShellyDeviceType::Shelly1).property("0"))
        );
        assert_eq!(
            p.device_property_id_from_topic("shellies/shellyswitch25-E01234/roller/0/pos"),
            Some(device("E01234", ShellyDeviceType::Shelly25).property("0"))
        );
        assert_eq!(
            p.device_property_id_from_topic("shellies/shellyswitch-E01234/roller/0/pos"),
            Some(device("E01234", ShellyDeviceType::Shelly2).property("0"))
        );
    }

    #[test]
    fn extract_device_id() {
        assert_eq!(
            parser().device_id_from_topic("shellies/shellyht-E01234/sensor/temperature"),
            Some(device("E01234", ShellyDeviceType::ShellyHt))
        );
    }

    #[test]
    fn extract_property_type() {
        assert_eq!(
            parser().device_property_type("shellies/shellydimmer-ABC/light/0/status"),
            Some("light")
        );
    }

    #[test]
    fn indexed_sub_path_keeps_index_and_rest() {
        assert_eq!(
            parser()
                .sub_topic_of("shellies/shellyht-E01234/relay/0/temperature")
                .as_deref(),
            Some("0/temperature")
        );
    }

    #[test]
    fn indexed_sub_path_without_rest_is_index() {
        let parsed = parser().parse("shellies/shelly1-E01234/relay/0").unwrap();
        assert_eq!(parsed.sub_path(), "0");
        assert_eq!(
            parsed.form(),
            &TopicForm::Indexed {
                index: "0".to_string()
            }
        );
        assert_eq!(parsed.facet(), None);
    }

    #[test]
    fn named_sub_path_is_verbatim() {
        let parsed = parser()
            .parse("shellies/shellyht-E01234/sensor/temperature")
            .unwrap();
        assert_eq!(parsed.sub_path(), "temperature");
        assert_eq!(parsed.form(), &TopicForm::Named);
    }

    #[test]
    fn sensor_family_never_indexed() {
        let parsed = parser().parse("shellies/shellyht-E01234/sensor/0").unwrap();
        assert_eq!(parsed.form(), &TopicForm::Named);
        assert_eq!(parsed.sub_path(), "0");
    }

    #[test]
    fn numeric_first_segment_is_index() {
        let parsed = parser()
            .parse("shellies/shellyswitch25-E01234/relay/1/power")
            .unwrap();
        assert_eq!(
            parsed.form(),
            &TopicForm::Indexed {
                index: "1".to_string()
            }
        );
        assert_eq!(parsed.property_key(), Some("1"));
        assert_eq!(parsed.facet(), Some("power"));
    }

    #[test]
    fn rpc_without_suffix_is_present_but_empty() {
        let p = parser();
        let parsed = p.parse("shellies/shelly1minig3-X/events/rpc").unwrap();
        assert_eq!(parsed.form(), &TopicForm::Rpc);
        assert_eq!(parsed.sub_path(), "");
        assert_eq!(parsed.property_key(), None);
        assert_eq!(
            p.sub_topic_of("shellies/shelly1minig3-X/events/rpc").as_deref(),
            Some("")
        );
    }

    #[test]
    fn rpc_suffix_is_verbatim() {
        let p = parser();
        assert_eq!(
            p.sub_topic_of("shellies/shelly1minig3-X/events/rpc/response")
                .as_deref(),
            Some("response")
        );
        assert_eq!(
            p.sub_topic_of("shellies/shelly1minig3-X/events/rpc/a/b/c")
                .as_deref(),
            Some("a/b/c")
        );
    }

    #[test]
    fn rpc_like_segment_is_not_rpc() {
        let parsed = parser()
            .parse("shellies/shelly1minig3-X/events/rpcx")
            .unwrap();
        assert_eq!(parsed.form(), &TopicForm::Named);
        assert_eq!(parsed.sub_path(), "rpcx");
    }

    #[test]
    fn non_matching_topic_is_absent() {
        let p = parser();
        assert_eq!(p.sub_topic_of("shellies/tasmota-E01234/relay/0"), None);
        assert_eq!(p.sub_topic_of("tele/shelly1-E01234/relay/0"), None);
        assert_eq!(p.sub_topic_of("shellies/shelly1-E01234/relay"), None);
        assert_eq!(p.sub_topic_of("shellies/shelly1-E01234/relay/"), None);
        assert_eq!(p.sub_topic_of("shellies/shelly1/relay/0"), None);
        assert_eq!(p.sub_topic_of("shellies/-E01234/relay/0"), None);
        assert_eq!(p.sub_topic_of("shellies/announce"), None);
    }

    #[test]
    fn prefix_split_on_last_dash() {
        let parsed = parser()
            .parse("shellies/shelly1minig3-543204547478/events/rpc")
            .unwrap();
        assert_eq!(parsed.device_id().external_id(), "543204547478");
        assert_eq!(
            parsed.device_id().device_type(),
            ShellyDeviceType::Shelly1MiniGen3
        );
    }

    #[test]
    fn longer_prefixes_resolve_exactly() {
        let p = parser();
        let ty = |topic: &str| p.device_id_from_topic(topic).map(|d| d.device_type());
        assert_eq!(ty("shellies/shellydw-A/sensor/state"), Some(ShellyDeviceType::ShellyDoorWindow));
        assert_eq!(ty("shellies/shellydw2-A/sensor/state"), Some(ShellyDeviceType::ShellyDoorWindow2));
        assert_eq!(ty("shellies/shellydimmer-A/light/0"), Some(ShellyDeviceType::ShellyDimmer));
        assert_eq!(ty("shellies/shellydimmer2-A/light/0"), Some(ShellyDeviceType::ShellyDimmer2));
    }

    #[test]
    fn restricted_registry_rejects_other_types() {
        let registry = DeviceTypeRegistry::new([ShellyDeviceType::ShellyHt]).unwrap();
        let p = TopicParser::new(registry);
        assert!(p.parse("shellies/shelly1-E01234/relay/0").is_none());
        assert!(p.parse("shellies/shellyht-E01234/sensor/humidity").is_some());
    }

    #[test]
    fn custom_root() {
        let p = TopicParser::default().with_root("home/shelly");
        assert_eq!(p.root(), "home/shelly/");
        assert_eq!(p.topic_filter(), "home/shelly/#");
        assert!(p.parse("home/shelly/shelly1-E01234/relay/0").is_some());
        assert!(p.parse("shellies/shelly1-E01234/relay/0").is_none());
    }

    #[test]
    fn empty_root() {
        let p = TopicParser::default().with_root("");
        assert_eq!(p.root(), "");
        assert_eq!(p.topic_filter(), "#");

        let parsed = p.parse("shellyht-E01234/sensor/temperature").unwrap();
        assert_eq!(parsed.device_id().external_id(), "E01234");
        assert_eq!(parsed.sub_path(), "temperature");
        assert!(p.parse("/shellyht-E01234/sensor/temperature").is_none());

        let property = device("X", ShellyDeviceType::Shelly1).property("0");
        assert_eq!(p.create_command_topic(&property, "relay"), "shelly1-X/relay/0/command");
    }

    #[test]
    fn custom_unindexed_family() {
        let p = TopicParser::default().with_unindexed_property_type("input_event");
        let parsed = p
            .parse("shellies/shelly1-E01234/input_event/0")
            .unwrap();
        assert_eq!(parsed.form(), &TopicForm::Named);
    }

    #[test]
    fn default_topic_filter() {
        assert_eq!(parser().topic_filter(), "shellies/#");
    }

    #[test]
    fn create_topics() {
        let p = parser();
        let property = device("E01234", ShellyDeviceType::Shelly25).property("0");
        assert_eq!(
            p.create_topic(&property, "roller"),
            "shellies/shellyswitch25-E01234/roller/0"
        );
        assert_eq!(
            p.create_command_topic(&property, "roller"),
            "shellies/shellyswitch25-E01234/roller/0/command"
        );
        assert_eq!(
            p.create_rpc_topic(&device("X", ShellyDeviceType::Shelly1MiniGen3)),
            "shellies/shelly1minig3-X/rpc"
        );
    }

    #[test]
    fn created_topic_parses_back() {
        let p = parser();
        let property = device("E01234", ShellyDeviceType::Shelly1).property("0");
        let topic = p.create_topic(&property, "relay");
        assert_eq!(p.device_property_id_from_topic(&topic), Some(property));
    }
}
