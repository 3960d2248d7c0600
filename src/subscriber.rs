// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entry point for inbound Shelly MQTT messages.
//!
//! [`ShellySubscriber::process_message`] runs the whole decode pipeline for
//! one message:
//!
//! 1. parse the topic, ignoring anything that is not a known Shelly device;
//! 2. announce devices seen for the first time to the sink;
//! 3. dispatch the payload to the processor registered for the device type;
//! 4. pass each decoded value through the change detector.
//!
//! Per-message failures are logged and the message dropped; nothing on this
//! path panics or returns an error to the transport.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, ParseError};
use crate::event::ValueUpdateSink;
use crate::processor::ProcessorRegistry;
use crate::state::ChangeDetector;
use crate::topic::TopicParser;
use crate::types::DeviceId;

/// Decodes Shelly messages and forwards changed values to a sink.
///
/// The subscriber is `Send + Sync`; the transport may call
/// [`process_message`](Self::process_message) from several threads at once.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use parking_lot::Mutex;
/// use shelly_mqtt::ShellySubscriber;
/// use shelly_mqtt::state::ValueUpdate;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink_seen = Arc::clone(&seen);
/// let subscriber = ShellySubscriber::builder(Arc::new(move |update: &ValueUpdate| {
///     sink_seen.lock().push(update.label.clone());
/// }))
/// .build()?;
///
/// subscriber.process_message("shellies/shellyht-E01234/sensor/temperature", Some(b"21.5"));
/// subscriber.process_message("shellies/shellyht-E01234/sensor/temperature", Some(b"21.5"));
///
/// assert_eq!(*seen.lock(), vec!["Temperature".to_string()]);
/// # Ok::<(), shelly_mqtt::Error>(())
/// ```
pub struct ShellySubscriber {
    parser: TopicParser,
    processors: ProcessorRegistry,
    detector: ChangeDetector,
    known_devices: RwLock<HashSet<DeviceId>>,
}

impl ShellySubscriber {
    /// Starts a subscriber forwarding changes to `sink`.
    #[must_use]
    pub fn builder(sink: Arc<dyn ValueUpdateSink>) -> ShellySubscriberBuilder {
        ShellySubscriberBuilder {
            sink,
            parser: None,
            processors: None,
        }
    }

    /// Returns the MQTT subscription filter covering all Shelly topics.
    #[must_use]
    pub fn topic_filter(&self) -> String {
        self.parser.topic_filter()
    }

    /// Returns the topic parser.
    #[must_use]
    pub fn parser(&self) -> &TopicParser {
        &self.parser
    }

    /// Returns the change detector holding the last known values.
    #[must_use]
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Returns the devices seen so far.
    #[must_use]
    pub fn known_devices(&self) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self.known_devices.read().iter().cloned().collect();
        devices.sort();
        devices
    }

    /// Processes one inbound message.
    ///
    /// A missing or empty payload (a cleared retained message) is ignored.
    /// Returns the number of changed values forwarded to the sink.
    pub fn process_message(&self, topic: &str, payload: Option<&[u8]>) -> usize {
        let Some(parsed) = self.parser.parse(topic) else {
            tracing::trace!(topic = %topic, "Ignoring unrecognised topic");
            return 0;
        };
        self.note_device(parsed.device_id());

        let Some(payload) = payload.filter(|p| !p.is_empty()) else {
            tracing::trace!(topic = %topic, "Ignoring empty payload");
            return 0;
        };
        let Ok(payload) = std::str::from_utf8(payload) else {
            tracing::warn!(topic = %topic, error = %ParseError::InvalidUtf8, "Dropping malformed payload");
            return 0;
        };

        let device_type = parsed.device_id().device_type();
        let Some(processor) = self.processors.processor_for(device_type) else {
            tracing::error!(
                topic = %topic,
                device = %parsed.device_id(),
                "No message processor for device type"
            );
            return 0;
        };

        tracing::debug!(
            topic = %topic,
            processor = processor.name(),
            payload = %payload,
            "Processing message"
        );
        let updates = match processor.process_message(&parsed, payload) {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(
                    topic = %topic,
                    device = %parsed.device_id(),
                    error = %e,
                    "Dropping malformed payload"
                );
                return 0;
            }
        };

        updates
            .into_iter()
            .filter(|update| self.detector.set_value(update.clone()))
            .count()
    }

    fn note_device(&self, device_id: &DeviceId) {
        if self.known_devices.read().contains(device_id) {
            return;
        }
        // Re-check under the write lock so concurrent first messages announce once
        if !self.known_devices.write().insert(device_id.clone()) {
            return;
        }
        tracing::info!(device = %device_id, "Discovered device");
        self.detector.sink().device_discovered(device_id);
    }
}

impl std::fmt::Debug for ShellySubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellySubscriber")
            .field("parser", &self.parser)
            .field("processors", &self.processors)
            .field("known_devices", &self.known_devices.read().len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ShellySubscriber`].
///
/// Without further configuration the subscriber understands every built-in
/// device type under the `shellies/` root.
pub struct ShellySubscriberBuilder {
    sink: Arc<dyn ValueUpdateSink>,
    parser: Option<TopicParser>,
    processors: Option<ProcessorRegistry>,
}

impl ShellySubscriberBuilder {
    /// Sets the topic parser.
    #[must_use]
    pub fn parser(mut self, parser: TopicParser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the processor registry.
    #[must_use]
    pub fn processors(mut self, processors: ProcessorRegistry) -> Self {
        self.processors = Some(processors);
        self
    }

    /// Builds the subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] if the default processor registry cannot
    /// be assembled.
    pub fn build(self) -> Result<ShellySubscriber, Error> {
        let processors = match self.processors {
            Some(processors) => processors,
            None => ProcessorRegistry::with_default_processors()?,
        };
        let parser = self.parser.unwrap_or_default();

        for device_type in parser.registry().types() {
            if processors.processor_for(*device_type).is_none() {
                tracing::warn!(device_type = %device_type, "Device type has no message processor");
            }
        }

        Ok(ShellySubscriber {
            parser,
            processors,
            detector: ChangeDetector::new(self.sink),
            known_devices: RwLock::new(HashSet::new()),
        })
    }
}
