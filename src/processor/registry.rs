// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device type to processor dispatch table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::types::ShellyDeviceType;

use super::{
    DimmerProcessor, DoorWindowProcessor, HtProcessor, MessageProcessor, RpcProcessor,
    Shelly1Processor, SwitchProcessor,
};

/// Immutable mapping from device type to its message processor.
///
/// Built once at start-up through [`ProcessorRegistry::builder`] and shared
/// read-only afterwards.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::processor::{ProcessorRegistry, Shelly1Processor};
/// use shelly_mqtt::types::ShellyDeviceType;
///
/// let registry = ProcessorRegistry::builder()
///     .register(Shelly1Processor)?
///     .build();
///
/// assert!(registry.processor_for(ShellyDeviceType::Shelly1).is_some());
/// assert!(registry.processor_for(ShellyDeviceType::ShellyHt).is_none());
///
/// // A second processor for the same type is rejected.
/// assert!(ProcessorRegistry::builder()
///     .register(Shelly1Processor)?
///     .register(Shelly1Processor)
///     .is_err());
/// # Ok::<(), shelly_mqtt::error::RegistryError>(())
/// ```
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<ShellyDeviceType, Arc<dyn MessageProcessor>>,
}

impl ProcessorRegistry {
    /// Starts an empty registry.
    #[must_use]
    pub fn builder() -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::default()
    }

    /// Creates a registry with a processor for every supported device type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateProcessor`] if two built-in
    /// processors claim the same device type.
    pub fn with_default_processors() -> Result<Self, RegistryError> {
        Ok(Self::builder().register_defaults()?.build())
    }

    /// Returns the processor responsible for `device_type`.
    #[must_use]
    pub fn processor_for(&self, device_type: ShellyDeviceType) -> Option<&dyn MessageProcessor> {
        self.processors.get(&device_type).map(Arc::as_ref)
    }

    /// Returns the device types that have a processor.
    #[must_use]
    pub fn device_types(&self) -> Vec<ShellyDeviceType> {
        let mut types: Vec<_> = self.processors.keys().copied().collect();
        types.sort();
        types
    }

    /// Returns the number of registered device types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns `true` if no processor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for device_type in self.device_types() {
            if let Some(processor) = self.processors.get(&device_type) {
                map.entry(&device_type, &processor.name());
            }
        }
        map.finish()
    }
}

/// Builder for [`ProcessorRegistry`].
#[derive(Default)]
pub struct ProcessorRegistryBuilder {
    processors: HashMap<ShellyDeviceType, Arc<dyn MessageProcessor>>,
}

impl ProcessorRegistryBuilder {
    /// Registers a processor for all device types it supports.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateProcessor`] if one of the device
    /// types already has a processor.
    pub fn register<P>(self, processor: P) -> Result<Self, RegistryError>
    where
        P: MessageProcessor + 'static,
    {
        self.register_shared(Arc::new(processor))
    }

    /// Registers an already shared processor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateProcessor`] if one of the device
    /// types already has a processor.
    pub fn register_shared(
        mut self,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<Self, RegistryError> {
        let types = processor.supported_device_types();
        if let Some(taken) = types.iter().find(|ty| self.processors.contains_key(*ty)) {
            return Err(RegistryError::DuplicateProcessor(*taken));
        }
        for device_type in types {
            self.processors.insert(*device_type, Arc::clone(&processor));
        }
        Ok(self)
    }

    /// Registers the built-in processors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateProcessor`] if a built-in device
    /// type already has a processor.
    pub fn register_defaults(self) -> Result<Self, RegistryError> {
        self.register(Shelly1Processor)?
            .register(SwitchProcessor)?
            .register(DimmerProcessor)?
            .register(HtProcessor)?
            .register(DoorWindowProcessor)?
            .register(RpcProcessor)
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> ProcessorRegistry {
        ProcessorRegistry {
            processors: self.processors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::state::ValueUpdate;
    use crate::topic::ParsedTopic;

    struct FakeHt;

    impl MessageProcessor for FakeHt {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
            &[ShellyDeviceType::ShellyHt]
        }

        fn process_message(
            &self,
            _topic: &ParsedTopic,
            _payload: &str,
        ) -> Result<Vec<ValueUpdate>, ParseError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn defaults_cover_every_device_type() {
        let registry = ProcessorRegistry::with_default_processors().unwrap();
        assert_eq!(registry.len(), ShellyDeviceType::ALL.len());
        for device_type in ShellyDeviceType::ALL {
            assert!(registry.processor_for(device_type).is_some(), "{device_type}");
        }
    }

    #[test]
    fn shared_processor_serves_all_its_types() {
        let registry = ProcessorRegistry::builder()
            .register(DoorWindowProcessor)
            .unwrap()
            .build();
        let first = registry.processor_for(ShellyDeviceType::ShellyDoorWindow).unwrap();
        let second = registry.processor_for(ShellyDeviceType::ShellyDoorWindow2).unwrap();
        assert_eq!(first.name(), second.name());
    }

    #[test]
    fn duplicate_registration_fails() {
        let result = ProcessorRegistry::builder()
            .register_defaults()
            .unwrap()
            .register(FakeHt);
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateProcessor(ShellyDeviceType::ShellyHt))
        ));
    }

    #[test]
    fn custom_processor_is_dispatched() {
        let registry = ProcessorRegistry::builder()
            .register(FakeHt)
            .unwrap()
            .build();
        assert_eq!(registry.device_types(), vec![ShellyDeviceType::ShellyHt]);
        assert_eq!(
            registry
                .processor_for(ShellyDeviceType::ShellyHt)
                .map(|processor| processor.name()),
            Some("fake")
        );
    }

    #[test]
    fn empty_registry() {
        let registry = ProcessorRegistry::builder().build();
        assert!(registry.is_empty());
        assert!(registry.processor_for(ShellyDeviceType::Shelly1).is_none());
    }
}
