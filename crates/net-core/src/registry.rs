//! Ordered registry of interface descriptors

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::ConfigError;
use crate::interface::InterfaceDescriptor;
use crate::Result;

/// Descriptors keyed by interface name, in insertion order
///
/// The `None` key holds the single default descriptor that unqualified
/// `ip=` forms apply to. No two descriptors share a name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorRegistry {
    descriptors: IndexMap<Option<String>, InterfaceDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name
    ///
    /// A descriptor whose key is already taken is rejected and dropped.
    pub fn insert(&mut self, descriptor: InterfaceDescriptor) -> Result<()> {
        match self.descriptors.entry(descriptor.name.clone()) {
            Entry::Occupied(entry) => Err(ConfigError::DuplicateInterface {
                name: entry.key().clone().unwrap_or_default(),
            }
            .into()),
            Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceDescriptor> {
        self.descriptors.get(&Some(name.to_string()))
    }

    pub fn get_default(&self) -> Option<&InterfaceDescriptor> {
        self.descriptors.get(&None)
    }

    /// Remove the default descriptor, keeping the order of the others
    pub fn take_default(&mut self) -> Option<InterfaceDescriptor> {
        self.descriptors.shift_remove(&None)
    }

    /// Put back a descriptor taken out for modification
    ///
    /// Restores the position it had before [`Self::take_default`] when given.
    pub fn restore(&mut self, descriptor: InterfaceDescriptor, index: Option<usize>) -> Result<()> {
        let len = self.descriptors.len();
        self.insert(descriptor)?;
        if let Some(index) = index.filter(|i| *i < len) {
            self.descriptors.move_index(len, index);
        }
        Ok(())
    }

    /// Position of the default descriptor
    pub fn default_index(&self) -> Option<usize> {
        self.descriptors.get_index_of(&None)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDescriptor> {
        self.descriptors.values()
    }

    /// Names of all named descriptors, in order
    pub fn names(&self) -> Vec<&str> {
        self.descriptors
            .keys()
            .filter_map(|key| key.as_deref())
            .collect()
    }

    /// Hand the descriptors over to a consumer
    pub fn into_descriptors(self) -> Vec<InterfaceDescriptor> {
        self.descriptors.into_values().collect()
    }
}

impl Serialize for DescriptorRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.descriptors.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::types::{LinkKind, Origin};

    fn descriptor(name: Option<&str>, filename: &str) -> InterfaceDescriptor {
        InterfaceDescriptor::new(
            name.map(str::to_string),
            LinkKind::Ethernet,
            Origin::cmdline(filename),
        )
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(Some("eth1"), "a")).unwrap();
        registry.insert(descriptor(None, "a")).unwrap();
        registry.insert(descriptor(Some("eth0"), "a")).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["eth1", "eth0"]);
        assert!(registry.get_default().is_some());
        assert!(registry.contains("eth0"));
        assert!(!registry.contains("eth2"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(Some("eth0"), "first")).unwrap();

        let result = registry.insert(descriptor(Some("eth0"), "second"));
        match result {
            Err(NetworkError::Configuration(ConfigError::DuplicateInterface { name })) => {
                assert_eq!(name, "eth0")
            }
            other => panic!("Expected DuplicateInterface error, got {:?}", other),
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("eth0").unwrap().origin.filename, "first");
    }

    #[test]
    fn test_take_and_restore_default() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(Some("eth0"), "a")).unwrap();
        registry.insert(descriptor(None, "a")).unwrap();
        registry.insert(descriptor(Some("eth1"), "a")).unwrap();

        let index = registry.default_index();
        assert_eq!(index, Some(1));

        let default = registry.take_default().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get_default().is_none());

        registry.restore(default, index).unwrap();
        assert_eq!(registry.default_index(), Some(1));
        assert_eq!(registry.names(), vec!["eth0", "eth1"]);
    }

    #[test]
    fn test_serialize_as_sequence() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(Some("eth0"), "a")).unwrap();
        registry.insert(descriptor(None, "a")).unwrap();

        let json = serde_json::to_value(&registry).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "eth0");
        assert!(list[1]["name"].is_null());
    }
}
