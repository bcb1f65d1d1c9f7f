//! VLAN link configuration

use serde::Serialize;

use crate::error::ConfigError;
use crate::interface::InterfaceDescriptor;
use crate::Result;

/// Valid 802.1Q tag range
pub const VLAN_TAG_RANGE: std::ops::RangeInclusive<u16> = 1..=4094;

/// VLAN-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanConfig {
    /// Parent interface
    pub parent: String,
    /// VLAN tag
    pub tag: u16,
    /// VLAN protocol (802.1Q or 802.1ad)
    pub protocol: VlanProtocol,
}

/// VLAN protocol types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum VlanProtocol {
    /// 802.1Q (standard VLAN)
    #[default]
    #[serde(rename = "802.1Q")]
    Ieee8021Q,
    /// 802.1ad (QinQ/Provider Bridge)
    #[serde(rename = "802.1ad")]
    Ieee8021Ad,
}

impl std::fmt::Display for VlanProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VlanProtocol::Ieee8021Q => write!(f, "802.1Q"),
            VlanProtocol::Ieee8021Ad => write!(f, "802.1ad"),
        }
    }
}

impl VlanConfig {
    /// Create new VLAN configuration
    pub fn new(parent: String, tag: u16) -> Self {
        Self {
            parent,
            tag,
            protocol: VlanProtocol::default(),
        }
    }

    /// Set VLAN protocol
    pub fn with_protocol(mut self, protocol: VlanProtocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// VLAN helper operations
pub struct VlanManager;

impl VlanManager {
    /// Validate a VLAN tag
    pub fn validate_tag(tag: u16) -> Result<()> {
        if !VLAN_TAG_RANGE.contains(&tag) {
            return Err(ConfigError::invalid_value("vlan_tag", tag.to_string()).into());
        }
        Ok(())
    }

    /// Derive the VLAN tag from a VLAN interface name
    ///
    /// A `name.TAG` suffix wins; otherwise the trailing digit run of the
    /// name is used, so both `eth0.100` and `vlan100` yield 100.
    pub fn extract_tag(name: &str) -> Result<u16> {
        let invalid = || ConfigError::InvalidVlanTag {
            name: name.to_string(),
        };

        let digits = match name.rsplit_once('.') {
            Some((_, suffix)) => suffix,
            None => {
                let start = name
                    .char_indices()
                    .rev()
                    .take_while(|(_, c)| c.is_ascii_digit())
                    .last()
                    .map(|(i, _)| i)
                    .ok_or_else(invalid)?;
                &name[start..]
            }
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid().into());
        }

        let tag = digits.parse::<u16>().map_err(|_| invalid())?;
        Self::validate_tag(tag)?;
        Ok(tag)
    }

    /// Check if descriptor is a VLAN
    pub fn is_vlan(descriptor: &InterfaceDescriptor) -> bool {
        descriptor.vlan.is_some()
    }

    /// Get VLAN parent from descriptor
    pub fn get_parent(descriptor: &InterfaceDescriptor) -> Option<&str> {
        descriptor.vlan.as_ref().map(|vlan| vlan.parent.as_str())
    }

    /// Get VLAN tag from descriptor
    pub fn get_tag(descriptor: &InterfaceDescriptor) -> Option<u16> {
        descriptor.vlan.as_ref().map(|vlan| vlan.tag)
    }
}
