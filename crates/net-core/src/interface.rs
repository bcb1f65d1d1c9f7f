//! Interface descriptors and name validation

use std::net::IpAddr;

use mac_address::MacAddress;
use serde::Serialize;

use crate::bond::BondConfig;
use crate::bridge::BridgeConfig;
use crate::error::ConfigError;
use crate::team::TeamConfig;
use crate::types::{
    AddrconfMethod, Addressing, LinkControl, LinkKind, Origin, StaticAddress,
};
use crate::vlan::VlanConfig;
use crate::Result;

/// Maximum interface name length, IFNAMSIZ without the terminator
pub const IFNAME_MAX_LEN: usize = 15;

/// Desired configuration of one network interface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceDescriptor {
    pub name: Option<String>,
    pub origin: Origin,
    pub kind: LinkKind,
    pub addressing: Addressing,
    pub dhcp4: AddrconfMethod,
    pub dhcp6: AddrconfMethod,
    pub auto6: AddrconfMethod,
    pub static_addresses: Vec<StaticAddress>,
    pub gateway: Option<IpAddr>,
    pub hostname: Option<String>,
    pub mtu: Option<u32>,
    pub macaddr: Option<MacAddress>,
    pub dns_servers: Vec<IpAddr>,
    pub link_control: LinkControl,
    pub firewall_enabled: bool,
    pub vlan: Option<VlanConfig>,
    pub bond: Option<BondConfig>,
    pub team: Option<TeamConfig>,
    pub bridge: Option<BridgeConfig>,
}

impl InterfaceDescriptor {
    /// Create a descriptor with the fixed link-control and firewall defaults
    pub fn new(name: Option<String>, kind: LinkKind, origin: Origin) -> Self {
        Self {
            name,
            origin,
            kind,
            addressing: Addressing::default(),
            dhcp4: AddrconfMethod::default(),
            dhcp6: AddrconfMethod::default(),
            auto6: AddrconfMethod::default(),
            static_addresses: Vec::new(),
            gateway: None,
            hostname: None,
            mtu: None,
            macaddr: None,
            dns_servers: Vec::new(),
            link_control: LinkControl::default(),
            firewall_enabled: true,
            vlan: None,
            bond: None,
            team: None,
            bridge: None,
        }
    }

    /// Descriptor for a named interface, validating the name first
    pub fn named(name: &str, kind: LinkKind, origin: Origin) -> Result<Self> {
        InterfaceValidator::validate_name(name)?;
        Ok(Self::new(Some(name.to_string()), kind, origin))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Append a static address and enable its family
    pub fn add_static_address(&mut self, address: StaticAddress) {
        self.addressing.enable(address.family);
        self.static_addresses.push(address);
    }

    /// Whether any dynamic address configuration is enabled
    pub fn has_dynamic_addrconf(&self) -> bool {
        self.dhcp4.enabled || self.dhcp6.enabled || self.auto6.enabled
    }
}

/// Interface validation functions
pub struct InterfaceValidator;

impl InterfaceValidator {
    /// Validate an interface name
    ///
    /// Rejects empty and over-long names, `.` and `..`, and anything outside
    /// alphanumerics and `_ - . +`, which keeps control characters and shell
    /// metacharacters out of descriptors.
    pub fn validate_name(name: &str) -> Result<()> {
        let invalid = || ConfigError::InvalidInterfaceName {
            name: name.to_string(),
        };

        if name.is_empty() || name.len() > IFNAME_MAX_LEN {
            return Err(invalid().into());
        }

        if name == "." || name == ".." {
            return Err(invalid().into());
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
        {
            return Err(invalid().into());
        }

        Ok(())
    }
}
