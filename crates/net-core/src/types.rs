//! Core types shared by interface descriptors

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use ipnet::IpNet;
use serde::Serialize;

use crate::error::ConfigError;

/// Provenance source recorded on every descriptor built from a cmdline
pub const ORIGIN_SOURCE: &str = "dracut:cmdline";

/// Link wait timeout applied to every new descriptor (seconds)
pub const DEFAULT_LINK_TIMEOUT: u32 = 30;

/// DHCPv4 defer timeout requested by `ip=dhcp` (seconds)
pub const DHCP4_DEFER_TIMEOUT: u32 = 15;

/// Three-valued flag: unset, explicitly on, explicitly off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    #[default]
    Unset,
    True,
    False,
}

impl Tristate {
    pub fn set(&mut self, value: bool) {
        *self = Tristate::from(value);
    }

    pub fn is_set(&self) -> bool {
        *self != Tristate::Unset
    }

    pub fn is_true(&self) -> bool {
        *self == Tristate::True
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tristate::Unset => None,
            Tristate::True => Some(true),
            Tristate::False => Some(false),
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::True
        } else {
            Tristate::False
        }
    }
}

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// Prefix length of a single host address
    pub fn host_prefix(&self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "ipv4"),
            AddressFamily::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Settings an address configuration lease is allowed to update
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateFlag {
    DefaultRoute,
    Hostname,
    Dns,
    Ntp,
    Smb,
    Nis,
}

/// Per-family enable flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Addressing {
    pub ipv4_enabled: Tristate,
    pub ipv6_enabled: Tristate,
    pub arp_verify: Tristate,
}

impl Addressing {
    pub fn enable(&mut self, family: AddressFamily) {
        match family {
            AddressFamily::Ipv4 => self.ipv4_enabled.set(true),
            AddressFamily::Ipv6 => self.ipv6_enabled.set(true),
        }
    }
}

/// One dynamic address configuration method (DHCPv4, DHCPv6, autoconf)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddrconfMethod {
    pub enabled: bool,
    pub update: BTreeSet<UpdateFlag>,
    pub defer_timeout: u32,
    pub hostname: Option<String>,
}

/// Where a descriptor came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub source: String,
    pub filename: String,
}

impl Origin {
    /// Origin of a descriptor read from a cmdline source
    pub fn cmdline(filename: &str) -> Self {
        Self {
            source: ORIGIN_SOURCE.to_string(),
            filename: filename.to_string(),
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.filename)
    }
}

/// Statically configured address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAddress {
    pub family: AddressFamily,
    pub prefix_len: u8,
    pub address: IpAddr,
    pub peer: Option<IpAddr>,
}

impl StaticAddress {
    /// Build an address, defaulting to a host prefix when none is given
    pub fn new(address: IpAddr, prefix_len: Option<u8>) -> Result<Self, ConfigError> {
        let family = AddressFamily::of(&address);
        let prefix_len = prefix_len.unwrap_or_else(|| family.host_prefix());
        IpNet::new(address, prefix_len)
            .map_err(|_| ConfigError::invalid_value("prefix_length", prefix_len.to_string()))?;

        Ok(Self {
            family,
            prefix_len,
            address,
            peer: None,
        })
    }

    pub fn with_peer(mut self, peer: Option<IpAddr>) -> Self {
        self.peer = peer;
        self
    }
}

impl std::fmt::Display for StaticAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// Address with an optional prefix length, `<ip>[/<prefixlen>]`
///
/// IPv6 literals may be wrapped in brackets, as the cmdline uses `:` as a
/// field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPrefix {
    pub addr: IpAddr,
    pub prefix_len: Option<u8>,
}

impl FromStr for AddressPrefix {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = match s.rsplit_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = parse_ip(addr).ok_or_else(|| ConfigError::invalid_value("ip_address", s))?;
        let prefix_len = match prefix {
            Some(prefix) => {
                let len = prefix
                    .parse::<u8>()
                    .map_err(|_| ConfigError::invalid_value("prefix_length", prefix))?;
                if len > AddressFamily::of(&addr).host_prefix() {
                    return Err(ConfigError::invalid_value("prefix_length", prefix));
                }
                Some(len)
            }
            None => None,
        };

        Ok(Self { addr, prefix_len })
    }
}

/// Parse a plain or bracketed IP address
pub fn parse_ip(s: &str) -> Option<IpAddr> {
    let s = s
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(s);
    s.parse::<IpAddr>().ok()
}

/// Convert a netmask to a prefix length
///
/// Accepts a dotted IPv4 netmask or a plain prefix length.
pub fn netmask_to_prefix(netmask: &str) -> Result<u8, ConfigError> {
    if let Ok(len) = netmask.parse::<u8>() {
        if len <= 128 {
            return Ok(len);
        }
    }

    let mask = netmask
        .parse::<Ipv4Addr>()
        .map_err(|_| ConfigError::invalid_value("netmask", netmask))?;
    let bits = u32::from(mask);
    let len = bits.leading_ones();
    if bits.checked_shl(len).unwrap_or(0) != 0 {
        return Err(ConfigError::invalid_value("netmask", netmask));
    }

    Ok(len as u8)
}

/// Link kind of a descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Ethernet,
    Vlan,
    Bond,
    Team,
    Bridge,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Ethernet => write!(f, "ethernet"),
            LinkKind::Vlan => write!(f, "vlan"),
            LinkKind::Bond => write!(f, "bond"),
            LinkKind::Team => write!(f, "team"),
            LinkKind::Bridge => write!(f, "bridge"),
        }
    }
}

/// Link control policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkControl {
    pub timeout: u32,
}

impl Default for LinkControl {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LINK_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_prefix_parsing() {
        let addr: AddressPrefix = "192.168.1.1/24".parse().unwrap();
        assert_eq!(addr.addr, "192.168.1.1".parse::<IpAddr>().unwrap());
        assert_eq!(addr.prefix_len, Some(24));

        let addr: AddressPrefix = "192.168.1.1".parse().unwrap();
        assert_eq!(addr.prefix_len, None);

        let addr: AddressPrefix = "[2001:db8::1]/64".parse().unwrap();
        assert_eq!(addr.addr, "2001:db8::1".parse::<IpAddr>().unwrap());
        assert_eq!(addr.prefix_len, Some(64));

        let addr: AddressPrefix = "2001:db8::1".parse().unwrap();
        assert!(addr.addr.is_ipv6());

        assert!("192.168.1.1/33".parse::<AddressPrefix>().is_err());
        assert!("dhcp".parse::<AddressPrefix>().is_err());
        assert!("eth0".parse::<AddressPrefix>().is_err());
    }

    #[test]
    fn test_netmask_conversion() {
        assert_eq!(netmask_to_prefix("255.255.255.0").unwrap(), 24);
        assert_eq!(netmask_to_prefix("255.255.0.0").unwrap(), 16);
        assert_eq!(netmask_to_prefix("255.0.0.0").unwrap(), 8);
        assert_eq!(netmask_to_prefix("255.255.255.128").unwrap(), 25);
        assert_eq!(netmask_to_prefix("255.255.255.255").unwrap(), 32);
        assert_eq!(netmask_to_prefix("0.0.0.0").unwrap(), 0);
        assert_eq!(netmask_to_prefix("64").unwrap(), 64);

        assert!(netmask_to_prefix("255.0.255.0").is_err());
        assert!(netmask_to_prefix("invalid.netmask").is_err());
    }

    #[test]
    fn test_static_address_defaults_to_host_prefix() {
        let v4 = StaticAddress::new("192.0.2.1".parse().unwrap(), None).unwrap();
        assert_eq!(v4.family, AddressFamily::Ipv4);
        assert_eq!(v4.prefix_len, 32);
        assert_eq!(v4.to_string(), "192.0.2.1/32");

        let v6 = StaticAddress::new("2001:db8::1".parse().unwrap(), None).unwrap();
        assert_eq!(v6.family, AddressFamily::Ipv6);
        assert_eq!(v6.prefix_len, 128);

        assert!(StaticAddress::new("192.0.2.1".parse().unwrap(), Some(40)).is_err());
    }

    #[test]
    fn test_tristate() {
        let mut flag = Tristate::default();
        assert!(!flag.is_set());
        assert_eq!(flag.as_bool(), None);

        flag.set(false);
        assert!(flag.is_set());
        assert!(!flag.is_true());
        assert_eq!(flag.as_bool(), Some(false));

        flag.set(true);
        assert!(flag.is_true());
    }
}
