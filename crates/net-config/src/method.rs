//! Address acquisition methods of `ip=`

use std::str::FromStr;

use dracut_net_core::{
    ConfigError, InterfaceDescriptor, Result, UpdateFlag, DHCP4_DEFER_TIMEOUT,
};

/// Method keyword of an `ip=` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Dhcp,
    Dhcp6,
    Auto6,
    /// Autoconf with DHCPv6 as a fallback; both are enabled and the
    /// activation layer picks.
    Either6,
    /// `none` / `off`: static configuration only
    Off,
    On,
    Any,
    Ibft,
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dhcp" => Ok(Method::Dhcp),
            "dhcp6" => Ok(Method::Dhcp6),
            "auto6" => Ok(Method::Auto6),
            "either6" => Ok(Method::Either6),
            "none" | "off" => Ok(Method::Off),
            "on" => Ok(Method::On),
            "any" => Ok(Method::Any),
            "ibft" => Ok(Method::Ibft),
            other => Err(ConfigError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            Method::Dhcp => "dhcp",
            Method::Dhcp6 => "dhcp6",
            Method::Auto6 => "auto6",
            Method::Either6 => "either6",
            Method::Off => "off",
            Method::On => "on",
            Method::Any => "any",
            Method::Ibft => "ibft",
        };
        write!(f, "{}", method)
    }
}

impl Method {
    /// Apply the method to a descriptor
    ///
    /// `hostname` is sent with DHCP requests.
    pub fn apply(self, descriptor: &mut InterfaceDescriptor, hostname: Option<&str>) -> Result<()> {
        match self {
            Method::Dhcp => {
                descriptor.addressing.ipv4_enabled.set(true);
                descriptor.addressing.arp_verify.set(true);
                let dhcp4 = &mut descriptor.dhcp4;
                dhcp4.enabled = true;
                dhcp4.update.insert(UpdateFlag::Hostname);
                dhcp4.update.insert(UpdateFlag::Smb);
                dhcp4.defer_timeout = DHCP4_DEFER_TIMEOUT;
                dhcp4.hostname = hostname.map(str::to_string);
            }
            Method::Dhcp6 => enable_dhcp6(descriptor, hostname),
            Method::Auto6 => enable_auto6(descriptor),
            Method::Either6 => {
                enable_auto6(descriptor);
                enable_dhcp6(descriptor, hostname);
            }
            Method::Off => {}
            Method::On | Method::Any | Method::Ibft => {
                log::error!(
                    "{}: address method '{}' is not supported",
                    descriptor.name().unwrap_or("default interface"),
                    self
                );
                return Err(ConfigError::UnsupportedMethod {
                    method: self.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Parse a method token and apply it
pub fn resolve(
    token: &str,
    descriptor: &mut InterfaceDescriptor,
    hostname: Option<&str>,
) -> Result<Method> {
    let method = token.parse::<Method>()?;
    method.apply(descriptor, hostname)?;
    Ok(method)
}

fn enable_dhcp6(descriptor: &mut InterfaceDescriptor, hostname: Option<&str>) {
    descriptor.addressing.ipv6_enabled.set(true);
    descriptor.dhcp6.enabled = true;
    descriptor.dhcp6.hostname = hostname.map(str::to_string);
}

fn enable_auto6(descriptor: &mut InterfaceDescriptor) {
    descriptor.addressing.ipv6_enabled.set(true);
    descriptor.auto6.enabled = true;
    descriptor.auto6.update.insert(UpdateFlag::Dns);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dracut_net_core::{LinkKind, NetworkError, Origin, Tristate};

    fn descriptor() -> InterfaceDescriptor {
        InterfaceDescriptor::new(None, LinkKind::Ethernet, Origin::cmdline("test"))
    }

    #[test]
    fn test_dhcp() {
        let mut desc = descriptor();
        resolve("dhcp", &mut desc, Some("client")).unwrap();

        assert_eq!(desc.addressing.ipv4_enabled, Tristate::True);
        assert_eq!(desc.addressing.arp_verify, Tristate::True);
        assert_eq!(desc.addressing.ipv6_enabled, Tristate::Unset);
        assert!(desc.dhcp4.enabled);
        assert!(desc.dhcp4.update.contains(&UpdateFlag::Hostname));
        assert!(desc.dhcp4.update.contains(&UpdateFlag::Smb));
        assert_eq!(desc.dhcp4.defer_timeout, 15);
        assert_eq!(desc.dhcp4.hostname.as_deref(), Some("client"));
        assert!(!desc.dhcp6.enabled);
    }

    #[test]
    fn test_dhcp6() {
        let mut desc = descriptor();
        resolve("dhcp6", &mut desc, Some("client")).unwrap();

        assert_eq!(desc.addressing.ipv6_enabled, Tristate::True);
        assert_eq!(desc.addressing.ipv4_enabled, Tristate::Unset);
        assert!(desc.dhcp6.enabled);
        assert_eq!(desc.dhcp6.hostname.as_deref(), Some("client"));
        assert!(!desc.auto6.enabled);
    }

    #[test]
    fn test_auto6() {
        let mut desc = descriptor();
        resolve("auto6", &mut desc, None).unwrap();

        assert_eq!(desc.addressing.ipv6_enabled, Tristate::True);
        assert!(desc.auto6.enabled);
        assert!(desc.auto6.update.contains(&UpdateFlag::Dns));
        assert!(!desc.dhcp6.enabled);
    }

    #[test]
    fn test_either6_enables_both() {
        let mut desc = descriptor();
        resolve("either6", &mut desc, None).unwrap();

        assert!(desc.auto6.enabled);
        assert!(desc.dhcp6.enabled);
        assert!(!desc.dhcp4.enabled);
    }

    #[test]
    fn test_off_leaves_descriptor_untouched() {
        let mut desc = descriptor();
        assert_eq!(resolve("none", &mut desc, None).unwrap(), Method::Off);
        assert_eq!(resolve("off", &mut desc, None).unwrap(), Method::Off);
        assert_eq!(desc, descriptor());
    }

    #[test]
    fn test_unsupported_methods_fail() {
        for token in ["on", "any", "ibft"] {
            let mut desc = descriptor();
            match resolve(token, &mut desc, None) {
                Err(NetworkError::Configuration(ConfigError::UnsupportedMethod { method })) => {
                    assert_eq!(method, token)
                }
                other => panic!("Expected UnsupportedMethod for {}, got {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_unknown_method_fails() {
        let mut desc = descriptor();
        assert!(matches!(
            resolve("bootp", &mut desc, None),
            Err(NetworkError::Configuration(ConfigError::UnknownMethod { .. }))
        ));
        assert!(resolve("", &mut desc, None).is_err());
    }
}
