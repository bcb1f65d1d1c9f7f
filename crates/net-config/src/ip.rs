//! `ip=` interpreter
//!
//! Supported forms:
//!
//! ```text
//! ip=<method>
//! ip=<client-ip>[/<prefix>]
//! ip=<interface>:<method>[:[<mtu>][:<macaddr>]]
//! ip=<client-ip>:[<peer>]:<gateway>:<netmask>:<hostname>:<interface>:<method>[:[<mtu>][:<macaddr>]]
//! ip=<client-ip>:[<peer>]:<gateway>:<netmask>:<hostname>:<interface>:<method>[:[<dns1>][:<dns2>]]
//! ```

use std::net::IpAddr;

use mac_address::MacAddress;

use dracut_net_core::{
    netmask_to_prefix, parse_ip, AddressPrefix, ConfigError, InterfaceDescriptor, LinkKind,
    NetworkError, Result, StaticAddress,
};

use crate::context::ParseContext;
use crate::hostname::is_valid_hostname;
use crate::method;
use crate::words::ParameterWords;

/// Syntax variant of an `ip=` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Invalid,
    /// `ip=<method>`
    Simple,
    /// `ip=<interface>:<method>[:<mtu>[:<macaddr>]]`
    SimpleIfname,
    /// Address form, optionally followed by `:<mtu>:<macaddr>`
    ExplicitMacaddr,
    /// Address form followed by `:<dns1>:<dns2>`
    ExplicitDns,
}

impl SyntaxKind {
    /// Classify parameter words by shape
    ///
    /// The DNS form is told apart from the mtu/macaddr form by an address in
    /// word 7, or in word 8 when word 7 is empty.
    pub fn detect(words: &ParameterWords) -> Self {
        if let Some(fields) = explicit_fields(words) {
            let dns = match fields.field(7) {
                Some(word) => parse_ip(word).is_some(),
                None => fields.field(8).and_then(parse_ip).is_some(),
            };
            return if dns {
                SyntaxKind::ExplicitDns
            } else {
                SyntaxKind::ExplicitMacaddr
            };
        }

        if words.field(0).is_none() {
            return SyntaxKind::Invalid;
        }

        if words.len() < 2 {
            SyntaxKind::Simple
        } else {
            SyntaxKind::SimpleIfname
        }
    }
}

/// Interpret one `ip=` value
///
/// Returns the detected syntax; any failure leaves the registry as it was.
pub fn interpret(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<SyntaxKind> {
    let kind = SyntaxKind::detect(words);
    match kind {
        SyntaxKind::Invalid => {
            return Err(ConfigError::MissingField {
                field: "ip".to_string(),
            }
            .into())
        }
        SyntaxKind::Simple => method_only(words, ctx)?,
        SyntaxKind::SimpleIfname => interface_qualified(words, ctx)?,
        SyntaxKind::ExplicitMacaddr | SyntaxKind::ExplicitDns => {
            let fields = explicit_fields(words).ok_or_else(|| {
                NetworkError::from(ConfigError::invalid_value("ip", words.to_string()))
            })?;
            explicit(&fields, kind, ctx)?
        }
    }
    log::debug!("{}: ip={} parsed as {:?}", ctx.filename, words, kind);
    Ok(kind)
}

/// `ip=<method>` applies to the default descriptor
fn method_only(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    let token = words.field(0).unwrap_or_default().to_string();
    let hostname = ctx.default_hostname();
    ctx.update_default(|desc| method::resolve(&token, desc, hostname.as_deref()).map(|_| ()))
}

/// `ip=<interface>:<method>[:<mtu>[:<macaddr>]]`
fn interface_qualified(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    let ifname = words.field(0).unwrap_or_default().to_string();
    let token = words.field(1).ok_or_else(|| ConfigError::MissingField {
        field: "method".to_string(),
    })?;
    let mtu = words.field(2).map(parse_mtu).transpose()?;
    let macaddr = words.rest(3).as_deref().map(parse_macaddr).transpose()?;
    let hostname = ctx.default_hostname();

    ctx.register(&ifname, LinkKind::Ethernet, |desc| {
        desc.mtu = mtu;
        desc.macaddr = macaddr;
        method::resolve(token, desc, hostname.as_deref()).map(|_| ())
    })
}

/// Address forms; an interface field names the descriptor, otherwise the
/// default descriptor is extended.
fn explicit(fields: &ParameterWords, kind: SyntaxKind, ctx: &mut ParseContext<'_>) -> Result<()> {
    let client: AddressPrefix = fields.field(0).unwrap_or_default().parse()?;
    let peer = fields.field(1).map(|p| parse_addr("peer", p)).transpose()?;
    let gateway = fields.field(2).map(|g| parse_addr("gateway", g)).transpose()?;
    let prefix_len = match (client.prefix_len, fields.field(3)) {
        (Some(len), _) => Some(len),
        (None, Some(netmask)) => Some(netmask_to_prefix(netmask)?),
        (None, None) => None,
    };
    let address = StaticAddress::new(client.addr, prefix_len)?.with_peer(peer);

    let hostname = fields.field(4).map(str::to_string);
    if let Some(name) = hostname.as_deref() {
        if !is_valid_hostname(name) {
            return Err(ConfigError::invalid_value("hostname", name).into());
        }
    }
    let ifname = fields.field(5).map(str::to_string);
    let token = fields.field(6).unwrap_or("none").to_string();

    let mut mtu = None;
    let mut macaddr = None;
    let mut dns_servers = Vec::new();
    match kind {
        SyntaxKind::ExplicitDns => {
            for server in [fields.field(7), fields.field(8)].into_iter().flatten() {
                dns_servers.push(parse_addr("dns", server)?);
            }
        }
        _ => {
            mtu = fields.field(7).map(parse_mtu).transpose()?;
            macaddr = fields.rest(8).as_deref().map(parse_macaddr).transpose()?;
        }
    }

    let dhcp_hostname = hostname.clone().or_else(|| ctx.default_hostname());
    let build = move |desc: &mut InterfaceDescriptor| -> Result<()> {
        desc.add_static_address(address);
        if gateway.is_some() {
            desc.gateway = gateway;
        }
        if hostname.is_some() {
            desc.hostname = hostname;
        }
        if mtu.is_some() {
            desc.mtu = mtu;
        }
        if macaddr.is_some() {
            desc.macaddr = macaddr;
        }
        desc.dns_servers.extend(dns_servers);
        method::resolve(&token, desc, dhcp_hostname.as_deref()).map(|_| ())
    };

    match ifname {
        Some(ifname) => ctx.register(&ifname, LinkKind::Ethernet, build),
        None => ctx.update_default(build),
    }
}

/// Words of an address form, or `None` when the value is not one
///
/// A bare IPv6 address is split on its colons; it is recognised by parsing
/// the re-joined value. Its first word is empty for addresses such as `::1`.
fn explicit_fields(words: &ParameterWords) -> Option<ParameterWords> {
    if words
        .field(0)
        .is_some_and(|first| first.parse::<AddressPrefix>().is_ok())
    {
        return Some(words.clone());
    }

    let joined = words.to_string();
    if words.len() > 1 && joined.parse::<AddressPrefix>().is_ok_and(|a| a.addr.is_ipv6()) {
        return Some(ParameterWords::from(vec![joined]));
    }

    None
}

fn parse_addr(field: &str, value: &str) -> Result<IpAddr> {
    parse_ip(value).ok_or_else(|| ConfigError::invalid_value(field, value).into())
}

fn parse_mtu(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::invalid_value("mtu", value).into())
}

fn parse_macaddr(value: &str) -> Result<MacAddress> {
    value
        .parse::<MacAddress>()
        .map_err(|_| ConfigError::invalid_value("macaddr", value).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostname::FixedHostname;
    use dracut_net_core::{AddressFamily, DescriptorRegistry, Tristate};

    fn words(value: &str) -> ParameterWords {
        ParameterWords::split(value)
    }

    fn run(registry: &mut DescriptorRegistry, value: &str) -> Result<SyntaxKind> {
        let lookup = FixedHostname::new("client");
        let mut ctx = ParseContext::new(registry, "cmdline", &lookup);
        interpret(&words(value), &mut ctx)
    }

    #[test]
    fn test_detect_syntax() {
        assert_eq!(SyntaxKind::detect(&words("")), SyntaxKind::Invalid);
        assert_eq!(SyntaxKind::detect(&ParameterWords::default()), SyntaxKind::Invalid);
        assert_eq!(SyntaxKind::detect(&words("dhcp")), SyntaxKind::Simple);
        assert_eq!(SyntaxKind::detect(&words("eth0:dhcp")), SyntaxKind::SimpleIfname);
        assert_eq!(SyntaxKind::detect(&words("192.0.2.1/24")), SyntaxKind::ExplicitMacaddr);
        assert_eq!(SyntaxKind::detect(&words("2001:db8::1/64")), SyntaxKind::ExplicitMacaddr);
        assert_eq!(
            SyntaxKind::detect(&words("192.0.2.5::192.0.2.1:255.255.255.0:host:eth0:none")),
            SyntaxKind::ExplicitMacaddr
        );
        assert_eq!(
            SyntaxKind::detect(&words(
                "192.0.2.5::192.0.2.1:255.255.255.0:host:eth0:none:192.0.2.53"
            )),
            SyntaxKind::ExplicitDns
        );
        assert_eq!(
            SyntaxKind::detect(&words("192.0.2.5:::24::eth0:none::192.0.2.53")),
            SyntaxKind::ExplicitDns
        );
        assert_eq!(SyntaxKind::detect(&words("::1/128")), SyntaxKind::ExplicitMacaddr);
        assert_eq!(SyntaxKind::detect(&words(":eth0")), SyntaxKind::Invalid);
    }

    #[test]
    fn test_method_only_updates_default() {
        let mut registry = DescriptorRegistry::new();
        assert_eq!(run(&mut registry, "dhcp").unwrap(), SyntaxKind::Simple);
        assert_eq!(run(&mut registry, "auto6").unwrap(), SyntaxKind::Simple);

        assert_eq!(registry.len(), 1);
        let desc = registry.get_default().unwrap();
        assert!(desc.dhcp4.enabled);
        assert!(desc.auto6.enabled);
        assert_eq!(desc.dhcp4.hostname.as_deref(), Some("client"));
    }

    #[test]
    fn test_failed_method_keeps_default_unchanged() {
        let mut registry = DescriptorRegistry::new();
        run(&mut registry, "dhcp6").unwrap();
        let before = registry.clone();

        assert!(run(&mut registry, "on").is_err());
        assert!(run(&mut registry, "bogus").is_err());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_interface_qualified() {
        let mut registry = DescriptorRegistry::new();
        assert_eq!(
            run(&mut registry, "eth0:dhcp:9000:52:54:00:12:34:56").unwrap(),
            SyntaxKind::SimpleIfname
        );

        let eth0 = registry.get("eth0").unwrap();
        assert!(eth0.dhcp4.enabled);
        assert_eq!(eth0.mtu, Some(9000));
        assert_eq!(eth0.macaddr.unwrap().to_string(), "52:54:00:12:34:56");
    }

    #[test]
    fn test_interface_qualified_rejects_bad_fields() {
        let mut registry = DescriptorRegistry::new();
        assert!(run(&mut registry, "eth;0:dhcp").is_err());
        assert!(run(&mut registry, "eth0:dhcp:big").is_err());
        assert!(run(&mut registry, "eth0:dhcp::zz:zz").is_err());
        assert!(run(&mut registry, "eth0:").is_err());
        assert!(run(&mut registry, "eth0:any").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_single_address() {
        let mut registry = DescriptorRegistry::new();
        run(&mut registry, "192.0.2.1/24").unwrap();
        run(&mut registry, "[2001:db8::1]/64").unwrap();

        let desc = registry.get_default().unwrap();
        assert_eq!(desc.addressing.ipv4_enabled, Tristate::True);
        assert_eq!(desc.addressing.ipv6_enabled, Tristate::True);
        assert_eq!(desc.static_addresses.len(), 2);
        assert_eq!(desc.static_addresses[0].to_string(), "192.0.2.1/24");
        assert_eq!(desc.static_addresses[1].family, AddressFamily::Ipv6);
        assert_eq!(desc.static_addresses[1].prefix_len, 64);
        assert!(!desc.has_dynamic_addrconf());
    }

    #[test]
    fn test_explicit_with_interface() {
        let mut registry = DescriptorRegistry::new();
        let kind = run(
            &mut registry,
            "192.0.2.5:192.0.2.9:192.0.2.1:255.255.255.0:node1.example.com:eth1:none:1400:52:54:00:aa:bb:cc",
        )
        .unwrap();
        assert_eq!(kind, SyntaxKind::ExplicitMacaddr);

        let eth1 = registry.get("eth1").unwrap();
        let address = &eth1.static_addresses[0];
        assert_eq!(address.to_string(), "192.0.2.5/24");
        assert_eq!(address.peer, Some("192.0.2.9".parse().unwrap()));
        assert_eq!(eth1.gateway, Some("192.0.2.1".parse().unwrap()));
        assert_eq!(eth1.hostname.as_deref(), Some("node1.example.com"));
        assert_eq!(eth1.mtu, Some(1400));
        assert_eq!(eth1.macaddr.unwrap().to_string(), "52:54:00:AA:BB:CC");
        assert!(!eth1.dhcp4.enabled);
    }

    #[test]
    fn test_explicit_with_dns_and_dhcp() {
        let mut registry = DescriptorRegistry::new();
        let kind = run(
            &mut registry,
            "192.0.2.5::192.0.2.1:24:node1:eth0:dhcp:192.0.2.53:[2001:db8::53]",
        )
        .unwrap();
        assert_eq!(kind, SyntaxKind::ExplicitDns);

        let eth0 = registry.get("eth0").unwrap();
        assert_eq!(eth0.static_addresses[0].prefix_len, 24);
        assert_eq!(
            eth0.dns_servers,
            vec![
                "192.0.2.53".parse::<IpAddr>().unwrap(),
                "2001:db8::53".parse::<IpAddr>().unwrap()
            ]
        );
        assert!(eth0.dhcp4.enabled);
        assert_eq!(eth0.dhcp4.hostname.as_deref(), Some("node1"));
    }

    #[test]
    fn test_explicit_with_second_dns_only() {
        let mut registry = DescriptorRegistry::new();
        let kind = run(&mut registry, "192.0.2.5:::24::eth0:none::192.0.2.53").unwrap();
        assert_eq!(kind, SyntaxKind::ExplicitDns);

        let eth0 = registry.get("eth0").unwrap();
        assert_eq!(eth0.dns_servers, vec!["192.0.2.53".parse::<IpAddr>().unwrap()]);
        assert_eq!(eth0.macaddr, None);
    }

    #[test]
    fn test_explicit_without_interface_extends_default() {
        let mut registry = DescriptorRegistry::new();
        run(&mut registry, "192.0.2.5::192.0.2.1:255.255.255.0").unwrap();

        let desc = registry.get_default().unwrap();
        assert_eq!(desc.static_addresses[0].to_string(), "192.0.2.5/24");
        assert_eq!(desc.gateway, Some("192.0.2.1".parse().unwrap()));
    }

    #[test]
    fn test_explicit_rejects_bad_fields() {
        let mut registry = DescriptorRegistry::new();
        assert!(run(&mut registry, "192.0.2.5::gw").is_err());
        assert!(run(&mut registry, "192.0.2.5:::255.0.255.0").is_err());
        assert!(run(&mut registry, "192.0.2.5::::bad_host").is_err());
        assert!(run(&mut registry, "192.0.2.5:::::eth0:on").is_err());
        assert!(run(&mut registry, "192.0.2.5:::::eth0:none:mtu").is_err());
        assert!(registry.is_empty());
    }
}
