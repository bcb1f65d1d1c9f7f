//! Show command

use std::path::Path;

use anyhow::{Context, Result};
use dracut_net_config::{CmdlineReader, ReadSummary};
use dracut_net_core::{DescriptorRegistry, InterfaceDescriptor};

use crate::settings::{OutputFormat, Settings};

/// Reads the cmdline sources and prints the resulting descriptors
pub struct ShowCommand {
    reader: CmdlineReader,
    format: OutputFormat,
}

impl ShowCommand {
    pub fn new(settings: &Settings) -> Self {
        Self {
            reader: CmdlineReader::new(settings.reader_options()),
            format: settings.format,
        }
    }

    /// Execute show command
    pub fn execute(&self, path: Option<&Path>) -> Result<()> {
        let (registry, summary) = self.read(path)?;
        println!("{}", self.render(&registry)?);

        log::info!(
            "Read {} source(s): {} assignment(s) accepted, {} rejected",
            summary.sources.len(),
            summary.accepted,
            summary.rejected
        );
        Ok(())
    }

    /// Read an explicit source, or the default locations
    pub fn read(&self, path: Option<&Path>) -> Result<(DescriptorRegistry, ReadSummary)> {
        let mut registry = DescriptorRegistry::new();
        let summary = self.reader.read(path, &mut registry).with_context(|| match path {
            Some(path) => format!("Failed to read cmdline from {}", path.display()),
            None => "Failed to read cmdline from the default locations".to_string(),
        })?;

        if !summary.ok() {
            anyhow::bail!("No cmdline source could be read");
        }
        Ok((registry, summary))
    }

    pub fn render(&self, registry: &DescriptorRegistry) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(render_text(registry)),
            OutputFormat::Json => serde_json::to_string_pretty(registry)
                .context("Failed to serialize interface descriptors"),
        }
    }
}

/// One line per descriptor
pub fn render_text(registry: &DescriptorRegistry) -> String {
    let mut out = format!(
        "{:<15} {:<10} {:<20} {:<30} {}\n",
        "Interface", "Kind", "Methods", "Addresses", "Details"
    );
    out.push_str(&"-".repeat(90));

    for desc in registry.iter() {
        out.push('\n');
        out.push_str(&format!(
            "{:<15} {:<10} {:<20} {:<30} {}",
            desc.name().unwrap_or("*"),
            desc.kind.to_string(),
            methods(desc),
            addresses(desc),
            details(desc)
        ));
    }
    out
}

fn methods(desc: &InterfaceDescriptor) -> String {
    let methods: Vec<&str> = [
        (desc.dhcp4.enabled, "dhcp"),
        (desc.dhcp6.enabled, "dhcp6"),
        (desc.auto6.enabled, "auto6"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect();

    if methods.is_empty() {
        "static".to_string()
    } else {
        methods.join(",")
    }
}

fn addresses(desc: &InterfaceDescriptor) -> String {
    if desc.static_addresses.is_empty() {
        return "-".to_string();
    }
    desc.static_addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn details(desc: &InterfaceDescriptor) -> String {
    let mut details = Vec::new();
    if let Some(vlan) = &desc.vlan {
        details.push(format!("vlan {} on {}", vlan.tag, vlan.parent));
    }
    if let Some(bond) = &desc.bond {
        details.push(format!("{} slaves {}", bond.mode, bond.slaves.join(",")));
    }
    if let Some(team) = &desc.team {
        details.push(format!("{} ports {}", team.runner, team.ports.join(",")));
    }
    if let Some(bridge) = &desc.bridge {
        details.push(format!("ports {}", bridge.ports.join(",")));
    }
    if let Some(gateway) = &desc.gateway {
        details.push(format!("gw {}", gateway));
    }
    if let Some(mtu) = desc.mtu {
        details.push(format!("mtu {}", mtu));
    }
    if let Some(macaddr) = &desc.macaddr {
        details.push(format!("mac {}", macaddr));
    }
    if !desc.dns_servers.is_empty() {
        let servers: Vec<String> = desc.dns_servers.iter().map(ToString::to_string).collect();
        details.push(format!("dns {}", servers.join(",")));
    }
    details.join("; ")
}
