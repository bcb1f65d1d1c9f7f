//! `bond=`, `team=` and `bridge=` interpreters

use dracut_net_core::{
    BondConfig, BridgeConfig, ConfigError, LinkKind, NetworkError, Result, TeamConfig,
};

use crate::context::ParseContext;
use crate::words::{split_list, ParameterWords};

const DEFAULT_BOND_NAME: &str = "bond0";
const DEFAULT_BOND_SLAVES: &str = "eth0,eth1";
const DEFAULT_BRIDGE_NAME: &str = "br0";
const DEFAULT_BRIDGE_PORT: &str = "eth0";

/// `bond=<bondname>[:<slaves>[:<options>[:<mtu>]]]`
pub fn interpret_bond(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    if words.len() > 4 {
        return Err(ConfigError::invalid_value("bond", words.to_string()).into());
    }

    let name = words.field(0).unwrap_or(DEFAULT_BOND_NAME);
    let slaves = split_list(words.field(1).unwrap_or(DEFAULT_BOND_SLAVES));
    let mut bond = BondConfig::new(slaves);
    if let Some(options) = words.field(2) {
        bond.apply_options(options)?;
    }
    bond.validate()?;
    if bond.slaves.iter().any(|slave| slave == name) {
        return Err(ConfigError::SelfReference {
            name: name.to_string(),
        }
        .into());
    }
    let mtu = words.field(3).map(parse_mtu).transpose()?;

    log::debug!(
        "{}: bond {} with slaves {} in mode {}",
        ctx.filename,
        name,
        bond.slaves.join(","),
        bond.mode
    );
    ctx.register(name, LinkKind::Bond, |desc| {
        desc.mtu = mtu;
        desc.bond = Some(bond);
        Ok(())
    })
}

/// `team=<teammaster>:<teamslaves>`
pub fn interpret_team(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    let (name, ports) = match (words.len(), words.field(0), words.field(1)) {
        (2, Some(name), Some(ports)) => (name, split_list(ports)),
        _ => return Err(ConfigError::invalid_value("team", words.to_string()).into()),
    };

    let team = TeamConfig::new(ports);
    team.validate()?;
    if team.ports.iter().any(|port| port == name) {
        return Err(ConfigError::SelfReference {
            name: name.to_string(),
        }
        .into());
    }

    log::debug!(
        "{}: team {} with ports {} using runner {}",
        ctx.filename,
        name,
        team.ports.join(","),
        team.runner
    );
    ctx.register(name, LinkKind::Team, |desc| {
        desc.team = Some(team);
        Ok(())
    })
}

/// `bridge=<bridgename>[:<ethnames>]`
pub fn interpret_bridge(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    if words.len() > 2 {
        return Err(ConfigError::invalid_value("bridge", words.to_string()).into());
    }

    let name = words.field(0).unwrap_or(DEFAULT_BRIDGE_NAME);
    let bridge = split_list(words.field(1).unwrap_or(DEFAULT_BRIDGE_PORT))
        .into_iter()
        .fold(BridgeConfig::default(), BridgeConfig::with_port);
    bridge.validate(name)?;

    log::debug!(
        "{}: bridge {} with ports {}",
        ctx.filename,
        name,
        bridge.ports.join(",")
    );
    ctx.register(name, LinkKind::Bridge, |desc| {
        desc.bridge = Some(bridge);
        Ok(())
    })
}

fn parse_mtu(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| NetworkError::from(ConfigError::invalid_value("mtu", value)))
}
