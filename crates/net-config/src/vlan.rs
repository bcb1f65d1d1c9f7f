//! `vlan=<vlanname>:<etherdevice>` interpreter

use dracut_net_core::{
    ConfigError, InterfaceValidator, LinkKind, Result, VlanConfig, VlanManager,
};

use crate::context::ParseContext;
use crate::words::ParameterWords;

/// Register a VLAN descriptor on top of its parent device
///
/// The tag comes from the VLAN name, e.g. `eth0.100` or `vlan100`.
pub fn interpret(words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    let (ifname, etherdev) = match (words.len(), words.field(0), words.field(1)) {
        (2, Some(ifname), Some(etherdev)) => (ifname, etherdev),
        _ => {
            return Err(ConfigError::invalid_value("vlan", words.to_string()).into());
        }
    };

    InterfaceValidator::validate_name(ifname)?;
    InterfaceValidator::validate_name(etherdev)?;
    if ifname == etherdev {
        return Err(ConfigError::SelfReference {
            name: ifname.to_string(),
        }
        .into());
    }

    let tag = VlanManager::extract_tag(ifname)?;
    ctx.register(ifname, LinkKind::Vlan, |desc| {
        desc.addressing.ipv4_enabled.set(false);
        desc.vlan = Some(VlanConfig::new(etherdev.to_string(), tag));
        Ok(())
    })?;

    log::debug!("{}: vlan {} on {} with tag {}", ctx.filename, ifname, etherdev, tag);
    Ok(())
}
