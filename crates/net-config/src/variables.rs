//! Routing of cmdline variables to their interpreters

use dracut_net_core::Result;

use crate::context::ParseContext;
use crate::words::ParameterWords;
use crate::{ip, links, vlan};

/// Variables that belong to other dracut modules and are accepted silently
pub const IGNORED_VARIABLES: &[&str] = &[
    "root",
    "ifname",
    "rd.route",
    "bootdev",
    "BOOTIF",
    "rd.bootif",
    "nameserver",
    "rd.peerdns",
];

/// Network related cmdline variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    Ip,
    Vlan,
    Bond,
    Team,
    Bridge,
    Ignored,
    Unknown,
}

impl Variable {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ip" => Variable::Ip,
            "vlan" => Variable::Vlan,
            "bond" => Variable::Bond,
            "team" => Variable::Team,
            "bridge" => Variable::Bridge,
            name if IGNORED_VARIABLES.contains(&name) => Variable::Ignored,
            _ => Variable::Unknown,
        }
    }
}

/// Interpret one assignment
///
/// Errors only concern this assignment; whatever it was building has
/// already been dropped when one is returned.
pub fn dispatch(name: &str, words: &ParameterWords, ctx: &mut ParseContext<'_>) -> Result<()> {
    let result = match Variable::from_name(name) {
        Variable::Ip => ip::interpret(words, ctx).map(|_| ()),
        Variable::Vlan => vlan::interpret(words, ctx),
        Variable::Bond => links::interpret_bond(words, ctx),
        Variable::Team => links::interpret_team(words, ctx),
        Variable::Bridge => links::interpret_bridge(words, ctx),
        Variable::Ignored => {
            log::trace!("{}: ignoring {}", ctx.filename, name);
            Ok(())
        }
        Variable::Unknown => {
            log::trace!("{}: skipping unknown variable {}", ctx.filename, name);
            Ok(())
        }
    };

    if let Err(err) = &result {
        log::warn!("{}: rejected {}={}: {}", ctx.filename, name, words, err);
    }
    result
}
