//! Team link configuration

use serde::Serialize;

use crate::error::ConfigError;
use crate::interface::InterfaceValidator;
use crate::Result;

/// Team runners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRunner {
    Broadcast,
    RoundRobin,
    Random,
    #[default]
    ActiveBackup,
    LoadBalance,
    Lacp,
}

impl std::fmt::Display for TeamRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let runner = match self {
            TeamRunner::Broadcast => "broadcast",
            TeamRunner::RoundRobin => "roundrobin",
            TeamRunner::Random => "random",
            TeamRunner::ActiveBackup => "activebackup",
            TeamRunner::LoadBalance => "loadbalance",
            TeamRunner::Lacp => "lacp",
        };
        write!(f, "{}", runner)
    }
}

/// Team-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamConfig {
    pub ports: Vec<String>,
    pub runner: TeamRunner,
}

impl TeamConfig {
    pub fn new(ports: Vec<String>) -> Self {
        Self {
            ports,
            runner: TeamRunner::default(),
        }
    }

    /// A team needs at least one port
    pub fn validate(&self) -> Result<()> {
        if self.ports.is_empty() {
            return Err(ConfigError::MissingField {
                field: "team_ports".to_string(),
            }
            .into());
        }
        for port in &self.ports {
            InterfaceValidator::validate_name(port)?;
        }
        Ok(())
    }
}
