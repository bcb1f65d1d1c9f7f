//! Bond link configuration

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ConfigError, NetworkError};
use crate::interface::InterfaceValidator;
use crate::Result;

/// Bonding modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BondMode {
    #[default]
    #[serde(rename = "balance-rr")]
    RoundRobin,
    #[serde(rename = "active-backup")]
    ActiveBackup,
    #[serde(rename = "balance-xor")]
    Xor,
    #[serde(rename = "broadcast")]
    Broadcast,
    #[serde(rename = "802.3ad")]
    Ieee8023ad,
    #[serde(rename = "balance-tlb")]
    BalanceTlb,
    #[serde(rename = "balance-alb")]
    BalanceAlb,
}

impl FromStr for BondMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "0" | "balance-rr" => Ok(BondMode::RoundRobin),
            "1" | "active-backup" => Ok(BondMode::ActiveBackup),
            "2" | "balance-xor" => Ok(BondMode::Xor),
            "3" | "broadcast" => Ok(BondMode::Broadcast),
            "4" | "802.3ad" => Ok(BondMode::Ieee8023ad),
            "5" | "balance-tlb" => Ok(BondMode::BalanceTlb),
            "6" | "balance-alb" => Ok(BondMode::BalanceAlb),
            other => Err(ConfigError::invalid_value("bond_mode", other)),
        }
    }
}

impl std::fmt::Display for BondMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            BondMode::RoundRobin => "balance-rr",
            BondMode::ActiveBackup => "active-backup",
            BondMode::Xor => "balance-xor",
            BondMode::Broadcast => "broadcast",
            BondMode::Ieee8023ad => "802.3ad",
            BondMode::BalanceTlb => "balance-tlb",
            BondMode::BalanceAlb => "balance-alb",
        };
        write!(f, "{}", mode)
    }
}

/// Bond-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BondConfig {
    /// Bond slaves
    pub slaves: Vec<String>,
    /// Bond mode
    pub mode: BondMode,
    /// Remaining driver options, in the order given
    pub options: IndexMap<String, String>,
}

impl BondConfig {
    /// Create new bond configuration
    pub fn new(slaves: Vec<String>) -> Self {
        Self {
            slaves,
            mode: BondMode::default(),
            options: IndexMap::new(),
        }
    }

    /// Apply a comma separated `key=value` option list
    ///
    /// `mode` is parsed into [`BondMode`]; every other option is kept as-is.
    pub fn apply_options(&mut self, options: &str) -> Result<()> {
        for option in options.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = option.split_once('=').ok_or_else(|| {
                NetworkError::from(ConfigError::invalid_value("bond_option", option))
            })?;

            match key {
                "mode" => self.mode = value.parse()?,
                _ => {
                    self.options.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(())
    }

    /// Validate bond configuration
    pub fn validate(&self) -> Result<()> {
        if self.slaves.is_empty() {
            return Err(ConfigError::MissingField {
                field: "bond_slaves".to_string(),
            }
            .into());
        }

        for slave in &self.slaves {
            InterfaceValidator::validate_name(slave)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_mode_parsing() {
        assert_eq!(
            "active-backup".parse::<BondMode>().unwrap(),
            BondMode::ActiveBackup
        );
        assert_eq!("1".parse::<BondMode>().unwrap(), BondMode::ActiveBackup);
        assert_eq!("802.3ad".parse::<BondMode>().unwrap(), BondMode::Ieee8023ad);
        assert!("fastest".parse::<BondMode>().is_err());
        assert_eq!(BondMode::BalanceAlb.to_string(), "balance-alb");
    }

    #[test]
    fn test_bond_options() {
        let mut config = BondConfig::new(vec!["eth0".to_string(), "eth1".to_string()]);
        config
            .apply_options("mode=active-backup,miimon=100,primary=eth0")
            .unwrap();

        assert_eq!(config.mode, BondMode::ActiveBackup);
        assert_eq!(
            config.options.iter().collect::<Vec<_>>(),
            vec![
                (&"miimon".to_string(), &"100".to_string()),
                (&"primary".to_string(), &"eth0".to_string())
            ]
        );

        assert!(config.apply_options("miimon").is_err());
        assert!(config.apply_options("mode=bogus").is_err());
    }

    #[test]
    fn test_bond_validation() {
        let config = BondConfig::new(vec!["eth0".to_string()]);
        assert!(config.validate().is_ok());

        assert!(BondConfig::new(Vec::new()).validate().is_err());
        assert!(BondConfig::new(vec!["eth 0".to_string()]).validate().is_err());
    }
}
