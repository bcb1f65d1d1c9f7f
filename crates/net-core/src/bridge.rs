//! Bridge link configuration

use serde::Serialize;

use crate::interface::InterfaceValidator;
use crate::Result;

/// Bridge-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BridgeConfig {
    /// Bridge ports
    pub ports: Vec<String>,
}

impl BridgeConfig {
    /// Create new bridge configuration
    pub fn new(ports: Vec<String>) -> Self {
        Self { ports }
    }

    /// Add a port, ignoring duplicates
    pub fn with_port(mut self, port: String) -> Self {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
        self
    }

    /// Validate bridge ports; a bridge without ports is allowed
    pub fn validate(&self, bridge: &str) -> Result<()> {
        for port in &self.ports {
            InterfaceValidator::validate_name(port)?;
            if port == bridge {
                return Err(crate::error::ConfigError::SelfReference {
                    name: bridge.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}
