//! dracut cmdline network core
//!
//! Interface descriptors, link configurations and the descriptor registry
//! produced by the cmdline reader.

pub mod bond;
pub mod bridge;
pub mod error;
pub mod interface;
pub mod registry;
pub mod team;
pub mod types;
pub mod vlan;

pub use bond::{BondConfig, BondMode};
pub use bridge::BridgeConfig;
pub use error::{ConfigError, NetworkError, SourceError};
pub use interface::{InterfaceDescriptor, InterfaceValidator};
pub use registry::DescriptorRegistry;
pub use team::{TeamConfig, TeamRunner};
pub use types::*;
pub use vlan::{VlanConfig, VlanManager, VlanProtocol};

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
