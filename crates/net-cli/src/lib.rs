//! dracut cmdline network CLI
//!
//! Reads dracut cmdline sources and prints the interface descriptors they
//! describe.

pub mod commands;
pub mod settings;
