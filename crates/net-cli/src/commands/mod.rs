//! CLI commands

pub mod show;

pub use show::ShowCommand;
