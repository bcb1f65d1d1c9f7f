//! Layered CLI settings
//!
//! Values come from the settings file, then `DRACUT_NETCONF_*` environment
//! variables, then command line flags.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use dracut_net_config::ReaderOptions;

/// Settings file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dracut-netconf.toml";

/// Prefix of the environment overrides
pub const ENV_PREFIX: &str = "DRACUT_NETCONF";

/// Output format of the descriptor listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory prepended to every source path
    pub root: Option<PathBuf>,
    /// Explicit cmdline file or directory instead of the defaults
    pub path: Option<PathBuf>,
    /// Hostname sent with DHCP requests
    pub hostname: Option<String>,
    pub format: OutputFormat,
}

impl Settings {
    /// Load settings from a file and the environment
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }

    /// Override loaded values with the ones given on the command line
    pub fn merge(
        mut self,
        root: Option<PathBuf>,
        path: Option<PathBuf>,
        hostname: Option<String>,
        format: Option<OutputFormat>,
    ) -> Self {
        if root.is_some() {
            self.root = root;
        }
        if path.is_some() {
            self.path = path;
        }
        if hostname.is_some() {
            self.hostname = hostname;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            root: self.root.clone(),
            hostname: self.hostname.clone(),
        }
    }
}
