//! dracut cmdline network CLI (dracut-netconf)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dracut_netconf::commands::ShowCommand;
use dracut_netconf::settings::{OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "dracut-netconf")]
#[command(about = "Read network configuration from the dracut cmdline")]
#[command(version)]
#[command(long_about = "
Read network configuration from the dracut cmdline

Parses ip=, vlan=, bond=, team= and bridge= from /etc/cmdline,
/etc/cmdline.d/*.conf and /proc/cmdline, or from an explicit file or
directory, and prints the resulting interface descriptors.

Examples:
  dracut-netconf                               # Read the default locations
  dracut-netconf -p /tmp/cmdline               # Read a specific file
  dracut-netconf -r /sysroot                   # Read below another root
  dracut-netconf -f json                       # Print descriptors as JSON
  dracut-netconf --hostname node1 -p cmdline   # Hostname for DHCP requests
")]
struct Cli {
    /// Settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory prepended to every source path
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Cmdline file or directory to read instead of the defaults
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Hostname sent with DHCP requests
    #[arg(long)]
    hostname: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())
        .context("Failed to load settings")?
        .merge(cli.root, cli.path, cli.hostname, cli.format);

    ShowCommand::new(&settings).execute(settings.path.as_deref())
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let quiet = cli.quiet;
    let chain = cli.verbose || cli.debug;
    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            if !quiet {
                eprintln!("Error: {}", e);

                if chain {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "dracut-netconf",
            "-r",
            "/sysroot",
            "-p",
            "/etc/cmdline",
            "-f",
            "json",
            "-d",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/sysroot")));
        assert_eq!(cli.path, Some(PathBuf::from("/etc/cmdline")));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.log_level(), "debug");
        assert!(Cli::try_parse_from(["dracut-netconf", "-f", "yaml"]).is_err());
    }
}
