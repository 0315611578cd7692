// src/cli/mod.rs
//! CLI definitions for setup-oob
//!
//! The command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use setup_oob::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "setup-oob")]
#[command(version)]
#[command(about = "Converge out-of-band management controller settings", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and desired-state flags; each overrides the settings file
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Controller host, `localhost` for in-band access
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Controller user
    #[arg(short = 'U', long, global = true)]
    pub user: Option<String>,

    /// Desired administrator password
    #[arg(short = 'P', long, env = "SETUP_OOB_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Controller type: drac or smc
    #[arg(short = 't', long = "type", global = true)]
    pub vendor: Option<String>,

    /// Desired controller hostname (default: <short hostname>-oob)
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// Desired NIC mode: dedicated, shared or failover
    #[arg(long, global = true)]
    pub network_mode: Option<String>,

    /// Desired address source: dhcp or an IPv4 CIDR address
    #[arg(long, global = true)]
    pub network_src: Option<String>,

    /// File holding the license private key
    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,

    /// NTP server (repeat for the secondary)
    #[arg(long = "ntp-server", global = true)]
    pub ntp_servers: Vec<String>,

    /// Settings file (default: /etc/setup-oob/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Per-command timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl GlobalArgs {
    /// Flags as a settings overlay
    pub fn overrides(&self) -> Settings {
        Settings {
            host: self.host.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            vendor: self.vendor.clone(),
            hostname: self.hostname.clone(),
            network_mode: self.network_mode.clone(),
            network_src: self.network_src.clone(),
            key_file: self.key_file.clone(),
            level: self.log_level.clone(),
            ntp_servers: (!self.ntp_servers.is_empty()).then(|| self.ntp_servers.clone()),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report whether the controller matches the desired state (exit 1 on drift)
    Check,

    /// Converge the controller to the desired state
    Apply {
        /// Print the plan without touching the controller
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the ordered resources and their desired values
    Plan,

    /// Print the Supermicro license for a MAC address (offline)
    License {
        /// MAC address, e.g. 00:25:90:ab:cd:ef
        mac: String,
    },
}
