// src/config.rs

//! Settings file and defaults
//!
//! Settings come from an optional TOML file, overridden field by field by
//! command-line flags. Example:
//!
//! ```toml
//! type = "smc"
//! host = "localhost"
//! password = "s3cret"
//! network_mode = "dedicated"
//! network_src = "dhcp"
//! key_file = "/etc/setup-oob/smc.key"
//! ntp_servers = ["ntp1.example.com", "ntp2.example.com"]
//! ```

use crate::error::{Error, Result};
use crate::orchestrator::Plan;
use crate::resource::{DesiredValue, ResourceKind};
use crate::target::{Target, Vendor, DEFAULT_USER, LOCALHOST};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where settings are read from when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/setup-oob/config.toml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Suffix appended to the local short hostname for the controller's name
const HOSTNAME_SUFFIX: &str = "-oob";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Controller family, `drac` or `smc`
    #[serde(rename = "type")]
    pub vendor: Option<String>,
    /// Desired controller hostname
    pub hostname: Option<String>,
    pub network_mode: Option<String>,
    pub network_src: Option<String>,
    /// File holding the license private key
    pub key_file: Option<PathBuf>,
    pub level: Option<String>,
    pub ntp_servers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Read a settings file.
    ///
    /// A missing file is `None` unless `explicit` is set, in which case it is
    /// an error. Nothing is logged; the caller may not have a subscriber yet.
    pub fn read(path: &Path, explicit: bool) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => Ok(None),
            Err(e) => Err(Error::Config(format!("cannot read {}: {}", path.display(), e))),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Fields set in `overrides` replace ours
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            host: overrides.host.or(self.host),
            user: overrides.user.or(self.user),
            password: overrides.password.or(self.password),
            vendor: overrides.vendor.or(self.vendor),
            hostname: overrides.hostname.or(self.hostname),
            network_mode: overrides.network_mode.or(self.network_mode),
            network_src: overrides.network_src.or(self.network_src),
            key_file: overrides.key_file.or(self.key_file),
            level: overrides.level.or(self.level),
            ntp_servers: overrides.ntp_servers.or(self.ntp_servers),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(LOCALHOST)
    }

    pub fn vendor(&self) -> Result<Vendor> {
        self.vendor
            .as_deref()
            .ok_or_else(|| Error::Config("controller type not set (drac or smc)".to_string()))?
            .parse()
    }

    pub fn log_level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn target(&self) -> Result<Target> {
        Ok(Target {
            host: self.host().to_string(),
            user: self.user.clone().unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: self.password.clone(),
            vendor: self.vendor()?,
        })
    }

    /// The configured hostname, else `<short local hostname>-oob` for the
    /// local controller, else the remote host name itself
    pub fn desired_hostname(&self) -> Result<String> {
        if let Some(name) = &self.hostname {
            return Ok(name.clone());
        }
        if self.host() != LOCALHOST {
            return Ok(self.host().to_string());
        }

        let local = nix::unistd::gethostname()
            .map_err(|e| Error::Config(format!("cannot determine local hostname: {}", e)))?
            .into_string()
            .map_err(|_| Error::Config("local hostname is not valid UTF-8".to_string()))?;
        Ok(oob_hostname(&local))
    }

    /// License key bytes, trailing newline stripped
    pub fn license_key(&self) -> Result<Option<Vec<u8>>> {
        let Some(path) = &self.key_file else {
            return Ok(None);
        };
        let mut key = fs::read(path)
            .map_err(|e| Error::Config(format!("cannot read key file {}: {}", path.display(), e)))?;
        while matches!(key.last(), Some(b'\n' | b'\r')) {
            key.pop();
        }
        Ok(Some(key))
    }

    /// Resources to evaluate, in order
    pub fn plan(&self) -> Result<Plan> {
        let mut plan = Plan::new()
            .with(ResourceKind::Password, scalar(&self.password))
            .with(ResourceKind::Hostname, DesiredValue::Scalar(self.desired_hostname()?))
            .with(
                ResourceKind::Ntp,
                self.ntp_servers
                    .clone()
                    .filter(|servers| !servers.is_empty())
                    .map_or(DesiredValue::Absent, DesiredValue::List),
            )
            .with(ResourceKind::NetworkMode, scalar(&self.network_mode))
            .with(ResourceKind::NetworkSource, scalar(&self.network_src))
            .with(ResourceKind::Ddns, DesiredValue::Absent);

        if self.vendor()? == Vendor::Smc {
            let key = self
                .license_key()?
                .map_or(DesiredValue::Absent, DesiredValue::Blob);
            plan.set(ResourceKind::License, key);
        }
        Ok(plan)
    }
}

fn scalar(value: &Option<String>) -> DesiredValue {
    value
        .clone()
        .map_or(DesiredValue::Absent, DesiredValue::Scalar)
}

/// Controller name derived from a host's name: first label plus `-oob`
pub fn oob_hostname(local: &str) -> String {
    let short = local.split('.').next().unwrap_or(local);
    format!("{}{}", short, HOSTNAME_SUFFIX)
}
