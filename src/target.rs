// src/target.rs

//! Where commands run and with which credentials

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Host name that selects in-band access through the local tool
pub const LOCALHOST: &str = "localhost";

/// Administrator account name on Supermicro controllers
pub const DEFAULT_USER: &str = "ADMIN";

/// Factory default password on Supermicro controllers
pub const DEFAULT_PASSWORD: &str = "ADMIN";

/// Controller vendor family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Dell iDRAC, driven through `racadm`
    Drac,
    /// Supermicro IPMI, driven through `ipmitool raw`
    Smc,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drac => "drac",
            Self::Smc => "smc",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drac" | "idrac" | "dell" => Ok(Self::Drac),
            "smc" | "supermicro" => Ok(Self::Smc),
            _ => Err(Error::UnknownVendor(s.to_string())),
        }
    }
}

/// A controller to configure
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub vendor: Vendor,
}

impl Target {
    pub fn new(host: impl Into<String>, vendor: Vendor) -> Self {
        Self {
            host: host.into(),
            user: DEFAULT_USER.to_string(),
            password: None,
            vendor,
        }
    }

    /// Local target for `vendor`
    pub fn local(vendor: Vendor) -> Self {
        Self::new(LOCALHOST, vendor)
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = Some(password.into());
        self
    }

    pub fn is_local(&self) -> bool {
        self.host == LOCALHOST
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("vendor", &self.vendor)
            .finish()
    }
}
