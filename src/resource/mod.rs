// src/resource/mod.rs

//! Convergent controller resources
//!
//! A resource is one configurable controller attribute. It answers "does the
//! live state match the desired value?" and, when it does not, issues the
//! writes needed to make it match. Resources are built fresh for each check
//! or apply pass; any state they memoize lives only as long as the instance.
//!
//! The attribute logic (what to compare, in which order to write) is written
//! once per attribute, generic over a small driver trait. The vendor modules
//! supply the drivers that know the actual commands.

mod ddns;
mod hostname;
mod license;
mod network_mode;
mod network_source;
mod ntp;
mod password;

pub use ddns::{Ddns, DdnsDriver};
pub use hostname::{Hostname, HostnameDriver};
pub use license::{License, MAC_QUERY};
pub use network_mode::{NetworkMode, NetworkModeDriver, NicMode};
pub use network_source::{AddressSource, NetworkSource};
pub use ntp::{Ntp, NtpDriver, DEFAULT_NTP_SERVERS, NTP_SLOTS};
pub use password::{Password, PasswordDriver, RESET_SETTLE};

use crate::error::{Error, Result};
use std::fmt;
use tracing::info;

/// The fixed set of configurable attributes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ResourceKind {
    #[strum(to_string = "password")]
    Password,
    #[strum(to_string = "hostname")]
    Hostname,
    #[strum(to_string = "ntp")]
    Ntp,
    #[strum(to_string = "networkmode", serialize = "network_mode")]
    NetworkMode,
    #[strum(to_string = "networksrc", serialize = "networksource", serialize = "network_src")]
    NetworkSource,
    #[strum(to_string = "ddns")]
    Ddns,
    #[strum(to_string = "license")]
    License,
}

impl ResourceKind {
    /// Resources whose firmware support is optional; an "unsupported"
    /// rejection skips them instead of failing the batch
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Ntp | Self::Ddns)
    }

    /// Whether the desired value must be kept out of logs and output
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Password | Self::License)
    }
}

/// Desired value for a resource
#[derive(Clone, PartialEq, Eq)]
pub enum DesiredValue {
    /// Not specified
    Absent,
    Scalar(String),
    List(Vec<String>),
    /// Opaque bytes, e.g. a license private key
    Blob(Vec<u8>),
}

impl DesiredValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_scalar(&self, kind: ResourceKind) -> Result<&str> {
        match self {
            Self::Scalar(s) => Ok(s),
            _ => Err(Error::InvalidValue(format!("{} expects a single value", kind))),
        }
    }

    pub fn as_list(&self, kind: ResourceKind) -> Result<Vec<String>> {
        match self {
            Self::List(items) => Ok(items.clone()),
            Self::Scalar(s) => Ok(vec![s.clone()]),
            _ => Err(Error::InvalidValue(format!("{} expects a list of values", kind))),
        }
    }

    pub fn as_bytes(&self, kind: ResourceKind) -> Result<Vec<u8>> {
        match self {
            Self::Blob(bytes) => Ok(bytes.clone()),
            Self::Scalar(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(Error::InvalidValue(format!("{} expects a key", kind))),
        }
    }
}

impl fmt::Debug for DesiredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Blob(bytes) => write!(f, "Blob({} bytes)", bytes.len()),
        }
    }
}

impl fmt::Display for DesiredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("(default)"),
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// A convergent controller attribute
pub trait Resource {
    fn kind(&self) -> ResourceKind;

    /// Compare live state with the desired value. Reads only.
    fn check(&mut self) -> Result<bool>;

    /// Issue the writes needed to converge. A no-op when already converged;
    /// does not re-verify afterwards.
    fn apply(&mut self) -> Result<()>;

    /// [`check`](Self::check) with the verdict logged
    fn is_converged(&mut self) -> Result<bool> {
        let converged = self.check()?;
        info!("{}: converged: {}", self.kind(), converged);
        Ok(converged)
    }

    /// [`apply`](Self::apply) with progress logged
    fn converge(&mut self) -> Result<()> {
        info!("Validating {}", self.kind());
        self.apply()
    }
}
