// src/resource/network_mode.rs

use super::{Resource, ResourceKind};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Which physical port the controller's network interface uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicMode {
    /// Dedicated management port
    Dedicated,
    /// Shared with a host LOM port
    Shared,
    /// Dedicated with fallback to shared
    Failover,
}

impl NicMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dedicated => "dedicated",
            Self::Shared => "shared",
            Self::Failover => "failover",
        }
    }
}

impl fmt::Display for NicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NicMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dedicated" => Ok(Self::Dedicated),
            "shared" => Ok(Self::Shared),
            "failover" => Ok(Self::Failover),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// Vendor access to the NIC selection
pub trait NetworkModeDriver {
    /// Current mode, `None` if the controller reports something unrecognised
    fn mode(&mut self) -> Result<Option<NicMode>>;
    fn set_mode(&mut self, mode: NicMode) -> Result<()>;
}

/// NIC selection; converged when the controller reports the desired mode
pub struct NetworkMode<D> {
    desired: NicMode,
    driver: D,
}

impl<D: NetworkModeDriver> NetworkMode<D> {
    pub fn new(desired: NicMode, driver: D) -> Self {
        Self { desired, driver }
    }

    fn mode_correct(&mut self) -> Result<bool> {
        debug!("  - Checking NIC mode");
        let current = self.driver.mode()?;
        debug!("mode: {:?}", current);
        Ok(current == Some(self.desired))
    }
}

impl<D: NetworkModeDriver> Resource for NetworkMode<D> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::NetworkMode
    }

    fn check(&mut self) -> Result<bool> {
        self.mode_correct()
    }

    fn apply(&mut self) -> Result<()> {
        if !self.mode_correct()? {
            info!(" - Setting network to {}", self.desired);
            self.driver.set_mode(self.desired)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("Shared".parse::<NicMode>().unwrap(), NicMode::Shared);
        assert_eq!("dedicated".parse::<NicMode>().unwrap(), NicMode::Dedicated);
        assert_eq!("failover".parse::<NicMode>().unwrap(), NicMode::Failover);
        assert!(matches!("lom2".parse::<NicMode>(), Err(Error::InvalidMode(_))));
    }

    struct Port(Option<NicMode>, usize);

    impl NetworkModeDriver for &mut Port {
        fn mode(&mut self) -> Result<Option<NicMode>> {
            Ok(self.0)
        }

        fn set_mode(&mut self, mode: NicMode) -> Result<()> {
            self.0 = Some(mode);
            self.1 += 1;
            Ok(())
        }
    }

    #[test]
    fn test_unknown_current_mode_converges() {
        let mut port = Port(None, 0);
        let mut resource = NetworkMode::new(NicMode::Dedicated, &mut port);
        assert!(!resource.check().unwrap());
        resource.apply().unwrap();
        resource.apply().unwrap();
        drop(resource);
        assert_eq!(port.0, Some(NicMode::Dedicated));
        assert_eq!(port.1, 1);
    }
}
