// src/resource/hostname.rs

use super::{Resource, ResourceKind};
use crate::error::Result;
use tracing::{debug, info};

/// Vendor access to the controller's own hostname
pub trait HostnameDriver {
    fn hostname(&mut self) -> Result<String>;
    fn set_hostname(&mut self, name: &str) -> Result<()>;
}

/// Controller hostname; converged when it equals the desired name exactly
pub struct Hostname<D> {
    desired: String,
    driver: D,
}

impl<D: HostnameDriver> Hostname<D> {
    pub fn new(desired: impl Into<String>, driver: D) -> Self {
        Self {
            desired: desired.into(),
            driver,
        }
    }
}

impl<D: HostnameDriver> Resource for Hostname<D> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Hostname
    }

    fn check(&mut self) -> Result<bool> {
        let current = self.driver.hostname()?;
        debug!("'{}' vs '{}'", current, self.desired);
        Ok(current == self.desired)
    }

    fn apply(&mut self) -> Result<()> {
        if !self.check()? {
            info!(" - Setting hostname ({})", self.desired);
            self.driver.set_hostname(&self.desired)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeController {
        name: String,
        writes: usize,
    }

    impl HostnameDriver for &mut FakeController {
        fn hostname(&mut self) -> Result<String> {
            Ok(self.name.clone())
        }

        fn set_hostname(&mut self, name: &str) -> Result<()> {
            self.name = name.to_string();
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut fake = FakeController {
            name: "old".to_string(),
            ..Default::default()
        };

        let mut resource = Hostname::new("web01-oob", &mut fake);
        assert!(!resource.is_converged().unwrap());
        resource.converge().unwrap();
        assert!(resource.is_converged().unwrap());
        resource.converge().unwrap();
        drop(resource);

        assert_eq!(fake.name, "web01-oob");
        assert_eq!(fake.writes, 1);
    }
}
