// src/resource/ddns.rs

use super::{Resource, ResourceKind};
use crate::error::Result;
use tracing::info;

/// Vendor access to dynamic DNS registration
pub trait DdnsDriver {
    fn enabled(&mut self) -> Result<bool>;
    fn enable(&mut self) -> Result<()>;
}

/// Dynamic DNS registration; converged when enabled
pub struct Ddns<D> {
    driver: D,
}

impl<D: DdnsDriver> Ddns<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }
}

impl<D: DdnsDriver> Resource for Ddns<D> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Ddns
    }

    fn check(&mut self) -> Result<bool> {
        self.driver.enabled()
    }

    fn apply(&mut self) -> Result<()> {
        if !self.driver.enabled()? {
            info!(" - Enabling DDNS");
            self.driver.enable()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag {
        on: bool,
        enables: usize,
    }

    impl DdnsDriver for &mut Flag {
        fn enabled(&mut self) -> Result<bool> {
            Ok(self.on)
        }

        fn enable(&mut self) -> Result<()> {
            self.on = true;
            self.enables += 1;
            Ok(())
        }
    }

    #[test]
    fn test_enable_once() {
        let mut flag = Flag { on: false, enables: 0 };
        let mut ddns = Ddns::new(&mut flag);
        ddns.converge().unwrap();
        assert!(ddns.is_converged().unwrap());
        ddns.converge().unwrap();
        drop(ddns);
        assert_eq!(flag.enables, 1);
    }
}
