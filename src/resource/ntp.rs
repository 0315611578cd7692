// src/resource/ntp.rs

use super::{Resource, ResourceKind};
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Servers used when none are configured
pub const DEFAULT_NTP_SERVERS: [&str; 2] = ["0.pool.ntp.org", "1.pool.ntp.org"];

/// Controllers expose a primary and a secondary server slot
pub const NTP_SLOTS: usize = 2;

/// Vendor access to the NTP client settings
pub trait NtpDriver {
    fn enabled(&mut self) -> Result<bool>;
    fn enable(&mut self) -> Result<()>;
    /// Server configured in `slot` (0 = primary)
    fn server(&mut self, slot: usize) -> Result<Option<String>>;
    fn set_server(&mut self, slot: usize, server: &str) -> Result<()>;
}

/// NTP client; converged when enabled and every desired server sits in
/// the slot matching its position
pub struct Ntp<D> {
    servers: Vec<String>,
    driver: D,
}

impl<D: NtpDriver> Ntp<D> {
    pub fn new(servers: Vec<String>, driver: D) -> Result<Self> {
        if servers.len() > NTP_SLOTS {
            return Err(Error::InvalidValue(format!(
                "at most {} NTP servers can be configured, got {}",
                NTP_SLOTS,
                servers.len()
            )));
        }
        Ok(Self { servers, driver })
    }

    fn server_correct(&mut self, slot: usize) -> Result<bool> {
        let current = self.driver.server(slot)?;
        Ok(current.as_deref() == Some(self.servers[slot].as_str()))
    }
}

impl<D: NtpDriver> Resource for Ntp<D> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Ntp
    }

    fn check(&mut self) -> Result<bool> {
        let mut servers_correct = true;
        for slot in 0..self.servers.len() {
            let correct = self.server_correct(slot)?;
            debug!(" - NTP{} correct: {}", slot + 1, correct);
            servers_correct &= correct;
        }
        Ok(self.driver.enabled()? && servers_correct)
    }

    fn apply(&mut self) -> Result<()> {
        debug!(" - Checking if enabled");
        if !self.driver.enabled()? {
            info!(" - Enabling NTP");
            self.driver.enable()?;
        }

        for slot in 0..self.servers.len() {
            debug!(" - Checking if NTP{} is correct", slot + 1);
            if !self.server_correct(slot)? {
                info!(" - Setting NTP{} server", slot + 1);
                let server = self.servers[slot].clone();
                self.driver.set_server(slot, &server)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeNtp {
        enabled: bool,
        slots: [Option<String>; NTP_SLOTS],
        writes: Vec<String>,
    }

    impl NtpDriver for &mut FakeNtp {
        fn enabled(&mut self) -> Result<bool> {
            Ok(self.enabled)
        }

        fn enable(&mut self) -> Result<()> {
            self.enabled = true;
            self.writes.push("enable".to_string());
            Ok(())
        }

        fn server(&mut self, slot: usize) -> Result<Option<String>> {
            Ok(self.slots[slot].clone())
        }

        fn set_server(&mut self, slot: usize, server: &str) -> Result<()> {
            self.slots[slot] = Some(server.to_string());
            self.writes.push(format!("slot{}={}", slot, server));
            Ok(())
        }
    }

    fn defaults() -> Vec<String> {
        DEFAULT_NTP_SERVERS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_disabled_is_not_converged() {
        let mut fake = FakeNtp {
            slots: [Some("0.pool.ntp.org".into()), Some("1.pool.ntp.org".into())],
            ..Default::default()
        };
        let mut ntp = Ntp::new(defaults(), &mut fake).unwrap();
        assert!(!ntp.check().unwrap());
    }

    #[test]
    fn test_only_mismatched_slots_written() {
        let mut fake = FakeNtp {
            enabled: true,
            slots: [Some("0.pool.ntp.org".into()), Some("time.example.com".into())],
            ..Default::default()
        };

        let mut ntp = Ntp::new(defaults(), &mut fake).unwrap();
        ntp.apply().unwrap();
        assert!(ntp.check().unwrap());
        ntp.apply().unwrap();
        drop(ntp);

        assert_eq!(fake.writes, vec!["slot1=1.pool.ntp.org"]);
    }

    #[test]
    fn test_enable_then_servers() {
        let mut fake = FakeNtp::default();
        let mut ntp = Ntp::new(defaults(), &mut fake).unwrap();
        ntp.apply().unwrap();
        drop(ntp);

        assert_eq!(
            fake.writes,
            vec!["enable", "slot0=0.pool.ntp.org", "slot1=1.pool.ntp.org"]
        );
    }

    #[test]
    fn test_too_many_servers() {
        let mut fake = FakeNtp::default();
        let servers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(matches!(
            Ntp::new(servers, &mut fake),
            Err(Error::InvalidValue(_))
        ));
    }
}
