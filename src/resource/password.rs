// src/resource/password.rs

use super::{Resource, ResourceKind};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{info, warn};

/// How long the controller needs after a factory reset before it accepts
/// new credentials. It gives no readiness signal.
pub const RESET_SETTLE: Duration = Duration::from_secs(5);

/// Vendor access to the administrator credential
pub trait PasswordDriver {
    /// Id of the administrator account; resolved once and cached
    fn admin_id(&mut self) -> Result<String>;

    /// Probe whether `password` authenticates user `id`
    fn test_password(&mut self, id: &str, password: &str) -> Result<bool>;

    /// Try to set the password; `false` when the controller refused
    fn set_password(&mut self, id: &str, password: &str) -> Result<bool>;

    /// Restore factory defaults, clearing leftover credentials
    fn factory_reset(&mut self) -> Result<()>;

    /// Uninterruptible wait after the reset
    fn settle(&mut self, duration: Duration);
}

/// Administrator password; converged when a live credential probe with the
/// desired password succeeds.
///
/// A refused write is taken to mean a leftover non-default password. The
/// controller is then reset to factory defaults and the write retried once.
pub struct Password<D> {
    password: String,
    driver: D,
}

impl<D: PasswordDriver> Password<D> {
    pub fn new(password: impl Into<String>, driver: D) -> Self {
        Self {
            password: password.into(),
            driver,
        }
    }
}

impl<D: PasswordDriver> Resource for Password<D> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Password
    }

    fn check(&mut self) -> Result<bool> {
        let id = self.driver.admin_id()?;
        self.driver.test_password(&id, &self.password)
    }

    fn apply(&mut self) -> Result<()> {
        if self.check()? {
            return Ok(());
        }

        info!(" - Setting password");
        let id = self.driver.admin_id()?;
        if self.driver.set_password(&id, &self.password)? {
            return Ok(());
        }

        warn!("Password write refused, resetting controller to factory defaults");
        self.driver.factory_reset()?;
        self.driver.settle(RESET_SETTLE);

        if self.driver.set_password(&id, &self.password)? {
            Ok(())
        } else {
            Err(Error::PasswordResetExhausted { user_id: id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        current: String,
        refusals: usize,
        log: Vec<String>,
    }

    impl PasswordDriver for &mut Scripted {
        fn admin_id(&mut self) -> Result<String> {
            Ok("2".to_string())
        }

        fn test_password(&mut self, _id: &str, password: &str) -> Result<bool> {
            Ok(self.current == password)
        }

        fn set_password(&mut self, _id: &str, password: &str) -> Result<bool> {
            self.log.push("set".to_string());
            if self.refusals > 0 {
                self.refusals -= 1;
                return Ok(false);
            }
            self.current = password.to_string();
            Ok(true)
        }

        fn factory_reset(&mut self) -> Result<()> {
            self.log.push("reset".to_string());
            Ok(())
        }

        fn settle(&mut self, duration: Duration) {
            self.log.push(format!("settle {}s", duration.as_secs()));
        }
    }

    #[test]
    fn test_already_set() {
        let mut ctl = Scripted { current: "pw".into(), refusals: 0, log: vec![] };
        Password::new("pw", &mut ctl).apply().unwrap();
        assert!(ctl.log.is_empty());
    }

    #[test]
    fn test_direct_set() {
        let mut ctl = Scripted { current: "ADMIN".into(), refusals: 0, log: vec![] };
        let mut resource = Password::new("pw", &mut ctl);
        resource.apply().unwrap();
        assert!(resource.check().unwrap());
        drop(resource);
        assert_eq!(ctl.log, vec!["set"]);
    }

    #[test]
    fn test_reset_then_retry() {
        let mut ctl = Scripted { current: "legacy".into(), refusals: 1, log: vec![] };
        Password::new("pw", &mut ctl).apply().unwrap();
        assert_eq!(ctl.log, vec!["set", "reset", "settle 5s", "set"]);
        assert_eq!(ctl.current, "pw");
    }

    #[test]
    fn test_retry_bounded_to_one() {
        let mut ctl = Scripted { current: "legacy".into(), refusals: 5, log: vec![] };
        let err = Password::new("pw", &mut ctl).apply().unwrap_err();
        assert!(matches!(err, Error::PasswordResetExhausted { .. }));
        assert_eq!(ctl.log, vec!["set", "reset", "settle 5s", "set"]);
    }
}
