// src/backend/racadm.rs

//! Dell iDRAC text-protocol backend (`racadm`)

use super::Backend;
use crate::codec::parse_key_value_text;
use crate::error::{Error, Result};
use crate::runner::CommandRunner;
use crate::target::Target;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const TOOL: &str = "racadm";

/// Reads and writes iDRAC attributes by dotted key
#[derive(Clone)]
pub struct RacadmBackend {
    target: Target,
    runner: Arc<dyn CommandRunner>,
}

impl RacadmBackend {
    pub fn new(target: Target, runner: Arc<dyn CommandRunner>) -> Self {
        Self { target, runner }
    }

    /// Read one attribute.
    ///
    /// `racadm get` prints a `[Key=...]` header followed by `Name=value`;
    /// the value is the right-hand side of the second line.
    pub fn get(&self, key: &str) -> Result<String> {
        let output = self.run(&["get", key], true)?;
        let line = output
            .stdout
            .lines()
            .nth(1)
            .ok_or_else(|| Error::invalid_response(format!("racadm get {}", key), "no value line"))?;

        let value = line
            .trim()
            .split('=')
            .nth(1)
            .ok_or_else(|| {
                Error::invalid_response(format!("racadm get {}", key), format!("no '=' in '{}'", line))
            })?
            .to_string();
        debug!("{} = {}", key, value);
        Ok(value)
    }

    /// Read every attribute of a group as a map
    pub fn get_multi(&self, key: &str) -> Result<HashMap<String, String>> {
        let output = self.run(&["get", key], true)?;
        Ok(parse_key_value_text(&output.stdout))
    }

    /// Raw `racadm get` output, for listings that are not key/value blocks
    pub fn get_raw(&self, key: &str) -> Result<String> {
        Ok(self.run(&["get", key], true)?.stdout)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["set", key, value], true)?;
        Ok(())
    }
}

impl Backend for RacadmBackend {
    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    fn base_command(&self, _default_password: bool) -> Result<Vec<String>> {
        if self.target.is_local() {
            Ok(vec![TOOL.to_string()])
        } else {
            Err(Error::UnsupportedTarget {
                tool: TOOL.to_string(),
                host: self.target.host.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::mock::MockRunner;
    use crate::target::Vendor;

    fn backend(mock: &Arc<MockRunner>) -> RacadmBackend {
        RacadmBackend::new(Target::local(Vendor::Drac), mock.clone())
    }

    #[test]
    fn test_get_takes_second_line() {
        let mock = Arc::new(MockRunner::new());
        mock.on(
            "get iDRAC.NIC.DNSRacName",
            "[Key=iDRAC.Embedded.1#NIC.1]\nDNSRacName=web01-oob\n",
        );

        let value = backend(&mock).get("iDRAC.NIC.DNSRacName").unwrap();
        assert_eq!(value, "web01-oob");
        assert_eq!(mock.calls(), vec!["racadm get iDRAC.NIC.DNSRacName"]);
    }

    #[test]
    fn test_get_without_value_line() {
        let mock = Arc::new(MockRunner::new());
        mock.on("get iDRAC.NIC.Selection", "[Key=iDRAC.Embedded.1#NIC.1]\n");
        let err = backend(&mock).get("iDRAC.NIC.Selection").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse { .. }));
    }

    #[test]
    fn test_get_multi_and_set() {
        let mock = Arc::new(MockRunner::new());
        mock.on(
            "get idrac.NTPConfigGroup",
            "[Key=iDRAC.Embedded.1#NTPConfigGroup.1]\nNTP1=a\nNTP2=b\nNTPEnable=Disabled\n",
        );

        let backend = backend(&mock);
        let vals = backend.get_multi("idrac.NTPConfigGroup").unwrap();
        assert_eq!(vals["NTP2"], "b");

        backend.set("idrac.NTPConfigGroup.NTPEnable", "Enabled").unwrap();
        assert_eq!(
            mock.calls().last().unwrap(),
            "racadm set idrac.NTPConfigGroup.NTPEnable Enabled"
        );
    }

    #[test]
    fn test_set_failure_is_fatal() {
        let mock = Arc::new(MockRunner::new());
        mock.on_failure("set iDRAC.NIC.DNSRegister Enabled", "ERROR: invalid");
        let err = backend(&mock).set("iDRAC.NIC.DNSRegister", "Enabled").unwrap_err();
        assert!(matches!(err, Error::ShellExecution { .. }));
    }

    #[test]
    fn test_remote_target_unsupported() {
        let mock = Arc::new(MockRunner::new());
        let backend = RacadmBackend::new(
            Target::new("idrac01.example.com", Vendor::Drac).with_credentials("root", "calvin"),
            mock.clone(),
        );
        let err = backend.get("iDRAC.NIC.DNSRacName").unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget { .. }));
        assert!(mock.calls().is_empty());
    }
}
