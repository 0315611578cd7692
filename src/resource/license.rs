// src/resource/license.rs

//! Supermicro out-of-band feature license
//!
//! Generating licenses for hardware you have not purchased them for is not
//! permitted. The key is derivable from the MAC address given the vendor
//! private key, which this tool does not ship; this resource exists so that
//! purchased activations can be applied unattended.

use super::{Resource, ResourceKind};
use crate::backend::IpmiToolBackend;
use crate::codec::{build_command, format_license, generate_license, OemCommand};
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Standard (non-OEM) Get LAN Configuration Parameters, parameter 5 (MAC)
/// on channel 1. The reply is a revision byte followed by the six MAC bytes.
pub const MAC_QUERY: [u8; 6] = [0x0c, 0x02, 0x01, 0x05, 0x00, 0x00];

/// License activation; converged when the controller reports it activated
pub struct License {
    key: Vec<u8>,
    backend: IpmiToolBackend,
}

impl License {
    pub fn new(key: Vec<u8>, backend: IpmiToolBackend) -> Self {
        Self { key, backend }
    }

    fn activated(&self) -> Result<bool> {
        let reply = self.backend.raw(&build_command(OemCommand::IsActivated, None, &[]))?;
        let status = *reply
            .first()
            .ok_or_else(|| Error::invalid_response("isactivated", "empty reply"))?;
        debug!("Activated: {}", status > 0);
        Ok(status > 0)
    }

    fn mac(&self) -> Result<[u8; 6]> {
        let reply = self.backend.raw(&MAC_QUERY)?;
        let bytes = reply
            .get(1..7)
            .ok_or_else(|| Error::invalid_response("get lan mac", format!("{} bytes", reply.len())))?;

        let mut mac = [0u8; 6];
        mac.copy_from_slice(bytes);
        debug!(
            "Mac is {}",
            mac.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(":")
        );
        Ok(mac)
    }
}

impl Resource for License {
    fn kind(&self) -> ResourceKind {
        ResourceKind::License
    }

    fn check(&mut self) -> Result<bool> {
        self.activated()
    }

    fn apply(&mut self) -> Result<()> {
        if self.activated()? {
            return Ok(());
        }

        info!(" - Setting license");
        let license = generate_license(&self.mac()?, &self.key)?;
        debug!("Generated license: {}", format_license(&license));

        let reply = self.backend.raw(&build_command(OemCommand::SetLicense, None, &license))?;
        match reply.first() {
            Some(0) => Ok(()),
            Some(&status) => Err(Error::LicenseActivation { status }),
            None => Err(Error::invalid_response("setlicense", "empty reply")),
        }
    }
}
