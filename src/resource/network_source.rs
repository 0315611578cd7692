// src/resource/network_source.rs

use super::{Resource, ResourceKind};
use crate::backend::IpmiToolBackend;
use crate::error::{Error, Result};
use ipnetwork::Ipv4Network;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::{debug, info};

const KEY_SOURCE: &str = "IP Address Source";
const KEY_ADDRESS: &str = "IP Address";
const KEY_NETMASK: &str = "Subnet Mask";

/// Desired addressing for the controller's LAN channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    Dhcp,
    /// A fixed address in CIDR form; a bare address means /32
    Static(Ipv4Network),
}

impl AddressSource {
    /// `ipsrc` value understood by `ipmitool lan set`
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Dhcp => "dhcp",
            Self::Static(_) => "static",
        }
    }

    pub fn address(&self) -> Result<Ipv4Addr> {
        match self {
            Self::Static(net) => Ok(net.ip()),
            Self::Dhcp => Err(Error::InvalidValue(
                "source is DHCP, there is no static address".to_string(),
            )),
        }
    }

    pub fn netmask(&self) -> Result<Ipv4Addr> {
        match self {
            Self::Static(net) => Ok(net.mask()),
            Self::Dhcp => Err(Error::InvalidValue(
                "source is DHCP, there is no static netmask".to_string(),
            )),
        }
    }
}

impl FromStr for AddressSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("dhcp") {
            return Ok(Self::Dhcp);
        }
        Ipv4Network::from_str(s)
            .map(Self::Static)
            .map_err(|e| Error::InvalidValue(format!("invalid network source '{}': {}", s, e)))
    }
}

/// LAN channel address source, shared by both vendors.
///
/// The live state comes from one `lan print` dump, cached for the lifetime
/// of the instance. A static source counts as converged when the mode
/// matches and *either* the address or the netmask matches.
pub struct NetworkSource {
    desired: AddressSource,
    backend: IpmiToolBackend,
    current: Option<HashMap<String, String>>,
}

impl NetworkSource {
    pub fn new(desired: AddressSource, backend: IpmiToolBackend) -> Self {
        Self {
            desired,
            backend,
            current: None,
        }
    }

    fn current(&mut self) -> Result<&HashMap<String, String>> {
        let current = match self.current.take() {
            Some(current) => current,
            None => self.backend.lan_print()?,
        };
        let current: &HashMap<String, String> = self.current.insert(current);
        Ok(current)
    }

    fn current_value(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.current()?.get(key).cloned())
    }

    fn current_mode(&mut self) -> Result<&'static str> {
        let source = self.current_value(KEY_SOURCE)?.unwrap_or_default();
        Ok(if source.contains("DHCP") {
            "dhcp"
        } else if source.contains("Static") {
            "static"
        } else {
            "other"
        })
    }

    fn mode_correct(&mut self) -> Result<bool> {
        debug!("  - Checking if network src mode set to {}", self.desired.mode());
        Ok(self.current_mode()? == self.desired.mode())
    }

    fn address_correct(&mut self) -> Result<bool> {
        debug!("  - Checking address");
        Ok(self.current_value(KEY_ADDRESS)? == Some(self.desired.address()?.to_string()))
    }

    fn netmask_correct(&mut self) -> Result<bool> {
        Ok(self.current_value(KEY_NETMASK)? == Some(self.desired.netmask()?.to_string()))
    }
}

impl Resource for NetworkSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::NetworkSource
    }

    fn check(&mut self) -> Result<bool> {
        if !self.mode_correct()? {
            return Ok(false);
        }
        match self.desired {
            AddressSource::Dhcp => Ok(true),
            AddressSource::Static(_) => Ok(self.address_correct()? || self.netmask_correct()?),
        }
    }

    fn apply(&mut self) -> Result<()> {
        if !self.mode_correct()? {
            info!(" - Setting network src to {}", self.desired.mode());
            self.backend.lan_set("ipsrc", self.desired.mode())?;
        }

        if let AddressSource::Static(_) = self.desired {
            if !self.address_correct()? {
                let address = self.desired.address()?.to_string();
                info!(" - Setting network address to {}", address);
                self.backend.lan_set("ipaddr", &address)?;
            }
            if !self.netmask_correct()? {
                let netmask = self.desired.netmask()?.to_string();
                info!(" - Setting network mask to {}", netmask);
                self.backend.lan_set("netmask", &netmask)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dhcp() {
        let src: AddressSource = "DHCP".parse().unwrap();
        assert_eq!(src, AddressSource::Dhcp);
        assert_eq!(src.mode(), "dhcp");
        assert!(matches!(src.address(), Err(Error::InvalidValue(_))));
        assert!(src.netmask().is_err());
    }

    #[test]
    fn test_parse_cidr() {
        let src: AddressSource = "10.1.2.3/24".parse().unwrap();
        assert_eq!(src.mode(), "static");
        assert_eq!(src.address().unwrap(), Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(src.netmask().unwrap(), Ipv4Addr::new(255, 255, 255, 0));
    }

    #[test]
    fn test_parse_bare_address() {
        let src: AddressSource = "10.1.2.3".parse().unwrap();
        assert_eq!(src.netmask().unwrap(), Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            "not-an-address".parse::<AddressSource>(),
            Err(Error::InvalidValue(_))
        ));
    }
}
