// src/codec/license.rs

//! Supermicro out-of-band license derivation
//!
//! The activation key is the first 12 bytes of HMAC-SHA1 over the six raw
//! MAC address bytes, keyed with the vendor private key. The key itself is
//! never shipped with this tool; it must be supplied by the operator.

use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Length of an activation key in bytes
pub const LICENSE_LEN: usize = 12;

type HmacSha1 = Hmac<Sha1>;

/// Parse a colon-separated MAC address into its six bytes
pub fn parse_mac(mac: &str) -> Result<[u8; 6]> {
    let parts: Vec<&str> = mac.trim().split(':').collect();
    if parts.len() != 6 {
        return Err(Error::InvalidValue(format!("malformed MAC address: {}", mac)));
    }

    let mut bytes = [0u8; 6];
    for (slot, part) in bytes.iter_mut().zip(&parts) {
        *slot = u8::from_str_radix(part, 16)
            .map_err(|_| Error::InvalidValue(format!("malformed MAC address: {}", mac)))?;
    }
    Ok(bytes)
}

/// Derive the activation key for `mac` from the private `key`
pub fn generate_license(mac: &[u8; 6], key: &[u8]) -> Result<[u8; LICENSE_LEN]> {
    let mut hmac = HmacSha1::new_from_slice(key)
        .map_err(|e| Error::InvalidValue(format!("unusable license key: {}", e)))?;
    hmac.update(mac);
    let digest = hmac.finalize().into_bytes();

    let mut license = [0u8; LICENSE_LEN];
    license.copy_from_slice(&digest[..LICENSE_LEN]);
    Ok(license)
}

/// Human-readable form, e.g. `6504-B602-86DF-A4C8-8359-97EB`
pub fn format_license(license: &[u8; LICENSE_LEN]) -> String {
    license
        .chunks(2)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join("-")
}
