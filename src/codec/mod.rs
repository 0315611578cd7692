// src/codec/mod.rs

//! Byte and text codecs shared by both vendor backends
//!
//! - Raw IPMI payloads are passed to `ipmitool raw` as `0xNN` tokens and come
//!   back as whitespace-separated hex tokens
//! - Controller string replies are raw UTF-8 bytes
//! - `racadm get` and `ipmitool lan print` emit line-oriented `key=value` /
//!   `key : value` blocks

pub mod license;
pub mod raw;

pub use license::{format_license, generate_license, parse_mac, LICENSE_LEN};
pub use raw::{build_command, Action, OemCommand, NETFN_OEM};

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Interpret controller reply bytes as UTF-8 text
pub fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Render payload bytes as `ipmitool raw` arguments
pub fn to_raw_args(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| format!("0x{:02x}", b)).collect()
}

/// Parse the whitespace-separated hex tokens printed by `ipmitool raw`
pub fn parse_hex_tokens(command: &str, output: &str) -> Result<Vec<u8>> {
    output
        .split_whitespace()
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u8::from_str_radix(digits, 16).map_err(|_| {
                Error::invalid_response(command, format!("'{}' is not a hex byte", token))
            })
        })
        .collect()
}

/// Parse a `key=value` / `key: value` text block into a map.
///
/// Each line is split on whichever of `=` or `:` comes first. Blank lines,
/// `[section]` headers and lines without a separator are skipped. Keys and
/// values are trimmed; a repeated key keeps its last value.
pub fn parse_key_value_text(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('[') {
            continue;
        }

        let Some(split) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..split].trim();
        let value = line[split + 1..].trim();
        map.insert(key.to_string(), value.to_string());
    }

    map
}
