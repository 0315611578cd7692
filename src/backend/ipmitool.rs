// src/backend/ipmitool.rs

//! Binary-protocol backend (`ipmitool`)
//!
//! Supermicro settings are read and written with OEM raw commands. The
//! `user` and `lan` subcommands are standard IPMI and are also used for
//! Dell controllers, always in-band.

use super::Backend;
use crate::codec::{build_command, parse_hex_tokens, parse_key_value_text, to_raw_args, Action, OemCommand};
use crate::error::{Error, Result};
use crate::runner::{redact, CommandOutput, CommandRunner};
use crate::target::{Target, DEFAULT_PASSWORD};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

const TOOL: &str = "ipmitool";

/// LAN channel configured by `lan print` / `lan set`
pub const LAN_CHANNEL: &str = "1";

/// IPMI completion code "Invalid data field in request"
pub const CC_INVALID_DATA_FIELD: u8 = 0xcc;

const INVALID_DATA_FIELD: &str = "Invalid data field in request";

/// OEM "restore factory defaults"; clears every setting, credentials included
pub const FACTORY_RESET: [u8; 3] = [0x30, 0x48, 0x01];

static COMPLETION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rsp=0x([0-9a-fA-F]{1,2})").expect("valid completion code regex"));

/// Runs `ipmitool` against a local or remote controller
#[derive(Clone)]
pub struct IpmiToolBackend {
    target: Target,
    runner: Arc<dyn CommandRunner>,
}

impl IpmiToolBackend {
    pub fn new(target: Target, runner: Arc<dyn CommandRunner>) -> Self {
        Self { target, runner }
    }

    /// In-band backend regardless of the configured host
    pub fn local(runner: Arc<dyn CommandRunner>, vendor: crate::target::Vendor) -> Self {
        Self::new(Target::local(vendor), runner)
    }

    /// Send a raw payload and decode the reply bytes
    pub fn raw(&self, data: &[u8]) -> Result<Vec<u8>> {
        let line = self.raw_text(false, data)?;
        parse_hex_tokens("ipmitool raw", &line)
    }

    /// Send a raw payload and return the reply as printed by the tool
    pub fn raw_text(&self, default_password: bool, data: &[u8]) -> Result<String> {
        let mut args = vec!["raw".to_string()];
        args.extend(to_raw_args(data));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let argv = self.command(default_password, &args)?;
        let output = self.runner.run(&argv, false)?;
        if !output.success() {
            return Err(classify_failure(redact(&argv), output));
        }
        Ok(output.stdout)
    }

    /// `netfn + command + get + sub`
    pub fn get(&self, command: OemCommand, sub: &[u8]) -> Result<Vec<u8>> {
        self.raw(&build_command(command, Some(Action::Get), sub))
    }

    /// `netfn + command + set + payload`
    pub fn set(&self, command: OemCommand, payload: &[u8]) -> Result<Vec<u8>> {
        self.raw(&build_command(command, Some(Action::Set), payload))
    }

    /// Read an enable flag: the first reply byte is 1 when enabled.
    ///
    /// Returns the flag and the bytes that followed it, which some commands
    /// require to be echoed back verbatim when enabling.
    pub fn enabled(&self, data: &[u8]) -> Result<(bool, Vec<u8>)> {
        let reply = self.raw(data)?;
        let Some((first, rest)) = reply.split_first() else {
            return Err(Error::invalid_response("ipmitool raw", "empty reply to enable query"));
        };
        Ok((*first == 1, rest.to_vec()))
    }

    /// `lan print` as a key/value map
    pub fn lan_print(&self) -> Result<HashMap<String, String>> {
        let output = self.run(&["lan", "print", LAN_CHANNEL], true)?;
        Ok(parse_key_value_text(&output.stdout))
    }

    pub fn lan_set(&self, parameter: &str, value: &str) -> Result<()> {
        self.run(&["lan", "set", LAN_CHANNEL, parameter, value], true)?;
        Ok(())
    }

    /// `user list` output
    pub fn user_list(&self) -> Result<String> {
        Ok(self.run(&["user", "list"], true)?.stdout)
    }

    /// Probe whether `password` authenticates user `id`
    pub fn user_test(&self, id: &str, size: u8, password: &str) -> Result<bool> {
        let size = size.to_string();
        let output = self.run(&["user", "test", id, &size, password], false)?;
        Ok(output.success())
    }

    /// Attempt to set the password of user `id`, authenticating with the
    /// factory default password. Failure is reported, not raised.
    pub fn user_set_password(&self, id: &str, password: &str) -> Result<bool> {
        let argv = self.command(true, &["user", "set", "password", id, password])?;
        Ok(self.runner.run(&argv, false)?.success())
    }

    /// Reset the controller to factory defaults, authenticating with the
    /// default password
    pub fn factory_reset(&self) -> Result<()> {
        self.raw_text(true, &FACTORY_RESET)?;
        Ok(())
    }
}

impl Backend for IpmiToolBackend {
    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    fn base_command(&self, default_password: bool) -> Result<Vec<String>> {
        if self.target.is_local() {
            return Ok(vec![TOOL.to_string()]);
        }

        let password = if default_password {
            DEFAULT_PASSWORD
        } else {
            self.target.password.as_deref().ok_or_else(|| {
                Error::Config(format!("no password configured for host {}", self.target.host))
            })?
        };

        Ok(vec![
            TOOL.to_string(),
            "-H".to_string(),
            self.target.host.clone(),
            "-U".to_string(),
            self.target.user.clone(),
            "-P".to_string(),
            password.to_string(),
        ])
    }
}

/// Completion code reported in ipmitool's `rsp=0xNN` diagnostic, if any
pub fn completion_code(text: &str) -> Option<u8> {
    let caps = COMPLETION_CODE.captures(text)?;
    u8::from_str_radix(&caps[1], 16).ok()
}

/// Map a failed raw command to the firmware "not supported" signal when the
/// completion code (or, lacking one, the message) says so.
fn classify_failure(command: String, output: CommandOutput) -> Error {
    let text = format!("{}\n{}", output.stderr, output.stdout);
    let unsupported = match completion_code(&text) {
        Some(code) => code == CC_INVALID_DATA_FIELD,
        None => text.contains(INVALID_DATA_FIELD),
    };

    if unsupported {
        debug!("Firmware rejected {} as unsupported", command);
        Error::UnsupportedFeature {
            command,
            message: output.stderr.trim().to_string(),
        }
    } else {
        output.into_error(command)
    }
}
