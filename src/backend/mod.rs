// src/backend/mod.rs

//! Vendor tool backends
//!
//! A backend knows how to turn a read or write of one controller setting
//! into an invocation of the vendor tool:
//!
//! - [`RacadmBackend`]: text protocol, `racadm get|set <dotted.key>`
//! - [`IpmiToolBackend`]: binary protocol, `ipmitool raw <bytes>` plus the
//!   `user` and `lan` subcommands that both vendors rely on
//!
//! Both share the [`Backend`] trait for building the base command line
//! (tool, host and credentials) and running it through a [`CommandRunner`].

mod ipmitool;
mod racadm;

pub use ipmitool::{completion_code, IpmiToolBackend, CC_INVALID_DATA_FIELD, FACTORY_RESET, LAN_CHANNEL};
pub use racadm::RacadmBackend;

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner};

/// Common behavior of the vendor tool backends
pub trait Backend {
    fn runner(&self) -> &dyn CommandRunner;

    /// Tool plus host/credential flags.
    ///
    /// `default_password` forces the factory default password instead of the
    /// configured one, for writes that must authenticate before the password
    /// has been converged.
    fn base_command(&self, default_password: bool) -> Result<Vec<String>>;

    /// Full command line for `args`
    fn command(&self, default_password: bool, args: &[&str]) -> Result<Vec<String>> {
        let mut argv = self.base_command(default_password)?;
        argv.extend(args.iter().map(|a| a.to_string()));
        Ok(argv)
    }

    /// Run `args` with the configured credentials
    fn run(&self, args: &[&str], force_fail: bool) -> Result<CommandOutput> {
        let argv = self.command(false, args)?;
        self.runner().run(&argv, force_fail)
    }
}
