// src/lib.rs

//! setup-oob: out-of-band controller configuration
//!
//! Converges the settings of Dell iDRAC and Supermicro IPMI controllers
//! (hostname, NTP, dynamic DNS, NIC mode, LAN address source, administrator
//! password, license activation) by driving the vendor command-line tools.
//!
//! # Architecture
//!
//! - Runner: executes a tool argument vector, nothing else
//! - Backends: `racadm` text attributes and `ipmitool raw` OEM payloads
//! - Resources: one convergent attribute each, check then apply
//! - Vendor drivers: map a resource's reads and writes onto a backend
//! - Registry and orchestrator: build resources per (vendor, name) and run
//!   them as an ordered batch

pub mod backend;
pub mod codec;
pub mod config;
mod error;
pub mod orchestrator;
pub mod registry;
pub mod resource;
pub mod runner;
pub mod target;
pub mod vendor;

pub use config::{Settings, DEFAULT_CONFIG_PATH};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, Plan, PlanEntry};
pub use registry::Registry;
pub use resource::{DesiredValue, Resource, ResourceKind};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use target::{Target, Vendor};
