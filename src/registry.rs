// src/registry.rs

//! Resource constructor registry
//!
//! Maps a (vendor, resource) pair to the function that builds the resource
//! for a target. Built once at startup; a pair with no entry fails with
//! [`Error::UnknownResource`].

use crate::error::{Error, Result};
use crate::resource::{DesiredValue, Resource, ResourceKind};
use crate::runner::CommandRunner;
use crate::target::{Target, Vendor};
use crate::vendor::{drac, smc};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds one resource for `target` with the desired value
pub type Constructor =
    fn(&Target, &DesiredValue, Arc<dyn CommandRunner>) -> Result<Box<dyn Resource>>;

#[derive(Default)]
pub struct Registry {
    entries: HashMap<(Vendor, ResourceKind), Constructor>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every resource both vendor families support
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        drac::register(&mut registry);
        smc::register(&mut registry);
        registry
    }

    /// Add or replace the constructor for a pair
    pub fn register(&mut self, vendor: Vendor, kind: ResourceKind, constructor: Constructor) {
        self.entries.insert((vendor, kind), constructor);
    }

    pub fn supports(&self, vendor: Vendor, kind: ResourceKind) -> bool {
        self.entries.contains_key(&(vendor, kind))
    }

    pub fn build(
        &self,
        target: &Target,
        kind: ResourceKind,
        desired: &DesiredValue,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Box<dyn Resource>> {
        let constructor = self
            .entries
            .get(&(target.vendor, kind))
            .ok_or_else(|| Error::UnknownResource {
                vendor: target.vendor.to_string(),
                resource: kind.to_string(),
            })?;
        constructor(target, desired, runner)
    }

    /// Build by resource name, as written in configuration
    pub fn build_named(
        &self,
        target: &Target,
        name: &str,
        desired: &DesiredValue,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Box<dyn Resource>> {
        let kind = name.parse::<ResourceKind>().map_err(|_| Error::UnknownResource {
            vendor: target.vendor.to_string(),
            resource: name.to_string(),
        })?;
        self.build(target, kind, desired, runner)
    }
}
