// src/orchestrator.rs

//! Batch evaluation of a host's resources
//!
//! A [`Plan`] is the ordered list of resources with their desired values.
//! The [`Orchestrator`] walks it once per pass, building every resource
//! fresh from the registry, and either ANDs the convergence verdicts
//! (check) or converges each resource in turn (apply).
//!
//! Rules applied to every pass:
//!
//! - Password is always evaluated first; the other resources authenticate
//!   with it
//! - An absent value for NTP falls back to the public pool servers; an
//!   absent DDNS value runs anyway; any other absent value skips the
//!   resource with a warning
//! - NTP and DDNS may be rejected by firmware that lacks them; that
//!   rejection skips the resource, any other error aborts the batch
//! - Nothing is rolled back on abort

use crate::error::Result;
use crate::registry::Registry;
use crate::resource::{DesiredValue, Resource, ResourceKind, DEFAULT_NTP_SERVERS};
use crate::runner::CommandRunner;
use crate::target::Target;
use std::sync::Arc;
use tracing::{debug, warn};

/// One planned resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub kind: ResourceKind,
    pub desired: DesiredValue,
}

impl PlanEntry {
    /// Human-readable line with secrets masked
    pub fn description(&self) -> String {
        let value = if self.kind.is_secret() && !self.desired.is_absent() {
            "****".to_string()
        } else {
            self.desired.to_string()
        };
        format!("{}: {}", self.kind, value)
    }
}

/// Ordered resources for one host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any earlier entry of the same kind
    pub fn set(&mut self, kind: ResourceKind, desired: DesiredValue) {
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => entry.desired = desired,
            None => self.entries.push(PlanEntry { kind, desired }),
        }
    }

    pub fn with(mut self, kind: ResourceKind, desired: DesiredValue) -> Self {
        self.set(kind, desired);
        self
    }

    /// Entries in evaluation order: password first, the rest as added
    pub fn entries(&self) -> Vec<&PlanEntry> {
        let mut ordered: Vec<&PlanEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|e| e.kind != ResourceKind::Password);
        ordered
    }

    pub fn describe(&self) -> Vec<String> {
        self.entries().into_iter().map(PlanEntry::description).collect()
    }
}

/// Runs check and apply passes for one target
pub struct Orchestrator {
    target: Target,
    registry: Registry,
    runner: Arc<dyn CommandRunner>,
}

impl Orchestrator {
    /// Orchestrator using the built-in registry
    pub fn new(target: Target, runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_registry(target, Registry::builtin(), runner)
    }

    pub fn with_registry(target: Target, registry: Registry, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            target,
            registry,
            runner,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether every evaluated resource is converged.
    ///
    /// Every resource is evaluated even after one reports drift.
    pub fn check(&self, plan: &Plan) -> Result<bool> {
        let mut converged = true;
        self.each(plan, |resource| {
            converged &= resource.is_converged()?;
            Ok(())
        })?;
        Ok(converged)
    }

    /// Converge every resource in order
    pub fn apply(&self, plan: &Plan) -> Result<()> {
        self.each(plan, |resource| resource.converge())
    }

    /// The resources a pass would evaluate, after defaults and skips
    pub fn resolve(&self, plan: &Plan) -> Vec<PlanEntry> {
        plan.entries()
            .into_iter()
            .filter_map(|entry| self.resolve_entry(entry))
            .collect()
    }

    fn resolve_entry(&self, entry: &PlanEntry) -> Option<PlanEntry> {
        let kind = entry.kind;

        if !self.registry.supports(self.target.vendor, kind) && kind == ResourceKind::License {
            warn!("Will not check/activate license, not supported on {}", self.target.vendor);
            return None;
        }

        let desired = match (&entry.desired, kind) {
            (DesiredValue::Absent, ResourceKind::Ntp) => {
                DesiredValue::List(DEFAULT_NTP_SERVERS.iter().map(|s| s.to_string()).collect())
            }
            (DesiredValue::Absent, ResourceKind::Ddns) => DesiredValue::Absent,
            (DesiredValue::Absent, ResourceKind::License) => {
                warn!("Will not check/activate license, no private key available");
                return None;
            }
            (DesiredValue::Absent, _) => {
                warn!("Will not set {}, not specified", kind);
                return None;
            }
            (desired, _) => desired.clone(),
        };

        Some(PlanEntry { kind, desired })
    }

    fn each<F>(&self, plan: &Plan, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut dyn Resource) -> Result<()>,
    {
        for entry in self.resolve(plan) {
            debug!("Evaluating {} on {}", entry.kind, self.target.host);
            let mut resource =
                self.registry
                    .build(&self.target, entry.kind, &entry.desired, self.runner.clone())?;

            match visit(resource.as_mut()) {
                Ok(()) => {}
                Err(e) if entry.kind.is_optional() && e.is_unsupported_feature() => {
                    warn!("Host does not seem to support {}, skipping", entry.kind);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
