// src/commands/mod.rs

//! Command handlers for the setup-oob CLI

use anyhow::{Context, Result};
use setup_oob::codec::{format_license, generate_license, parse_mac};
use setup_oob::{CommandRunner, Orchestrator, Settings, SystemRunner};
use std::sync::Arc;
use tracing::info;

fn orchestrator(settings: &Settings) -> Result<Orchestrator> {
    let target = settings.target().context("Invalid controller target")?;

    let mut runner = SystemRunner::new();
    if let Some(timeout) = settings.timeout() {
        runner = runner.with_timeout(timeout);
    }
    let runner: Arc<dyn CommandRunner> = Arc::new(runner);

    Ok(Orchestrator::new(target, runner))
}

/// Evaluate the batch. Returns whether the controller is converged.
pub fn cmd_check(settings: &Settings) -> Result<bool> {
    let plan = settings.plan().context("Failed to build plan")?;
    let orchestrator = orchestrator(settings)?;

    info!("Checking {} ({})", orchestrator.target().host, orchestrator.target().vendor);
    let converged = orchestrator
        .check(&plan)
        .context("Convergence check failed")?;

    if converged {
        println!("OK: controller matches desired state");
    } else {
        println!("DRIFT: controller does not match desired state");
    }
    Ok(converged)
}

pub fn cmd_apply(settings: &Settings, dry_run: bool) -> Result<()> {
    let plan = settings.plan().context("Failed to build plan")?;

    if dry_run {
        println!("Dry run, would converge:");
        for line in plan.describe() {
            println!("  {}", line);
        }
        return Ok(());
    }

    let orchestrator = orchestrator(settings)?;
    info!("Converging {} ({})", orchestrator.target().host, orchestrator.target().vendor);
    orchestrator.apply(&plan).context("Failed to converge controller")?;
    println!("Controller converged");
    Ok(())
}

pub fn cmd_plan(settings: &Settings) -> Result<()> {
    let plan = settings.plan().context("Failed to build plan")?;
    let target = settings.target()?;

    println!("{} ({}):", target.host, target.vendor);
    for (idx, line) in plan.describe().iter().enumerate() {
        println!("  {}. {}", idx + 1, line);
    }
    Ok(())
}

/// Print the license for `mac` without contacting a controller
pub fn cmd_license(settings: &Settings, mac: &str) -> Result<()> {
    let key = settings
        .license_key()?
        .context("No key file configured (use --key-file)")?;
    let mac = parse_mac(mac)?;
    let license = generate_license(&mac, &key)?;
    println!("{}", format_license(&license));
    Ok(())
}
