// tests/common/mod.rs

//! Shared test utilities for integration tests.
//!
//! Each `script_*` helper registers the replies of a controller that is
//! already fully converged; tests then replace individual replies with
//! [`reply`], [`fail`] or [`unsupported`].

#![allow(dead_code)]

use setup_oob::runner::mock::MockRunner;
use setup_oob::{CommandRunner, DesiredValue, Orchestrator, Plan, ResourceKind, Target, Vendor};
use std::sync::Arc;

pub const HOSTNAME: &str = "web01-oob";
pub const PASSWORD: &str = "s3cret";
pub const LICENSE_KEY: &[u8] = b"test-private-key";

/// `ipmitool raw` style reply for `bytes`
pub fn hex_reply(bytes: &[u8]) -> String {
    let tokens: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(" {}\n", tokens.join(" "))
}

pub fn text_reply(text: &str) -> String {
    hex_reply(text.as_bytes())
}

pub fn scalar(value: &str) -> DesiredValue {
    DesiredValue::Scalar(value.to_string())
}

pub fn lan_print(source: &str, address: &str, netmask: &str) -> String {
    format!(
        "Set in Progress         : Set Complete\n\
         IP Address Source       : {}\n\
         IP Address              : {}\n\
         Subnet Mask             : {}\n\
         MAC Address             : 00:25:90:ab:cd:ef\n",
        source, address, netmask
    )
}

/// A Supermicro controller matching [`smc_plan`]
pub fn script_smc(mock: &MockRunner) {
    mock.on("user list", "ID  Name   Callin  Link Auth\n2   ADMIN  false   false\n");
    mock.on("raw 0x30 0x47 0x02", &text_reply(HOSTNAME));
    mock.on("raw 0x30 0x68 0x01 0x00 0x00", " 01 3c 00\n");
    mock.on("raw 0x30 0x68 0x01 0x00 0x01", &text_reply("0.pool.ntp.org"));
    mock.on("raw 0x30 0x68 0x01 0x00 0x02", &text_reply("1.pool.ntp.org"));
    mock.on("raw 0x30 0x70 0x0c 0x00", " 00\n");
    mock.on("lan print 1", &lan_print("DHCP Address", "10.0.0.5", "255.255.255.0"));
    mock.on("raw 0x30 0x68 0x04 0x00 0x00", " 01\n");
    mock.on("raw 0x30 0x6a", " 01\n");
}

pub fn smc_plan() -> Plan {
    Plan::new()
        .with(ResourceKind::Password, scalar(PASSWORD))
        .with(ResourceKind::Hostname, scalar(HOSTNAME))
        .with(ResourceKind::Ntp, DesiredValue::Absent)
        .with(ResourceKind::NetworkMode, scalar("dedicated"))
        .with(ResourceKind::NetworkSource, scalar("dhcp"))
        .with(ResourceKind::Ddns, DesiredValue::Absent)
        .with(ResourceKind::License, DesiredValue::Blob(LICENSE_KEY.to_vec()))
}

/// A Dell controller matching [`drac_plan`]
pub fn script_drac(mock: &MockRunner) {
    mock.on(
        "get iDRAC.Users",
        "iDRAC.Users.1 [Key=iDRAC.Embedded.1#Users.1]\niDRAC.Users.2 [Key=iDRAC.Embedded.1#Users.2]\n",
    );
    mock.on("get iDRAC.Users.1", "[Key=iDRAC.Embedded.1#Users.1]\nUserName=\n");
    mock.on("get iDRAC.Users.2", "[Key=iDRAC.Embedded.1#Users.2]\nUserName=root\n");
    mock.on(
        "get iDRAC.NIC.DNSRacName",
        &format!("[Key=iDRAC.Embedded.1#NIC.1]\nDNSRacName={}\n", HOSTNAME),
    );
    mock.on(
        "get idrac.NTPConfigGroup",
        "[Key=iDRAC.Embedded.1#NTPConfigGroup.1]\nNTP1=0.pool.ntp.org\nNTP2=1.pool.ntp.org\nNTPEnable=Enabled\n",
    );
    mock.on("get iDRAC.NIC.Selection", "[Key=iDRAC.Embedded.1#NIC.1]\nSelection=Dedicated\n");
    mock.on("lan print 1", &lan_print("DHCP Address", "10.0.0.5", "255.255.255.0"));
    mock.on("get iDRAC.NIC.DNSRegister", "[Key=iDRAC.Embedded.1#NIC.1]\nDNSRegister=Enabled\n");
}

pub fn drac_plan() -> Plan {
    Plan::new()
        .with(ResourceKind::Password, scalar(PASSWORD))
        .with(ResourceKind::Hostname, scalar(HOSTNAME))
        .with(ResourceKind::Ntp, DesiredValue::Absent)
        .with(ResourceKind::NetworkMode, scalar("dedicated"))
        .with(ResourceKind::NetworkSource, scalar("dhcp"))
        .with(ResourceKind::Ddns, DesiredValue::Absent)
}

pub fn orchestrator(mock: &Arc<MockRunner>, target: Target) -> Orchestrator {
    let runner: Arc<dyn CommandRunner> = mock.clone();
    Orchestrator::new(target, runner)
}

pub fn local_smc(mock: &Arc<MockRunner>) -> Orchestrator {
    orchestrator(mock, Target::local(Vendor::Smc))
}

pub fn local_drac(mock: &Arc<MockRunner>) -> Orchestrator {
    orchestrator(mock, Target::local(Vendor::Drac))
}

/// Replace whatever reply was scripted for `suffix`
pub fn reply(mock: &MockRunner, suffix: &str, stdout: &str) {
    mock.clear(suffix).on(suffix, stdout);
}

pub fn fail(mock: &MockRunner, suffix: &str, stderr: &str) {
    mock.clear(suffix).on_failure(suffix, stderr);
}

/// Reject a raw command as unsupported by the firmware
pub fn unsupported(mock: &MockRunner, suffix: &str) {
    mock.clear(suffix).on_failure(
        suffix,
        "Unable to send RAW command (channel=0x0 netfn=0x30 lun=0x0 cmd=0x68 rsp=0xcc): Invalid data field in request",
    );
}
