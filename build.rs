// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Flags shared by every subcommand
fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("host")
            .short('H')
            .long("host")
            .global(true)
            .help("Controller host, localhost for in-band access"),
        Arg::new("user")
            .short('U')
            .long("user")
            .global(true)
            .help("Controller user"),
        Arg::new("password")
            .short('P')
            .long("password")
            .env("SETUP_OOB_PASSWORD")
            .global(true)
            .help("Desired administrator password"),
        Arg::new("type")
            .short('t')
            .long("type")
            .value_parser(["drac", "smc"])
            .global(true)
            .help("Controller type"),
        Arg::new("hostname")
            .long("hostname")
            .global(true)
            .help("Desired controller hostname (default: <short hostname>-oob)"),
        Arg::new("network_mode")
            .long("network-mode")
            .global(true)
            .help("Desired NIC mode: dedicated, shared or failover"),
        Arg::new("network_src")
            .long("network-src")
            .global(true)
            .help("Desired address source: dhcp or an IPv4 CIDR address"),
        Arg::new("key_file")
            .long("key-file")
            .global(true)
            .help("File holding the license private key"),
        Arg::new("ntp_server")
            .long("ntp-server")
            .action(ArgAction::Append)
            .global(true)
            .help("NTP server (repeat for the secondary)"),
        Arg::new("config")
            .short('c')
            .long("config")
            .global(true)
            .help("Settings file (default: /etc/setup-oob/config.toml)"),
        Arg::new("log_level")
            .short('l')
            .long("log-level")
            .global(true)
            .help("Log level: error, warn, info, debug or trace"),
        Arg::new("timeout")
            .long("timeout")
            .global(true)
            .help("Per-command timeout in seconds"),
    ]
}

fn build_cli() -> Command {
    Command::new("setup-oob")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converge out-of-band management controller settings")
        .args(global_args())
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about("Report whether the controller matches the desired state (exit 1 on drift)"),
        )
        .subcommand(
            Command::new("apply")
                .about("Converge the controller to the desired state")
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the plan without touching the controller"),
                ),
        )
        .subcommand(Command::new("plan").about("Print the ordered resources and their desired values"))
        .subcommand(
            Command::new("license")
                .about("Print the Supermicro license for a MAC address (offline)")
                .arg(Arg::new("mac").required(true).help("MAC address, e.g. 00:25:90:ab:cd:ef")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("setup-oob.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
