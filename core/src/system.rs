//! Thin wrappers around the external tools netsweep leans on (`ip`, `route`,
//! `arp`, `ifconfig`, `ping`).
//!
//! A missing tool is not an error for the program as a whole: the feature
//! that needs it degrades and the user is told once.

use std::collections::HashSet;
use std::io;
use std::net::IpAddr;
use std::process::{Command, Stdio};
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, bail};
use tracing::warn;

const RESOLV_CONF: &str = "/etc/resolv.conf";

static REPORTED_MISSING: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Runs `program` with `args` and returns its stdout.
///
/// Fails when the program cannot be spawned or exits unsuccessfully.
pub fn run(program: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                report_missing_tool(program);
            }
            err
        })
        .with_context(|| format!("spawning {program}"))?;

    if !output.status.success() {
        bail!("{program} exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Warns that `program` is not installed, once per program per process.
pub fn report_missing_tool(program: &str) {
    let reported = REPORTED_MISSING.get_or_init(|| Mutex::new(HashSet::new()));
    let first_time = match reported.lock() {
        Ok(mut set) => set.insert(program.to_string()),
        Err(_) => false,
    };

    if first_time {
        warn!("'{program}' is not installed, features depending on it are skipped");
    }
}

/// Name servers listed in `/etc/resolv.conf`.
pub fn nameservers() -> anyhow::Result<Vec<IpAddr>> {
    let content = std::fs::read_to_string(RESOLV_CONF)
        .with_context(|| format!("reading {RESOLV_CONF}"))?;
    Ok(parse_nameservers(&content))
}

pub fn parse_nameservers(content: &str) -> Vec<IpAddr> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => addr.parse().ok(),
                _ => None,
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
