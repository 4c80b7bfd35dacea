//! # Result Aggregation
//!
//! Scan results arrive in whatever order the workers finish. The
//! [`Aggregator`] collects them and imposes one canonical order: hosts by
//! ascending IPv4 address, ports by ascending number. The `render_*`
//! functions write fixed-width tables to any [`io::Write`] sink.

use std::io::{self, Write};
use std::time::Duration;

use netsweep_common::network::host::{HostRecord, HostScanResult, PortRecord};

const MAX_HOSTNAME_LEN: usize = 38;
const TRUNCATED_HOSTNAME_LEN: usize = 35;

#[derive(Debug, Default)]
pub struct Aggregator {
    results: Vec<HostScanResult>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: HostScanResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All collected results in canonical order.
    pub fn finish(self) -> Vec<HostScanResult> {
        let mut results = self.results;
        for result in &mut results {
            sort_ports(&mut result.ports);
        }
        results.sort_by_key(|result| result.host.ip);
        results
    }
}

impl Extend<HostScanResult> for Aggregator {
    fn extend<I: IntoIterator<Item = HostScanResult>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

pub fn sort_ports(ports: &mut Vec<PortRecord>) {
    ports.sort_by_key(|record| record.port);
    ports.dedup_by_key(|record| record.port);
}

/// One `Host:` heading and port table per host with open ports.
pub fn render_network_scan<W: Write>(out: &mut W, results: &[HostScanResult]) -> io::Result<()> {
    let mut any_open = false;

    for result in results.iter().filter(|result| result.has_open_ports()) {
        any_open = true;
        writeln!(
            out,
            "\n=== Host: {} ({}) ===\n",
            result.host.ip,
            result.host.hostname_or_unknown()
        )?;
        render_ports(out, &result.ports)?;
    }

    if !any_open {
        writeln!(out, "No open ports found.")?;
    }
    Ok(())
}

pub fn render_ports<W: Write>(out: &mut W, ports: &[PortRecord]) -> io::Result<()> {
    if ports.is_empty() {
        return writeln!(out, "No open ports found.");
    }

    writeln!(out, "{:<8} {:<20} {:<30}", "Port", "Service", "Banner")?;
    writeln!(out, "{:<8} {:<20} {:<30}", "-".repeat(8), "-".repeat(20), "-".repeat(30))?;
    for record in ports {
        writeln!(
            out,
            "{:<8} {:<20} {}",
            record.port, record.service, record.banner
        )?;
    }
    Ok(())
}

pub fn render_hosts<W: Write>(out: &mut W, hosts: &[HostRecord]) -> io::Result<()> {
    writeln!(out, "{:<16} {:<40} {:<10} {:<17}", "IP", "Hostname", "Response", "MAC Address")?;
    writeln!(
        out,
        "{:<16} {:<40} {:<10} {:<17}",
        "-".repeat(16),
        "-".repeat(40),
        "-".repeat(10),
        "-".repeat(17)
    )?;

    for host in hosts {
        let response: String = host.rtt.map(format_rtt).unwrap_or_else(|| "-".to_string());
        let mac: String = match &host.vendor {
            Some(vendor) => format!("{} ({vendor})", host.mac_or_unknown()),
            None => host.mac_or_unknown(),
        };
        writeln!(
            out,
            "{:<16} {:<40} {:<10} {}",
            host.ip.to_string(),
            shorten_hostname(host.hostname_or_unknown()),
            response,
            mac
        )?;
    }
    Ok(())
}

pub fn shorten_hostname(name: &str) -> String {
    if name.chars().count() > MAX_HOSTNAME_LEN {
        let head: String = name.chars().take(TRUNCATED_HOSTNAME_LEN).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

pub fn format_rtt(rtt: Duration) -> String {
    format!("{:.1}ms", rtt.as_secs_f64() * 1000.0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
