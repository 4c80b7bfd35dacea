use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use netsweep_common::config::Config;
use netsweep_common::network::address_space::AddressSpace;
use netsweep_common::network::host::HostRecord;
use netsweep_core::aggregate;
use netsweep_core::discovery::{DiscoveryOptions, HostDiscoverer};
use netsweep_core::{address, vendors::MacOuiRepo};

use crate::mprint;
use crate::terminal::{colors, format, input, print, spinner};

pub async fn scan(opts: DiscoveryOptions, cfg: &Config) -> anyhow::Result<()> {
    let space: AddressSpace = address::resolve_blocking(address::resolve)
        .await
        .context("resolving the local network")?;
    print_address_space(&space, cfg);

    let (cancel, input) = input::cancellation(cfg);
    let progress = spinner::Progress::spinner("discovery", input.is_some());

    let discoverer = HostDiscoverer::system().with_vendors(Arc::new(MacOuiRepo));
    let start_time: Instant = Instant::now();
    let mut rx = discoverer.discover(&space, opts, cancel.clone())?;

    let mut hosts: Vec<HostRecord> = Vec::new();
    while let Some(host) = rx.recv().await {
        hosts.push(host);
        spinner::report_discovery_progress(&progress, hosts.len());
    }

    drop(progress);
    drop(input);

    if cancel.is_cancelled() {
        warn!("discovery interrupted, showing partial results");
    }

    discovery_ends(&mut hosts, start_time.elapsed(), cfg)
}

pub fn print_address_space(space: &AddressSpace, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    print::header("local network", cfg.quiet);
    print::set_key_width(&["Interface", "Gateway", "Local IP", "Network"]);
    print::aligned_line("Interface", space.interface.clone().color(colors::PRIMARY));
    print::aligned_line("Gateway", format::optional_ipv4(space.gateway));
    print::aligned_line("Local IP", format::ipv4(space.local_ip));
    print::aligned_line("Network", space.to_string());
    print::print_status(format!("Scanning {} potential hosts...", space.candidate_count()));
    mprint!();
}

fn discovery_ends(hosts: &mut [HostRecord], total_time: Duration, cfg: &Config) -> anyhow::Result<()> {
    if hosts.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("network discovery", cfg.quiet);
    hosts.sort_by_key(|host| host.ip);
    print::render(|out| aggregate::render_hosts(out, &*hosts))?;
    print_summary(hosts.len(), total_time, cfg);
    Ok(())
}

fn print_summary(hosts_len: usize, total_time: Duration, cfg: &Config) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Discovery Complete: {active_hosts} identified in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            mprint!();
            info!("{}", output)
        }
    }
}
