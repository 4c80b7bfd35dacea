use std::net::IpAddr;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use netsweep_common::config::Config;
use netsweep_common::network::ports::PortRange;
use netsweep_common::network::target::Target;
use netsweep_common::UNKNOWN;
use netsweep_core::aggregate;
use netsweep_core::network::dns::{self, SystemResolver};
use netsweep_core::probe::HostnameResolver;
use netsweep_core::scanner::{PortScanOptions, PortScanner};

use crate::mprint;
use crate::terminal::{colors, format, input, print, spinner};

pub async fn portscan(target: Target, range_code: u8, opts: PortScanOptions, cfg: &Config) -> anyhow::Result<()> {
    let range: PortRange = PortRange::from_code(range_code)?;

    let addr: IpAddr = match &target {
        Target::Addr(addr) => *addr,
        Target::Hostname(name) => {
            print::print_status(format!("Resolving hostname {name}..."));
            dns::resolve_target(name)
                .await
                .with_context(|| format!("resolving target '{name}'"))?
        }
    };

    let hostname: String = match &target {
        Target::Hostname(name) => SystemResolver.resolve(addr).await.unwrap_or_else(|| name.clone()),
        Target::Addr(_) => SystemResolver
            .resolve(addr)
            .await
            .unwrap_or_else(|| UNKNOWN.to_string()),
    };

    print::header("port scan", cfg.quiet);
    if cfg.quiet == 0 {
        print::set_key_width(&["Target", "Hostname", "Range"]);
        print::aligned_line("Target", format::ip(addr));
        print::aligned_line("Hostname", hostname.color(colors::PRIMARY));
        print::aligned_line("Range", format!("{} ({range})", range.name()));
        mprint!();
    }

    let (cancel, input) = input::cancellation(cfg);
    let progress = spinner::Progress::spinner("portscan", input.is_some());
    progress.set_message(&format!("Scanning {} ports...", range.len()));

    let start_time = Instant::now();
    let ports = PortScanner::default()
        .scan_ports(addr, range, opts, cancel.clone())
        .await?;

    drop(progress);
    drop(input);

    if cancel.is_cancelled() {
        warn!("port scan interrupted, showing partial results");
    }

    print::render(|out| aggregate::render_ports(out, &ports))?;

    let summary: String = format!(
        "Found {} open ports in {:.2}s",
        ports.len().to_string().green().bold(),
        start_time.elapsed().as_secs_f64()
    );
    if cfg.quiet < 2 {
        mprint!();
        info!("{summary}");
    }
    Ok(())
}
