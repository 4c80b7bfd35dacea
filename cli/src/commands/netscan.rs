use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use colored::*;
use tracing::{info, warn};

use netsweep_common::config::Config;
use netsweep_core::discovery::HostDiscoverer;
use netsweep_core::{address, aggregate};
use netsweep_core::orchestrator::{NetScanOptions, NetScanner, Observer, ScanEvent, ScanPhase};
use netsweep_core::scanner::PortScanner;
use netsweep_core::vendors::MacOuiRepo;

use crate::commands::scan::print_address_space;
use crate::mprint;
use crate::terminal::{input, print, spinner};

pub async fn netscan(opts: NetScanOptions, cfg: &Config) -> anyhow::Result<()> {
    let (cancel, input) = input::cancellation(cfg);
    let progress = spinner::Progress::spinner("netscan", input.is_some());

    let scanner = NetScanner::new(
        HostDiscoverer::system().with_vendors(Arc::new(MacOuiRepo)),
        PortScanner::default(),
    );

    let start_time = Instant::now();
    let report = scanner
        .run_local(address::resolve, opts, Some(progress_observer(progress.clone(), cfg)), cancel)
        .await?;

    drop(progress);
    drop(input);

    if report.cancelled {
        warn!("network scan interrupted, showing partial results");
    }

    if report.discovered.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("network-wide port scan results", cfg.quiet);
    print::render(|out| aggregate::render_network_scan(out, &report.results))?;

    if cfg.quiet < 2 {
        let open: usize = report.results.iter().map(|result| result.ports.len()).sum();
        let summary: String = format!(
            "Scan Complete: {} open ports on {} hosts in {:.2}s",
            open.to_string().green().bold(),
            report.results.len().to_string().green().bold(),
            start_time.elapsed().as_secs_f64()
        );
        mprint!();
        info!("{summary}");
    }
    Ok(())
}

fn progress_observer(progress: spinner::Progress, cfg: &Config) -> Observer {
    let discovered = AtomicUsize::new(0);
    let cfg: Config = cfg.clone();

    Box::new(move |event| match event {
        ScanEvent::SpaceResolved(space) => print_address_space(&space, &cfg),
        ScanEvent::PhaseChanged(ScanPhase::Discovering) => {
            progress.set_message("Discovering hosts...");
        }
        ScanEvent::HostDiscovered(_) => {
            let count = discovered.fetch_add(1, Ordering::Relaxed) + 1;
            spinner::report_discovery_progress(&progress, count);
        }
        ScanEvent::PhaseChanged(ScanPhase::Scanning) => {
            progress.switch_to_bar(discovered.load(Ordering::Relaxed) as u64);
            progress.set_message("hosts scanned");
        }
        ScanEvent::HostScanned { done, total } => {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
        }
        ScanEvent::PhaseChanged(_) => {}
    })
}
