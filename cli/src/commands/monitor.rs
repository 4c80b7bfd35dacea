use std::time::Duration;

use chrono::Local;
use colored::*;

use netsweep_common::config::Config;
use netsweep_core::address;
use netsweep_core::monitor::{RateMonitor, RateSample};

use crate::mprint;
use crate::terminal::{colors, input, print};

const COLUMNS: [&str; 7] = [
    "Timestamp",
    "In (pkts/s)",
    "Out (pkts/s)",
    "In (KB/s)",
    "Out (KB/s)",
    "Total In (pkts)",
    "Total Out (pkts)",
];

pub async fn monitor(duration: Duration, interval: Duration, cfg: &Config) -> anyhow::Result<()> {
    let space = address::resolve_blocking(address::resolve).await?;

    print::header("network performance monitor", cfg.quiet);
    if cfg.quiet == 0 {
        print::set_key_width(&["Interface", "Duration", "Interval"]);
        print::aligned_line("Interface", space.interface.clone().color(colors::PRIMARY));
        print::aligned_line("Duration", format!("{} seconds", duration.as_secs()));
        print::aligned_line("Interval", format!("{} seconds", interval.as_secs()));
        mprint!();
    }

    let monitor = RateMonitor::default();
    let (cancel, input) = input::cancellation(cfg);

    // Fails before the table header when no source has counters.
    monitor.sample(&space.interface).await?;

    print::print(&header_row());
    print::print(&separator_row());

    monitor
        .monitor(&space.interface, duration, interval, cancel, |sample| {
            print::print(&sample_row(&sample));
        })
        .await?;

    drop(input);
    mprint!();
    Ok(())
}

fn header_row() -> String {
    format!(
        "{:<20} {:<15} {:<15} {:<15} {:<15} {:<15} {:<15}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5], COLUMNS[6]
    )
}

fn separator_row() -> String {
    let dashes = |width: usize| "-".repeat(width);
    format!(
        "{} {} {} {} {} {} {}",
        dashes(20),
        dashes(15),
        dashes(15),
        dashes(15),
        dashes(15),
        dashes(15),
        dashes(15)
    )
    .color(colors::SEPARATOR)
    .to_string()
}

fn sample_row(sample: &RateSample) -> String {
    format!(
        "{:<20} {:<15.1} {:<15.1} {:<15.1} {:<15.1} {:<15} {:<15}",
        Local::now().format("%H:%M:%S").to_string(),
        sample.in_pps,
        sample.out_pps,
        sample.in_kbps,
        sample.out_kbps,
        sample.total_in,
        sample.total_out
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
