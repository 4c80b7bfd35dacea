mod commands;
mod terminal;

use std::process::ExitCode;
use std::time::Duration;

use colored::*;

use commands::{CommandLine, Commands, info, monitor, netscan, portscan, scan};
use netsweep_common::config::Config;
use netsweep_common::network::ports::PortRange;
use netsweep_core::discovery::DiscoveryOptions;
use netsweep_core::orchestrator::NetScanOptions;
use netsweep_core::scanner::PortScanOptions;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    let cfg = Config {
        quiet: commands.quiet,
        disable_input: commands.no_input,
    };

    if let Err(err) = logging::init_logging(cfg.quiet) {
        eprintln!("{} {err:#}", "[-]".red().bold());
    }

    print::banner(cfg.quiet);

    match run(commands.command, &cfg).await {
        Ok(()) => {
            print::end_of_program(cfg.quiet);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {}", "[-]".red().bold(), format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, cfg: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Info => info::info(cfg).await,
        Commands::Scan {
            timeout,
            concurrency,
            all,
        } => {
            let opts = DiscoveryOptions {
                concurrency: concurrency as usize,
                probe_timeout: Duration::from_secs(timeout),
                include_unnamed: all,
            };
            scan::scan(opts, cfg).await
        }
        Commands::Portscan {
            target,
            range,
            concurrency,
            timeout,
        } => {
            let opts = PortScanOptions {
                concurrency: concurrency as usize,
                timeout: Duration::from_secs(timeout),
            };
            portscan::portscan(target, range, opts, cfg).await
        }
        Commands::Netscan {
            concurrency,
            timeout,
            port_timeout,
            port_concurrency,
            all,
        } => {
            let opts = NetScanOptions {
                discovery: DiscoveryOptions {
                    probe_timeout: Duration::from_secs(timeout),
                    include_unnamed: all,
                    ..DiscoveryOptions::default()
                },
                host_concurrency: concurrency as usize,
                ports: PortRange::WELL_KNOWN,
                port: PortScanOptions {
                    concurrency: port_concurrency as usize,
                    timeout: Duration::from_secs(port_timeout),
                },
            };
            netscan::netscan(opts, cfg).await
        }
        Commands::Monitor { duration, interval } => {
            monitor::monitor(Duration::from_secs(duration), Duration::from_secs(interval), cfg).await
        }
    }
}
