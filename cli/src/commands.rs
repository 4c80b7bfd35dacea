pub mod info;
pub mod monitor;
pub mod netscan;
pub mod portscan;
pub mod scan;

use clap::{ArgAction, Parser, Subcommand};
use netsweep_common::network::target::Target;

#[derive(Parser)]
#[command(name = "netsweep")]
#[command(version, about = "Subnet discovery, port scanning and interface monitoring.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output; repeat for less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not listen for the 'q' key
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the local network configuration
    #[command(alias = "i")]
    Info,

    /// Discover named hosts on the local subnet
    #[command(alias = "s")]
    Scan {
        /// Ping timeout in seconds
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Simultaneous ping probes
        #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
        concurrency: u64,

        /// Also list hosts without a hostname
        #[arg(short, long)]
        all: bool,
    },

    /// Scan one host for open TCP ports
    #[command(alias = "p")]
    Portscan {
        /// IP address or hostname
        target: Target,

        /// 0 well-known (1-1024), 1 registered (1025-49151), 2 private (49152-65535), 3 all
        #[arg(default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
        range: u8,

        /// Simultaneous connection attempts
        #[arg(short, long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
        concurrency: u64,

        /// Connect and banner timeout in seconds
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// Discover hosts, then port scan every one of them
    #[command(alias = "n")]
    Netscan {
        /// Hosts scanned at the same time
        #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
        concurrency: u64,

        /// Ping timeout in seconds
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Connect timeout in seconds
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        port_timeout: u64,

        /// Simultaneous connection attempts per host
        #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
        port_concurrency: u64,

        /// Also scan hosts without a hostname
        #[arg(short, long)]
        all: bool,
    },

    /// Show packet and byte rates of the active interface
    #[command(alias = "m")]
    Monitor {
        /// Total duration in seconds
        #[arg(default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        duration: u64,

        /// Sampling interval in seconds
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
