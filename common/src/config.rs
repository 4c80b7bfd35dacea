use std::time::Duration;

pub const DEFAULT_DISCOVERY_CONCURRENCY: usize = 50;
pub const DEFAULT_HOST_CONCURRENCY: usize = 50;
pub const DEFAULT_PORT_CONCURRENCY: usize = 200;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_PORT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_MONITOR_DURATION: Duration = Duration::from_secs(30);
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(1);

/// Presentation settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Verbosity reduction. `1` drops headers and summaries, `2` also drops
    /// the per-host detail.
    pub quiet: u8,
    /// Disables the keyboard listener that lets `q` stop a running scan.
    ///
    /// Ctrl-C still cancels through the signal handler.
    pub disable_input: bool,
}
