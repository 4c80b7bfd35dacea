//! # Interface Rate Monitor
//!
//! Samples an interface's packet and byte counters at a fixed interval and
//! turns consecutive samples into per-second rates.
//!
//! Counters come from the first [`StatsSource`] that reports a non-zero
//! packet count: `ifconfig`, then `ip -s link`, then `/proc/net/dev`. When
//! none does, sampling fails; counters are never made up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use netsweep_common::error::ScanError;

use crate::system;

const PROC_NET_DEV: &str = "/proc/net/dev";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub in_packets: u64,
    pub out_packets: u64,
    pub in_bytes: u64,
    pub out_bytes: u64,
}

impl InterfaceCounters {
    pub fn has_packets(&self) -> bool {
        self.in_packets > 0 || self.out_packets > 0
    }
}

/// Rates over one monitoring interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub elapsed: Duration,
    pub in_pps: f64,
    pub out_pps: f64,
    pub in_kbps: f64,
    pub out_kbps: f64,
    pub total_in: u64,
    pub total_out: u64,
}

impl RateSample {
    /// `(current - previous) / elapsed`; a counter that went backwards
    /// (interface reset) counts as zero.
    pub fn between(previous: &InterfaceCounters, current: &InterfaceCounters, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let rate = |now: u64, before: u64| {
            if secs > 0.0 {
                now.saturating_sub(before) as f64 / secs
            } else {
                0.0
            }
        };

        Self {
            elapsed,
            in_pps: rate(current.in_packets, previous.in_packets),
            out_pps: rate(current.out_packets, previous.out_packets),
            in_kbps: rate(current.in_bytes, previous.in_bytes) / 1024.0,
            out_kbps: rate(current.out_bytes, previous.out_bytes) / 1024.0,
            total_in: current.in_packets,
            total_out: current.out_packets,
        }
    }
}

/// One way of reading interface counters.
pub trait StatsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the source is unavailable or reports no packets.
    fn read(&self, interface: &str) -> Option<InterfaceCounters>;
}

#[derive(Debug, Default)]
pub struct IfconfigSource;

impl StatsSource for IfconfigSource {
    fn name(&self) -> &'static str {
        "ifconfig"
    }

    fn read(&self, interface: &str) -> Option<InterfaceCounters> {
        let output = system::run("ifconfig", &[interface]).ok()?;
        parse_ifconfig(&output)
    }
}

#[derive(Debug, Default)]
pub struct IpLinkSource;

impl StatsSource for IpLinkSource {
    fn name(&self) -> &'static str {
        "ip -s link"
    }

    fn read(&self, interface: &str) -> Option<InterfaceCounters> {
        let output = system::run("ip", &["-s", "link", "show", interface]).ok()?;
        parse_ip_link(&output)
    }
}

#[derive(Debug)]
pub struct ProcNetDevSource {
    path: PathBuf,
}

impl Default for ProcNetDevSource {
    fn default() -> Self {
        Self::with_path(PROC_NET_DEV)
    }
}

impl ProcNetDevSource {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatsSource for ProcNetDevSource {
    fn name(&self) -> &'static str {
        "/proc/net/dev"
    }

    fn read(&self, interface: &str) -> Option<InterfaceCounters> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        parse_proc_net_dev(&content, interface)
    }
}

/// Handles both the net-tools 2.x layout (`RX packets 12  bytes 3456`) and
/// the older one (`RX packets:12 ...`, `RX bytes:3456 ... TX bytes:789`).
pub fn parse_ifconfig(output: &str) -> Option<InterfaceCounters> {
    #[derive(Clone, Copy)]
    enum Direction {
        In,
        Out,
    }

    let mut in_packets: Option<u64> = None;
    let mut out_packets: Option<u64> = None;
    let mut in_bytes: Option<u64> = None;
    let mut out_bytes: Option<u64> = None;

    for line in output.lines() {
        let line = line.replace(':', " ");
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut direction: Option<Direction> = None;

        for (idx, token) in tokens.iter().enumerate() {
            match *token {
                "RX" => direction = Some(Direction::In),
                "TX" => direction = Some(Direction::Out),
                "packets" | "bytes" => {
                    let Some(value) = tokens.get(idx + 1).and_then(|v| v.parse::<u64>().ok()) else {
                        continue;
                    };
                    let slot = match (direction, *token) {
                        (Some(Direction::In), "packets") => &mut in_packets,
                        (Some(Direction::Out), "packets") => &mut out_packets,
                        (Some(Direction::In), _) => &mut in_bytes,
                        (Some(Direction::Out), _) => &mut out_bytes,
                        (None, _) => continue,
                    };
                    slot.get_or_insert(value);
                }
                _ => {}
            }
        }
    }

    let counters = InterfaceCounters {
        in_packets: in_packets.unwrap_or(0),
        out_packets: out_packets.unwrap_or(0),
        in_bytes: in_bytes.unwrap_or(0),
        out_bytes: out_bytes.unwrap_or(0),
    };
    counters.has_packets().then_some(counters)
}

/// The line after `RX:` / `TX:` starts with `bytes packets`.
pub fn parse_ip_link(output: &str) -> Option<InterfaceCounters> {
    let lines: Vec<&str> = output.lines().collect();
    let mut counters = InterfaceCounters::default();

    for (idx, line) in lines.iter().enumerate() {
        let is_rx = line.contains("RX:");
        let is_tx = line.contains("TX:");
        if !is_rx && !is_tx {
            continue;
        }

        let Some(values) = lines.get(idx + 1) else {
            continue;
        };
        let fields: Vec<u64> = values
            .split_whitespace()
            .take(2)
            .filter_map(|f| f.parse().ok())
            .collect();
        let [bytes, packets] = fields.as_slice() else {
            continue;
        };

        if is_rx {
            counters.in_bytes = *bytes;
            counters.in_packets = *packets;
        } else {
            counters.out_bytes = *bytes;
            counters.out_packets = *packets;
        }
    }

    counters.has_packets().then_some(counters)
}

/// `iface: rx_bytes rx_packets ... (8 receive fields) tx_bytes tx_packets ...`
pub fn parse_proc_net_dev(content: &str, interface: &str) -> Option<InterfaceCounters> {
    content.lines().skip(2).find_map(|line| {
        let (name, rest) = line.trim().split_once(':')?;
        if name.trim() != interface {
            return None;
        }

        let fields: Vec<u64> = rest
            .split_whitespace()
            .map(|f| f.parse().ok())
            .collect::<Option<Vec<u64>>>()?;
        if fields.len() < 10 {
            return None;
        }

        let counters = InterfaceCounters {
            in_bytes: fields[0],
            in_packets: fields[1],
            out_bytes: fields[8],
            out_packets: fields[9],
        };
        counters.has_packets().then_some(counters)
    })
}

#[derive(Clone)]
pub struct RateMonitor {
    sources: Vec<Arc<dyn StatsSource>>,
}

impl Default for RateMonitor {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(IfconfigSource),
            Arc::new(IpLinkSource),
            Arc::new(ProcNetDevSource::default()),
        ])
    }
}

impl RateMonitor {
    pub fn new(sources: Vec<Arc<dyn StatsSource>>) -> Self {
        Self { sources }
    }

    /// Counters from the first source that has them.
    pub fn sample_once(&self, interface: &str) -> Result<InterfaceCounters, ScanError> {
        for source in &self.sources {
            match source.read(interface) {
                Some(counters) if counters.has_packets() => {
                    debug!("counters for {interface} from {}", source.name());
                    return Ok(counters);
                }
                _ => debug!("{} has no counters for {interface}", source.name()),
            }
        }

        Err(ScanError::StatsUnavailable {
            interface: interface.to_string(),
        })
    }

    /// [`sample_once`](Self::sample_once) on the blocking pool.
    pub async fn sample(&self, interface: &str) -> Result<InterfaceCounters, ScanError> {
        let monitor = self.clone();
        let name: String = interface.to_string();
        tokio::task::spawn_blocking(move || monitor.sample_once(&name))
            .await
            .unwrap_or_else(|_join_err| {
                Err(ScanError::StatsUnavailable {
                    interface: interface.to_string(),
                })
            })
    }

    /// Samples every `interval` until `duration` has passed or `cancel`
    /// fires, handing one [`RateSample`] per interval to `on_sample`.
    /// Returns the number of samples produced.
    pub async fn monitor<F>(
        &self,
        interface: &str,
        duration: Duration,
        interval: Duration,
        cancel: CancellationToken,
        mut on_sample: F,
    ) -> Result<usize, ScanError>
    where
        F: FnMut(RateSample),
    {
        let mut previous = self.sample(interface).await?;
        let mut previous_at = Instant::now();
        let deadline = previous_at + duration;
        let mut produced: usize = 0;

        while Instant::now() < deadline {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let current = match self.sample(interface).await {
                Ok(counters) => counters,
                Err(err) => {
                    warn!("skipping sample: {err}");
                    continue;
                }
            };
            let now = Instant::now();

            on_sample(RateSample::between(&previous, &current, now - previous_at));
            produced += 1;

            previous = current;
            previous_at = now;
        }

        Ok(produced)
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
