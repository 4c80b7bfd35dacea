//! # Network-wide Scan
//!
//! Runs discovery over the local subnet, then fans the discovered hosts out
//! to a pool of host workers, each performing a full port scan with its own
//! nested pool. Results are collected by a single task, which also emits
//! the progress events.
//!
//! A run moves `Idle -> Discovering -> Scanning -> Aggregating -> Done`, or
//! ends in `Failed` when it cannot start or discovery finds nothing.

use std::net::IpAddr;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use netsweep_common::config::DEFAULT_HOST_CONCURRENCY;
use netsweep_common::error::ScanError;
use netsweep_common::network::address_space::AddressSpace;
use netsweep_common::network::host::{HostRecord, HostScanResult};
use netsweep_common::network::ports::PortRange;

use crate::address;
use crate::aggregate::Aggregator;
use crate::discovery::{DiscoveryOptions, HostDiscoverer};
use crate::pool;
use crate::scanner::{PortScanOptions, PortScanner};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPhase {
    #[default]
    Idle,
    Discovering,
    Scanning,
    Aggregating,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    PhaseChanged(ScanPhase),
    /// The subnet [`NetScanner::run_local`] is about to sweep.
    SpaceResolved(AddressSpace),
    HostDiscovered(HostRecord),
    HostScanned { done: usize, total: usize },
}

pub type Observer = Box<dyn Fn(ScanEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct NetScanOptions {
    pub discovery: DiscoveryOptions,
    /// Hosts port-scanned at the same time.
    pub host_concurrency: usize,
    pub ports: PortRange,
    pub port: PortScanOptions,
}

impl Default for NetScanOptions {
    fn default() -> Self {
        Self {
            discovery: DiscoveryOptions::default(),
            host_concurrency: DEFAULT_HOST_CONCURRENCY,
            ports: PortRange::WELL_KNOWN,
            port: PortScanOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetScanReport {
    pub space: AddressSpace,
    /// Every host discovery found, in discovery order.
    pub discovered: Vec<HostRecord>,
    /// One entry per scanned host, in canonical order.
    pub results: Vec<HostScanResult>,
    pub cancelled: bool,
    /// `Done`, or `Failed` when discovery came back empty.
    pub phase: ScanPhase,
}

/// The current phase and whoever listens to it.
struct Tracker {
    phase: ScanPhase,
    observer: Option<Observer>,
}

impl Tracker {
    fn new(observer: Option<Observer>) -> Self {
        Self {
            phase: ScanPhase::default(),
            observer,
        }
    }

    fn enter(&mut self, phase: ScanPhase) {
        debug!("scan phase {:?} -> {phase:?}", self.phase);
        self.phase = phase;
        self.emit(ScanEvent::PhaseChanged(phase));
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

#[derive(Clone)]
pub struct NetScanner {
    discoverer: HostDiscoverer,
    scanner: PortScanner,
}

impl NetScanner {
    pub fn new(discoverer: HostDiscoverer, scanner: PortScanner) -> Self {
        Self { discoverer, scanner }
    }

    /// Resolves the address space with `resolver` off the runtime, then
    /// scans it. `resolver` is normally [`address::resolve`].
    pub async fn run_local<F>(
        &self,
        resolver: F,
        opts: NetScanOptions,
        observer: Option<Observer>,
        cancel: CancellationToken,
    ) -> Result<NetScanReport, ScanError>
    where
        F: FnOnce() -> Result<AddressSpace, ScanError> + Send + 'static,
    {
        let mut tracker = Tracker::new(observer);
        let space = match address::resolve_blocking(resolver).await {
            Ok(space) => space,
            Err(err) => {
                tracker.enter(ScanPhase::Failed);
                return Err(err);
            }
        };
        tracker.emit(ScanEvent::SpaceResolved(space.clone()));
        self.scan(space, opts, &mut tracker, cancel).await
    }

    pub async fn run(
        &self,
        space: AddressSpace,
        opts: NetScanOptions,
        observer: Option<Observer>,
        cancel: CancellationToken,
    ) -> Result<NetScanReport, ScanError> {
        let mut tracker = Tracker::new(observer);
        self.scan(space, opts, &mut tracker, cancel).await
    }

    async fn scan(
        &self,
        space: AddressSpace,
        opts: NetScanOptions,
        tracker: &mut Tracker,
        cancel: CancellationToken,
    ) -> Result<NetScanReport, ScanError> {
        if opts.host_concurrency == 0 || opts.port.concurrency == 0 {
            tracker.enter(ScanPhase::Failed);
            return Err(ScanError::InvalidConcurrency);
        }

        tracker.enter(ScanPhase::Discovering);
        let mut host_rx = match self.discoverer.discover(&space, opts.discovery, cancel.clone()) {
            Ok(rx) => rx,
            Err(err) => {
                tracker.enter(ScanPhase::Failed);
                return Err(err);
            }
        };

        let mut discovered: Vec<HostRecord> = Vec::new();
        while let Some(host) = host_rx.recv().await {
            tracker.emit(ScanEvent::HostDiscovered(host.clone()));
            discovered.push(host);
        }

        let mut report = NetScanReport {
            space,
            discovered,
            results: Vec::new(),
            cancelled: cancel.is_cancelled(),
            phase: tracker.phase,
        };

        if report.discovered.is_empty() {
            info!("no hosts discovered in {}", report.space);
            tracker.enter(if report.cancelled { ScanPhase::Done } else { ScanPhase::Failed });
            report.phase = tracker.phase;
            return Ok(report);
        }

        tracker.enter(ScanPhase::Scanning);
        let total: usize = report.discovered.len();
        debug!("scanning {total} hosts, {} at a time", opts.host_concurrency);

        let scanner = self.scanner.clone();
        let worker_cancel = cancel.clone();
        let mut result_rx = pool::spawn_pool(
            report.discovered.clone(),
            opts.host_concurrency,
            cancel.clone(),
            move |host: HostRecord| {
                let scanner = scanner.clone();
                let cancel = worker_cancel.clone();
                async move {
                    let ports = scanner
                        .scan_ports(IpAddr::V4(host.ip), opts.ports, opts.port, cancel)
                        .await
                        .ok()?;
                    Some(HostScanResult::new(host, ports))
                }
            },
        );

        let mut aggregator = Aggregator::new();
        while let Some(result) = result_rx.recv().await {
            aggregator.push(result);
            tracker.emit(ScanEvent::HostScanned { done: aggregator.len(), total });
        }

        tracker.enter(ScanPhase::Aggregating);
        report.results = aggregator.finish();
        report.cancelled = cancel.is_cancelled();

        tracker.enter(ScanPhase::Done);
        report.phase = tracker.phase;
        Ok(report)
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
