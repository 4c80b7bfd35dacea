//! # Host Discovery
//!
//! Sweeps every candidate address of an [`AddressSpace`] with a reachability
//! probe and enriches each host that answers with its hostname, MAC address,
//! vendor and measured response time.
//!
//! Probes run concurrently, gated by a semaphore so that no more than the
//! configured number are ever in flight. Records are streamed as they are
//! found; the stream carries no ordering guarantee.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use netsweep_common::config::{DEFAULT_DISCOVERY_CONCURRENCY, DEFAULT_PROBE_TIMEOUT};
use netsweep_common::error::ScanError;
use netsweep_common::network::address_space::AddressSpace;
use netsweep_common::network::host::HostRecord;
use netsweep_common::vendors::VendorRepository;

use crate::network::{arp::ArpTable, dns::SystemResolver, ping::SystemPing};
use crate::probe::{HostnameResolver, NeighborTable, ReachabilityProbe};

#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    pub concurrency: usize,
    pub probe_timeout: Duration,
    /// Also report hosts without a PTR record.
    pub include_unnamed: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_DISCOVERY_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            include_unnamed: false,
        }
    }
}

#[derive(Clone)]
pub struct HostDiscoverer {
    pinger: Arc<dyn ReachabilityProbe>,
    resolver: Arc<dyn HostnameResolver>,
    neighbors: Arc<dyn NeighborTable>,
    vendors: Option<Arc<dyn VendorRepository>>,
}

impl HostDiscoverer {
    pub fn new(
        pinger: Arc<dyn ReachabilityProbe>,
        resolver: Arc<dyn HostnameResolver>,
        neighbors: Arc<dyn NeighborTable>,
    ) -> Self {
        Self {
            pinger,
            resolver,
            neighbors,
            vendors: None,
        }
    }

    /// The system ping, resolver and neighbour table.
    pub fn system() -> Self {
        Self::new(
            Arc::new(SystemPing),
            Arc::new(SystemResolver),
            Arc::new(ArpTable::default()),
        )
    }

    pub fn with_vendors(mut self, vendors: Arc<dyn VendorRepository>) -> Self {
        self.vendors = Some(vendors);
        self
    }

    /// Starts the sweep and returns the stream of discovered hosts.
    ///
    /// The stream ends once every probe has finished, or early when
    /// `cancel` fires; probes already running are abandoned. Dropping the
    /// receiver stops the sweep the same way.
    pub fn discover(
        &self,
        space: &AddressSpace,
        opts: DiscoveryOptions,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<HostRecord>, ScanError> {
        if opts.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }

        debug!(
            "sweeping {} candidates in {space} with {} probes",
            space.candidate_count(),
            opts.concurrency
        );

        let (tx, rx) = mpsc::channel::<HostRecord>(opts.concurrency);
        let semaphore = Arc::new(Semaphore::new(opts.concurrency));
        let candidates = space.candidates();
        let discoverer = self.clone();

        tokio::spawn(async move {
            for addr in candidates {
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tx.closed() => break,
                    permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_closed) => break,
                    },
                };

                let discoverer = discoverer.clone();
                let tx = tx.clone();
                let cancel = cancel.clone();

                tokio::spawn(async move {
                    let _permit = permit;
                    let record = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        _ = tx.closed() => None,
                        record = discoverer.probe_host(addr, opts) => record,
                    };
                    if let Some(record) = record {
                        let _ = tx.send(record).await;
                    }
                });
            }
        });

        Ok(rx)
    }

    /// [`discover`](Self::discover), collected.
    pub async fn discover_all(
        &self,
        space: &AddressSpace,
        opts: DiscoveryOptions,
        cancel: CancellationToken,
    ) -> Result<Vec<HostRecord>, ScanError> {
        let mut rx = self.discover(space, opts, cancel)?;
        let mut hosts: Vec<HostRecord> = Vec::new();
        while let Some(host) = rx.recv().await {
            hosts.push(host);
        }
        Ok(hosts)
    }

    async fn probe_host(&self, addr: Ipv4Addr, opts: DiscoveryOptions) -> Option<HostRecord> {
        let started = Instant::now();
        let reachable = tokio::time::timeout(opts.probe_timeout, self.pinger.is_reachable(addr, opts.probe_timeout))
            .await
            .unwrap_or(false);
        if !reachable {
            return None;
        }
        let rtt: Duration = started.elapsed();

        let hostname: Option<String> = self.resolver.resolve(IpAddr::V4(addr)).await;
        if hostname.is_none() && !opts.include_unnamed {
            trace!("{addr} is up but has no name, skipped");
            return None;
        }

        let mac = self.neighbors.mac_address(addr).await;
        let vendor = match (&self.vendors, mac) {
            (Some(repo), Some(mac)) => repo.get_vendor(mac),
            _ => None,
        };

        Some(
            HostRecord::new(addr)
                .with_hostname(hostname)
                .with_mac(mac)
                .with_vendor(vendor)
                .with_rtt(rtt),
        )
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
