//! TCP connect port scanning of a single host.
//!
//! Every port of the range goes through a bounded [`pool`](crate::pool).
//! A port that accepts the connection is reported open together with its
//! service name and whatever banner it sent on that same connection.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use netsweep_common::config::{DEFAULT_PORT_CONCURRENCY, DEFAULT_PORT_TIMEOUT};
use netsweep_common::error::ScanError;
use netsweep_common::network::host::PortRecord;
use netsweep_common::network::ports::PortRange;
use netsweep_common::services;

use crate::banner;
use crate::network::tcp::TcpConnect;
use crate::pool;
use crate::probe::PortProbe;

#[derive(Debug, Clone, Copy)]
pub struct PortScanOptions {
    /// Upper bound on simultaneous connection attempts.
    pub concurrency: usize,
    /// Applies to the connect and, separately, to the banner read.
    pub timeout: Duration,
}

impl Default for PortScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_PORT_CONCURRENCY,
            timeout: DEFAULT_PORT_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct PortScanner {
    probe: Arc<dyn PortProbe>,
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new(Arc::new(TcpConnect))
    }
}

impl PortScanner {
    pub fn new(probe: Arc<dyn PortProbe>) -> Self {
        Self { probe }
    }

    /// Returns the open ports of `host` within `range`, ascending and
    /// without duplicates. A cancelled scan returns what it found so far.
    pub async fn scan_ports(
        &self,
        host: IpAddr,
        range: PortRange,
        opts: PortScanOptions,
        cancel: CancellationToken,
    ) -> Result<Vec<PortRecord>, ScanError> {
        if opts.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }

        debug!("scanning {host} ports {range} with {} workers", opts.concurrency);

        let ports: Vec<u16> = range.iter().collect();
        let probe = Arc::clone(&self.probe);

        let mut rx = pool::spawn_pool(ports, opts.concurrency, cancel, move |port| {
            let probe = Arc::clone(&probe);
            async move { probe_port(probe.as_ref(), SocketAddr::new(host, port), opts.timeout).await }
        });

        let mut open: Vec<PortRecord> = Vec::new();
        while let Some(record) = rx.recv().await {
            open.push(record);
        }

        open.sort_by_key(|record| record.port);
        open.dedup_by_key(|record| record.port);
        Ok(open)
    }
}

async fn probe_port(probe: &dyn PortProbe, addr: SocketAddr, timeout: Duration) -> Option<PortRecord> {
    let mut stream = probe.connect(addr, timeout).await?;

    let port: u16 = addr.port();
    let banner: String = banner::grab(&mut stream, port, timeout).await;
    trace!("{addr} open, banner {banner:?}");

    Some(PortRecord::new(port, services::service_name(port), banner))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
