//! Test doubles for the collaborator traits and mock interfaces shared by
//! the scenario tests under `tests/`.

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use pnet::util::MacAddr;
use tokio::io::AsyncWriteExt;

use netsweep_common::network::address_space::AddressSpace;
use netsweep_core::discovery::HostDiscoverer;
use netsweep_core::probe::{BoxedStream, HostnameResolver, NeighborTable, PortProbe, ReachabilityProbe};

/// `192.168.1.0/24` as seen from `192.168.1.42`.
pub fn lan() -> AddressSpace {
    AddressSpace::new("eth0", Ipv4Addr::new(192, 168, 1, 42), 24, Some(Ipv4Addr::new(192, 168, 1, 1)))
        .unwrap_or_else(|err| panic!("invalid test subnet: {err}"))
}

pub fn lan_ip(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, last)
}

/// A simulated subnet: which hosts answer, what they are called and which
/// MAC the neighbour cache knows for them.
#[derive(Default, Clone)]
pub struct FakeNetwork {
    up: HashSet<Ipv4Addr>,
    names: HashMap<Ipv4Addr, String>,
    macs: HashMap<Ipv4Addr, MacAddr>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, addr: Ipv4Addr, name: Option<&str>) -> Self {
        self.up.insert(addr);
        if let Some(name) = name {
            self.names.insert(addr, name.to_string());
        }
        self
    }

    pub fn mac(mut self, addr: Ipv4Addr, mac: MacAddr) -> Self {
        self.macs.insert(addr, mac);
        self
    }

    pub fn discoverer(self) -> HostDiscoverer {
        let network = Arc::new(self);
        HostDiscoverer::new(network.clone(), network.clone(), network)
    }
}

#[async_trait]
impl ReachabilityProbe for FakeNetwork {
    async fn is_reachable(&self, addr: Ipv4Addr, _timeout: Duration) -> bool {
        self.up.contains(&addr)
    }
}

#[async_trait]
impl HostnameResolver for FakeNetwork {
    async fn resolve(&self, addr: IpAddr) -> Option<String> {
        match addr {
            IpAddr::V4(v4) => self.names.get(&v4).cloned(),
            IpAddr::V6(_) => None,
        }
    }
}

#[async_trait]
impl NeighborTable for FakeNetwork {
    async fn mac_address(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        self.macs.get(&addr).copied()
    }
}

/// Every host answers after `delay`; records the highest number of probes
/// that were running at the same time.
pub struct InstrumentedProbe {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl InstrumentedProbe {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReachabilityProbe for InstrumentedProbe {
    async fn is_reachable(&self, _addr: Ipv4Addr, _timeout: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        true
    }
}

/// Answers only after `delay`, whatever the timeout.
pub struct SlowProbe(pub Duration);

#[async_trait]
impl ReachabilityProbe for SlowProbe {
    async fn is_reachable(&self, _addr: Ipv4Addr, _timeout: Duration) -> bool {
        tokio::time::sleep(self.0).await;
        true
    }
}

/// Names every address `host-<ip>`.
pub struct NameEverything;

#[async_trait]
impl HostnameResolver for NameEverything {
    async fn resolve(&self, addr: IpAddr) -> Option<String> {
        Some(format!("host-{addr}"))
    }
}

pub struct EmptyNeighbors;

#[async_trait]
impl NeighborTable for EmptyNeighbors {
    async fn mac_address(&self, _addr: Ipv4Addr) -> Option<MacAddr> {
        None
    }
}

/// Open ports per host, each greeting with a fixed banner over an in-memory
/// stream.
#[derive(Default)]
pub struct FakePorts {
    open: HashMap<(IpAddr, u16), &'static [u8]>,
    connects: AtomicUsize,
}

impl FakePorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(mut self, host: Ipv4Addr, port: u16, greeting: &'static [u8]) -> Self {
        self.open.insert((IpAddr::V4(host), port), greeting);
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortProbe for FakePorts {
    async fn connect(&self, addr: SocketAddr, _timeout: Duration) -> Option<BoxedStream> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let greeting: &'static [u8] = self.open.get(&(addr.ip(), addr.port())).copied()?;

        let (client, mut server) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            if !greeting.is_empty() {
                let _ = server.write_all(greeting).await;
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        });
        Some(Box::new(client))
    }
}

/// Every port stays silent until `delay` has passed, then reports closed.
pub struct StallingPorts {
    delay: Duration,
    connects: AtomicUsize,
}

impl StallingPorts {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortProbe for StallingPorts {
    async fn connect(&self, _addr: SocketAddr, _timeout: Duration) -> Option<BoxedStream> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        None
    }
}

pub const IFF_UP: u32 = 1;
pub const IFF_LOOPBACK: u32 = 1 << 3;
pub const IFF_RUNNING: u32 = 1 << 6;
pub const UP_RUNNING: u32 = IFF_UP | IFF_RUNNING;

pub fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: "".into(),
        index,
        mac,
        ips: ips.to_vec(),
        flags,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
    let net = Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap_or_else(|err| panic!("bad test network: {err}"));
    IpNetwork::V4(net)
}

pub fn v6(s: &str, p: u8) -> IpNetwork {
    let addr: Ipv6Addr = s.parse().unwrap_or_else(|err| panic!("bad test address {s}: {err}"));
    let net = Ipv6Network::new(addr, p).unwrap_or_else(|err| panic!("bad test network: {err}"));
    IpNetwork::V6(net)
}
