//! Capabilities the scanning engine consumes but does not implement itself.
//!
//! Discovery and port scanning only talk to these traits. The system
//! implementations live in [`crate::network`]; tests plug in doubles.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use pnet::util::MacAddr;
use tokio::io::{AsyncRead, AsyncWrite};

/// Any bidirectional byte stream a banner can be read from.
pub trait ByteStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ByteStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn ByteStream>;

/// Answers whether a host is up.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self, addr: Ipv4Addr, timeout: Duration) -> bool;
}

/// Opens TCP connections.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Returns the connected stream, or `None` when the port is closed,
    /// filtered or did not answer within `timeout`.
    async fn connect(&self, addr: SocketAddr, timeout: Duration) -> Option<BoxedStream>;
}

/// Reverse (PTR) lookups.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn resolve(&self, addr: IpAddr) -> Option<String>;
}

/// The kernel's IP to MAC neighbour cache.
#[async_trait]
pub trait NeighborTable: Send + Sync {
    async fn mac_address(&self, addr: Ipv4Addr) -> Option<MacAddr>;
}
