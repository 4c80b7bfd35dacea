use std::net::Ipv4Addr;
use std::time::Duration;

use pnet::util::MacAddr;

use crate::UNKNOWN;

/// A host that answered the reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ip: Ipv4Addr,
    pub hostname: Option<String>,
    pub mac: Option<MacAddr>,
    pub vendor: Option<String>,
    /// Measured time until the probe reported the host as reachable.
    pub rtt: Option<Duration>,
}

impl HostRecord {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            hostname: None,
            mac: None,
            vendor: None,
            rtt: None,
        }
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn with_mac(mut self, mac: Option<MacAddr>) -> Self {
        self.mac = mac;
        self
    }

    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn with_rtt(mut self, rtt: Duration) -> Self {
        self.rtt = Some(rtt);
        self
    }

    pub fn hostname_or_unknown(&self) -> &str {
        self.hostname.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn mac_or_unknown(&self) -> String {
        self.mac
            .map(|mac| mac.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// An open TCP port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub port: u16,
    pub service: &'static str,
    /// First line the service sent, at most 28 characters. Empty if the
    /// service stayed silent.
    pub banner: String,
}

impl PortRecord {
    pub fn new(port: u16, service: &'static str, banner: String) -> Self {
        Self {
            port,
            service,
            banner,
        }
    }
}

/// Outcome of scanning one discovered host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScanResult {
    pub host: HostRecord,
    pub ports: Vec<PortRecord>,
}

impl HostScanResult {
    pub fn new(host: HostRecord, ports: Vec<PortRecord>) -> Self {
        Self { host, ports }
    }

    pub fn has_open_ports(&self) -> bool {
        !self.ports.is_empty()
    }
}
