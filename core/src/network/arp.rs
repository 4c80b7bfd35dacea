use std::net::Ipv4Addr;
use std::path::PathBuf;

use async_trait::async_trait;
use pnet::util::MacAddr;
use tracing::trace;

use crate::probe::NeighborTable;
use crate::system;

const PROC_NET_ARP: &str = "/proc/net/arp";

/// The kernel neighbour cache. Reads `/proc/net/arp` and falls back to
/// `arp -n <ip>` where that file does not exist.
///
/// The cache is filled as a side effect of the reachability probe, so a
/// lookup right after a successful ping usually hits.
#[derive(Debug, Clone)]
pub struct ArpTable {
    path: PathBuf,
}

impl Default for ArpTable {
    fn default() -> Self {
        Self {
            path: PathBuf::from(PROC_NET_ARP),
        }
    }
}

impl ArpTable {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lookup_blocking(path: PathBuf, addr: Ipv4Addr) -> Option<MacAddr> {
        if let Ok(content) = std::fs::read_to_string(&path) {
            return parse_proc_arp(&content, addr);
        }

        let addr_str: String = addr.to_string();
        match system::run("arp", &["-n", &addr_str]) {
            Ok(output) => parse_arp_command(&output, addr),
            Err(err) => {
                trace!("arp lookup for {addr} failed: {err:#}");
                None
            }
        }
    }
}

#[async_trait]
impl NeighborTable for ArpTable {
    async fn mac_address(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        let path: PathBuf = self.path.clone();
        tokio::task::spawn_blocking(move || Self::lookup_blocking(path, addr))
            .await
            .ok()
            .flatten()
    }
}

/// Columns: `IP address, HW type, Flags, HW address, Mask, Device`.
pub fn parse_proc_arp(content: &str, addr: Ipv4Addr) -> Option<MacAddr> {
    content.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [ip, _hw_type, _flags, mac, ..] if ip.parse::<Ipv4Addr>().ok() == Some(addr) => {
                parse_mac(mac)
            }
            _ => None,
        }
    })
}

/// Net-tools output: `Address HWtype HWaddress Flags Mask Iface`. Unresolved
/// entries show `(incomplete)` in place of the hardware address.
pub fn parse_arp_command(output: &str, addr: Ipv4Addr) -> Option<MacAddr> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let ip: Ipv4Addr = fields.next()?.parse().ok()?;
        if ip != addr {
            return None;
        }
        fields.find_map(parse_mac)
    })
}

fn parse_mac(field: &str) -> Option<MacAddr> {
    let mac: MacAddr = field.parse().ok()?;
    (mac != MacAddr::zero()).then_some(mac)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
