//! # Address Space Model
//!
//! Describes the IPv4 subnet attached to the selected local interface and
//! derives the boundaries a subnet sweep needs: the network and broadcast
//! addresses, the host count and the list of candidate hosts in between.

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::ScanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpace {
    pub interface: String,
    pub local_ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    /// `None` when neither routing source produced a default route.
    pub gateway: Option<Ipv4Addr>,
    pub cidr: u8,
}

impl AddressSpace {
    /// Builds the address space of `local_ip/cidr`.
    ///
    /// A `/32` holds a single address and is rejected; a `/31` is accepted
    /// but yields no candidates once network and broadcast are excluded.
    pub fn new(
        interface: impl Into<String>,
        local_ip: Ipv4Addr,
        cidr: u8,
        gateway: Option<Ipv4Addr>,
    ) -> Result<Self, ScanError> {
        if cidr > 31 {
            return Err(ScanError::SubnetTooSmall(cidr));
        }

        Ok(Self {
            interface: interface.into(),
            local_ip,
            netmask: netmask_from_cidr(cidr),
            gateway,
            cidr,
        })
    }

    /// `local_ip AND netmask`, octet by octet.
    pub fn network(&self) -> Ipv4Addr {
        let ip = self.local_ip.octets();
        let mask = self.netmask.octets();
        Ipv4Addr::from(std::array::from_fn::<u8, 4, _>(|i| ip[i] & mask[i]))
    }

    /// `local_ip OR (NOT netmask)`, octet by octet.
    pub fn broadcast(&self) -> Ipv4Addr {
        let ip = self.local_ip.octets();
        let mask = self.netmask.octets();
        Ipv4Addr::from(std::array::from_fn::<u8, 4, _>(|i| ip[i] | !mask[i]))
    }

    /// First three octets of the network address, e.g. `192.168.1`.
    pub fn network_prefix(&self) -> String {
        let [a, b, c, _] = self.network().octets();
        format!("{a}.{b}.{c}")
    }

    /// `2^(32 - cidr)`, network and broadcast included.
    pub fn host_count(&self) -> u64 {
        1u64 << (32 - u32::from(self.cidr))
    }

    /// Number of addresses a sweep probes.
    pub fn candidate_count(&self) -> u64 {
        self.host_count().saturating_sub(2)
    }

    /// Every host index in `1..=host_count - 2` added to the network address.
    pub fn candidates(&self) -> impl Iterator<Item = Ipv4Addr> + Send + 'static {
        let network: u32 = self.network().into();
        let count: u64 = self.candidate_count();
        (1..=count).map(move |idx| Ipv4Addr::from(network.wrapping_add(idx as u32)))
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.cidr)
    }
}

pub fn netmask_from_cidr(cidr: u8) -> Ipv4Addr {
    let mask: u32 = match cidr {
        0 => 0,
        bits if bits >= 32 => u32::MAX,
        bits => u32::MAX << (32 - u32::from(bits)),
    };
    Ipv4Addr::from(mask)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
