//! Resolves the [`AddressSpace`] a local sweep runs on.
//!
//! The subnet comes from the first viable interface. The default gateway is
//! best effort: `ip route`, then `route -n`, otherwise unknown.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use tracing::debug;

use netsweep_common::error::ScanError;
use netsweep_common::network::address_space::AddressSpace;
use netsweep_common::network::interface::select_ipv4_interface;

use crate::system;

pub fn resolve() -> Result<AddressSpace, ScanError> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    resolve_from(&interfaces, default_gateway)
}

/// Runs `resolver` on the blocking pool. Interface enumeration and the
/// gateway lookup shell out, so async callers go through here.
pub async fn resolve_blocking<F>(resolver: F) -> Result<AddressSpace, ScanError>
where
    F: FnOnce() -> Result<AddressSpace, ScanError> + Send + 'static,
{
    tokio::task::spawn_blocking(resolver)
        .await
        .unwrap_or(Err(ScanError::NoActiveInterface))
}

/// [`resolve`] over a given interface list and gateway source.
pub fn resolve_from<F>(interfaces: &[NetworkInterface], gateway: F) -> Result<AddressSpace, ScanError>
where
    F: FnOnce() -> Option<Ipv4Addr>,
{
    let (interface, net) = select_ipv4_interface(interfaces).ok_or(ScanError::NoActiveInterface)?;
    debug!("selected interface {} ({}/{})", interface.name, net.ip(), net.prefix());

    AddressSpace::new(interface.name.clone(), net.ip(), net.prefix(), gateway())
}

pub fn default_gateway() -> Option<Ipv4Addr> {
    if let Some(gateway) = system::run("ip", &["route", "show", "default"])
        .ok()
        .and_then(|out| parse_ip_route_default(&out))
    {
        return Some(gateway);
    }

    system::run("route", &["-n"])
        .ok()
        .and_then(|out| parse_route_n(&out))
}

/// `default via 192.168.1.1 dev wlan0 proto dhcp metric 600`
pub fn parse_ip_route_default(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["default", "via", gateway, ..] => gateway.parse().ok(),
            _ => None,
        }
    })
}

/// The `0.0.0.0` destination row of the net-tools routing table.
pub fn parse_route_n(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 8 && fields[0] == "0.0.0.0" {
            fields[1].parse().ok()
        } else {
            None
        }
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
