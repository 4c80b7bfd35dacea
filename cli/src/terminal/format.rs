use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use colored::*;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;

use netsweep_common::UNKNOWN;
use netsweep_common::network::interface;

use crate::terminal::{colors, print};

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(&IpAddr::V6(*ipv6_addr)) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    "IPv6"
}

fn is_global_unicast(ip_addr: &IpAddr) -> bool {
    match ip_addr {
        IpAddr::V6(ipv6_addr) => {
            let first_byte = ipv6_addr.octets()[0];
            (0x20..=0x3F).contains(&first_byte)
        }
        _ => false,
    }
}

pub fn ipv4(addr: Ipv4Addr) -> ColoredString {
    addr.to_string().color(colors::IPV4_ADDR)
}

pub fn optional_ipv4(addr: Option<Ipv4Addr>) -> ColoredString {
    match addr {
        Some(addr) => ipv4(addr),
        None => UNKNOWN.color(colors::UNKNOWN_VALUE),
    }
}

pub fn ip(addr: IpAddr) -> ColoredString {
    match addr {
        IpAddr::V4(v4) => ipv4(v4),
        IpAddr::V6(v6) => v6.to_string().color(colors::IPV6_ADDR),
    }
}

pub fn net_to_key_value_pair(ip_net: &[IpNetwork]) -> Vec<(String, ColoredString)> {
    ip_net
        .iter()
        .map(|ip_network| match ip_network {
            IpNetwork::V4(ipv4_network) => {
                let address: ColoredString = ipv4_network.ip().to_string().color(colors::IPV4_ADDR);
                let prefix: ColoredString =
                    ipv4_network.prefix().to_string().color(colors::IPV4_PREFIX);
                let result: ColoredString = format!("{address}/{prefix}").color(colors::SEPARATOR);
                ("IPv4".to_string(), result)
            }
            IpNetwork::V6(ipv6_network) => {
                let address: ColoredString = ipv6_network.ip().to_string().color(colors::IPV6_ADDR);
                let prefix: ColoredString =
                    ipv6_network.prefix().to_string().color(colors::IPV6_PREFIX);
                let value: ColoredString = format!("{address}/{prefix}").color(colors::SEPARATOR);
                let key = ipv6_to_type_str(&ipv6_network.ip());
                (key.to_string(), value)
            }
        })
        .collect()
}

pub fn print_interface(network_interface: &NetworkInterface, idx: usize) {
    print::tree_head(idx, &network_interface.name);

    let status = interface::interface_status(network_interface);
    let mut key_value_pair: Vec<(String, ColoredString)> =
        vec![("Status".to_string(), status.label().color(colors::ACCENT))];
    key_value_pair.extend(net_to_key_value_pair(&network_interface.ips));

    if let Some(mac_addr) = network_interface.mac {
        key_value_pair.push((
            "MAC".to_string(),
            mac_addr.to_string().color(colors::MAC_ADDR),
        ));
    }
    print::as_tree_one_level(key_value_pair);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
