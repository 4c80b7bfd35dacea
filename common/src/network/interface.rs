use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface only reaches this machine.
    IsLoopback,
    /// The interface carries no IPv4 address to derive a subnet from.
    NoIpv4Address,
}

/// How an interface is listed by the `info` command.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterfaceStatus {
    Active,
    Loopback,
    NoIpv4,
    Inactive,
}

impl InterfaceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InterfaceStatus::Active => "active",
            InterfaceStatus::Loopback => "loopback",
            InterfaceStatus::NoIpv4 => "no IPv4",
            InterfaceStatus::Inactive => "inactive",
        }
    }
}

/// Picks the interface a subnet sweep runs on: the first one that is up, not
/// loopback and holds an IPv4 address, in the order the OS reports them.
pub fn select_ipv4_interface(
    interfaces: &[NetworkInterface],
) -> Option<(&NetworkInterface, Ipv4Network)> {
    interfaces.iter().find_map(|interface| {
        is_viable_sweep_interface(interface)
            .ok()
            .map(|net| (interface, net))
    })
}

fn is_viable_sweep_interface(interface: &NetworkInterface) -> Result<Ipv4Network, ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    first_ipv4_net(interface).ok_or(ViabilityError::NoIpv4Address)
}

pub fn first_ipv4_net(interface: &NetworkInterface) -> Option<Ipv4Network> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) => Some(*v4),
        IpNetwork::V6(_) => None,
    })
}

pub fn interface_status(interface: &NetworkInterface) -> InterfaceStatus {
    if !interface.is_up() {
        InterfaceStatus::Inactive
    } else if interface.is_loopback() {
        InterfaceStatus::Loopback
    } else if first_ipv4_net(interface).is_none() {
        InterfaceStatus::NoIpv4
    } else {
        InterfaceStatus::Active
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
