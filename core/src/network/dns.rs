use std::net::IpAddr;

use async_trait::async_trait;
use tracing::trace;

use netsweep_common::error::ScanError;

use crate::probe::HostnameResolver;

/// PTR lookups through the system resolver (`getnameinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostnameResolver for SystemResolver {
    async fn resolve(&self, addr: IpAddr) -> Option<String> {
        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr));

        match lookup.await {
            Ok(Ok(name)) => normalize_hostname(&name, addr),
            Ok(Err(err)) => {
                trace!("no PTR record for {addr}: {err}");
                None
            }
            Err(_join_err) => None,
        }
    }
}

/// Forward lookup for the `portscan` target. Prefers the first IPv4 answer.
pub async fn resolve_target(hostname: &str) -> Result<IpAddr, ScanError> {
    let name: String = hostname.to_string();
    let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_host(&name)).await;

    let addrs: Vec<IpAddr> = match lookup {
        Ok(Ok(addrs)) => addrs,
        _ => Vec::new(),
    };

    pick_address(&addrs).ok_or_else(|| ScanError::UnresolvedTarget(hostname.to_string()))
}

fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

/// `getnameinfo` hands back the numeric address when no name exists; that
/// is not a hostname.
fn normalize_hostname(name: &str, addr: IpAddr) -> Option<String> {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() || name.parse::<IpAddr>().is_ok() || name == addr.to_string() {
        return None;
    }
    Some(name.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
