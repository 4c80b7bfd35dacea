use std::io;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::probe::ReachabilityProbe;
use crate::system;

const PING: &str = "ping";

/// ICMP echo through the system `ping` binary, which works without raw
/// socket privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPing;

#[async_trait]
impl ReachabilityProbe for SystemPing {
    async fn is_reachable(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        let wait_secs: String = wait_seconds(timeout).to_string();
        let addr_str: String = addr.to_string();

        let mut command = Command::new(PING);
        command
            .args(["-c", "1", "-W", &wait_secs, &addr_str])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(timeout, command.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(err)) => {
                if err.kind() == io::ErrorKind::NotFound {
                    system::report_missing_tool(PING);
                }
                trace!("ping {addr} failed to run: {err}");
                false
            }
            Err(_elapsed) => false,
        }
    }
}

/// `ping -W` only takes whole seconds; never pass 0, which some builds
/// treat as "wait forever".
fn wait_seconds(timeout: Duration) -> u64 {
    timeout.as_secs_f64().ceil().max(1.0) as u64
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
