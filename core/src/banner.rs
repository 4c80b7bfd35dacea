//! Best-effort service banners read from an already open connection.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

/// Ports that only talk after a request; they get an HTTP `HEAD` first.
pub const WEB_PORTS: [u16; 4] = [80, 443, 8080, 8443];

const HTTP_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";
const READ_LIMIT: usize = 1024;
const MAX_BANNER_LEN: usize = 28;
const TRUNCATED_LEN: usize = 25;

/// Reads whatever the service on `port` sends within `deadline` and returns
/// its first line. Empty when the service is silent, closes or errors.
pub async fn grab<S>(stream: &mut S, port: u16, deadline: Duration) -> String
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    let exchange = async {
        if WEB_PORTS.contains(&port) {
            stream.write_all(HTTP_PROBE).await?;
            stream.flush().await?;
        }

        let mut buf = [0u8; READ_LIMIT];
        let read = stream.read(&mut buf).await?;
        Ok::<_, std::io::Error>(buf[..read].to_vec())
    };

    match timeout(deadline, exchange).await {
        Ok(Ok(bytes)) => first_line(&bytes),
        _ => String::new(),
    }
}

/// First non-blank line with control characters removed, cut to 25
/// characters plus `...` when longer than 28.
pub fn first_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let line: String = text
        .trim_start()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let line = line.trim_end();

    if line.chars().count() > MAX_BANNER_LEN {
        let head: String = line.chars().take(TRUNCATED_LEN).collect();
        format!("{head}...")
    } else {
        line.to_string()
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
