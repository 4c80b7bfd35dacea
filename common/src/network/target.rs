//! # Port Scan Target
//!
//! The `portscan` command accepts either a literal IP address or a hostname
//! that still has to be resolved. This module only parses and validates the
//! input; resolution happens in `netsweep-core`.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A literal IPv4 or IPv6 address.
    Addr(IpAddr),
    /// A DNS name such as `router.lan` or `example.com`.
    Hostname(String),
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Address**: "192.168.1.5", "::1".
    /// * **Hostname**: letters, digits, hyphens and dots, labels of at most
    ///   63 characters, 253 characters in total. A trailing dot is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(addr) = s.parse::<IpAddr>() {
            return Ok(Target::Addr(addr));
        }

        parse_hostname(s).map(Target::Hostname)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Addr(addr) => write!(f, "{addr}"),
            Target::Hostname(name) => write!(f, "{name}"),
        }
    }
}

fn parse_hostname(s: &str) -> Result<String, String> {
    let name = s.strip_suffix('.').unwrap_or(s);

    if name.is_empty() {
        return Err("target cannot be empty".to_string());
    }
    if name.len() > 253 {
        return Err(format!("hostname is too long: {name}"));
    }

    for label in name.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(format!("invalid hostname label in '{name}'"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("hostname label cannot start or end with '-': {label}"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(format!("invalid target: {s}"));
        }
    }

    // "300.1.1.1" is neither an address nor a sensible hostname
    if name.split('.').all(|label| label.chars().all(|c| c.is_ascii_digit())) {
        return Err(format!("invalid IP address: {s}"));
    }

    Ok(name.to_ascii_lowercase())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
