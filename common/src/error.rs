use thiserror::Error;

/// Failures that abort an operation.
///
/// Per-host and per-port failures (a ping that times out, a refused connect,
/// a missing PTR record) never show up here; they only exclude the unit from
/// the results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("no active network interface with an IPv4 address found")]
    NoActiveInterface,

    #[error("invalid port range {start}-{end}: expected 1 <= start <= end <= 65535")]
    InvalidPortRange { start: u32, end: u32 },

    #[error("invalid range code {0}: expected 0 (well-known), 1 (registered), 2 (private) or 3 (all)")]
    InvalidRangeCode(u8),

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("a /{0} network has no room for hosts")]
    SubnetTooSmall(u8),

    #[error("could not resolve hostname '{0}'")]
    UnresolvedTarget(String),

    #[error("no statistics source produced counters for interface '{interface}'")]
    StatsUnavailable { interface: String },
}
