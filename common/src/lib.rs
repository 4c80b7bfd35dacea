//! Shared data model for netsweep.
//!
//! Everything here is plain data and pure computation: address arithmetic,
//! interface selection, port ranges, the service name table and the error
//! taxonomy. Anything that touches the network or spawns a process lives in
//! `netsweep-core`.

pub mod config;
pub mod error;
pub mod network;
pub mod services;
pub mod vendors;

/// Rendered in place of any value that could not be resolved.
pub const UNKNOWN: &str = "unknown";
