pub mod arp;
pub mod dns;
pub mod ping;
pub mod tcp;
