pub mod address_space;
pub mod host;
pub mod interface;
pub mod ports;
pub mod target;
