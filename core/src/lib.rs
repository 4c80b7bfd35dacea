pub mod address;
pub mod aggregate;
pub mod banner;
pub mod discovery;
pub mod monitor;
pub mod network;
pub mod orchestrator;
pub mod pool;
pub mod probe;
pub mod scanner;
pub mod system;
pub mod vendors;
