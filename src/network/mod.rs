pub mod config;
pub mod network;

pub use config::{HiddenDelta, NetworkConfig, NetworkOption, OptionValue};
pub use network::{Network, NetworkBuilder};
