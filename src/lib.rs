pub mod activation;
pub mod checkpoint;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use checkpoint::record::CheckpointRecord;
pub use error::{Error, Result};
pub use layers::dense::Layer;
pub use network::config::{HiddenDelta, NetworkConfig, NetworkOption, OptionValue};
pub use network::network::{Network, NetworkBuilder};
pub use loss::mse::MseLoss;
pub use train::trainer::{train_epochs, train_network};

/// Loads a network from a checkpoint written by [`Network::save`].
pub fn load_checkpoint<P: AsRef<std::path::Path>>(path: P) -> Result<Network> {
    checkpoint::load(path)
}
