pub mod dense;
pub mod neuron;
pub mod synapse;

pub use dense::{Init, Layer};
pub use neuron::Neuron;
pub use synapse::Synapse;
