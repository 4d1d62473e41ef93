pub mod codec;
pub mod record;

pub use codec::{load, save};
pub use record::{CheckpointRecord, LayerRecord, NeuronRecord, SynapseRecord};
