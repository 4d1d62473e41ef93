//! Flat, serializable mirror of a network's parameters and caches.
//!
//! The record keeps layer, neuron and synapse order exactly as in the live
//! network so that decoding rebuilds the same topology.

use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::{Layer, Neuron, Synapse};
use crate::network::Network;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseRecord {
    pub weight: f64,
    pub last_in: f64,
    pub last_out: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronRecord {
    pub bias: SynapseRecord,
    pub synapses: Vec<SynapseRecord>,
    pub z: f64,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub neurons: Vec<NeuronRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub activation_function: String,
    pub layers: Vec<LayerRecord>,
}

impl SynapseRecord {
    fn is_finite(&self) -> bool {
        self.weight.is_finite() && self.last_in.is_finite() && self.last_out.is_finite()
    }
}

impl From<&Synapse> for SynapseRecord {
    fn from(s: &Synapse) -> Self {
        SynapseRecord { weight: s.weight, last_in: s.last_in, last_out: s.last_out }
    }
}

impl From<&SynapseRecord> for Synapse {
    fn from(r: &SynapseRecord) -> Self {
        Synapse { weight: r.weight, last_in: r.last_in, last_out: r.last_out }
    }
}

impl From<&Neuron> for NeuronRecord {
    fn from(n: &Neuron) -> Self {
        NeuronRecord {
            bias: SynapseRecord::from(&n.bias),
            synapses: n.synapses.iter().map(SynapseRecord::from).collect(),
            z: n.z,
            a: n.a,
        }
    }
}

impl From<&NeuronRecord> for Neuron {
    fn from(r: &NeuronRecord) -> Self {
        Neuron {
            synapses: r.synapses.iter().map(Synapse::from).collect(),
            bias: Synapse::from(&r.bias),
            z: r.z,
            a: r.a,
        }
    }
}

impl CheckpointRecord {
    /// Deep, order-preserving copy of every parameter and cache.
    pub fn encode(network: &Network) -> CheckpointRecord {
        CheckpointRecord {
            activation_function: network.activation().name().to_owned(),
            layers: network
                .layers()
                .iter()
                .map(|layer| LayerRecord {
                    neurons: layer.neurons.iter().map(NeuronRecord::from).collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds the network, rejecting records whose topology is inconsistent.
    pub fn decode(&self) -> Result<Network> {
        let activation: ActivationFunction = self.activation_function.parse().map_err(|_| {
            Error::CorruptCheckpoint(format!("unknown activation {:?}", self.activation_function))
        })?;
        self.validate()?;

        let layers = self
            .layers
            .iter()
            .map(|layer| Layer { neurons: layer.neurons.iter().map(Neuron::from).collect() })
            .collect();
        Ok(Network::from_layers(layers, activation))
    }

    /// JSON has no representation for NaN or infinity, so a diverged network
    /// cannot be written.
    pub fn ensure_finite(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            for (j, neuron) in layer.neurons.iter().enumerate() {
                let at = |what: String| {
                    Err(Error::NonFiniteParameter(format!("{what} of neuron {j} in layer {i}")))
                };
                if !(neuron.z.is_finite() && neuron.a.is_finite()) {
                    return at("cached z/a".to_owned());
                }
                if !neuron.bias.is_finite() {
                    return at("bias".to_owned());
                }
                if let Some(k) = neuron.synapses.iter().position(|s| !s.is_finite()) {
                    return at(format!("synapse {k}"));
                }
            }
        }
        Ok(())
    }

    /// Checks the fan-in invariant.
    fn validate(&self) -> Result<()> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| Error::CorruptCheckpoint("no layers".to_owned()))?;
        let input_size = first.neurons.first().map_or(0, |n| n.synapses.len());
        if input_size == 0 {
            return Err(Error::CorruptCheckpoint("first layer has no inputs".to_owned()));
        }

        let mut fan_in = input_size;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.neurons.is_empty() {
                return Err(Error::CorruptCheckpoint(format!("layer {i} has no neurons")));
            }
            if let Some(j) = layer.neurons.iter().position(|n| n.synapses.len() != fan_in) {
                return Err(Error::CorruptCheckpoint(format!(
                    "neuron {j} of layer {i} has {} synapses, expected {fan_in}",
                    layer.neurons[j].synapses.len()
                )));
            }
            fan_in = layer.neurons.len();
        }
        Ok(())
    }

    /// Writes the record as uncompressed, pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_finite()?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<CheckpointRecord> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
