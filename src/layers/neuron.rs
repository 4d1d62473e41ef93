use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::synapse::Synapse;

/// Constant input fed to every bias synapse.
pub const BIAS_INPUT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub synapses: Vec<Synapse>,
    pub bias: Synapse,
    /// Pre-activation sum from the most recent `fire`.
    pub z: f64,
    /// Activated value from the most recent `activate`.
    pub a: f64,
}

impl Neuron {
    pub fn new(synapses: Vec<Synapse>, bias: Synapse) -> Neuron {
        Neuron { synapses, bias, z: 0.0, a: 0.0 }
    }

    pub fn fan_in(&self) -> usize {
        self.synapses.len()
    }

    /// Weighted sum of `inputs` plus the bias; overwrites `z`.
    pub fn fire(&mut self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.synapses.len() {
            return Err(Error::shape("neuron fan-in", self.synapses.len(), inputs.len()));
        }
        let mut z = 0.0;
        for (synapse, &x) in self.synapses.iter_mut().zip(inputs) {
            z += synapse.fire(x);
        }
        z += self.bias.fire(BIAS_INPUT);
        self.z = z;
        Ok(z)
    }

    pub fn activate(&mut self, activation: ActivationFunction) -> f64 {
        self.a = activation.function(self.z);
        self.a
    }

    /// Applies the same scaled delta to every synapse and to the bias.
    pub fn adjust(&mut self, delta: f64) {
        for synapse in &mut self.synapses {
            synapse.adjust(delta);
        }
        self.bias.adjust(delta);
    }
}
