use rand::Rng;

use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::neuron::Neuron;
use crate::layers::synapse::Synapse;

/// Weight policy used when (re)initializing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Init {
    /// Every weight set to `1.0`.
    Constant,
    /// Independent uniform draw in `[0, 1)`.
    Uniform,
}

impl Init {
    pub fn from_flag(randomize: bool) -> Init {
        if randomize { Init::Uniform } else { Init::Constant }
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            Init::Constant => 1.0,
            Init::Uniform => rng.gen::<f64>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    /// `size` neurons, each with `input_size` synapses.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        weights: Init,
        bias: Init,
        rng: &mut R,
    ) -> Layer {
        let mut neurons = Vec::with_capacity(size);
        for _ in 0..size {
            let mut synapses = Vec::with_capacity(input_size);
            for _ in 0..input_size {
                synapses.push(Synapse::new(weights.sample(rng)));
            }
            neurons.push(Neuron::new(synapses, Synapse::new(bias.sample(rng))));
        }
        Layer { neurons }
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    /// Fan-in shared by every neuron, or `None` for an empty layer.
    pub fn input_size(&self) -> Option<usize> {
        self.neurons.first().map(Neuron::fan_in)
    }

    /// Fires every neuron on `input`, then returns their activations.
    pub fn feed_from(&mut self, input: &[f64], activation: ActivationFunction) -> Result<Vec<f64>> {
        for neuron in &mut self.neurons {
            neuron.fire(input)?;
        }
        Ok(self.output(activation))
    }

    /// Activates every neuron in index order.
    pub fn output(&mut self, activation: ActivationFunction) -> Vec<f64> {
        self.neurons.iter_mut().map(|n| n.activate(activation)).collect()
    }

    pub fn reinit_weights<R: Rng + ?Sized>(&mut self, init: Init, rng: &mut R) {
        for neuron in &mut self.neurons {
            for synapse in &mut neuron.synapses {
                synapse.weight = init.sample(rng);
            }
        }
    }

    pub fn reinit_bias<R: Rng + ?Sized>(&mut self, init: Init, rng: &mut R) {
        for neuron in &mut self.neurons {
            neuron.bias.weight = init.sample(rng);
        }
    }
}
