use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::Path;

use crate::activation::ActivationFunction;
use crate::checkpoint;
use crate::error::{Error, Result};
use crate::layers::dense::{Init, Layer};
use crate::loss::mse::MseLoss;
use crate::network::config::{HiddenDelta, NetworkConfig, NetworkOption, OptionValue};
use crate::train;

/// A fully-connected feed-forward network.
///
/// Every forward pass overwrites the per-neuron `z`/`a` caches and the
/// per-synapse input/output caches; `backward` relies on those caches, so it
/// only makes sense right after the `forward` whose output it receives.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    input_size: usize,
    config: NetworkConfig,
    rng: StdRng,
    /// Still holds its initial draw: never trained and not decoded from a
    /// checkpoint.
    pristine: bool,
}

/// Collects shape, activation and initialization policy before drawing any
/// weights.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    input_size: usize,
    layer_sizes: Vec<usize>,
    config: NetworkConfig,
    rng: Option<StdRng>,
}

impl NetworkBuilder {
    pub fn activation(mut self, activation: ActivationFunction) -> Self {
        self.config.activation = Some(activation);
        self
    }

    pub fn randomize_weights(mut self, randomize: bool) -> Self {
        self.config.randomize_weights = Some(randomize);
        self
    }

    pub fn randomize_bias(mut self, randomize: bool) -> Self {
        self.config.randomize_bias = Some(randomize);
        self
    }

    pub fn hidden_delta(mut self, rule: HiddenDelta) -> Self {
        self.config.hidden_delta = rule;
        self
    }

    /// Makes weight initialization reproducible.
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<Network> {
        if self.input_size == 0 {
            return Err(Error::InvalidTopology("input width must be at least 1".to_owned()));
        }
        if self.layer_sizes.is_empty() {
            return Err(Error::InvalidTopology("network needs at least one layer".to_owned()));
        }
        if let Some(i) = self.layer_sizes.iter().position(|&size| size == 0) {
            return Err(Error::InvalidTopology(format!("layer {i} has no neurons")));
        }

        let mut rng = self.rng.unwrap_or_else(StdRng::from_entropy);
        let weights = Init::from_flag(self.config.randomize_weights());
        let bias = Init::from_flag(self.config.randomize_bias());

        let mut fan_in = self.input_size;
        let mut layers = Vec::with_capacity(self.layer_sizes.len());
        for &size in &self.layer_sizes {
            layers.push(Layer::new(size, fan_in, weights, bias, &mut rng));
            fan_in = size;
        }

        debug!(
            "built network {}x{:?} activation={} weights={:?} bias={:?}",
            self.input_size,
            self.layer_sizes,
            self.config.activation(),
            weights,
            bias
        );

        Ok(Network {
            layers,
            input_size: self.input_size,
            config: self.config,
            rng,
            pristine: true,
        })
    }
}

impl Network {
    pub fn builder(input_size: usize, layer_sizes: &[usize]) -> NetworkBuilder {
        NetworkBuilder {
            input_size,
            layer_sizes: layer_sizes.to_vec(),
            config: NetworkConfig::default(),
            rng: None,
        }
    }

    /// Default activation (`relu`) and default initialization (uniform weights
    /// and biases).
    pub fn new(input_size: usize, layer_sizes: &[usize]) -> Result<Network> {
        Network::builder(input_size, layer_sizes).build()
    }

    pub fn with_activation(
        activation: ActivationFunction,
        input_size: usize,
        layer_sizes: &[usize],
    ) -> Result<Network> {
        Network::builder(input_size, layer_sizes).activation(activation).build()
    }

    /// Reassembles a network from already-populated layers. The caller is
    /// responsible for the fan-in invariant; the input width is read from the
    /// first layer.
    pub(crate) fn from_layers(layers: Vec<Layer>, activation: ActivationFunction) -> Network {
        let input_size = layers.first().and_then(Layer::input_size).unwrap_or(0);
        Network {
            layers,
            input_size,
            config: NetworkConfig { activation: Some(activation), ..NetworkConfig::default() },
            rng: StdRng::from_entropy(),
            pristine: false,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::size).collect()
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn activation(&self) -> ActivationFunction {
        self.config.activation()
    }

    /// Stores `value` under `option`. The randomize flags re-draw weights or
    /// biases only while the network still holds its initial draw; on a
    /// trained or loaded network they are recorded and nothing else changes.
    pub fn set_option(&mut self, option: NetworkOption, value: Option<OptionValue>) -> Result<()> {
        self.config.set(option, value)?;
        match option {
            NetworkOption::ActivationFunction => {}
            _ if !self.pristine => {}
            NetworkOption::RandomizeWeights => {
                let init = Init::from_flag(self.config.randomize_weights());
                for layer in &mut self.layers {
                    layer.reinit_weights(init, &mut self.rng);
                }
            }
            NetworkOption::RandomizeBias => {
                let init = Init::from_flag(self.config.randomize_bias());
                for layer in &mut self.layers {
                    layer.reinit_bias(init, &mut self.rng);
                }
            }
        }
        debug!("option {option} set to {:?}", value);
        Ok(())
    }

    pub fn get_option(&self, option: NetworkOption) -> Result<OptionValue> {
        self.config.get(option)
    }

    /// Feeds `input` through every layer in order and returns the last
    /// layer's activations.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let activation = self.config.activation();
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current, activation)?;
        }
        Ok(current)
    }

    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// One forward pass followed by one backward pass on a single sample.
    pub fn train(&mut self, input: &[f64], expected: &[f64], rate: f64) -> Result<()> {
        let prediction = self.forward(input)?;
        self.backward(&prediction, expected, rate)
    }

    /// Repeats the single-sample step over every sample, in listed order, for
    /// `epochs` full passes.
    pub fn train_batch(
        &mut self,
        inputs: &[Vec<f64>],
        expecteds: &[Vec<f64>],
        epochs: usize,
        rate: f64,
    ) -> Result<()> {
        train::train_epochs(self, inputs, expecteds, epochs, rate).map(|_| ())
    }

    /// Updates every synapse and bias in place from the output error.
    pub fn backward(&mut self, prediction: &[f64], expected: &[f64], rate: f64) -> Result<()> {
        if prediction.len() != expected.len() {
            return Err(Error::shape("prediction vs expected", expected.len(), prediction.len()));
        }
        if prediction.len() != self.output_size() {
            let expected = self.output_size();
            return Err(Error::shape("prediction vs output layer", expected, prediction.len()));
        }
        self.pristine = false;
        match self.config.hidden_delta {
            HiddenDelta::Shared => self.backward_shared(prediction, expected, rate),
            HiddenDelta::Chained => self.backward_chained(prediction, expected, rate),
        }
        Ok(())
    }

    fn backward_shared(&mut self, prediction: &[f64], expected: &[f64], rate: f64) {
        let activation = self.config.activation();
        let deltas: Vec<f64> = MseLoss::error(prediction, expected)
            .into_iter()
            .zip(prediction)
            .map(|(err, &p)| err * activation.derivative(p))
            .collect();

        let last = self.layers.len() - 1;
        for (neuron, &delta) in self.layers[last].neurons.iter_mut().zip(&deltas) {
            neuron.adjust(rate * delta);
        }

        // All hidden scalars are computed before any hidden layer moves; the
        // last hidden layer sees the already-updated output weights.
        let mut hidden = Vec::with_capacity(last);
        for i in (0..last).rev() {
            let downstream = &self.layers[i + 1];
            let layer_deltas: Vec<f64> = (0..self.layers[i].size())
                .map(|j| {
                    let mut hdelta = 0.0;
                    for neuron in &downstream.neurons {
                        for &delta in &deltas {
                            hdelta += neuron.synapses[j].weight * delta;
                        }
                    }
                    hdelta
                })
                .collect();
            hidden.push((i, layer_deltas));
        }

        for (i, layer_deltas) in hidden {
            for (neuron, hdelta) in self.layers[i].neurons.iter_mut().zip(layer_deltas) {
                neuron.adjust(rate * hdelta);
            }
        }
    }

    fn backward_chained(&mut self, prediction: &[f64], expected: &[f64], rate: f64) {
        let activation = self.config.activation();
        let last = self.layers.len() - 1;

        let output: Vec<f64> = MseLoss::error(prediction, expected)
            .into_iter()
            .zip(&self.layers[last].neurons)
            .map(|(err, neuron)| err * activation.derivative(neuron.z))
            .collect();

        let mut deltas = vec![Vec::new(); self.layers.len()];
        deltas[last] = output;
        for i in (0..last).rev() {
            let downstream = &self.layers[i + 1];
            deltas[i] = self.layers[i]
                .neurons
                .iter()
                .enumerate()
                .map(|(j, neuron)| {
                    let back: f64 = downstream
                        .neurons
                        .iter()
                        .zip(&deltas[i + 1])
                        .map(|(k, &delta)| k.synapses[j].weight * delta)
                        .sum();
                    back * activation.derivative(neuron.z)
                })
                .collect();
        }

        for (layer, layer_deltas) in self.layers.iter_mut().zip(deltas) {
            for (neuron, delta) in layer.neurons.iter_mut().zip(layer_deltas) {
                neuron.adjust(rate * delta);
            }
        }
    }

    /// Writes a gzip-compressed checkpoint to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        checkpoint::save(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        checkpoint::load(path)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "Layer {i}:")?;
            for (j, neuron) in layer.neurons.iter().enumerate() {
                writeln!(f, "\tNeuron({j})")?;
                writeln!(f, "\t\tBias => {:.6}", neuron.bias.weight)?;
                for (k, synapse) in neuron.synapses.iter().enumerate() {
                    writeln!(f, "\t\tSynapse({k}) => {:.6}", synapse.weight)?;
                }
            }
        }
        Ok(())
    }
}
