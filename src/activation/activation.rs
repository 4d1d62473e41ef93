use serde::{Deserialize, Serialize};
use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Activation applied to every neuron of a network.
///
/// The registry only resolves `relu` and `sigmoid` by name. `softplus` and its
/// derivative exist as free functions below but are not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationFunction {
    /// Leaky rectifier: `x` for positive input, `x / 100` otherwise.
    #[default]
    #[serde(rename = "relu")]
    ReLU,
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => relu(x),
            ActivationFunction::Sigmoid => sigmoid(x),
        }
    }

    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => relu_derivative(x),
            ActivationFunction::Sigmoid => sigmoid_derivative(x),
        }
    }

    /// Registry name, as stored in checkpoints.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Sigmoid => "sigmoid",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relu" => Ok(ActivationFunction::ReLU),
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            other => Err(Error::UnknownActivation(other.to_owned())),
        }
    }
}

/// Never exactly zero for negative input; `relu(0.0) == 0.0`.
pub fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { x / 100.0 }
}

pub fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.01 }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

pub fn sigmoid_derivative(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

pub fn softplus(x: f64) -> f64 {
    (1.0 + x.exp()).ln()
}

pub fn softplus_derivative(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
