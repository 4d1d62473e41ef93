use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Keys accepted by `Network::set_option` / `Network::get_option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkOption {
    ActivationFunction,
    RandomizeWeights,
    RandomizeBias,
}

impl fmt::Display for NetworkOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkOption::ActivationFunction => "activation_function",
            NetworkOption::RandomizeWeights => "randomize_weights",
            NetworkOption::RandomizeBias => "randomize_bias",
        };
        f.write_str(name)
    }
}

/// Value carried by an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Activation(ActivationFunction),
    Flag(bool),
}

impl From<ActivationFunction> for OptionValue {
    fn from(value: ActivationFunction) -> Self {
        OptionValue::Activation(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Activation(a) => write!(f, "{a}"),
            OptionValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// How hidden layers turn the output error into weight updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenDelta {
    /// Each hidden neuron receives one scalar,
    /// `Σ_k Σ_p w(k → j) · δ_p` over every downstream neuron `k` and every
    /// output delta `p`, without its own activation derivative.
    #[default]
    Shared,
    /// Textbook chain rule: `δ_j = f'(z_j) · Σ_k w(k → j) · δ_k`, computed
    /// against the weights as they were before the update.
    ///
    /// Checkpoints do not record the rule: a loaded network always resumes
    /// with `Shared`.
    Chained,
}

/// Network settings. `None` means the option was never set; the effective
/// value then falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub activation: Option<ActivationFunction>,
    #[serde(default)]
    pub randomize_weights: Option<bool>,
    #[serde(default)]
    pub randomize_bias: Option<bool>,
    #[serde(default)]
    pub hidden_delta: HiddenDelta,
}

impl NetworkConfig {
    pub fn activation(&self) -> ActivationFunction {
        self.activation.unwrap_or_default()
    }

    pub fn randomize_weights(&self) -> bool {
        self.randomize_weights.unwrap_or(true)
    }

    pub fn randomize_bias(&self) -> bool {
        self.randomize_bias.unwrap_or(true)
    }

    pub fn get(&self, option: NetworkOption) -> Result<OptionValue> {
        let value = match option {
            NetworkOption::ActivationFunction => self.activation.map(OptionValue::Activation),
            NetworkOption::RandomizeWeights => self.randomize_weights.map(OptionValue::Flag),
            NetworkOption::RandomizeBias => self.randomize_bias.map(OptionValue::Flag),
        };
        value.ok_or(Error::UnknownOption(option))
    }

    /// Stores `value` under `option`; rejects an absent value or one of the
    /// wrong kind.
    pub fn set(&mut self, option: NetworkOption, value: Option<OptionValue>) -> Result<()> {
        let value = value.ok_or(Error::MissingOptionValue(option))?;
        match (option, value) {
            (NetworkOption::ActivationFunction, OptionValue::Activation(a)) => {
                self.activation = Some(a)
            }
            (NetworkOption::RandomizeWeights, OptionValue::Flag(b)) => {
                self.randomize_weights = Some(b)
            }
            (NetworkOption::RandomizeBias, OptionValue::Flag(b)) => self.randomize_bias = Some(b),
            (option, value) => {
                return Err(Error::InvalidOptionValue { option, value: value.to_string() })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = NetworkConfig::default();
        assert_eq!(config.activation(), ActivationFunction::ReLU);
        assert!(config.randomize_weights());
        assert!(config.randomize_bias());
        assert_eq!(config.hidden_delta, HiddenDelta::Shared);
    }

    #[test]
    fn unset_option_is_unknown() {
        let config = NetworkConfig::default();
        assert!(matches!(
            config.get(NetworkOption::RandomizeBias),
            Err(Error::UnknownOption(NetworkOption::RandomizeBias))
        ));
    }

    #[test]
    fn set_then_get() {
        let mut config = NetworkConfig::default();
        config
            .set(NetworkOption::ActivationFunction, Some(ActivationFunction::Sigmoid.into()))
            .unwrap();
        config.set(NetworkOption::RandomizeWeights, Some(false.into())).unwrap();
        assert_eq!(
            config.get(NetworkOption::ActivationFunction).unwrap(),
            OptionValue::Activation(ActivationFunction::Sigmoid)
        );
        assert_eq!(config.get(NetworkOption::RandomizeWeights).unwrap(), OptionValue::Flag(false));
        assert!(!config.randomize_weights());
    }

    #[test]
    fn absent_value_is_rejected() {
        let mut config = NetworkConfig::default();
        assert!(matches!(
            config.set(NetworkOption::RandomizeWeights, None),
            Err(Error::MissingOptionValue(NetworkOption::RandomizeWeights))
        ));
        assert!(config.randomize_weights.is_none());
    }

    #[test]
    fn mismatched_value_kind_is_rejected() {
        let mut config = NetworkConfig::default();
        let err = config.set(NetworkOption::ActivationFunction, Some(true.into())).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOptionValue { option: NetworkOption::ActivationFunction, .. }
        ));
    }

    #[test]
    fn config_serializes_with_registry_names() {
        let config = NetworkConfig {
            activation: Some(ActivationFunction::Sigmoid),
            ..NetworkConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"sigmoid\""));
        let back: NetworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
