use thiserror::Error;

use crate::network::config::NetworkOption;

/// Every failure the library reports. Nothing in the crate aborts the process;
/// callers decide what to do with these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("option {0} has never been set")]
    UnknownOption(NetworkOption),

    #[error("option {0} requires a value")]
    MissingOptionValue(NetworkOption),

    #[error("invalid value {value} for option {option}")]
    InvalidOptionValue { option: NetworkOption, value: String },

    #[error("unknown activation function: {0}")]
    UnknownActivation(String),

    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cannot checkpoint a non-finite value: {0}")]
    NonFiniteParameter(String),

    #[error("corrupt checkpoint: {0}")]
    CorruptCheckpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(context: &'static str, expected: usize, actual: usize) -> Error {
        Error::ShapeMismatch { context, expected, actual }
    }
}
