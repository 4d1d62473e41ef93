use log::{debug, info};

use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;

/// One pass over every sample, in listed order. Returns the mean loss of the
/// predictions made before each update.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    rate: f64,
) -> Result<f64> {
    if inputs.len() != expected_outputs.len() {
        return Err(Error::shape("samples vs targets", inputs.len(), expected_outputs.len()));
    }
    if inputs.is_empty() {
        return Ok(0.0);
    }

    let mut total_loss = 0.0;
    for (input, expected) in inputs.iter().zip(expected_outputs) {
        let output = network.forward(input)?;
        if output.len() != expected.len() {
            return Err(Error::shape("prediction vs expected", expected.len(), output.len()));
        }
        total_loss += MseLoss::loss(&output, expected);
        network.backward(&output, expected, rate)?;
    }

    Ok(total_loss / inputs.len() as f64)
}

/// Runs `epochs` passes of `train_network` and returns the mean loss of the
/// last one. There is no early stopping; callers that need it should drive
/// `train_network` themselves.
pub fn train_epochs(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    epochs: usize,
    rate: f64,
) -> Result<f64> {
    let report_every = (epochs / 10).max(1);
    let mut last_loss = 0.0;

    for epoch in 0..epochs {
        last_loss = train_network(network, inputs, expected_outputs, rate)?;
        if epoch % report_every == 0 {
            debug!("epoch {}/{}: loss = {:.6}", epoch + 1, epochs, last_loss);
        }
    }

    info!("trained {} epochs over {} samples, final loss = {:.6}", epochs, inputs.len(), last_loss);
    Ok(last_loss)
}
