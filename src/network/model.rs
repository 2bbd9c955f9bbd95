use crate::error::Result;
use crate::network::network::Network;

/// Anything that learns from one `(input, target)` sample at a time and maps
/// inputs to outputs.
///
/// Training loops and callers take `impl Model` so a different network
/// (batched, deeper, lock-guarded) can be dropped in without changes.
pub trait Model {
    fn input_size(&self) -> usize;

    fn output_size(&self) -> usize;

    /// Updates the model from a single sample.
    fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()>;

    /// Returns the model output for `input` without changing the model.
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;

    /// Trains on one sample and returns the output the model gave for
    /// `input` just before the update.
    ///
    /// The default predicts and then trains as two calls. Implementations
    /// shared between threads override it so both happen against the same
    /// state.
    fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        let output = self.predict(input)?;
        self.train(input, target)?;
        Ok(output)
    }
}

impl Model for Network {
    fn input_size(&self) -> usize {
        Network::input_size(self)
    }

    fn output_size(&self) -> usize {
        Network::output_size(self)
    }

    fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        Network::train(self, input, target)
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Network::predict(self, input)
    }

    fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        Network::train_step(self, input, target)
    }
}
