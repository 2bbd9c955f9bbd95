use rand::Rng;
use tracing::{debug, trace};

use crate::activation::{sigmoid, sigmoid_prime_from_output};
use crate::error::{check_len, Result};
use crate::math::matrix::Matrix;

/// A three-layer perceptron (input → hidden → output) with sigmoid
/// activations on both layers and no biases.
///
/// `hidden_weights` is `hidden_size x input_size` and `output_weights` is
/// `output_size x hidden_size`. Those shapes are fixed at construction; only
/// the entries change during training.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    pub(crate) hidden_weights: Matrix,
    pub(crate) output_weights: Matrix,
    learning_rate: f64,
}

/// Activations produced by one forward pass, kept as column vectors.
struct Forward {
    hidden: Matrix,
    output: Matrix,
}

impl Network {
    /// Builds a network with weights drawn from the thread RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, learning_rate: f64) -> Network {
        Network::with_rng(input_size, hidden_size, output_size, learning_rate, &mut rand::thread_rng())
    }

    /// Builds a network with weights drawn from `rng`.
    ///
    /// Each weight is uniform in `(-1/sqrt(fan_in), 1/sqrt(fan_in))`, where
    /// the fan-in is `input_size` for the hidden layer and `hidden_size` for
    /// the output layer.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Network {
        let hidden_weights = Matrix::random_uniform(hidden_size, input_size, input_size, rng);
        let output_weights = Matrix::random_uniform(output_size, hidden_size, hidden_size, rng);

        debug!(input_size, hidden_size, output_size, learning_rate, "created network");

        Network {
            input_size,
            hidden_size,
            output_size,
            hidden_weights,
            output_weights,
            learning_rate,
        }
    }

    /// Assembles a network from existing weights. Shapes must already agree
    /// with the sizes; callers in this crate validate before calling.
    pub(crate) fn from_parts(
        hidden_weights: Matrix,
        output_weights: Matrix,
        learning_rate: f64,
    ) -> Network {
        Network {
            input_size: hidden_weights.cols(),
            hidden_size: hidden_weights.rows(),
            output_size: output_weights.rows(),
            hidden_weights,
            output_weights,
            learning_rate,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// `hidden_size x input_size`.
    pub fn hidden_weights(&self) -> &Matrix {
        &self.hidden_weights
    }

    /// `output_size x hidden_size`.
    pub fn output_weights(&self) -> &Matrix {
        &self.output_weights
    }

    /// Runs the forward pass and returns the output activations.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("input", self.input_size, input.len())?;
        let forward = self.forward(&Matrix::column(input))?;
        Ok(forward.output.into_column_vec())
    }

    /// One step of online gradient descent on a single sample.
    ///
    /// Every activation and error term is computed from the current weights
    /// before either weight matrix is touched, and both updates are built
    /// before either is committed.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.train_step(input, target).map(drop)
    }

    /// Same as `train`, but also returns the output the network produced for
    /// `input` before the update.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        check_len("input", self.input_size, input.len())?;
        check_len("target", self.output_size, target.len())?;

        let inputs = Matrix::column(input);
        let Forward { hidden, output } = self.forward(&inputs)?;

        // Errors
        let output_errors = Matrix::column(target).sub(&output)?;
        let hidden_errors = self.output_weights.transpose().dot(&output_errors)?;

        // Backpropagate
        let output_delta = output_errors.hadamard(&output.map(sigmoid_prime_from_output))?;
        let output_step = output_delta.dot(&hidden.transpose())?.scale(self.learning_rate);
        let next_output_weights = self.output_weights.add(&output_step)?;

        let hidden_delta = hidden_errors.hadamard(&hidden.map(sigmoid_prime_from_output))?;
        let hidden_step = hidden_delta.dot(&inputs.transpose())?.scale(self.learning_rate);
        let next_hidden_weights = self.hidden_weights.add(&hidden_step)?;

        self.output_weights = next_output_weights;
        self.hidden_weights = next_hidden_weights;

        trace!(
            error = output_errors.to_flat().iter().map(|e| e * e).sum::<f64>(),
            "trained on sample"
        );

        Ok(output.into_column_vec())
    }

    fn forward(&self, inputs: &Matrix) -> Result<Forward> {
        let hidden = self.hidden_weights.dot(inputs)?.map(sigmoid);
        let output = self.output_weights.dot(&hidden)?.map(sigmoid);
        Ok(Forward { hidden, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(input: usize, hidden: usize, output: usize, rate: f64) -> Network {
        Network::with_rng(input, hidden, output, rate, &mut StdRng::seed_from_u64(42))
    }

    fn assert_shapes(net: &Network) {
        assert_eq!(net.hidden_weights().shape(), (net.hidden_size(), net.input_size()));
        assert_eq!(net.output_weights().shape(), (net.output_size(), net.hidden_size()));
    }

    #[test]
    fn construction_sets_shapes_and_fan_in_bounds() {
        let net = seeded(4, 9, 3, 0.1);
        assert_shapes(&net);
        assert!(net.hidden_weights().to_flat().iter().all(|w| w.abs() < 0.5));
        assert!(net.output_weights().to_flat().iter().all(|w| w.abs() < 1.0 / 3.0));
        assert_eq!(net.learning_rate(), 0.1);
    }

    #[test]
    fn same_seed_gives_same_weights() {
        assert_eq!(seeded(3, 4, 2, 0.3), seeded(3, 4, 2, 0.3));
    }

    #[test]
    fn predict_on_fresh_network_is_in_unit_interval() {
        let net = Network::new(2, 2, 1, 0.5);
        let out = net.predict(&[0.0, 0.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0] > 0.0 && out[0] < 1.0);
    }

    #[test]
    fn zero_input_predicts_one_half_at_hidden_layer() {
        // With a zero input every hidden activation is 0.5, so the output is
        // sigmoid(0.5 * row sum of the output weights).
        let net = seeded(3, 4, 2, 0.1);
        let out = net.predict(&[0.0, 0.0, 0.0]).unwrap();
        for (o, row) in out.iter().zip((0..net.output_size()).map(|i| net.output_weights().row(i))) {
            assert_relative_eq!(*o, sigmoid(0.5 * row.iter().sum::<f64>()), epsilon = 1e-12);
        }
    }

    #[test]
    fn predict_is_deterministic() {
        let net = seeded(3, 5, 2, 0.1);
        let input = [0.2, -0.7, 1.3];
        let a = net.predict(&input).unwrap();
        let b = net.predict(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn train_matches_hand_computed_update() {
        let hidden = Matrix::from_data(vec![vec![0.5, -0.25]]).unwrap();
        let output = Matrix::from_data(vec![vec![0.75]]).unwrap();
        let mut net = Network::from_parts(hidden, output, 0.5);

        let input = [1.0, 2.0];
        let target = [1.0];

        // Forward: hidden_raw = 0.5 - 0.5 = 0, hidden_act = 0.5
        let h = 0.5;
        let o = sigmoid(0.75 * h);
        let out_err = 1.0 - o;
        let hid_err = 0.75 * out_err;

        net.train(&input, &target).unwrap();

        let expected_out_w = 0.75 + 0.5 * out_err * o * (1.0 - o) * h;
        let hidden_grad = hid_err * h * (1.0 - h);
        assert_relative_eq!(net.output_weights().get(0, 0), expected_out_w, epsilon = 1e-12);
        assert_relative_eq!(net.hidden_weights().get(0, 0), 0.5 + 0.5 * hidden_grad * 1.0, epsilon = 1e-12);
        assert_relative_eq!(net.hidden_weights().get(0, 1), -0.25 + 0.5 * hidden_grad * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn hidden_error_uses_pre_update_output_weights() {
        let hidden = Matrix::from_data(vec![vec![0.0]]).unwrap();
        let output = Matrix::from_data(vec![vec![2.0]]).unwrap();
        let mut net = Network::from_parts(hidden, output, 1.0);

        // hidden_act = 0.5, output = sigmoid(1.0)
        let o = sigmoid(1.0);
        let out_err = 0.0 - o;
        let hid_err_old = 2.0 * out_err;

        net.train(&[1.0], &[0.0]).unwrap();

        let expected = hid_err_old * 0.25;
        assert_relative_eq!(net.hidden_weights().get(0, 0), expected, epsilon = 1e-12);
    }

    #[test]
    fn one_step_moves_prediction_toward_target() {
        let mut net = seeded(3, 4, 1, 0.05);
        let input = [0.3, -0.6, 0.9];
        let target = [1.0];

        let before = net.predict(&input).unwrap();
        net.train(&input, &target).unwrap();
        let after = net.predict(&input).unwrap();

        let dist = |v: &[f64]| v.iter().zip(target.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>();
        assert!(dist(&after) < dist(&before));
    }

    #[test]
    fn train_step_returns_pre_update_output() {
        let mut net = seeded(3, 4, 2, 0.5);
        let mut plain = net.clone();
        let input = [0.4, 0.1, -0.2];

        let before = net.predict(&input).unwrap();
        assert_eq!(net.train_step(&input, &[0.0, 1.0]).unwrap(), before);

        plain.train(&input, &[0.0, 1.0]).unwrap();
        assert_eq!(net, plain);
    }

    #[test]
    fn shapes_are_stable_across_training() {
        let mut net = seeded(2, 3, 1, 0.5);
        for _ in 0..10 {
            net.train(&[1.0, 0.0], &[1.0]).unwrap();
            assert_shapes(&net);
        }
    }

    #[test]
    fn wrong_input_length_is_rejected_without_mutation() {
        let mut net = seeded(2, 3, 1, 0.5);
        let before = net.clone();

        let err = net.train(&[1.0, 0.0, 1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "input", expected: 2, actual: 3 }));
        assert_eq!(net, before);
    }

    #[test]
    fn wrong_target_length_is_rejected_without_mutation() {
        let mut net = seeded(2, 3, 1, 0.5);
        let before = net.clone();

        let err = net.train(&[1.0, 0.0], &[]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "target", expected: 1, actual: 0 }));
        assert_eq!(net, before);
    }

    #[test]
    fn predict_rejects_wrong_length() {
        let net = seeded(2, 3, 1, 0.5);
        assert!(matches!(
            net.predict(&[1.0]),
            Err(Error::ShapeMismatch { what: "input", expected: 2, actual: 1 })
        ));
    }
}
