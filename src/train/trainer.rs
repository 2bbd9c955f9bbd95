use tracing::trace;

use crate::error::{check_len, Error, Result};
use crate::loss::mse::MseLoss;
use crate::network::model::Model;

/// Runs one online pass over the samples in the order given and returns the
/// mean squared error, each sample measured just before the model trains on
/// it.
///
/// Every sample is checked against the model's sizes before the first update,
/// so a malformed dataset leaves the model untouched.
pub fn train_network(
    model: &mut impl Model,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<f64> {
    validate_dataset(&*model, inputs, expected_outputs)?;
    let order: Vec<usize> = (0..inputs.len()).collect();
    train_in_order(model, inputs, expected_outputs, &order)
}

/// Checks that the dataset is non-empty, that inputs and targets pair up, and
/// that every vector matches the model.
pub(crate) fn validate_dataset(
    model: &impl Model,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::EmptyDataset);
    }
    check_len("targets", inputs.len(), expected_outputs.len())?;

    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        check_len("input", model.input_size(), input.len())?;
        check_len("target", model.output_size(), expected.len())?;
    }
    Ok(())
}

/// Trains on `inputs[i]` for each `i` in `order`. The dataset must already be
/// validated.
///
/// Each sample's loss comes from `Model::train_step`, so it describes the
/// exact state that sample trained against, even for a `SharedNetwork`
/// other threads are updating.
pub(crate) fn train_in_order(
    model: &mut impl Model,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    order: &[usize],
) -> Result<f64> {
    let mut total_loss = 0.0;

    for &idx in order {
        let input = &inputs[idx];
        let expected = &expected_outputs[idx];

        let output = model.train_step(input, expected)?;
        let loss = MseLoss::loss(&output, expected);
        total_loss += loss;

        trace!(sample = idx, loss, "online step");
    }

    Ok(total_loss / order.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Network, SharedNetwork};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> Network {
        Network::with_rng(2, 3, 1, 0.5, &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn reports_loss_before_each_update() {
        let mut net = seeded();
        let input = vec![vec![1.0, 0.0]];
        let target = vec![vec![1.0]];

        let predicted = net.predict(&input[0]).unwrap();
        let loss = train_network(&mut net, &input, &target).unwrap();
        assert_eq!(loss, MseLoss::loss(&predicted, &target[0]));
    }

    #[test]
    fn shared_network_loss_matches_plain_network() {
        let inputs = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let targets = vec![vec![1.0], vec![1.0], vec![0.0]];

        let mut shared = SharedNetwork::new(seeded());
        let mut plain = seeded();
        let shared_loss = train_network(&mut shared, &inputs, &targets).unwrap();
        let plain_loss = train_network(&mut plain, &inputs, &targets).unwrap();

        assert_eq!(shared_loss, plain_loss);
        assert_eq!(shared.try_into_inner().unwrap(), plain);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let mut net = seeded();
        assert!(matches!(train_network(&mut net, &[], &[]), Err(Error::EmptyDataset)));
    }

    #[test]
    fn unpaired_targets_are_rejected() {
        let mut net = seeded();
        let inputs = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let targets = vec![vec![0.0]];
        assert!(matches!(
            train_network(&mut net, &inputs, &targets),
            Err(Error::ShapeMismatch { what: "targets", expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn bad_sample_anywhere_leaves_model_untouched() {
        let mut net = seeded();
        let before = net.clone();
        let inputs = vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0]];
        let targets = vec![vec![0.0], vec![1.0]];

        assert!(matches!(
            train_network(&mut net, &inputs, &targets),
            Err(Error::ShapeMismatch { what: "input", expected: 2, actual: 3 })
        ));
        assert_eq!(net, before);
    }
}
