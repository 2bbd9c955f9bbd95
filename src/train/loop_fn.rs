use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::network::model::Model;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{train_in_order, validate_dataset};

/// Trains `model` for `config.epochs` epochs of online gradient descent and
/// returns the mean training loss of the **last completed epoch**.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `EmptyDataset` for no samples, `ShapeMismatch` if inputs and targets do
/// not pair up or any vector disagrees with the model's sizes. Both are
/// reported before any training happens.
pub fn train_loop(
    model: &mut impl Model,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    validate_dataset(&*model, inputs, expected_outputs)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            warn!(epoch, "stop requested, ending training");
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }
        let train_loss = train_in_order(model, inputs, expected_outputs, &order)?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if config.log_every > 0 && epoch % config.log_every == 0 {
            info!(epoch, total = config.epochs, loss = train_loss, "epoch complete");
        } else {
            debug!(epoch, loss = train_loss, elapsed_ms, "epoch complete");
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped, ending training");
                break;
            }
        }
    }

    Ok(last_train_loss)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
