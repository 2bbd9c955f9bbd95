use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::network::model::Model;
use crate::network::network::Network;
use crate::network::snapshot::NetworkSnapshot;

/// A `Network` that can be trained and queried from several threads.
///
/// Training (`train`, `train_step`) takes the write lock, so it is serialized against every other
/// `train` and `predict`; predictions share the read lock. Clones refer to the
/// same weights.
#[derive(Debug, Clone)]
pub struct SharedNetwork {
    inner: Arc<RwLock<Network>>,
}

impl SharedNetwork {
    pub fn new(network: Network) -> SharedNetwork {
        SharedNetwork { inner: Arc::new(RwLock::new(network)) }
    }

    pub fn train(&self, input: &[f64], target: &[f64]) -> Result<()> {
        self.write().train(input, target)
    }

    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.read().predict(input)
    }

    /// Trains and returns the pre-update output under a single write lock, so
    /// no other thread's update lands between the two.
    pub fn train_step(&self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        self.write().train_step(input, target)
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        self.read().snapshot()
    }

    /// Returns the network if this is the last handle, otherwise gives the
    /// handle back.
    pub fn try_into_inner(self) -> std::result::Result<Network, SharedNetwork> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(inner) => Err(SharedNetwork { inner }),
        }
    }

    // A panic while holding the lock cannot leave half-written weights:
    // `Network::train_step` only assigns after both updates are built.
    fn read(&self) -> RwLockReadGuard<'_, Network> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Network> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl From<Network> for SharedNetwork {
    fn from(network: Network) -> SharedNetwork {
        SharedNetwork::new(network)
    }
}

impl Model for SharedNetwork {
    fn input_size(&self) -> usize {
        self.read().input_size()
    }

    fn output_size(&self) -> usize {
        self.read().output_size()
    }

    fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        SharedNetwork::train(self, input, target)
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        SharedNetwork::predict(self, input)
    }

    fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        SharedNetwork::train_step(self, input, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::thread;

    fn seeded() -> Network {
        Network::with_rng(2, 3, 1, 0.5, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn clones_share_weights() {
        let shared = SharedNetwork::new(seeded());
        let other = shared.clone();
        let before = other.predict(&[1.0, 0.0]).unwrap();

        shared.train(&[1.0, 0.0], &[1.0]).unwrap();

        assert_ne!(other.predict(&[1.0, 0.0]).unwrap(), before);
    }

    #[test]
    fn concurrent_training_applies_every_step() {
        let shared = SharedNetwork::new(seeded());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let net = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        net.train(&[1.0, 1.0], &[0.0]).unwrap();
                        let out = net.predict(&[1.0, 1.0]).unwrap();
                        assert_eq!(out.len(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every thread trains on the same sample, so the interleaving does not
        // matter: the result equals 100 sequential steps.
        let mut sequential = seeded();
        for _ in 0..100 {
            sequential.train(&[1.0, 1.0], &[0.0]).unwrap();
        }

        let net = shared.try_into_inner().unwrap();
        assert_eq!(net.hidden_weights().shape(), (3, 2));
        assert_eq!(net.output_weights().shape(), (1, 3));
        assert_eq!(net, sequential);
    }

    #[test]
    fn concurrent_train_steps_report_the_state_they_trained_on() {
        let shared = SharedNetwork::new(seeded());
        let input = [1.0, 0.0];
        let target = [1.0];

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let net = shared.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|_| net.train_step(&input, &target).unwrap()[0])
                        .collect::<Vec<f64>>()
                })
            })
            .collect();
        let mut reported: Vec<f64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();

        // Every step saw a distinct state, and those states are exactly the
        // first 100 states of a sequential run.
        let mut sequential = seeded();
        let mut expected: Vec<f64> = (0..100)
            .map(|_| sequential.train_step(&input, &target).unwrap()[0])
            .collect();
        reported.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(reported, expected);
    }

    #[test]
    fn try_into_inner_fails_while_shared() {
        let shared = SharedNetwork::new(seeded());
        let other = shared.clone();
        let shared = shared.try_into_inner().unwrap_err();
        drop(other);
        assert!(shared.try_into_inner().is_ok());
    }

    #[test]
    fn usable_through_model_trait() {
        fn step(model: &mut impl Model) -> Vec<f64> {
            model.train(&[0.0, 1.0], &[1.0]).unwrap();
            model.predict(&[0.0, 1.0]).unwrap()
        }

        let mut shared = SharedNetwork::from(seeded());
        let mut plain = seeded();
        assert_eq!(step(&mut shared), step(&mut plain));
        assert_eq!(Model::input_size(&shared), 2);
        assert_eq!(Model::output_size(&shared), 1);
    }
}
