//! A three-layer perceptron (input → hidden → output) with sigmoid
//! activations, trained one sample at a time by backpropagation.
//!
//! ```no_run
//! use tiny_mlp::Network;
//!
//! let mut net = Network::new(2, 2, 1, 0.5);
//! net.train(&[1.0, 0.0], &[1.0])?;
//! let out = net.predict(&[1.0, 0.0])?;
//! assert_eq!(out.len(), 1);
//! # Ok::<(), tiny_mlp::Error>(())
//! ```

pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{sigmoid, sigmoid_prime_from_output};
pub use network::{Model, Network, NetworkSnapshot, NetworkSpec, SharedNetwork};
pub use loss::mse::MseLoss;
pub use train::{train_loop, train_network, EpochStats, TrainConfig};
pub use error::{Error, Result};
