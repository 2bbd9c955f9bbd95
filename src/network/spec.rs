use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::network::Network;

/// A serializable description of a network: the three layer sizes and the
/// learning rate.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// trained weights, so an architecture can be stored before training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
}

impl NetworkSpec {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, learning_rate: f64) -> NetworkSpec {
        NetworkSpec { input_size, hidden_size, output_size, learning_rate }
    }

    /// Rejects zero layer sizes and learning rates that are not positive and
    /// finite.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if size == 0 {
                return Err(Error::InvalidSpec(format!("{name} must be at least 1")));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidSpec(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Validates the spec and builds a randomly initialized network.
    pub fn build(&self) -> Result<Network> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        Ok(Network::with_rng(
            self.input_size,
            self.hidden_size,
            self.output_size,
            self.learning_rate,
            rng,
        ))
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl From<&Network> for NetworkSpec {
    fn from(network: &Network) -> NetworkSpec {
        NetworkSpec::new(
            network.input_size(),
            network.hidden_size(),
            network.output_size(),
            network.learning_rate(),
        )
    }
}
