use serde::{Serialize, Deserialize};

use crate::error::{check_len, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;

/// Persisted form of a trained network: the three sizes, the learning rate
/// and both weight matrices as flat row-major arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    /// `hidden_size * input_size` values.
    pub hidden_weights: Vec<f64>,
    /// `output_size * hidden_size` values.
    pub output_weights: Vec<f64>,
}

impl Network {
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            input_size: self.input_size(),
            hidden_size: self.hidden_size(),
            output_size: self.output_size(),
            learning_rate: self.learning_rate(),
            hidden_weights: self.hidden_weights.to_flat(),
            output_weights: self.output_weights.to_flat(),
        }
    }

    /// Restores a network. The sizes and learning rate must pass
    /// `NetworkSpec::validate`, and each weight array must hold exactly
    /// `rows * cols` values.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Network> {
        let (inputs, hiddens, outputs) =
            (snapshot.input_size, snapshot.hidden_size, snapshot.output_size);
        NetworkSpec::new(inputs, hiddens, outputs, snapshot.learning_rate).validate()?;

        check_len("hidden weights", Matrix::len_for(hiddens, inputs)?, snapshot.hidden_weights.len())?;
        check_len("output weights", Matrix::len_for(outputs, hiddens)?, snapshot.output_weights.len())?;

        let hidden = Matrix::from_flat(hiddens, inputs, &snapshot.hidden_weights)?;
        let output = Matrix::from_flat(outputs, hiddens, &snapshot.output_weights)?;

        Ok(Network::from_parts(hidden, output, snapshot.learning_rate))
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.snapshot())?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let snapshot: NetworkSnapshot = serde_json::from_reader(reader)?;
        Network::from_snapshot(&snapshot)
    }
}
