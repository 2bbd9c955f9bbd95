// Trains the network on XOR and prints what it learned.
//
//   cargo run -- --epochs 5000 --hidden 4 --save xor.json
//   RUST_LOG=debug cargo run
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiny_mlp::{train_loop, NetworkSpec, TrainConfig};

#[derive(Parser)]
#[command(version, about = "Train a one-hidden-layer sigmoid network on XOR")]
struct Cli {
    /// Network spec (JSON); overrides --hidden and --learning-rate
    #[arg(long, value_name = "PATH")]
    spec: Option<PathBuf>,
    /// Hidden layer size
    #[arg(long, default_value_t = 4)]
    hidden: usize,
    /// Learning rate
    #[arg(short, long, default_value_t = 0.5)]
    learning_rate: f64,
    /// Passes over the four XOR samples
    #[arg(short, long, value_name = "INT", default_value_t = 5000)]
    epochs: usize,
    /// Seed for weight initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,
    /// Visit samples in random order each epoch
    #[arg(long)]
    shuffle: bool,
    /// Write the trained network to this JSON file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().compact().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Cli::parse();

    let spec = match &args.spec {
        Some(path) => {
            let path = path.to_str().context("spec path is not valid UTF-8")?;
            NetworkSpec::load_json(path).with_context(|| format!("loading spec from {path}"))?
        }
        None => NetworkSpec::new(3, args.hidden, 1, args.learning_rate),
    };
    if spec.input_size != 3 || spec.output_size != 1 {
        bail!(
            "XOR needs 3 inputs (two bits and a constant) and 1 output, spec has {} and {}",
            spec.input_size,
            spec.output_size
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = spec.build_with_rng(&mut rng)?;

    // The network has no biases; the constant third input stands in for one.
    let inputs = vec![
        vec![0.0, 0.0, 1.0],
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0],
    ];
    let expected_outputs = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];

    let mut config = TrainConfig::new(args.epochs).log_every((args.epochs / 10).max(1));
    if args.shuffle {
        config = config.shuffled(args.seed);
    }

    let loss = train_loop(&mut network, &inputs, &expected_outputs, &config)?;
    info!(loss, "training finished");

    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        let output = network.predict(input)?;
        println!("Input: {:?} -> Output: {:.4} (target {})", &input[..2], output[0], expected[0]);
    }

    if let Some(path) = &args.save {
        let path = path.to_str().context("save path is not valid UTF-8")?;
        network.save_json(path).with_context(|| format!("saving network to {path}"))?;
        info!(path, "saved network");
    }

    Ok(())
}
