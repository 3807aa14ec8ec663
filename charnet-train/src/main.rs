//! Trains the character-level MLP classifier.
//!
//! Reads `{data_dir}/{dataset}.{train,valid,test}.clean`, checks the engine's
//! gradients, runs constant-rate SGD for the requested number of epochs and
//! saves the test-set probabilities, in file row order, as a `.npy` array.
//!
//! ```bash
//! RUST_LOG=info charnet-train --dataset small --epochs 20 --init-lr 0.5
//! ```

use charnet_core::autograd::grad_check;
use charnet_core::metrics::accuracy;
use charnet_core::nn::mlp::{LOSS, OUTPUT};
use charnet_core::{Mlp, Network, Tensor, ValueEnv};
use charnet_data::{
    save_predictions, DataPreprocessor, Minibatch, MinibatchLoader, RandomSampler, Sampler,
};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Characters kept per entity.
    #[arg(long, default_value_t = 10)]
    pub max_len: usize,

    /// Width of the hidden layer.
    #[arg(long, default_value_t = 50)]
    pub num_hid: usize,

    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Dataset name, resolved as `{data_dir}/{dataset}.{split}.clean`.
    #[arg(long, default_value = "small")]
    pub dataset: String,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Learning rate, constant over the whole run.
    #[arg(long, default_value_t = 0.5)]
    pub init_lr: f64,

    /// Where test predictions go (`.npy` is appended when missing).
    #[arg(long, default_value = "output")]
    pub output_file: PathBuf,

    #[arg(long, default_value = "../data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "../logs")]
    pub log_dir: PathBuf,

    /// Seed for initialisation and shuffling.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl Args {
    fn split_path(&self, split: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}.clean", self.dataset, split))
    }

    fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!(
            "{}_mlp4c_L{}_H{}_B{}_E{}_lr{:.3}.txt",
            self.dataset, self.max_len, self.num_hid, self.batch_size, self.epochs, self.init_lr
        ))
    }
}

/// Outputs of a forward-only pass over one epoch of a loader.
struct EvalPass {
    mean_loss: f64,
    probs: Tensor,
    targets: Tensor,
    indices: Vec<usize>,
}

/// Overwrites the `X`/`y` entries of `env` with one batch.
fn load_batch(
    mlp: &Mlp,
    env: &mut ValueEnv,
    batch: &Minibatch,
) -> Result<(), Box<dyn Error>> {
    env.extend(mlp.data_dict(batch.flat_features()?, batch.labels.clone()));
    Ok(())
}

fn output_loss(values: &ValueEnv) -> Result<f64, Box<dyn Error>> {
    let loss = values.get(LOSS).ok_or("forward pass produced no loss")?;
    Ok(loss.item()?)
}

fn evaluate_epoch<S: Sampler>(
    mlp: &Mlp,
    env: &mut ValueEnv,
    loader: &mut MinibatchLoader<S>,
) -> Result<EvalPass, Box<dyn Error>> {
    let (mut total_loss, mut n) = (0.0, 0usize);
    let (mut probs, mut targets, mut indices) = (Vec::new(), Vec::new(), Vec::new());
    for batch in loader.epoch() {
        let batch = batch?;
        load_batch(mlp, env, &batch)?;
        let values = mlp.fwd(env)?;
        total_loss += output_loss(&values)?;
        probs.push(values.get(OUTPUT).ok_or("forward pass produced no output")?.clone());
        targets.push(batch.labels);
        indices.extend(batch.indices);
        n += 1;
    }
    Ok(EvalPass {
        mean_loss: if n > 0 { total_loss / n as f64 } else { 0.0 },
        probs: Tensor::vstack(&probs)?,
        targets: Tensor::vstack(&targets)?,
        indices,
    })
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let data = DataPreprocessor::new().preprocess(
        &args.split_path("train"),
        &args.split_path("valid"),
        &args.split_path("test"),
    )?;
    let (num_chars, num_labels) = (data.vocab.num_chars(), data.vocab.num_labels());
    let loader = |examples, seed: u64| {
        MinibatchLoader::new(
            examples,
            args.batch_size,
            args.max_len,
            num_chars,
            num_labels,
            RandomSampler::new(seed),
        )
    };
    let mut mb_train = loader(data.training, rng.gen())?;
    let mut mb_valid = loader(data.validation, rng.gen())?;
    let mut mb_test = loader(data.test, rng.gen())?;

    info!("building mlp...");
    let mut mlp = Mlp::new(&[args.max_len * num_chars, args.num_hid, num_labels], &mut rng)?;
    info!("checking gradients...");
    grad_check(&mlp)?;
    info!("gradients ok");

    fs::create_dir_all(&args.log_dir)?;
    let log_path = args.log_path();
    let mut logger = BufWriter::new(File::create(&log_path)?);
    info!("training, logging to {:?}", log_path);

    let start = Instant::now();
    let mut value_dict = mlp.input_dict();
    let mut min_loss = 1e5;
    let lr = args.init_lr;
    for epoch in 0..args.epochs {
        for batch in mb_train.epoch() {
            let batch = batch?;
            load_batch(&mlp, &mut value_dict, &batch)?;
            let values = mlp.fwd(&value_dict)?;
            let grads = mlp.bwd(&values)?;
            value_dict = mlp.update(&value_dict, &grads, lr)?;
            writeln!(logger, "TRAIN loss = {:.3}", output_loss(&values)?)?;
        }
        mlp.store_params(&value_dict)?;

        let valid = evaluate_epoch(&mlp, &mut value_dict, &mut mb_valid)?;
        let acc = accuracy(&valid.probs, &valid.targets)?;
        if valid.mean_loss < min_loss {
            min_loss = valid.mean_loss;
        }
        let message = format!(
            "Epoch {} VAL loss {:.3} min_loss {:.3} acc {:.3} time {:.2}",
            epoch,
            valid.mean_loss,
            min_loss,
            acc,
            start.elapsed().as_secs_f64()
        );
        writeln!(logger, "{}", message)?;
        println!("{}", message);
    }
    logger.flush()?;
    info!("done");

    let test = evaluate_epoch(&mlp, &mut value_dict, &mut mb_test)?;
    info!("test loss {:.3}", test.mean_loss);
    let written = save_predictions(&args.output_file, &test.probs, &test.indices)?;
    info!("predictions written to {:?}", written);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    info!("{:?}", args);
    run(&args)
}
