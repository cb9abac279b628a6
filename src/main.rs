//! `mnist-ort` CLI - Classify a handwritten digit image.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mnist_ort::{
    image, Classifier, Config, ModelSource, OptimizationLevel, Prediction, Runtime,
    SessionOptions,
};

/// Classify a 28x28 handwritten digit image with a pre-trained MNIST model.
#[derive(Parser, Debug)]
#[command(name = "mnist-ort")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to classify.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// ONNX model path. Defaults to ./model.onnx, then the cached model zoo export.
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Never download the model; fail if it is not available locally.
    #[arg(long)]
    offline: bool,

    /// Resize images that are not 28x28 instead of rejecting them.
    #[arg(long)]
    resize: bool,

    /// Graph optimization level (disable, basic, extended, all).
    #[arg(long, default_value = "all", value_name = "LEVEL", value_parser = parse_opt_level)]
    opt_level: OptimizationLevel,

    /// Intra-op thread count for ONNX Runtime.
    #[arg(long, value_name = "INT")]
    threads: Option<usize>,

    /// Print the raw score and softmax confidence of every class.
    #[arg(short, long)]
    scores: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            model: self.model.clone(),
            allow_download: !self.offline,
            resize: self.resize,
            show_scores: self.scores,
            session: SessionOptions {
                optimization_level: self.opt_level,
                intra_threads: self.threads,
            },
        }
    }
}

fn parse_opt_level(s: &str) -> std::result::Result<OptimizationLevel, String> {
    s.parse().map_err(|err: mnist_ort::Error| err.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mnist_ort={log_level},ort=warn").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let config = args.config();
    config.validate().context("Invalid configuration")?;

    // Decode before touching the model so a bad image fails fast
    let tensor = image::load_digit(&args.image, config.resize).context("Failed to load image")?;

    let model = ModelSource::resolve(config.model.as_deref(), config.allow_download)
        .context("Failed to locate model")?;

    let runtime = Runtime::init("mnist-ort").context("Failed to initialize ONNX Runtime")?;
    let mut classifier = Classifier::new(&runtime, model.path(), &config.session)
        .context("Failed to load model")?;

    let prediction = classifier
        .classify(&tensor)
        .context("Failed to classify image")?;

    println!("{}", result_line(&args.image, &prediction));
    if config.show_scores {
        for line in score_lines(&prediction) {
            println!("{line}");
        }
    }

    Ok(())
}

fn result_line(path: &Path, prediction: &Prediction) -> String {
    format!("{} : {prediction}", path.display())
}

fn score_lines(prediction: &Prediction) -> Vec<String> {
    let mut lines = vec![format!(
        "confidence {:.2}% (softmax over raw scores)",
        prediction.confidence() * 100.0
    )];

    let probs = prediction.scores.softmax();
    for (class, (score, prob)) in prediction.scores.as_slice().iter().zip(probs).enumerate() {
        let marker = if class == prediction.label { "*" } else { " " };
        lines.push(format!(
            "{marker} {class}: score {score:>9.4}  softmax {:>6.2}%",
            prob * 100.0
        ));
    }
    lines
}
