//! # housing
//!
//! Command-line interface for the housing price pipeline: split the raw
//! data, train and select a model, evaluate it on the test partition, and
//! serve it over HTTP.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use automl_facade::prelude::*;
use clap::{Parser, Subcommand};
use data_core::{max_abs_difference, train_test_split, CsvDatasetStore, DatasetStore};
use registry::{ModelRegistry, DEFAULT_MODEL_PATH};
use server::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest value drift tolerated across a CSV write/read cycle.
const ROUND_TRIP_TOLERANCE: f64 = 1e-6;

#[derive(Parser)]
#[command(name = "housing")]
#[command(about = "Housing price regression pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a full housing CSV into train and test partitions
    Split {
        /// Full dataset (8 feature columns plus MedHouseVal)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving train.csv and test.csv
        #[arg(short, long, default_value = "data")]
        out_dir: PathBuf,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_ratio: f64,

        /// Shuffle seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Train both model families, select the better one and save it
    Train {
        /// Training partition
        #[arg(short, long, default_value = "data/train.csv")]
        input: PathBuf,

        /// Model artifact to write
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// JSON training configuration (optional)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the training report as JSON (optional)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Report MSE and RMSE of the saved model on the test partition
    Evaluate {
        /// Test partition
        #[arg(short, long, default_value = "data/test.csv")]
        input: PathBuf,

        /// Model artifact to read
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },

    /// Start the prediction server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Model artifact to serve
        #[arg(short, long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

/// Row counts and round-trip drift of a split.
#[derive(Debug)]
struct SplitSummary {
    train_rows: usize,
    test_rows: usize,
    max_drift: f64,
}

fn run_split(input: &Path, out_dir: &Path, test_ratio: f64, seed: u64) -> anyhow::Result<SplitSummary> {
    let store = CsvDatasetStore::new();
    let dataset = store
        .load(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    println!("Dataset rows: {}", dataset.len());

    let split = train_test_split(&dataset, test_ratio, seed).context("failed to split dataset")?;
    println!("Train rows: {}", split.train.len());
    println!("Test rows: {}", split.test.len());

    let mut max_drift = 0.0_f64;
    for (name, part) in [("train.csv", &split.train), ("test.csv", &split.test)] {
        let path = out_dir.join(name);
        store
            .save(part, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;

        let reread = store
            .load(&path)
            .with_context(|| format!("failed to re-read {}", path.display()))?;
        let drift = match max_abs_difference(part, &reread) {
            Some(drift) if drift <= ROUND_TRIP_TOLERANCE => drift,
            Some(drift) => bail!(
                "{} failed verification: values drifted by {:e}",
                path.display(),
                drift
            ),
            None => bail!("{} failed verification: row count changed", path.display()),
        };
        println!("{} saved and verified at {}", name, path.display());
        max_drift = max_drift.max(drift);
    }

    Ok(SplitSummary {
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        max_drift,
    })
}

fn run_train(
    input: &Path,
    model_path: &Path,
    config: Option<&Path>,
    report_path: Option<&Path>,
) -> anyhow::Result<TrainingOutcome> {
    let config = match config {
        Some(path) => TrainingConfig::from_json_file(path)?,
        None => TrainingConfig::default(),
    };

    let train = CsvDatasetStore::new()
        .load(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    println!(
        "Starting hyperparameter tuning for Random Forest ({} grid points, {} folds)...",
        config.search.grid.len(),
        config.search.cv_folds
    );
    let outcome = TrainingPipeline::new(config)
        .run(&train)
        .context("training failed")?;
    print_report(&outcome);

    ModelRegistry::new(model_path)
        .save(&outcome.selection.model)
        .context("failed to save model")?;
    println!(
        "Best model ({}) saved at: {}",
        outcome.selection.family,
        model_path.display()
    );

    if let Some(path) = report_path {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &outcome.report)
            .context("failed to write training report")?;
        println!("Report written to {}", path.display());
    }

    Ok(outcome)
}

fn print_report(outcome: &TrainingOutcome) {
    let report = &outcome.report;
    println!("\n=== Training Results ===");
    println!(
        "Fit rows: {}  Validation rows: {}",
        report.fit_rows, report.validation_rows
    );
    println!("Best grid point: {}", report.best_point);
    println!("Best CV score (neg MSE): {:.4}", report.best_cv_score);
    println!("Validation MSE (Random Forest): {:.4}", report.forest.mse);
    println!("Validation RMSE (Random Forest): {:.4}", report.forest.rmse);
    println!(
        "Gradient boosting stopped after {} rounds (best round {})",
        report.boosting_rounds_evaluated, report.boosting_best_round
    );
    println!("Validation MSE (Gradient Boosting): {:.4}", report.boosting.mse);
    println!("Validation RMSE (Gradient Boosting): {:.4}", report.boosting.rmse);
    println!(
        "Selected: {} (RMSE {:.4})",
        outcome.selection.family, outcome.selection.rmse
    );
}

fn run_evaluate(input: &Path, model_path: &Path) -> anyhow::Result<Evaluation> {
    let test = CsvDatasetStore::new()
        .load(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let model = ModelRegistry::new(model_path)
        .load()
        .context("failed to load model")?;

    let evaluation = evaluate(&model, &test).context("evaluation failed")?;
    println!("Test MSE: {:.4}", evaluation.mse);
    println!("Test RMSE: {:.4}", evaluation.rmse);
    Ok(evaluation)
}

fn run_serve(host: String, port: u16, model: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig::default()
        .with_host(host)
        .with_port(port)
        .with_model_path(model);
    config.socket_addr()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(server::run(config))?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "housing=info,automl_core=info,registry=info,server=info,tower_http=info".into()
            }),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            input,
            out_dir,
            test_ratio,
            seed,
        } => {
            let summary = run_split(&input, &out_dir, test_ratio, seed)?;
            tracing::info!(
                train_rows = summary.train_rows,
                test_rows = summary.test_rows,
                max_drift = summary.max_drift,
                "data preparation completed"
            );
        }

        Commands::Train {
            input,
            model,
            config,
            report,
        } => {
            run_train(&input, &model, config.as_deref(), report.as_deref())?;
        }

        Commands::Evaluate { input, model } => {
            run_evaluate(&input, &model)?;
        }

        Commands::Serve { port, host, model } => run_serve(host, port, model)?,
    }

    Ok(())
}
