//! Train the autoencoder on a synthetic, heavily imbalanced dataset and
//! print per-threshold metrics.
//!
//! ```text
//! cargo run --release --example synthetic_fraud [config.json]
//! RUST_LOG=qfraud=debug QFRAUD_EPOCHS=20 cargo run --release --example synthetic_fraud
//! ```

use std::path::PathBuf;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qfraud::prelude::*;

/// Fraction of rows labelled anomalous
const ANOMALY_RATE: f64 = 0.05;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Normal rows cluster around small angles; anomalies are pushed toward π
/// on a random subset of wires.
fn synthetic_dataset(rows: usize, width: usize, seed: u64) -> Result<TabularDataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((rows, width));
    let mut labels = Array1::zeros(rows);

    for (mut row, label) in features.outer_iter_mut().zip(labels.iter_mut()) {
        let anomalous = rng.gen_bool(ANOMALY_RATE);
        for value in row.iter_mut() {
            *value = rng.gen_range(-0.3..0.3);
            if anomalous && rng.gen_bool(0.6) {
                *value += rng.gen_range(2.0..3.0);
            }
        }
        *label = u8::from(anomalous);
    }

    TabularDataset::new(features, labels)
}

fn main() -> Result<()> {
    init_logging();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    config.validate()?;

    let seed = config.model.init_seed.unwrap_or(7);
    let train = synthetic_dataset(600, config.model.qubit_count, seed)?;
    let test = synthetic_dataset(400, config.model.qubit_count, seed.wrapping_add(1))?;
    info!(
        train_rows = train.len(),
        train_anomalies = train.anomaly_count(),
        test_rows = test.len(),
        test_anomalies = test.anomaly_count(),
        "Generated synthetic dataset"
    );

    let mut model = QuantumAutoencoder::new(&config.model)?;
    let mut trainer = Trainer::new(&config)?;
    let report = trainer.fit(&mut model, train.normal_only().features())?;
    info!(
        initial_loss = report.initial_loss,
        final_loss = report.final_loss(),
        steps = report.steps,
        "Training finished"
    );

    let fidelities = model.score_batch(test.features())?;
    let evaluation = EvaluationReport::evaluate(&fidelities, test.labels(), &config.evaluation.thresholds)?;

    println!("{}", evaluation);
    if let Some(best) = evaluation.best_by_f1() {
        println!("best threshold by F1: {:.2} (F1={:.4})", best.threshold, best.f1);
    }
    println!("{}", serde_json::to_string_pretty(&report.parameters)?);

    Ok(())
}
