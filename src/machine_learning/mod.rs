//! Training and scoring of the quantum autoencoder
//!
//! The model is fitted on normal rows only; at inference its reconstruction
//! fidelity is the anomaly score.

pub mod core;
pub mod loss;
pub mod optimizer;
pub mod dataset;
pub mod metrics;
pub mod training;
pub mod quantum;

/// Re-exports of commonly used components
pub mod prelude {
    pub use super::core::{Model, PredictiveModel};
    pub use super::loss::{fidelity, LossFunction, ReconstructionError, SquaredReconstructionError};
    pub use super::optimizer::{Adam, GradientDescent, Optimizer};
    pub use super::dataset::{batch_order, TabularDataset};
    pub use super::metrics::{roc_auc, ConfusionMatrix, EvaluationReport, ThresholdMetrics};
    pub use super::training::{Trainer, TrainingPhase, TrainingReport};
    pub use super::quantum::{AutoencoderCircuit, QuantumAutoencoder};
}
