//! Error types for the anomaly scorer
//!
//! Every error here is fatal to the current run. Simulator preconditions
//! (wire indices, control/target overlap) are programmer errors and panic
//! instead of surfacing through this type.

use thiserror::Error;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring, training or evaluating a model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A configuration value is out of its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data does not have the width or length the model expects
    #[error("Dimension mismatch in {context}: expected {expected}, got {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    /// Amplitudes do not describe a normalised state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Feature rows and labels do not line up
    #[error("Label count {labels} does not match feature row count {features}")]
    LabelMismatch { features: usize, labels: usize },

    /// A label other than 0 (normal) or 1 (anomalous)
    #[error("Label {value} at row {index} is not binary")]
    InvalidLabel { index: usize, value: u8 },

    /// An empty dataset, batch or score list was supplied
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Gradients or parameters became NaN or infinite
    #[error("Training diverged at epoch {epoch}, step {step}: {reason}")]
    TrainingDiverged {
        epoch: usize,
        step: usize,
        reason: String,
    },

    /// Configuration could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
