//! Quantum autoencoder anomaly scoring
//!
//! A variational circuit is trained to compress normal feature vectors so
//! that a designated trash qubit ends up in |0⟩. Rows it reconstructs poorly
//! (low trash-qubit fidelity) are scored as anomalous. The crate contains a
//! statevector simulator, exact parameter-shift gradients, an Adam training
//! loop and threshold/ranking metrics.

pub mod config;
pub mod error;
pub mod quantum;
pub mod simulators;
pub mod machine_learning;

pub use error::{Error, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AdamConfig, Config, EvaluationConfig, ModelConfig, TrainingConfig};
    pub use crate::error::{Error, Result};
    pub use crate::machine_learning::prelude::*;
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::{Outcome, StatevectorSimulator};
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
