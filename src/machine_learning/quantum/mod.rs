//! Quantum autoencoder circuit and model

pub mod circuit_model;
pub mod model;

pub use circuit_model::AutoencoderCircuit;
pub use model::QuantumAutoencoder;
