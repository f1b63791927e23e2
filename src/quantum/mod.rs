// src/quantum/mod.rs
//! Quantum computing primitives
//!
//! This module implements quantum states, gates, circuits and the
//! parameter-shift gradient rule used to train variational circuits.

pub mod state;
pub mod gate;
pub mod circuit;
pub mod parameters;
pub mod differentiation;

pub use state::{StateVector, MAX_QUBITS};
pub use gate::{QuantumGate, StandardGate, ParametrizedGate, RotationAxis};
pub use circuit::{QuantumCircuit, CircuitBuilder};
pub use parameters::ParameterTensor;
pub use differentiation::{ForwardEvaluator, ParameterShift, central_difference_gradient, parameter_shift_gradient};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{StateVector, QuantumGate, StandardGate, ParametrizedGate, RotationAxis};
    pub use super::{QuantumCircuit, CircuitBuilder};
    pub use super::{ForwardEvaluator, ParameterShift, ParameterTensor};
}
