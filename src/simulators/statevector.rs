//! Statevector simulator
//!
//! A stateless, reentrant engine: it holds only the register size, creates a
//! fresh [`StateVector`] for every run and never shares amplitudes between
//! calls, so one value can be used from many threads at once.
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::state::{StateVector, MAX_QUBITS};

/// A measurement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Measurement yielded 0
    Zero,
    /// Measurement yielded 1
    One,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Zero => write!(f, "0"),
            Outcome::One => write!(f, "1"),
        }
    }
}

/// A statevector simulator for a fixed register size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatevectorSimulator {
    qubit_count: usize,
}

impl StatevectorSimulator {
    /// Create a simulator for `qubit_count` qubits (1..=MAX_QUBITS)
    pub fn new(qubit_count: usize) -> Result<Self> {
        if qubit_count == 0 || qubit_count > MAX_QUBITS {
            return Err(Error::InvalidConfig(format!(
                "simulator supports 1..={} qubits, got {}",
                MAX_QUBITS, qubit_count
            )));
        }

        Ok(StatevectorSimulator { qubit_count })
    }

    /// Get the number of qubits in the simulator
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// A fresh |0...0⟩ register
    pub fn initialize(&self) -> StateVector {
        StateVector::zero_state(self.qubit_count)
    }

    /// Run a circuit from |0...0⟩ and return the final state
    pub fn run(&self, circuit: &QuantumCircuit) -> StateVector {
        let mut state = self.initialize();
        circuit.apply(&mut state);
        state
    }

    /// Run a circuit and return ⟨Z⟩ on `wire`
    pub fn run_expectation(&self, circuit: &QuantumCircuit, wire: usize) -> f64 {
        self.run(circuit).expectation_z(wire)
    }

    /// Probabilities of each outcome on `wire`, without collapsing the state
    pub fn measure_qubit_probability(&self, state: &StateVector, wire: usize) -> HashMap<Outcome, f64> {
        let prob_zero = (1.0 + state.expectation_z(wire)) / 2.0;

        let mut probabilities = HashMap::new();
        probabilities.insert(Outcome::Zero, prob_zero);
        probabilities.insert(Outcome::One, 1.0 - prob_zero);
        probabilities
    }
}
