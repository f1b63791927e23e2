//! Quantum circuits as ordered gate lists
//!
//! A circuit records `(gate, wires)` pairs and applies them in order to a
//! state vector. [`CircuitBuilder`] offers a chaining API for the gates the
//! autoencoder ansatz needs.

use std::fmt;

use crate::quantum::gate::{ParametrizedGate, QuantumGate, RotationAxis, StandardGate};
use crate::quantum::state::StateVector;

/// A quantum circuit consisting of a sequence of gates
#[derive(Debug, Clone)]
pub struct QuantumCircuit {
    pub gates: Vec<(Box<dyn QuantumGate>, Vec<usize>)>,
    pub qubit_count: usize,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new(qubit_count: usize) -> Self {
        QuantumCircuit {
            gates: Vec::new(),
            qubit_count,
        }
    }

    /// Append a gate acting on `qubits`.
    ///
    /// Panics if a wire is out of range, repeated, or the wire count does not
    /// match the gate.
    pub fn add_gate(&mut self, gate: Box<dyn QuantumGate>, qubits: &[usize]) {
        for &q in qubits {
            assert!(
                q < self.qubit_count,
                "Qubit index {} out of range for {}-qubit circuit",
                q,
                self.qubit_count
            );
        }

        assert_eq!(
            gate.qubit_count(),
            qubits.len(),
            "Gate {} acts on {} qubits, but {} qubits were specified",
            gate.name(),
            gate.qubit_count(),
            qubits.len()
        );

        if let [first, second] = qubits {
            assert_ne!(first, second, "Gate {} needs distinct wires", gate.name());
        }

        self.gates.push((gate, qubits.to_vec()));
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Apply the circuit in place to a quantum state
    pub fn apply(&self, state: &mut StateVector) {
        assert_eq!(
            state.qubit_count(),
            self.qubit_count,
            "State has {} qubits, but circuit requires {}",
            state.qubit_count(),
            self.qubit_count
        );

        for (gate, qubits) in &self.gates {
            gate.apply_to_qubits(state, qubits);
        }
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}-qubit circuit, {} gates:", self.qubit_count, self.gates.len())?;
        for (gate, qubits) in &self.gates {
            writeln!(f, "  {} {:?}", gate.name(), qubits)?;
        }
        Ok(())
    }
}

/// Builder for quantum circuits
#[derive(Debug)]
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder for the given number of qubits
    pub fn new(qubit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::new(qubit_count),
        }
    }

    /// Add an arbitrary gate
    pub fn gate(&mut self, gate: Box<dyn QuantumGate>, qubits: &[usize]) -> &mut Self {
        self.circuit.add_gate(gate, qubits);
        self
    }

    /// Add a Pauli-X gate
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.gate(Box::new(StandardGate::X), &[qubit])
    }

    /// Add a Hadamard gate
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.gate(Box::new(StandardGate::H), &[qubit])
    }

    /// Add a CNOT gate
    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.gate(Box::new(StandardGate::CNOT), &[control, target])
    }

    /// Add a rotation around the X axis
    pub fn rx(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.gate(Box::new(ParametrizedGate::Rx(theta)), &[qubit])
    }

    /// Add a rotation around the Y axis
    pub fn ry(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.gate(Box::new(ParametrizedGate::Ry(theta)), &[qubit])
    }

    /// Add a rotation around the Z axis
    pub fn rz(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.gate(Box::new(ParametrizedGate::Rz(theta)), &[qubit])
    }

    /// Add a rotation around `axis`
    pub fn rotation(&mut self, axis: RotationAxis, qubit: usize, theta: f64) -> &mut Self {
        self.gate(Box::new(axis.gate(theta)), &[qubit])
    }

    /// Add a ring of CNOTs `i -> (i + 1) mod n`, wrap-around edge included.
    /// A single qubit has no ring; two qubits get CNOT(0,1) then CNOT(1,0).
    pub fn cnot_ring(&mut self) -> &mut Self {
        let n = self.circuit.qubit_count;
        if n < 2 {
            return self;
        }
        for q in 0..n {
            self.cnot(q, (q + 1) % n);
        }
        self
    }

    /// Build the circuit
    pub fn build(&self) -> QuantumCircuit {
        self.circuit.clone()
    }
}
