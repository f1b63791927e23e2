// src/quantum/gate.rs
//! Quantum gates implementation
//!
//! Closed-form unitaries for the rotation gates used by the autoencoder
//! ansatz and the fixed two-qubit entangler. Gates know their matrix and how
//! to act on a [`StateVector`] in place.

use std::fmt::{self, Debug, Display};
use num_complex::Complex64;
use ndarray::{array, Array2};
use serde::{Deserialize, Serialize};

use super::state::StateVector;

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// Complex zero
    pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

    /// Complex one
    pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;

    /// Apply this gate in place to the given wires of a state.
    ///
    /// Panics if the wire count does not match the gate or a wire is out of
    /// range for the state.
    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) {
        assert_eq!(
            qubits.len(),
            self.qubit_count(),
            "{} acts on {} qubits, but {} wires were given",
            self.name(),
            self.qubit_count(),
            qubits.len()
        );

        match qubits {
            [wire] => state.apply_single_qubit_gate(&self.matrix(), *wire),
            [first, second] => state.apply_two_qubit_gate(&self.matrix(), *first, *second),
            _ => panic!("{} qubit gates are not supported", qubits.len()),
        }
    }
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

/// Fixed (non-parametrized) gates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Pauli-X gate (NOT gate)
    X,

    /// Pauli-Z gate, also the measured observable
    Z,

    /// Hadamard gate
    H,

    /// CNOT gate, control on the first wire
    CNOT,
}

impl QuantumGate for StandardGate {
    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::X | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CNOT => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::*;
        match self {
            StandardGate::X => array![[ZERO, ONE], [ONE, ZERO]],
            StandardGate::Z => array![[ONE, ZERO], [ZERO, -ONE]],
            StandardGate::H => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[factor, factor], [factor, -factor]]
            }
            StandardGate::CNOT => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO]
            ],
        }
    }

    fn name(&self) -> String {
        match self {
            StandardGate::X => "X".to_string(),
            StandardGate::Z => "Z".to_string(),
            StandardGate::H => "H".to_string(),
            StandardGate::CNOT => "CNOT".to_string(),
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(*self)
    }

    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) {
        match (self, qubits) {
            // Permutation only, no need to touch the matrix
            (StandardGate::CNOT, [control, target]) => state.apply_controlled_flip(*control, *target),
            (StandardGate::CNOT, _) => panic!("CNOT needs exactly two wires, got {}", qubits.len()),
            (_, [wire]) => state.apply_single_qubit_gate(&self.matrix(), *wire),
            _ => panic!("{} needs exactly one wire, got {}", self.name(), qubits.len()),
        }
    }
}

/// Rotation axis of a single-qubit rotation gate
///
/// The discriminant is the index of the axis in the last dimension of the
/// parameter tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl RotationAxis {
    /// Axes in the order a variational layer applies them
    pub const ALL: [RotationAxis; 3] = [RotationAxis::X, RotationAxis::Y, RotationAxis::Z];

    /// Position of this axis in the parameter tensor
    pub fn index(self) -> usize {
        self as usize
    }

    /// The rotation gate about this axis
    pub fn gate(self, theta: f64) -> ParametrizedGate {
        match self {
            RotationAxis::X => ParametrizedGate::Rx(theta),
            RotationAxis::Y => ParametrizedGate::Ry(theta),
            RotationAxis::Z => ParametrizedGate::Rz(theta),
        }
    }
}

impl Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationAxis::X => write!(f, "X"),
            RotationAxis::Y => write!(f, "Y"),
            RotationAxis::Z => write!(f, "Z"),
        }
    }
}

/// Parametrized quantum gates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParametrizedGate {
    /// Rotation around X-axis
    Rx(f64),

    /// Rotation around Y-axis
    Ry(f64),

    /// Rotation around Z-axis
    Rz(f64),
}

impl ParametrizedGate {
    /// The rotation angle
    pub fn angle(&self) -> f64 {
        match self {
            ParametrizedGate::Rx(theta) | ParametrizedGate::Ry(theta) | ParametrizedGate::Rz(theta) => *theta,
        }
    }

    /// The rotation axis
    pub fn axis(&self) -> RotationAxis {
        match self {
            ParametrizedGate::Rx(_) => RotationAxis::X,
            ParametrizedGate::Ry(_) => RotationAxis::Y,
            ParametrizedGate::Rz(_) => RotationAxis::Z,
        }
    }
}

impl QuantumGate for ParametrizedGate {
    fn qubit_count(&self) -> usize {
        1
    }

    fn matrix(&self) -> Array2<Complex64> {
        match self {
            ParametrizedGate::Rx(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                    [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)]
                ]
            },
            ParametrizedGate::Ry(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                    [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)]
                ]
            },
            ParametrizedGate::Rz(theta) => {
                let phase_pos = Complex64::new(0.0, theta / 2.0).exp();
                let phase_neg = Complex64::new(0.0, -theta / 2.0).exp();
                array![
                    [phase_neg, constants::ZERO],
                    [constants::ZERO, phase_pos]
                ]
            },
        }
    }

    fn name(&self) -> String {
        format!("R{}({:.4})", self.axis(), self.angle())
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_unitary(m: &Array2<Complex64>) -> bool {
        let adjoint = m.t().mapv(|c| c.conj());
        let product = adjoint.dot(m);
        let dim = m.nrows();
        (0..dim).all(|i| {
            (0..dim).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (product[[i, j]] - Complex64::new(expected, 0.0)).norm() < 1e-12
            })
        })
    }

    #[test]
    fn test_rotation_gates_are_unitary() {
        for &theta in &[0.0, 0.3, 1.7, -2.4, std::f64::consts::PI] {
            for axis in RotationAxis::ALL {
                assert!(is_unitary(&axis.gate(theta).matrix()), "R{}({}) is not unitary", axis, theta);
            }
        }
        assert!(is_unitary(&StandardGate::CNOT.matrix()));
        assert!(is_unitary(&StandardGate::H.matrix()));
    }

    #[test]
    fn test_axis_indices_follow_layer_order() {
        let indices: Vec<usize> = RotationAxis::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(RotationAxis::Y.gate(0.5), ParametrizedGate::Ry(0.5));
        assert_eq!(ParametrizedGate::Rz(0.25).axis(), RotationAxis::Z);
    }
}
