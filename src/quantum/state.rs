// src/quantum/state.rs
//! Quantum state representations
//!
//! The joint state of an n-qubit register is a flat array of 2^n complex
//! amplitudes. Wire `q` is bit `n - 1 - q` of the basis index, so wire 0 is
//! the most significant bit of `|q0 q1 ... q(n-1)⟩`.

use std::fmt::{self, Display};
use num_complex::Complex64;
use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

/// Hard upper bound on register size (2^24 amplitudes, 256 MiB)
pub const MAX_QUBITS: usize = 24;

/// Tolerance used when checking normalisation
pub const NORM_TOLERANCE: f64 = 1e-9;

/// State vector representation of a quantum state
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Number of qubits
    qubit_count: usize,

    /// The state vector as an array of complex amplitudes
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        check_register_size(qubit_count)?;
        let expected_dim = 1 << qubit_count;

        if amplitudes.len() != expected_dim {
            return Err(Error::DimensionMismatch {
                context: "state vector amplitudes".to_string(),
                expected: expected_dim,
                found: amplitudes.len(),
            });
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        if !state.is_valid() {
            return Err(Error::InvalidState(format!(
                "squared norm is {}, expected 1",
                state.norm_sqr()
            )));
        }

        Ok(state)
    }

    /// Create a new state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self> {
        check_register_size(qubit_count)?;
        let dim = 1 << qubit_count;

        if index >= dim {
            return Err(Error::InvalidState(format!(
                "index {} is out of range for {}-qubit state",
                index, qubit_count
            )));
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the zero state |00...0⟩
    ///
    /// Panics if `qubit_count` is 0 or above [`MAX_QUBITS`].
    pub fn zero_state(qubit_count: usize) -> Self {
        assert!(
            (1..=MAX_QUBITS).contains(&qubit_count),
            "register size {} outside 1..={}",
            qubit_count,
            MAX_QUBITS
        );
        let mut amplitudes = Array1::zeros(1 << qubit_count);
        amplitudes[0] = Complex64::new(1.0, 0.0);

        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    /// Returns the number of qubits in this state
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Returns the dimension of the Hilbert space (2^n for n qubits)
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Sum of squared amplitude magnitudes
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    /// Check that the state is normalised
    pub fn is_valid(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Calculate the probability of measuring the given bit string
    pub fn probability(&self, bit_string: usize) -> f64 {
        if bit_string >= self.dimension() {
            return 0.0;
        }

        self.amplitudes[bit_string].norm_sqr()
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> Complex64 {
        assert_eq!(
            self.qubit_count, other.qubit_count,
            "Dimension mismatch in inner product"
        );

        self.amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Bit mask selecting `wire` in a basis index
    fn wire_mask(&self, wire: usize) -> usize {
        assert!(
            wire < self.qubit_count,
            "wire {} out of range for {}-qubit register",
            wire,
            self.qubit_count
        );
        1 << (self.qubit_count - 1 - wire)
    }

    /// Apply a 2×2 unitary to one wire in place, O(2^n)
    pub fn apply_single_qubit_gate(&mut self, unitary: &Array2<Complex64>, wire: usize) {
        assert_eq!(unitary.shape(), [2, 2], "single-qubit gate must be 2x2");
        let mask = self.wire_mask(wire);
        let (u00, u01) = (unitary[[0, 0]], unitary[[0, 1]]);
        let (u10, u11) = (unitary[[1, 0]], unitary[[1, 1]]);

        for i in 0..self.dimension() {
            if i & mask != 0 {
                continue;
            }
            let j = i | mask;
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[j];
            self.amplitudes[i] = u00 * a0 + u01 * a1;
            self.amplitudes[j] = u10 * a0 + u11 * a1;
        }
    }

    /// Apply a 4×4 unitary to an ordered wire pair in place
    ///
    /// `first` selects the high bit of the gate's local index, so CNOT's
    /// matrix applied to `(control, target)` keeps its textbook meaning.
    pub fn apply_two_qubit_gate(&mut self, unitary: &Array2<Complex64>, first: usize, second: usize) {
        assert_eq!(unitary.shape(), [4, 4], "two-qubit gate must be 4x4");
        assert_ne!(first, second, "two-qubit gate needs distinct wires");
        let high = self.wire_mask(first);
        let low = self.wire_mask(second);

        for i in 0..self.dimension() {
            if i & (high | low) != 0 {
                continue;
            }
            let indices = [i, i | low, i | high, i | high | low];
            let old = indices.map(|idx| self.amplitudes[idx]);
            for (row, &idx) in indices.iter().enumerate() {
                self.amplitudes[idx] = (0..4).map(|col| unitary[[row, col]] * old[col]).sum();
            }
        }
    }

    /// Controlled flip: swap amplitude pairs whose control bit is 1,
    /// differing only in the target bit. Applying it twice is the identity.
    pub fn apply_controlled_flip(&mut self, control: usize, target: usize) {
        assert_ne!(control, target, "control and target must be different wires");
        let control_mask = self.wire_mask(control);
        let target_mask = self.wire_mask(target);

        for i in 0..self.dimension() {
            if i & control_mask != 0 && i & target_mask == 0 {
                self.amplitudes.swap(i, i | target_mask);
            }
        }
    }

    /// Expectation of Pauli-Z on `wire`: Σ |amp|² · (+1 if bit is 0 else −1)
    pub fn expectation_z(&self, wire: usize) -> f64 {
        let mask = self.wire_mask(wire);

        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| {
                if i & mask == 0 {
                    amp.norm_sqr()
                } else {
                    -amp.norm_sqr()
                }
            })
            .sum()
    }
}

fn check_register_size(qubit_count: usize) -> Result<()> {
    if qubit_count == 0 || qubit_count > MAX_QUBITS {
        return Err(Error::InvalidConfig(format!(
            "qubit count must be in 1..={}, got {}",
            MAX_QUBITS, qubit_count
        )));
    }
    Ok(())
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit state:", self.qubit_count)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > threshold {
                has_entries = true;

                // Convert i to binary representation for the ket label
                let bit_string = format!("{:0width$b}", i, width = self.qubit_count);

                writeln!(f, "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]", amp.re, amp.im, bit_string, prob * 100.0)?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}
