//! Trainable parameter tensor of a layered rotation ansatz
//!
//! Values are indexed by (layer, qubit, rotation axis) and stored flat in
//! row-major order, so the optimizer can treat them as a plain slice.

use ndarray::Array3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quantum::gate::RotationAxis;

/// Number of rotation angles per qubit per layer
pub const ROTATIONS_PER_QUBIT: usize = 3;

/// Parameter tensor of shape `layers × qubits × 3`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterTensor {
    layers: usize,
    qubits: usize,
    values: Vec<f64>,
}

impl ParameterTensor {
    /// All-zero tensor
    pub fn zeros(layers: usize, qubits: usize) -> Self {
        ParameterTensor {
            layers,
            qubits,
            values: vec![0.0; layers * qubits * ROTATIONS_PER_QUBIT],
        }
    }

    /// Tensor from flat row-major values
    pub fn from_vec(layers: usize, qubits: usize, values: Vec<f64>) -> Result<Self> {
        let expected = layers * qubits * ROTATIONS_PER_QUBIT;
        if values.len() != expected {
            return Err(Error::DimensionMismatch {
                context: format!("{}x{}x{} parameter tensor", layers, qubits, ROTATIONS_PER_QUBIT),
                expected,
                found: values.len(),
            });
        }

        Ok(ParameterTensor { layers, qubits, values })
    }

    /// Tensor with entries drawn uniformly from `[-scale, scale]`
    pub fn random<R: Rng + ?Sized>(layers: usize, qubits: usize, scale: f64, rng: &mut R) -> Self {
        let len = layers * qubits * ROTATIONS_PER_QUBIT;
        let values = if scale > 0.0 {
            (0..len).map(|_| rng.gen_range(-scale..=scale)).collect()
        } else {
            vec![0.0; len]
        };

        ParameterTensor { layers, qubits, values }
    }

    /// Number of variational layers
    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Number of qubits per layer
    pub fn qubit_count(&self) -> usize {
        self.qubits
    }

    /// Total number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(layers, qubits, 3)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.layers, self.qubits, ROTATIONS_PER_QUBIT)
    }

    /// Row-major position of (layer, qubit, axis)
    pub fn flat_index(&self, layer: usize, qubit: usize, axis: RotationAxis) -> usize {
        assert!(layer < self.layers, "layer {} out of range", layer);
        assert!(qubit < self.qubits, "qubit {} out of range", qubit);
        (layer * self.qubits + qubit) * ROTATIONS_PER_QUBIT + axis.index()
    }

    pub fn get(&self, layer: usize, qubit: usize, axis: RotationAxis) -> f64 {
        self.values[self.flat_index(layer, qubit, axis)]
    }

    pub fn set(&mut self, layer: usize, qubit: usize, axis: RotationAxis, value: f64) {
        let idx = self.flat_index(layer, qubit, axis);
        self.values[idx] = value;
    }

    /// The three angles of one qubit in one layer, ordered X, Y, Z
    pub fn rotations(&self, layer: usize, qubit: usize) -> &[f64] {
        let start = self.flat_index(layer, qubit, RotationAxis::X);
        &self.values[start..start + ROTATIONS_PER_QUBIT]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Copy with the flat entry `index` moved by `delta`
    pub fn shifted(&self, index: usize, delta: f64) -> Self {
        let mut shifted = self.clone();
        shifted.values[index] += delta;
        shifted
    }

    /// `self += factor * other`
    pub fn add_scaled(&mut self, other: &ParameterTensor, factor: f64) {
        assert_eq!(self.shape(), other.shape(), "parameter tensor shapes differ");
        for (value, delta) in self.values.iter_mut().zip(other.values.iter()) {
            *value += factor * delta;
        }
    }

    /// Multiply every entry by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.values.iter_mut().for_each(|v| *v *= factor);
    }

    /// Euclidean norm of the flattened tensor
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// True when no entry is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Copy into an ndarray of shape `(layers, qubits, 3)`
    pub fn to_array(&self) -> Array3<f64> {
        Array3::from_shape_fn(self.shape(), |(l, q, a)| {
            self.values[(l * self.qubits + q) * ROTATIONS_PER_QUBIT + a]
        })
    }
}
