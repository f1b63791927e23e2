//! The autoencoder circuit: RY angle encoding, L variational layers, ⟨Z⟩ on the trash wire

use ndarray::ArrayView1;

use crate::error::{Error, Result};
use crate::quantum::circuit::{CircuitBuilder, QuantumCircuit};
use crate::quantum::differentiation::ForwardEvaluator;
use crate::quantum::gate::{QuantumGate, RotationAxis};
use crate::quantum::parameters::{ParameterTensor, ROTATIONS_PER_QUBIT};
use crate::quantum::state::StateVector;
use crate::simulators::StatevectorSimulator;

/// Circuit layout of the quantum autoencoder
///
/// Holds only the register shape and a stateless simulator. Every forward
/// evaluation builds its own [`StateVector`], so one value can be shared by
/// all rayon workers during a mini-batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoencoderCircuit {
    simulator: StatevectorSimulator,
    layer_count: usize,
}

impl AutoencoderCircuit {
    /// Creates the layout for `qubit_count` wires and `layer_count` layers
    pub fn new(qubit_count: usize, layer_count: usize) -> Result<Self> {
        if layer_count == 0 {
            return Err(Error::InvalidConfig("layer_count must be > 0".into()));
        }
        let simulator = StatevectorSimulator::new(qubit_count)?;
        Ok(AutoencoderCircuit { simulator, layer_count })
    }

    pub fn qubit_count(&self) -> usize {
        self.simulator.qubit_count()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// The measured wire (last qubit)
    pub fn trash_qubit(&self) -> usize {
        self.qubit_count() - 1
    }

    /// Number of trainable angles, `L · n · 3`
    pub fn parameter_count(&self) -> usize {
        self.layer_count * self.qubit_count() * ROTATIONS_PER_QUBIT
    }

    /// Check that a sample has one angle per wire
    pub fn check_sample(&self, sample: ArrayView1<'_, f64>) -> Result<()> {
        if sample.len() != self.qubit_count() {
            return Err(Error::DimensionMismatch {
                context: "sample width".to_string(),
                expected: self.qubit_count(),
                found: sample.len(),
            });
        }
        Ok(())
    }

    /// Check that a parameter tensor has this circuit's shape
    pub fn check_parameters(&self, parameters: &ParameterTensor) -> Result<()> {
        if parameters.layer_count() != self.layer_count || parameters.qubit_count() != self.qubit_count() {
            return Err(Error::DimensionMismatch {
                context: "parameter tensor".to_string(),
                expected: self.parameter_count(),
                found: parameters.len(),
            });
        }
        Ok(())
    }

    /// RY(x_i) on every wire i
    pub fn apply_encoding(&self, state: &mut StateVector, sample: ArrayView1<'_, f64>) {
        for (wire, &angle) in sample.iter().enumerate() {
            state.apply_single_qubit_gate(&RotationAxis::Y.gate(angle).matrix(), wire);
        }
    }

    /// RX, RY, RZ of `layer` on every wire
    pub fn apply_rotations(&self, state: &mut StateVector, parameters: &ParameterTensor, layer: usize) {
        for wire in 0..self.qubit_count() {
            let angles = parameters.rotations(layer, wire);
            for (axis, &theta) in RotationAxis::ALL.iter().zip(angles) {
                state.apply_single_qubit_gate(&axis.gate(theta).matrix(), wire);
            }
        }
    }

    /// CNOT(i → i+1 mod n) for every wire; nothing on a single wire
    pub fn apply_entangling_ring(&self, state: &mut StateVector) {
        let n = self.qubit_count();
        if n < 2 {
            return;
        }
        for control in 0..n {
            state.apply_controlled_flip(control, (control + 1) % n);
        }
    }

    /// Final state after encoding and all layers
    pub fn final_state(&self, sample: ArrayView1<'_, f64>, parameters: &ParameterTensor) -> StateVector {
        assert_eq!(sample.len(), self.qubit_count(), "sample width must equal the qubit count");
        assert_eq!(
            parameters.shape(),
            (self.layer_count, self.qubit_count(), ROTATIONS_PER_QUBIT),
            "parameter tensor shape must match the circuit"
        );

        let mut state = self.simulator.initialize();
        self.apply_encoding(&mut state, sample);
        for layer in 0..self.layer_count {
            self.apply_rotations(&mut state, parameters, layer);
            self.apply_entangling_ring(&mut state);
        }
        state
    }

    /// Same gates as [`final_state`](Self::final_state), as an explicit gate list
    pub fn build_circuit(&self, sample: ArrayView1<'_, f64>, parameters: &ParameterTensor) -> QuantumCircuit {
        let mut builder = CircuitBuilder::new(self.qubit_count());
        for (wire, &angle) in sample.iter().enumerate() {
            builder.ry(wire, angle);
        }
        for layer in 0..self.layer_count {
            for wire in 0..self.qubit_count() {
                for (axis, &theta) in RotationAxis::ALL.iter().zip(parameters.rotations(layer, wire)) {
                    builder.rotation(*axis, wire, theta);
                }
            }
            builder.cnot_ring();
        }
        builder.build()
    }

    /// Run an explicit circuit and measure the trash wire
    pub fn run_circuit(&self, circuit: &QuantumCircuit) -> f64 {
        self.simulator.run_expectation(circuit, self.trash_qubit())
    }
}

impl ForwardEvaluator for AutoencoderCircuit {
    fn forward(&self, sample: ArrayView1<'_, f64>, parameters: &ParameterTensor) -> f64 {
        self.final_state(sample, parameters).expectation_z(self.trash_qubit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_direct_forward_matches_gate_list() {
        let circuit = AutoencoderCircuit::new(3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let params = ParameterTensor::random(2, 3, 1.0, &mut rng);
        let sample = array![0.3, -1.1, 0.7];

        let direct = circuit.forward(sample.view(), &params);
        let gates = circuit.build_circuit(sample.view(), &params);
        let via_list = circuit.run_circuit(&gates);
        assert!((direct - via_list).abs() < 1e-12);

        // 3 encodings, then per layer 9 rotations and a 3-edge ring
        assert_eq!(gates.gate_count(), 3 + 2 * (9 + 3));
        assert!(gates.to_string().contains("CNOT [2, 0]"));
    }

    #[test]
    fn test_zero_parameters_single_wire_is_cos() {
        // One wire, no ring: ⟨Z⟩ after RY(x) is cos(x)
        let circuit = AutoencoderCircuit::new(1, 1).unwrap();
        let params = ParameterTensor::zeros(1, 1);
        let e = circuit.forward(array![0.9].view(), &params);
        assert!((e - 0.9f64.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(AutoencoderCircuit::new(0, 1).is_err());
        assert!(AutoencoderCircuit::new(2, 0).is_err());

        let circuit = AutoencoderCircuit::new(2, 1).unwrap();
        assert!(circuit.check_sample(array![0.1, 0.2, 0.3].view()).is_err());
        assert!(circuit.check_parameters(&ParameterTensor::zeros(2, 2)).is_err());
        assert_eq!(circuit.parameter_count(), 6);
    }
}
