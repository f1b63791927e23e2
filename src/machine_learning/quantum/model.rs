//! Quantum autoencoder model: circuit layout plus its trainable angles

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::machine_learning::core::{Model, PredictiveModel};
use crate::machine_learning::loss::fidelity;
use crate::machine_learning::quantum::circuit_model::AutoencoderCircuit;
use crate::quantum::differentiation::ForwardEvaluator;
use crate::quantum::parameters::ParameterTensor;

/// A trainable quantum autoencoder scoring samples by reconstruction fidelity
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumAutoencoder {
    circuit: AutoencoderCircuit,
    parameters: ParameterTensor,
}

impl QuantumAutoencoder {
    /// Creates a model with parameters drawn from `[-init_scale, init_scale]`
    pub fn new(config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        let circuit = AutoencoderCircuit::new(config.qubit_count, config.layer_count)?;

        let mut rng = match config.init_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let parameters = ParameterTensor::random(
            config.layer_count,
            config.qubit_count,
            config.init_scale,
            &mut rng,
        );

        Ok(QuantumAutoencoder { circuit, parameters })
    }

    /// Creates a model around an existing parameter tensor
    pub fn from_parameters(parameters: ParameterTensor) -> Result<Self> {
        let circuit = AutoencoderCircuit::new(parameters.qubit_count(), parameters.layer_count())?;
        Ok(QuantumAutoencoder { circuit, parameters })
    }

    pub fn circuit(&self) -> &AutoencoderCircuit {
        &self.circuit
    }

    /// The trained parameter tensor (L × n × 3)
    pub fn parameters(&self) -> &ParameterTensor {
        &self.parameters
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut ParameterTensor {
        &mut self.parameters
    }

    pub fn qubit_count(&self) -> usize {
        self.circuit.qubit_count()
    }

    /// ⟨Z⟩ on the trash wire for one sample
    pub fn expectation(&self, sample: ArrayView1<'_, f64>) -> Result<f64> {
        self.circuit.check_sample(sample)?;
        Ok(self.circuit.forward(sample, &self.parameters))
    }

    /// Reconstruction fidelity `(1 + ⟨Z⟩) / 2` for one sample
    pub fn fidelity(&self, sample: ArrayView1<'_, f64>) -> Result<f64> {
        self.expectation(sample).map(fidelity)
    }

    /// ⟨Z⟩ on the trash wire for every row, evaluated on the rayon pool
    pub fn expectation_batch(&self, features: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        if features.ncols() != self.qubit_count() {
            return Err(Error::DimensionMismatch {
                context: "feature width".to_string(),
                expected: self.qubit_count(),
                found: features.ncols(),
            });
        }

        let rows: Vec<ArrayView1<'_, f64>> = features.outer_iter().collect();
        Ok(rows
            .par_iter()
            .map(|row| self.circuit.forward(row.view(), &self.parameters))
            .collect())
    }

    /// Fidelity of every row
    pub fn score_batch(&self, features: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        Ok(self.expectation_batch(features)?.into_iter().map(fidelity).collect())
    }

    /// Ranking scores `1 − fidelity`; higher is more anomalous
    pub fn anomaly_scores(&self, features: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        Ok(self.score_batch(features)?.into_iter().map(|f| 1.0 - f).collect())
    }
}

impl Model for QuantumAutoencoder {
    type Input = Array1<f64>;
    type Output = f64;

    fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    fn get_parameters(&self) -> Vec<f64> {
        self.parameters.as_slice().to_vec()
    }

    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        self.parameters = ParameterTensor::from_vec(
            self.circuit.layer_count(),
            self.circuit.qubit_count(),
            parameters.to_vec(),
        )?;
        Ok(())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.qubit_count(), 1)
    }
}

impl PredictiveModel for QuantumAutoencoder {
    fn predict(&self, input: &Self::Input) -> Result<Self::Output> {
        self.fidelity(input.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn config() -> ModelConfig {
        ModelConfig {
            qubit_count: 3,
            layer_count: 2,
            init_scale: 0.1,
            init_seed: Some(42),
        }
    }

    #[test]
    fn test_seeded_initialisation_is_reproducible() {
        let a = QuantumAutoencoder::new(&config()).unwrap();
        let b = QuantumAutoencoder::new(&config()).unwrap();
        assert_eq!(a.parameters(), b.parameters());
        assert_eq!(a.parameter_count(), 18);
        assert!(a.parameters().as_slice().iter().all(|p| p.abs() <= 0.1));
    }

    #[test]
    fn test_scores_are_fidelities() {
        let model = QuantumAutoencoder::new(&config()).unwrap();
        let features = array![[0.1, 0.2, 0.3], [2.0, -1.0, 3.0]];
        let scores = model.score_batch(features.view()).unwrap();

        assert_eq!(scores.len(), 2);
        let anomaly = model.anomaly_scores(features.view()).unwrap();
        assert!((anomaly[1] - (1.0 - scores[1])).abs() < 1e-15);
        for (score, row) in scores.iter().zip(features.outer_iter()) {
            assert!((0.0..=1.0).contains(score));
            assert!((score - model.fidelity(row).unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let model = QuantumAutoencoder::new(&config()).unwrap();
        assert!(model.fidelity(array![0.1, 0.2].view()).is_err());
        assert!(model.score_batch(array![[0.1, 0.2]].view()).is_err());
    }

    #[test]
    fn test_set_parameters_checks_length() {
        let mut model = QuantumAutoencoder::new(&config()).unwrap();
        assert!(model.set_parameters(&[0.0; 5]).is_err());
        model.set_parameters(&[0.0; 18]).unwrap();
        assert_eq!(model.get_parameters(), vec![0.0; 18]);
    }
}
