//! Mini-batch training of the quantum autoencoder
//!
//! `Idle → Running { epoch } → … → Done`. Each epoch walks the training set
//! in fixed-size batches (contiguous order unless a shuffle seed is set),
//! averages the per-sample shift-rule gradients of the loss and takes one
//! optimizer step per batch. The loss reported for an epoch is the mean
//! reconstruction error on a fixed leading slice of the training set.
//!
//! Every call to [`Trainer::fit`] is a fresh run: optimizer state is cleared
//! once the inputs are validated. A run that diverges restores the last
//! finite parameters, clears the optimizer and returns to `Idle`.

use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{Config, TrainingConfig};
use crate::error::{Error, Result};
use crate::machine_learning::dataset::batch_order;
use crate::machine_learning::loss::{LossFunction, ReconstructionError};
use crate::machine_learning::optimizer::{Adam, Optimizer};
use crate::machine_learning::quantum::model::QuantumAutoencoder;
use crate::quantum::differentiation::{ForwardEvaluator, ParameterShift};
use crate::quantum::parameters::ParameterTensor;

/// Where a trainer is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    Idle,
    Running { epoch: usize },
    Done,
}

/// Outcome of a completed training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Monitoring loss before the first step
    pub initial_loss: f64,
    /// Monitoring loss after each epoch
    pub epoch_losses: Vec<f64>,
    /// Optimizer steps taken
    pub steps: usize,
    /// Samples in the monitoring slice
    pub monitor_samples: usize,
    /// Trained parameter tensor
    pub parameters: ParameterTensor,
}

impl TrainingReport {
    pub fn final_loss(&self) -> f64 {
        self.epoch_losses.last().copied().unwrap_or(self.initial_loss)
    }
}

/// Drives an optimizer over a [`QuantumAutoencoder`]
///
/// The trainer is the single writer of the parameter tensor and the
/// optimizer state; gradient workers only read them.
#[derive(Debug)]
pub struct Trainer<O: Optimizer = Adam, L: LossFunction = ReconstructionError> {
    config: TrainingConfig,
    optimizer: O,
    loss: L,
    gradient: ParameterShift,
    phase: TrainingPhase,
}

impl Trainer {
    /// Adam with the configured hyperparameters and `1 − fidelity` loss
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Trainer::with_parts(
            config.training.clone(),
            Adam::from_config(&config.optimizer),
            ReconstructionError,
        )
    }
}

impl<O: Optimizer, L: LossFunction> Trainer<O, L> {
    /// A trainer with a custom optimizer and loss
    pub fn with_parts(config: TrainingConfig, optimizer: O, loss: L) -> Result<Self> {
        config.validate()?;
        Ok(Trainer {
            config,
            optimizer,
            loss,
            gradient: ParameterShift::new(),
            phase: TrainingPhase::Idle,
        })
    }

    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `model` on the rows of `features` for the configured epochs
    pub fn fit(&mut self, model: &mut QuantumAutoencoder, features: ArrayView2<'_, f64>) -> Result<TrainingReport> {
        if features.nrows() == 0 {
            return Err(Error::EmptyInput("training set has no rows".into()));
        }
        if features.ncols() != model.qubit_count() {
            return Err(Error::DimensionMismatch {
                context: "feature width".to_string(),
                expected: model.qubit_count(),
                found: features.ncols(),
            });
        }

        self.optimizer.reset();
        self.phase = TrainingPhase::Idle;

        let monitor_samples = self.config.monitor_samples.min(features.nrows());
        if monitor_samples < self.config.monitor_samples {
            warn!(
                requested = self.config.monitor_samples,
                available = features.nrows(),
                "Monitoring slice clamped to training set size"
            );
        }
        let monitor = features.slice(ndarray::s![..monitor_samples, ..]);

        let initial_loss = self.reconstruction_loss(model, monitor)?;
        info!(
            samples = features.nrows(),
            parameters = model.parameters().len(),
            epochs = self.config.epochs,
            batch_size = self.config.batch_size,
            initial_loss,
            "Starting training"
        );

        let mut epoch_losses = Vec::with_capacity(self.config.epochs);
        let mut steps = 0;

        for epoch in 0..self.config.epochs {
            self.phase = TrainingPhase::Running { epoch };
            let order = batch_order(features.nrows(), epoch, self.config.shuffle_seed);

            for chunk in order.chunks(self.config.batch_size) {
                let batch: Vec<ArrayView1<'_, f64>> = chunk.iter().map(|&i| features.row(i)).collect();
                let gradient = self.batch_gradient(model, &batch)?;

                if !gradient.is_finite() {
                    return Err(self.diverged(epoch, steps, "non-finite gradient"));
                }

                let previous = model.parameters().clone();
                self.optimizer
                    .update(model.parameters_mut().as_mut_slice(), gradient.as_slice());
                steps += 1;

                if !model.parameters().is_finite() {
                    *model.parameters_mut() = previous;
                    return Err(self.diverged(epoch, steps, "non-finite parameters after optimizer step"));
                }

                debug!(epoch, step = steps, gradient_norm = gradient.norm(), "Optimizer step");
            }

            let loss = self.reconstruction_loss(model, monitor)?;
            info!(epoch = epoch + 1, loss, "Epoch complete");
            epoch_losses.push(loss);
        }

        self.phase = TrainingPhase::Done;

        Ok(TrainingReport {
            initial_loss,
            epoch_losses,
            steps,
            monitor_samples,
            parameters: model.parameters().clone(),
        })
    }

    /// Mean over the batch of `loss'(E) · ∂E/∂θ`, with ∂E/∂θ from the shift rule
    pub fn batch_gradient(&self, model: &QuantumAutoencoder, batch: &[ArrayView1<'_, f64>]) -> Result<ParameterTensor> {
        if batch.is_empty() {
            return Err(Error::EmptyInput("mini-batch has no samples".into()));
        }
        for sample in batch {
            model.circuit().check_sample(*sample)?;
        }

        let circuit = model.circuit();
        let parameters = model.parameters();
        let (shift, loss) = (&self.gradient, &self.loss);
        let zeros = || ParameterTensor::zeros(parameters.layer_count(), parameters.qubit_count());

        let per_sample = |sample: &ArrayView1<f64>| {
            let expectation = circuit.forward(sample.view(), parameters);
            let mut gradient = shift.gradient(circuit, sample.view(), parameters);
            gradient.scale(loss.derivative(expectation));
            gradient
        };
        let accumulate = |mut total: ParameterTensor, g: ParameterTensor| {
            total.add_scaled(&g, 1.0);
            total
        };

        let mut sum = if self.config.parallel {
            batch.par_iter().map(per_sample).reduce(zeros, accumulate)
        } else {
            batch.iter().map(per_sample).fold(zeros(), accumulate)
        };
        sum.scale(1.0 / batch.len() as f64);
        Ok(sum)
    }

    /// Mean loss over the rows of `features`
    pub fn reconstruction_loss(&self, model: &QuantumAutoencoder, features: ArrayView2<'_, f64>) -> Result<f64> {
        if features.nrows() == 0 {
            return Err(Error::EmptyInput("no samples to evaluate".into()));
        }
        let expectations = model.expectation_batch(features)?;
        let total: f64 = expectations.iter().map(|&e| self.loss.loss(e)).sum();
        Ok(total / expectations.len() as f64)
    }

    fn diverged(&mut self, epoch: usize, step: usize, reason: &str) -> Error {
        error!(epoch, step, reason, "Training diverged");
        self.optimizer.reset();
        self.phase = TrainingPhase::Idle;
        Error::TrainingDiverged {
            epoch,
            step,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::quantum::differentiation::parameter_shift_gradient;
    use ndarray::array;

    fn model() -> QuantumAutoencoder {
        QuantumAutoencoder::new(&ModelConfig {
            qubit_count: 2,
            layer_count: 1,
            init_scale: 0.3,
            init_seed: Some(3),
        })
        .unwrap()
    }

    #[test]
    fn test_batch_gradient_is_half_negative_mean_shift_gradient() {
        let trainer = Trainer::new(&Config::default()).unwrap();
        let model = model();
        let features = array![[0.1, 0.8], [0.4, 0.7]];
        let batch: Vec<_> = features.outer_iter().collect();

        let g = trainer.batch_gradient(&model, &batch).unwrap();
        for k in 0..g.len() {
            let mean: f64 = batch
                .iter()
                .map(|s| parameter_shift_gradient(model.circuit(), *s, model.parameters()).as_slice()[k])
                .sum::<f64>()
                / 2.0;
            assert!((g.as_slice()[k] - (-0.5 * mean)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let trainer = Trainer::new(&Config::default()).unwrap();
        assert!(matches!(
            trainer.batch_gradient(&model(), &[]),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_phase_reaches_done() {
        let mut config = Config::default();
        config.model.qubit_count = 2;
        config.training.epochs = 2;
        config.training.batch_size = 2;
        let mut trainer = Trainer::new(&config).unwrap();
        assert_eq!(trainer.phase(), TrainingPhase::Idle);

        let mut m = model();
        let features = array![[0.1, 0.8], [0.2, 0.8], [0.3, 0.8]];
        let report = trainer.fit(&mut m, features.view()).unwrap();

        assert_eq!(trainer.phase(), TrainingPhase::Done);
        assert_eq!(report.steps, 4);
        assert_eq!(report.epoch_losses.len(), 2);
        assert_eq!(report.monitor_samples, 3);
        assert_eq!(trainer.optimizer().step_count(), 4);
    }
}
