//! Configuration for model shape, training and evaluation.
//!
//! Configuration is assembled from the following sources (later sources
//! override earlier ones):
//!
//! 1. Built-in defaults
//! 2. A JSON file
//! 3. Environment variables (QFRAUD_*)
//!
//! [`Config::validate`] must pass before a trainer is built.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::quantum::state::MAX_QUBITS;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Circuit shape and initialisation
    #[serde(default)]
    pub model: ModelConfig,

    /// Epoch and mini-batch settings
    #[serde(default)]
    pub training: TrainingConfig,

    /// Adam hyperparameters
    #[serde(default)]
    pub optimizer: AdamConfig,

    /// Scoring thresholds
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// Parse a JSON document; missing sections take their defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load configuration from an optional JSON file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = env_parse("QFRAUD_QUBITS") {
            self.model.qubit_count = val;
        }
        if let Some(val) = env_parse("QFRAUD_LAYERS") {
            self.model.layer_count = val;
        }
        if let Some(val) = env_parse("QFRAUD_SEED") {
            self.model.init_seed = Some(val);
        }
        if let Some(val) = env_parse("QFRAUD_BATCH_SIZE") {
            self.training.batch_size = val;
        }
        if let Some(val) = env_parse("QFRAUD_EPOCHS") {
            self.training.epochs = val;
        }
        if let Some(val) = env_parse("QFRAUD_LEARNING_RATE") {
            self.optimizer.learning_rate = val;
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.training.validate()?;
        self.optimizer.validate()?;
        self.evaluation.validate()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Circuit shape and parameter initialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of qubits; also the required feature width
    #[serde(default = "default_qubit_count")]
    pub qubit_count: usize,

    /// Number of variational layers
    #[serde(default = "default_layer_count")]
    pub layer_count: usize,

    /// Initial parameters are drawn from `[-init_scale, init_scale]`
    #[serde(default = "default_init_scale")]
    pub init_scale: f64,

    /// Seed for parameter initialisation; entropy-seeded when absent
    #[serde(default)]
    pub init_seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            qubit_count: default_qubit_count(),
            layer_count: default_layer_count(),
            init_scale: default_init_scale(),
            init_seed: None,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.qubit_count == 0 || self.qubit_count > MAX_QUBITS {
            return Err(Error::InvalidConfig(format!(
                "qubit_count must be in 1..={}, got {}",
                MAX_QUBITS, self.qubit_count
            )));
        }
        if self.layer_count == 0 {
            return Err(Error::InvalidConfig("layer_count must be > 0".into()));
        }
        if !self.init_scale.is_finite() || self.init_scale < 0.0 {
            return Err(Error::InvalidConfig("init_scale must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// Epoch and mini-batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Samples per optimizer step; the last batch of an epoch may be shorter
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of passes over the training set
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// Size of the leading slice used for the per-epoch loss
    #[serde(default = "default_monitor_samples")]
    pub monitor_samples: usize,

    /// Shuffle batch order each epoch with this seed; contiguous order when absent
    #[serde(default)]
    pub shuffle_seed: Option<u64>,

    /// Evaluate per-sample gradients on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            epochs: default_epochs(),
            monitor_samples: default_monitor_samples(),
            shuffle_seed: None,
            parallel: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".into()));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".into()));
        }
        if self.monitor_samples == 0 {
            return Err(Error::InvalidConfig("monitor_samples must be > 0".into()));
        }
        Ok(())
    }
}

/// Adam hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_beta1")]
    pub beta1: f64,

    #[serde(default = "default_beta2")]
    pub beta2: f64,

    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
        }
    }
}

impl AdamConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig("learning_rate must be > 0".into()));
        }
        if !(0.0..1.0).contains(&self.beta1) {
            return Err(Error::InvalidConfig("beta1 must be in [0, 1)".into()));
        }
        if !(0.0..1.0).contains(&self.beta2) {
            return Err(Error::InvalidConfig("beta2 must be in [0, 1)".into()));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidConfig("epsilon must be > 0".into()));
        }
        Ok(())
    }
}

/// Scoring thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Fidelity thresholds in [0, 1], reported in this order
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(Error::InvalidConfig(format!(
                "threshold {} is outside [0, 1]",
                t
            )));
        }
        Ok(())
    }
}

fn default_qubit_count() -> usize {
    4
}

fn default_layer_count() -> usize {
    2
}

fn default_init_scale() -> f64 {
    0.1
}

fn default_batch_size() -> usize {
    32
}

fn default_epochs() -> usize {
    10
}

fn default_monitor_samples() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_learning_rate() -> f64 {
    0.001
}

fn default_beta1() -> f64 {
    0.9
}

fn default_beta2() -> f64 {
    0.999
}

fn default_epsilon() -> f64 {
    1e-8
}

fn default_thresholds() -> Vec<f64> {
    vec![0.5, 0.6, 0.7, 0.8, 0.9]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.optimizer.learning_rate, 0.001);
        assert_eq!(config.optimizer.beta1, 0.9);
        assert_eq!(config.optimizer.beta2, 0.999);
        assert_eq!(config.optimizer.epsilon, 1e-8);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = Config::from_json_str(r#"{"model": {"qubit_count": 6}, "training": {"epochs": 3}}"#).unwrap();
        assert_eq!(config.model.qubit_count, 6);
        assert_eq!(config.model.layer_count, 2);
        assert_eq!(config.training.epochs, 3);
        assert_eq!(config.training.batch_size, 32);
        assert!(config.training.parallel);
    }

    #[test]
    fn test_rejects_zero_qubits_and_layers() {
        let mut config = Config::default();
        config.model.qubit_count = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.model.layer_count = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.model.qubit_count = MAX_QUBITS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_training_and_thresholds() {
        let mut config = Config::default();
        config.training.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.evaluation.thresholds = vec![0.5, 1.2];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.optimizer.beta2 = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = Config::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
