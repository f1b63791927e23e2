//! Core traits for machine learning models

use crate::error::Result;

/// Base trait for all machine learning models
pub trait Model {
    /// Type of input data
    type Input;

    /// Type of output predictions
    type Output;

    /// Returns the number of trainable parameters in the model
    fn parameter_count(&self) -> usize;

    /// Gets the current model parameters, flattened
    fn get_parameters(&self) -> Vec<f64>;

    /// Sets the model parameters from a flat slice
    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()>;

    /// Returns the input and output dimensions
    fn dimensions(&self) -> (usize, usize);
}

/// Trait for models that can make predictions
pub trait PredictiveModel: Model {
    /// Make a prediction for a single input
    fn predict(&self, input: &Self::Input) -> Result<Self::Output>;

    /// Make predictions for a batch of inputs
    fn predict_batch(&self, inputs: &[Self::Input]) -> Result<Vec<Self::Output>> {
        inputs.iter().map(|input| self.predict(input)).collect()
    }
}
