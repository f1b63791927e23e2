//! Optimization algorithms for machine learning models
//!
//! Optimizers own their state and are driven by a single writer (the
//! trainer) between mini-batches, so updates take `&mut self`.

use crate::config::AdamConfig;

/// Trait for optimization algorithms
pub trait Optimizer: Send {
    /// Update parameters in place using gradients
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]);

    /// Reset the optimizer's internal state
    fn reset(&mut self);

    /// Number of updates applied since construction or the last reset
    fn step_count(&self) -> usize;
}

/// Gradient Descent optimizer
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    steps: usize,
}

impl GradientDescent {
    /// Creates a new Gradient Descent optimizer
    pub fn new(learning_rate: f64) -> Self {
        GradientDescent { learning_rate, steps: 0 }
    }
}

impl Optimizer for GradientDescent {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) {
        assert_eq!(parameters.len(), gradients.len(), "Parameter and gradient dimensions must match");

        for (param, grad) in parameters.iter_mut().zip(gradients.iter()) {
            *param -= self.learning_rate * grad;
        }
        self.steps += 1;
    }

    fn reset(&mut self) {
        self.steps = 0;
    }

    fn step_count(&self) -> usize {
        self.steps
    }
}

/// Adaptive Moment Estimation (Adam) optimizer
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    m: Vec<f64>,        // First moment estimate
    v: Vec<f64>,        // Second moment estimate
    t: usize,           // Timestep
}

impl Default for Adam {
    fn default() -> Self {
        Adam::from_config(&AdamConfig::default())
    }
}

impl Adam {
    /// Creates a new Adam optimizer
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// Creates an Adam optimizer from validated hyperparameters
    pub fn from_config(config: &AdamConfig) -> Self {
        Adam::new(config.learning_rate, config.beta1, config.beta2, config.epsilon)
    }

    /// First moment estimate
    pub fn first_moment(&self) -> &[f64] {
        &self.m
    }

    /// Second moment estimate
    pub fn second_moment(&self) -> &[f64] {
        &self.v
    }
}

impl Optimizer for Adam {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) {
        let n = parameters.len();
        assert_eq!(n, gradients.len(), "Parameter and gradient dimensions must match");

        // Moments start at zero on the first step
        if self.m.is_empty() {
            self.m = vec![0.0; n];
            self.v = vec![0.0; n];
        }
        assert_eq!(self.m.len(), n, "Parameter count changed between Adam steps");

        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for i in 0..n {
            let g = gradients[i];
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;

            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;

            parameters[i] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }

    fn step_count(&self) -> usize {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adam_first_step_moves_by_learning_rate() {
        // With bias correction the first step is lr · g / (|g| + eps)
        let mut adam = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let mut params = vec![1.0, -1.0, 0.5];
        adam.update(&mut params, &[2.0, -0.5, 0.0]);

        assert!((params[0] - 0.9).abs() < 1e-6);
        assert!((params[1] - (-0.9)).abs() < 1e-6);
        assert_eq!(params[2], 0.5);
        assert_eq!(adam.step_count(), 1);
    }

    #[test]
    fn test_adam_moments_follow_recurrence() {
        let mut adam = Adam::new(0.01, 0.9, 0.999, 1e-8);
        let mut params = vec![0.0];
        adam.update(&mut params, &[1.0]);
        adam.update(&mut params, &[3.0]);

        let m = 0.9 * 0.1 + 0.1 * 3.0;
        let v = 0.999 * 0.001 + 0.001 * 9.0;
        assert!((adam.first_moment()[0] - m).abs() < 1e-12);
        assert!((adam.second_moment()[0] - v).abs() < 1e-12);
    }

    #[test]
    fn test_adam_reset_clears_state() {
        let mut adam = Adam::default();
        let mut params = vec![0.0, 0.0];
        adam.update(&mut params, &[1.0, 1.0]);
        adam.reset();
        assert_eq!(adam.step_count(), 0);
        assert!(adam.first_moment().is_empty());
    }

    #[test]
    fn test_gradient_descent_step() {
        let mut sgd = GradientDescent::new(0.5);
        let mut params = vec![1.0, 2.0];
        sgd.update(&mut params, &[1.0, -2.0]);
        assert_eq!(params, vec![0.5, 3.0]);
    }
}
