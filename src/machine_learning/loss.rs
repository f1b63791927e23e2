//! Loss functions over a measured trash-qubit expectation

/// Fidelity of a measured ⟨Z⟩: `(1 + E) / 2`, clamped to [0, 1] against rounding
pub fn fidelity(expectation: f64) -> f64 {
    ((1.0 + expectation) / 2.0).clamp(0.0, 1.0)
}

/// Trait for loss functions
///
/// The loss is a function of the measured expectation value only, so the
/// gradient w.r.t. circuit parameters is `derivative(E) · ∂E/∂θ`.
pub trait LossFunction: Sync {
    /// Loss for one measured expectation value
    fn loss(&self, expectation: f64) -> f64;

    /// dLoss/dE at the given expectation value
    fn derivative(&self, expectation: f64) -> f64;
}

/// Reconstruction error `1 − fidelity = (1 − E) / 2`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconstructionError;

impl LossFunction for ReconstructionError {
    fn loss(&self, expectation: f64) -> f64 {
        1.0 - fidelity(expectation)
    }

    fn derivative(&self, _expectation: f64) -> f64 {
        -0.5
    }
}

/// Squared reconstruction error `(1 − fidelity)²`
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredReconstructionError;

impl LossFunction for SquaredReconstructionError {
    fn loss(&self, expectation: f64) -> f64 {
        let error = 1.0 - fidelity(expectation);
        error * error
    }

    fn derivative(&self, expectation: f64) -> f64 {
        // d/dE (1 - (1+E)/2)^2 = 2 (1 - f) · (-1/2)
        -(1.0 - fidelity(expectation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruction_error_range() {
        let loss = ReconstructionError;
        assert_eq!(loss.loss(1.0), 0.0);
        assert_eq!(loss.loss(-1.0), 1.0);
        assert_eq!(loss.loss(0.0), 0.5);
        assert_eq!(loss.derivative(0.3), -0.5);
    }

    #[test]
    fn test_squared_derivative_matches_difference() {
        let loss = SquaredReconstructionError;
        let e = 0.2;
        let h = 1e-6;
        let numeric = (loss.loss(e + h) - loss.loss(e - h)) / (2.0 * h);
        assert!((numeric - loss.derivative(e)).abs() < 1e-8);
    }
}
