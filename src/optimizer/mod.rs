//! Optimization algorithms for parameter updates.

use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;
use std::marker::PhantomData;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is decoupled from the parameter update
/// rule, so any model whose parameters implement [`ParamOps`] can be
/// paired with any optimizer without dynamic dispatch.
pub trait Optimizer<B: Backend, P> {
    /// Performs one update step and returns the new parameters.
    ///
    /// Inputs are not mutated; the trainer swaps the returned value in.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic gradient descent: `θ ← θ − η · ∇L(θ)`.
///
/// Stateless by design. Momentum or adaptive learning-rate schemes
/// belong in separate optimizers.
#[derive(Clone)]
pub struct SGD<B: Backend> {
    lr: f64,
    _backend: PhantomData<B>,
}

impl<B: Backend> SGD<B> {
    /// Creates an SGD optimizer with the given learning rate.
    pub fn new(lr: f64) -> Self {
        Self {
            lr,
            _backend: PhantomData,
        }
    }

    /// Returns the learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for SGD<B> {
    fn step(&self, params: &P, gradients: &P) -> P {
        params.add(&gradients.scale(Scalar::new(-self.lr)))
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D, Tensor2D};
    use crate::model::mlp::MlpParams;

    fn params(w: f64, b: f64) -> MlpParams<CpuBackend> {
        MlpParams {
            hidden_weights: Tensor2D::new(vec![w as f32], 1, 1),
            hidden_bias: Tensor1D::new(vec![b as f32]),
            output_weights: Tensor1D::new(vec![w as f32]),
            output_bias: Scalar::new(b),
        }
    }

    #[test]
    fn test_sgd_learning_rate_accessor() {
        let sgd = SGD::<CpuBackend>::new(0.01);
        assert_eq!(sgd.learning_rate(), 0.01);
    }

    #[test]
    fn test_sgd_step_moves_against_gradient() {
        let sgd = SGD::<CpuBackend>::new(0.1);
        let updated = sgd.step(&params(2.0, 1.0), &params(1.0, -1.0));

        // w: 2.0 - 0.1*1.0 = 1.9; b: 1.0 - 0.1*(-1.0) = 1.1
        assert!((updated.hidden_weights.ravel().to_vec()[0] - 1.9).abs() < 1e-9);
        assert!((updated.hidden_bias.to_vec()[0] - 1.1).abs() < 1e-9);
        assert!((updated.output_weights.to_vec()[0] - 1.9).abs() < 1e-9);
        assert!((updated.output_bias.to_f64() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_sgd_step_zero_gradient_is_identity() {
        let sgd = SGD::<CpuBackend>::new(0.5);
        let p = params(3.0, -2.0);
        let updated = sgd.step(&p, &params(0.0, 0.0));
        assert_eq!(
            updated.hidden_weights.ravel().to_vec(),
            p.hidden_weights.ravel().to_vec()
        );
        assert_eq!(updated.output_bias.to_f64(), p.output_bias.to_f64());
    }
}
