//! Differentiable loss functions for model training.

use crate::backend::{Backend, Scalar, Tensor1D};

/// Trait for a differentiable loss.
///
/// A loss produces a scalar value for a prediction/target pair and the
/// gradient of that value with respect to the prediction, which the model
/// then backpropagates through its own parameters.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Loss value for the batch.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// Gradient of the loss with respect to the prediction.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean squared error: `L = mean((pred - target)^2)`.
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = prediction.sub(target);
        diff.dot(&diff) / Scalar::new(prediction.len() as f64)
    }

    /// `dL/dpred = 2 * (pred - target) / n`
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction {
        let n = prediction.len() as f64;
        prediction.sub(target).scale(&Scalar::new(2.0 / n))
    }
}
