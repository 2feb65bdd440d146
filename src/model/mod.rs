//! Models with compile-time training-state safety.
//!
//! A model's training state is encoded in the type system: a trainable
//! model (state [`Unfitted`]) exposes forward/backward and parameter
//! updates, while a fitted model (state [`Fitted`]) exposes only
//! prediction and serialization. Calling `predict` on a model that was
//! never trained is a compile error, not a runtime check.

pub mod mlp;

use crate::backend::{Backend, Scalar};
use crate::error::ValuationError;

/// Marker type for a model that is **not yet trained**.
pub struct Unfitted;

/// Marker type for a model that has been **fully trained**.
///
/// A `Fitted` model contains only inference parameters: no optimizer
/// state, loss function, or training hyperparameters.
pub struct Fitted;

/// Training interface: forward pass, gradient computation and parameter
/// updates. Consumed by the trainer; converted into the inference-only
/// form with [`TrainableModel::into_fitted`] when training completes.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss with respect to the parameters, given the
    /// gradient of the loss with respect to the forward output.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic over a parameter set, enabling any optimizer to step any
/// model whose parameters implement it.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

/// Inference interface of a fitted model.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain-data parameter representation for serialization.
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    /// Extracts parameters as a serializable plain-data representation.
    fn extract_params(&self) -> Self::ParamsRepr;

    /// Reconstructs a fitted model from a parameter representation.
    fn from_params(params: Self::ParamsRepr) -> Result<Self, ValuationError>
    where
        Self: Sized;
}
