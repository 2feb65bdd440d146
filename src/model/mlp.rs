//! Feed-forward regression network.
//!
//! Fixed topology: one hidden dense layer with rectified-linear
//! activation feeding a single linear output unit. The input dimension
//! and hidden unit count are set at construction; there is no
//! architecture search. State is tracked at the type level:
//! [`MlpRegression<B, Unfitted>`] trains, [`MlpRegression<B, Fitted>`]
//! predicts and serializes.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::ValuationError;
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of the network.
///
/// `hidden_weights` has shape `(n_inputs, n_hidden)` so the batch forward
/// pass is a plain `X @ W` with no transpose.
#[derive(Clone)]
pub struct MlpParams<B: Backend> {
    pub hidden_weights: Tensor2D<B>,
    pub hidden_bias: Tensor1D<B>,
    pub output_weights: Tensor1D<B>,
    pub output_bias: Scalar<B>,
}

impl<B: Backend> ParamOps<B> for MlpParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            hidden_weights: self.hidden_weights.add(&other.hidden_weights),
            hidden_bias: self.hidden_bias.add(&other.hidden_bias),
            output_weights: self.output_weights.add(&other.output_weights),
            output_bias: self.output_bias + other.output_bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            hidden_weights: self.hidden_weights.scale(&scalar),
            hidden_bias: self.hidden_bias.scale(&scalar),
            output_weights: self.output_weights.scale(&scalar),
            output_bias: self.output_bias * scalar,
        }
    }
}

/// Serializable representation of the network parameters.
///
/// Plain `f32` vectors only; backend tensors never cross the
/// serialization boundary.
#[derive(Clone, Serialize, Deserialize)]
pub struct SerializableMlpParams {
    pub n_inputs: usize,
    pub n_hidden: usize,
    /// Row-major `(n_inputs, n_hidden)`.
    pub hidden_weights: Vec<f32>,
    pub hidden_bias: Vec<f32>,
    pub output_weights: Vec<f32>,
    pub output_bias: f32,
}

impl<B: Backend> From<&MlpParams<B>> for SerializableMlpParams {
    fn from(params: &MlpParams<B>) -> Self {
        let (n_inputs, n_hidden) = params.hidden_weights.shape();
        Self {
            n_inputs,
            n_hidden,
            hidden_weights: params
                .hidden_weights
                .ravel()
                .to_vec()
                .into_iter()
                .map(|x| x as f32)
                .collect(),
            hidden_bias: params
                .hidden_bias
                .to_vec()
                .into_iter()
                .map(|x| x as f32)
                .collect(),
            output_weights: params
                .output_weights
                .to_vec()
                .into_iter()
                .map(|x| x as f32)
                .collect(),
            output_bias: params.output_bias.to_f64() as f32,
        }
    }
}

impl<B: Backend> TryFrom<SerializableMlpParams> for MlpParams<B> {
    type Error = ValuationError;

    fn try_from(value: SerializableMlpParams) -> Result<Self, Self::Error> {
        if value.hidden_weights.len() != value.n_inputs * value.n_hidden {
            return Err(ValuationError::Serialization(format!(
                "hidden weight count {} does not match declared shape ({}, {})",
                value.hidden_weights.len(),
                value.n_inputs,
                value.n_hidden
            )));
        }
        if value.hidden_bias.len() != value.n_hidden
            || value.output_weights.len() != value.n_hidden
        {
            return Err(ValuationError::Serialization(format!(
                "bias or output weight count does not match {} hidden units",
                value.n_hidden
            )));
        }
        Ok(Self {
            hidden_weights: Tensor2D::new(value.hidden_weights, value.n_inputs, value.n_hidden),
            hidden_bias: Tensor1D::new(value.hidden_bias),
            output_weights: Tensor1D::new(value.output_weights),
            output_bias: Scalar::new(value.output_bias as f64),
        })
    }
}

/// The regression network, with training state as a type parameter.
pub struct MlpRegression<B: Backend, S> {
    params: MlpParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> std::fmt::Debug for MlpRegression<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (n_inputs, n_hidden) = self.params.hidden_weights.shape();
        f.debug_struct("MlpRegression")
            .field("n_inputs", &n_inputs)
            .field("n_hidden", &n_hidden)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> MlpRegression<B, Unfitted> {
    /// Creates an untrained network with Glorot-uniform random weights
    /// and zero biases.
    pub fn new(n_inputs: usize, n_hidden: usize, rng: &mut impl Rng) -> Self {
        let hidden_limit = (6.0 / (n_inputs + n_hidden) as f64).sqrt();
        let output_limit = (6.0 / (n_hidden + 1) as f64).sqrt();

        let hidden_weights: Vec<f32> = (0..n_inputs * n_hidden)
            .map(|_| rng.gen_range(-hidden_limit..hidden_limit) as f32)
            .collect();
        let output_weights: Vec<f32> = (0..n_hidden)
            .map(|_| rng.gen_range(-output_limit..output_limit) as f32)
            .collect();

        Self {
            params: MlpParams {
                hidden_weights: Tensor2D::new(hidden_weights, n_inputs, n_hidden),
                hidden_bias: Tensor1D::zeros(n_hidden),
                output_weights: Tensor1D::new(output_weights),
                output_bias: Scalar::new(0.0),
            },
            _state: PhantomData,
        }
    }

    /// Constructs a model from explicit parameters, for testing or a
    /// warm start.
    pub fn from_params(params: MlpParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl<B: Backend> MlpRegression<B, Fitted> {
    /// Wraps trained parameters as an inference-only model. Typically
    /// reached via [`TrainableModel::into_fitted`].
    pub fn new(params: MlpParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    /// Number of input features the network expects.
    pub fn n_inputs(&self) -> usize {
        self.params.hidden_weights.shape().0
    }

    /// Hidden layer width.
    pub fn n_hidden(&self) -> usize {
        self.params.hidden_weights.shape().1
    }
}

impl<B: Backend> TrainableModel<B> for MlpRegression<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor1D<B>;
    type Params = MlpParams<B>;
    type Gradients = MlpParams<B>;
    type Output = MlpRegression<B, Fitted>;

    /// `y = relu(X @ W1 + b1) @ w2 + b2`
    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        let hidden = x
            .matmul(&self.params.hidden_weights)
            .broadcast_add_rows(&self.params.hidden_bias)
            .relu();
        hidden
            .matvec(&self.params.output_weights)
            .add_scalar(&self.params.output_bias)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        // The pre-activation is recomputed rather than cached; the model
        // stays stateless between forward and backward.
        let pre = x
            .matmul(&self.params.hidden_weights)
            .broadcast_add_rows(&self.params.hidden_bias);
        let hidden = pre.relu();

        let grad_output_weights = hidden.tdot(grad_output);
        let grad_output_bias = grad_output.sum();

        let grad_hidden = grad_output.outer(&self.params.output_weights);
        let grad_pre = grad_hidden.mul(&pre.relu_mask());

        let grad_hidden_weights = x.transpose().matmul(&grad_pre);
        let grad_hidden_bias = grad_pre.col_sum();

        MlpParams {
            hidden_weights: grad_hidden_weights,
            hidden_bias: grad_hidden_bias,
            output_weights: grad_output_weights,
            output_bias: grad_output_bias,
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, new_params: &Self::Params) {
        self.params = new_params.clone();
    }

    fn into_fitted(self) -> Self::Output {
        MlpRegression::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> InferenceModel<B> for MlpRegression<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = Scalar<B>;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableMlpParams;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        let hidden = self
            .params
            .hidden_weights
            .tdot(input)
            .add(&self.params.hidden_bias)
            .relu();
        hidden.dot(&self.params.output_weights) + self.params.output_bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        let hidden = input
            .matmul(&self.params.hidden_weights)
            .broadcast_add_rows(&self.params.hidden_bias)
            .relu();
        hidden
            .matvec(&self.params.output_weights)
            .add_scalar(&self.params.output_bias)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ValuationError> {
        Ok(Self::new(MlpParams::try_from(params)?))
    }
}

/// Convenient alias for a CPU-backed untrained network.
#[cfg(feature = "cpu")]
pub type MlpRegressor = MlpRegression<crate::backend::CpuBackend, Unfitted>;
