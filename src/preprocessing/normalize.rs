//! Global min-max normalization.
//!
//! The transformation is given by:
//! ```text
//! x_scaled = (x - min) / (max - min)
//! ```
//! with a single global `min`/`max` over all elements of all input
//! vectors combined (not per column), and a second global pair over all
//! targets. The statistics are fitted once on the training batch and then
//! travel with the trained model; the inference path applies them, it
//! never refits. Refitting on a single sample would force `min == max`
//! and a zero denominator for every feature, which is exactly the failure
//! the fitted-statistics design rules out.
//!
//! If a fitted span is degenerate (`max == min`, e.g. a one-record batch
//! or a constant target), `fit` fails with
//! [`ValuationError::DegenerateRange`] instead of producing NaN.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::ValuationError;
use serde::{Deserialize, Serialize};

/// Fitted min-max statistics for one training run.
///
/// A plain value: cheap to copy, serialized alongside the model weights,
/// and owned by the trained model so the pair can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub input_min: f64,
    pub input_max: f64,
    pub label_min: f64,
    pub label_max: f64,
}

/// Fits [`NormalizationStats`] over a training batch.
pub struct Normalizer;

impl Normalizer {
    /// Computes global input and label min/max over the batch.
    ///
    /// # Errors
    /// - [`ValuationError::InvalidTrainingConfig`] on an empty batch.
    /// - [`ValuationError::DegenerateRange`] if either span has
    ///   `max == min`.
    pub fn fit<B: Backend>(
        inputs: &Tensor2D<B>,
        labels: &Tensor1D<B>,
    ) -> Result<NormalizationStats, ValuationError> {
        let (rows, _) = inputs.shape();
        if rows == 0 || labels.is_empty() {
            return Err(ValuationError::InvalidTrainingConfig(
                "cannot fit normalization statistics on an empty batch".to_string(),
            ));
        }

        let stats = NormalizationStats {
            input_min: inputs.min().to_f64(),
            input_max: inputs.max().to_f64(),
            label_min: labels.min().to_f64(),
            label_max: labels.max().to_f64(),
        };

        if stats.input_max == stats.input_min {
            return Err(ValuationError::DegenerateRange {
                min: stats.input_min,
                max: stats.input_max,
            });
        }
        if stats.label_max == stats.label_min {
            return Err(ValuationError::DegenerateRange {
                min: stats.label_min,
                max: stats.label_max,
            });
        }

        Ok(stats)
    }
}

impl NormalizationStats {
    fn input_span(&self) -> f64 {
        self.input_max - self.input_min
    }

    fn label_span(&self) -> f64 {
        self.label_max - self.label_min
    }

    /// Scales a feature matrix into `[0, 1]` relative to the fitted span.
    pub fn transform_inputs<B: Backend>(&self, x: &Tensor2D<B>) -> Tensor2D<B> {
        x.add_scalar(&Scalar::new(-self.input_min))
            .scale(&Scalar::new(1.0 / self.input_span()))
    }

    /// Scales a single feature vector with the same fitted span used at
    /// training time.
    pub fn transform_input_vec<B: Backend>(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        x.add_scalar(&Scalar::new(-self.input_min))
            .scale(&Scalar::new(1.0 / self.input_span()))
    }

    /// Scales a target vector into `[0, 1]`.
    pub fn transform_labels<B: Backend>(&self, y: &Tensor1D<B>) -> Tensor1D<B> {
        y.add_scalar(&Scalar::new(-self.label_min))
            .scale(&Scalar::new(1.0 / self.label_span()))
    }

    /// Maps a scaled feature matrix back to raw values.
    pub fn inverse_inputs<B: Backend>(&self, x: &Tensor2D<B>) -> Tensor2D<B> {
        x.scale(&Scalar::new(self.input_span()))
            .add_scalar(&Scalar::new(self.input_min))
    }

    /// Maps a scaled target vector back to raw values.
    pub fn inverse_labels<B: Backend>(&self, y: &Tensor1D<B>) -> Tensor1D<B> {
        y.scale(&Scalar::new(self.label_span()))
            .add_scalar(&Scalar::new(self.label_min))
    }

    /// Maps one scaled model output back to the raw value scale.
    pub fn inverse_label(&self, normalized: f64) -> f64 {
        normalized * self.label_span() + self.label_min
    }
}
