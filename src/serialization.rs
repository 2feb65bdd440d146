//! Portable model export and import.
//!
//! The export document is self-describing JSON: an ordered architecture
//! section (unit count and activation per layer), a weights section with
//! per-layer numeric arrays, and the normalization statistics fitted in
//! the same training run. A model reconstructed from its own document
//! produces the same predictions as the original, so the document is a
//! complete unit of exchange, not just a weight dump.

use crate::backend::Backend;
use crate::error::ValuationError;
use crate::model::mlp::{MlpRegression, SerializableMlpParams};
use crate::model::{Fitted, InferenceModel};
use crate::pipeline::TrainedModel;
use crate::preprocessing::NormalizationStats;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Activation kind of one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
}

/// One entry of the ordered architecture section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: Activation,
}

/// Parameter arrays of one dense layer, row-major `(rows, cols)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f32>,
    pub bias: Vec<f32>,
}

/// Self-describing export of a trained model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelDocument {
    pub input_dim: usize,
    pub architecture: Vec<LayerSpec>,
    pub weights: Vec<LayerWeights>,
    pub normalization: NormalizationStats,
}

impl ModelDocument {
    /// Captures a trained model as a document.
    pub fn from_trained<B: Backend>(trained: &TrainedModel<B>) -> Self {
        let params = trained.model().extract_params();
        Self {
            input_dim: params.n_inputs,
            architecture: vec![
                LayerSpec {
                    units: params.n_hidden,
                    activation: Activation::Relu,
                },
                LayerSpec {
                    units: 1,
                    activation: Activation::Linear,
                },
            ],
            weights: vec![
                LayerWeights {
                    rows: params.n_inputs,
                    cols: params.n_hidden,
                    values: params.hidden_weights,
                    bias: params.hidden_bias,
                },
                LayerWeights {
                    rows: params.n_hidden,
                    cols: 1,
                    values: params.output_weights,
                    bias: vec![params.output_bias],
                },
            ],
            normalization: *trained.stats(),
        }
    }

    /// Reconstructs an equivalent trained model from the document.
    ///
    /// # Errors
    /// [`ValuationError::Serialization`] if the architecture or weight
    /// shapes do not describe the supported topology (one rectified
    /// hidden layer feeding one linear output unit).
    pub fn into_trained_model<B: Backend>(self) -> Result<TrainedModel<B>, ValuationError> {
        let expected = [Activation::Relu, Activation::Linear];
        let activations: Vec<Activation> =
            self.architecture.iter().map(|l| l.activation).collect();
        if activations != expected || self.weights.len() != 2 {
            return Err(ValuationError::Serialization(
                "document does not describe a hidden-relu plus linear-output network".to_string(),
            ));
        }

        let [hidden, output] = <[LayerWeights; 2]>::try_from(self.weights).map_err(|_| {
            ValuationError::Serialization("expected exactly two weight layers".to_string())
        })?;

        if self.architecture[0].units != hidden.cols || output.bias.len() != 1 {
            return Err(ValuationError::Serialization(
                "weight shapes disagree with the architecture section".to_string(),
            ));
        }

        let params = SerializableMlpParams {
            n_inputs: hidden.rows,
            n_hidden: hidden.cols,
            hidden_weights: hidden.values,
            hidden_bias: hidden.bias,
            output_weights: output.values,
            output_bias: output.bias[0],
        };

        let model = MlpRegression::<B, Fitted>::from_params(params)?;
        Ok(TrainedModel::new(model, self.normalization))
    }

    pub fn to_json(&self) -> Result<String, ValuationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ValuationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the document as a single JSON artifact.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ValuationError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ValuationError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Scalar, Tensor1D, Tensor2D};
    use crate::model::mlp::MlpParams;
    use crate::model::{TrainableModel, Unfitted};

    fn trained_fixture() -> TrainedModel<CpuBackend> {
        let params = MlpParams {
            hidden_weights: Tensor2D::new(
                vec![0.5, -0.25, 1.0, 0.75, -0.5, 0.1], 3, 2,
            ),
            hidden_bias: Tensor1D::new(vec![0.1, -0.1]),
            output_weights: Tensor1D::new(vec![1.5, 0.5]),
            output_bias: Scalar::new(0.2),
        };
        let model = MlpRegression::<CpuBackend, Unfitted>::from_params(params).into_fitted();
        let stats = NormalizationStats {
            input_min: -1.0,
            input_max: 3.0,
            label_min: 100.0,
            label_max: 500.0,
        };
        TrainedModel::new(model, stats)
    }

    #[test]
    fn test_document_structure() {
        let doc = ModelDocument::from_trained(&trained_fixture());
        assert_eq!(doc.input_dim, 3);
        assert_eq!(doc.architecture.len(), 2);
        assert_eq!(doc.architecture[0].units, 2);
        assert_eq!(doc.architecture[0].activation, Activation::Relu);
        assert_eq!(doc.architecture[1].units, 1);
        assert_eq!(doc.architecture[1].activation, Activation::Linear);
        assert_eq!(doc.weights[0].values.len(), 6);
        assert_eq!(doc.weights[1].bias.len(), 1);
        assert_eq!(doc.normalization.label_max, 500.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = ModelDocument::from_trained(&trained_fixture());
        let json = doc.to_json().unwrap();
        let restored = ModelDocument::from_json(&json).unwrap();
        assert_eq!(doc.weights, restored.weights);
        assert_eq!(doc.architecture, restored.architecture);
        assert_eq!(doc.normalization, restored.normalization);
    }

    #[test]
    fn test_reimport_preserves_predictions() {
        let trained = trained_fixture();
        let doc = ModelDocument::from_trained(&trained);
        let restored = doc.into_trained_model::<CpuBackend>().unwrap();

        // Compare the raw network outputs for identical normalized inputs.
        for input in [
            vec![0.0f32, 0.6, 0.9],
            vec![0.25, 0.5, 0.75],
            vec![1.0, 0.0, 0.3],
        ] {
            let x = Tensor1D::<CpuBackend>::new(input);
            let a = trained.model().predict(&x).to_f64();
            let b = restored.model().predict(&x).to_f64();
            assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let doc = ModelDocument::from_trained(&trained_fixture());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        doc.write_to_file(&path).unwrap();

        let restored = ModelDocument::read_from_file(&path).unwrap();
        assert_eq!(doc.weights, restored.weights);
    }

    #[test]
    fn test_reject_wrong_activation_order() {
        let mut doc = ModelDocument::from_trained(&trained_fixture());
        doc.architecture[0].activation = Activation::Linear;
        let err = doc.into_trained_model::<CpuBackend>().unwrap_err();
        assert!(matches!(err, ValuationError::Serialization(_)));
    }

    #[test]
    fn test_reject_inconsistent_shapes() {
        let mut doc = ModelDocument::from_trained(&trained_fixture());
        doc.weights[0].values.pop();
        let err = doc.into_trained_model::<CpuBackend>().unwrap_err();
        assert!(matches!(err, ValuationError::Serialization(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ModelDocument::from_json("{\"input_dim\": }").unwrap_err();
        assert!(matches!(err, ValuationError::Serialization(_)));
    }
}
