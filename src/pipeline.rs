//! End-to-end valuation workflow.
//!
//! [`ValuationPipeline`] wires the stages together: load and clean
//! records, encode them into fixed-order feature vectors, fit
//! normalization statistics, train the network, and hold the result in
//! the single active model slot. [`TrainedModel`] couples the fitted
//! network with the statistics that were in effect when it was trained;
//! the two always travel together, because a model without its fitted
//! statistics cannot produce a correctly scaled prediction.
//!
//! Each stage is a scope: intermediate tensors are owned by the stage
//! that creates them and dropped when it returns, on success and on
//! error alike. Only the declared outputs (statistics, fitted
//! parameters, loss history) are moved out.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::data::encoder::{encode, encode_batch, FEATURE_COUNT};
use crate::data::loader::HousingRecords;
use crate::data::records::HouseRecord;
use crate::dataset::InMemoryDataset;
use crate::error::ValuationError;
use crate::loss::MSELoss;
use crate::model::mlp::{MlpRegression, SerializableMlpParams};
use crate::model::{Fitted, InferenceModel, Unfitted};
use crate::preprocessing::{NormalizationStats, Normalizer};
use crate::serialization::ModelDocument;
use crate::trainer::{EpochReport, Trainer};
use crate::optimizer::SGD;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyperparameters for one training run. All fields have defaults.
#[derive(Clone, Debug)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub hidden_units: usize,
    pub shuffle: bool,
    /// Fixes weight initialization and shuffling for reproducible runs.
    pub seed: Option<u64>,
    /// Print per-epoch loss to stdout.
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 25,
            batch_size: 32,
            learning_rate: 0.01,
            hidden_units: 128,
            shuffle: true,
            seed: None,
            verbose: false,
        }
    }
}

/// A fitted network together with the normalization statistics fitted in
/// the same training run.
pub struct TrainedModel<B: Backend> {
    model: MlpRegression<B, Fitted>,
    stats: NormalizationStats,
}

impl<B: Backend> std::fmt::Debug for TrainedModel<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("model", &self.model)
            .field("stats", &self.stats)
            .finish()
    }
}

/// On-disk form of a trained model: plain parameters plus statistics.
#[derive(Serialize, Deserialize)]
struct TrainedModelSnapshot {
    params: SerializableMlpParams,
    stats: NormalizationStats,
}

impl<B: Backend> TrainedModel<B> {
    pub fn new(model: MlpRegression<B, Fitted>, stats: NormalizationStats) -> Self {
        Self { model, stats }
    }

    pub fn model(&self) -> &MlpRegression<B, Fitted> {
        &self.model
    }

    /// The statistics fitted on this model's training batch.
    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    /// Predicts a raw market value from raw feature values.
    ///
    /// The input must contain exactly [`FEATURE_COUNT`] finite values in
    /// the documented feature order. The vector is scaled with the
    /// statistics stored in this model (never refitted), run through the
    /// network, and the output is mapped back to the raw value scale.
    /// The normalized output is clamped into `[0, 1]` first, so the
    /// returned value always lies within the fitted label range.
    ///
    /// # Errors
    /// [`ValuationError::FeatureCountMismatch`] if the input is not
    /// exactly `FEATURE_COUNT` well-formed numbers.
    pub fn predict_raw(&self, features: &[f64]) -> Result<f64, ValuationError> {
        let well_formed = features.iter().filter(|v| v.is_finite()).count();
        if features.len() != FEATURE_COUNT || well_formed != FEATURE_COUNT {
            // Report the raw length when it is wrong, otherwise the count
            // of fields that actually parsed as finite numbers.
            let got = if features.len() != FEATURE_COUNT {
                features.len()
            } else {
                well_formed
            };
            return Err(ValuationError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                got,
            });
        }

        let raw = Tensor1D::<B>::new(features.iter().map(|&v| v as f32).collect());
        let normalized = self.stats.transform_input_vec(&raw);
        let output = self.model.predict(&normalized).to_f64();
        Ok(self.stats.inverse_label(output.clamp(0.0, 1.0)))
    }

    /// Convenience: encodes a validated record and predicts its value.
    pub fn predict_record(&self, record: &HouseRecord) -> Result<f64, ValuationError> {
        let (features, _) = encode(record);
        self.predict_raw(&features)
    }

    /// Builds the portable export document for this model.
    pub fn document(&self) -> ModelDocument {
        ModelDocument::from_trained(self)
    }

    /// Writes a compact binary snapshot (parameters + statistics).
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ValuationError> {
        let snapshot = TrainedModelSnapshot {
            params: self.model.extract_params(),
            stats: self.stats,
        };
        let bytes = bincode::serialize(&snapshot)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Restores a model from a binary snapshot.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ValuationError> {
        let bytes = std::fs::read(path)?;
        let snapshot: TrainedModelSnapshot = bincode::deserialize(&bytes)?;
        Ok(Self {
            model: MlpRegression::<B, Fitted>::from_params(snapshot.params)?,
            stats: snapshot.stats,
        })
    }
}

/// The valuation workflow facade.
///
/// Holds the configuration and the single active [`TrainedModel`] slot.
/// The slot is replaced only after a training run fully completes; a
/// failed run leaves any previous model in place.
pub struct ValuationPipeline<B: Backend> {
    config: TrainingConfig,
    trained: Option<TrainedModel<B>>,
}

impl<B: Backend> Default for ValuationPipeline<B> {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl<B: Backend> ValuationPipeline<B> {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            trained: None,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// The current model, if a training run has completed.
    pub fn trained_model(&self) -> Option<&TrainedModel<B>> {
        self.trained.as_ref()
    }

    /// Loads records from a JSON source and trains on them.
    ///
    /// # Errors
    /// [`ValuationError::DataSource`] if the source is unreachable or
    /// malformed; any training error from [`Self::run_training`].
    pub fn run_training_from_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Vec<f64>, ValuationError> {
        let loaded = HousingRecords::load(path)?;
        self.run_training(loaded.records())
    }

    /// Trains a fresh model on the given records and, on success, swaps
    /// it into the model slot. Returns the per-epoch loss history.
    pub fn run_training(&mut self, records: &[HouseRecord]) -> Result<Vec<f64>, ValuationError> {
        self.run_training_observed(records, |_| {})
    }

    /// Like [`Self::run_training`], invoking `observer` between epochs.
    pub fn run_training_observed(
        &mut self,
        records: &[HouseRecord],
        observer: impl FnMut(EpochReport),
    ) -> Result<Vec<f64>, ValuationError> {
        if records.is_empty() {
            return Err(ValuationError::InvalidTrainingConfig(
                "training requires at least one valid record".to_string(),
            ));
        }

        // Stage 1: encode and fit statistics. The raw tensors do not
        // outlive this block.
        let (stats, normalized_rows, normalized_targets) = {
            let (features, targets) = encode_batch(records);
            let inputs = Tensor2D::<B>::from_rows(&features);
            let labels = Tensor1D::<B>::new(targets);
            let stats = Normalizer::fit(&inputs, &labels)?;
            let normalized_inputs = stats.transform_inputs(&inputs);
            let normalized_labels = stats.transform_labels(&labels);
            let rows = normalized_inputs.to_rows();
            let targets: Vec<f32> = normalized_labels
                .to_vec()
                .into_iter()
                .map(|v| v as f32)
                .collect();
            (stats, rows, targets)
        };

        // Stage 2: train on the normalized batch.
        let (fitted, history) = {
            let dataset = InMemoryDataset::new(normalized_rows, normalized_targets)
                .map_err(ValuationError::InvalidTrainingConfig)?;

            let mut init_rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let model = MlpRegression::<B, Unfitted>::new(
                FEATURE_COUNT,
                self.config.hidden_units,
                &mut init_rng,
            );

            let trainer = Trainer::builder(MSELoss, SGD::new(self.config.learning_rate))
                .epochs(self.config.epochs)
                .batch_size(self.config.batch_size)
                .shuffle(self.config.shuffle)
                .seed(self.config.seed)
                .verbose(self.config.verbose)
                .build();

            trainer.fit_observed(model, &dataset, observer)?
        };

        // The slot is replaced only now, after the run fully succeeded.
        self.trained = Some(TrainedModel::new(fitted, stats));
        Ok(history)
    }

    /// Predicts a raw market value for one raw feature vector.
    ///
    /// # Errors
    /// [`ValuationError::ModelNotTrained`] before the first successful
    /// training run; [`ValuationError::FeatureCountMismatch`] for a
    /// malformed input.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ValuationError> {
        self.trained
            .as_ref()
            .ok_or(ValuationError::ModelNotTrained)?
            .predict_raw(features)
    }

    /// Builds the export document for the current model.
    ///
    /// # Errors
    /// [`ValuationError::ModelNotTrained`] if no model is available.
    pub fn export_model(&self) -> Result<ModelDocument, ValuationError> {
        Ok(self
            .trained
            .as_ref()
            .ok_or(ValuationError::ModelNotTrained)?
            .document())
    }
}

/// Convenient alias for the CPU-backed pipeline.
#[cfg(feature = "cpu")]
pub type Valuator = ValuationPipeline<crate::backend::CpuBackend>;
