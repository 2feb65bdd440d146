//! Training loop orchestration.
//!
//! A [`Trainer`] combines a loss function and an optimizer and runs
//! mini-batch gradient descent over a [`Dataset`]. Built via
//! [`TrainerBuilder`], it is immutable and reusable across models.
//!
//! Each epoch shuffles the paired `(input, label)` samples (when
//! `shuffle` is on), partitions them into mini-batches, performs one
//! update per mini-batch and records the epoch mean loss. Between epochs
//! control returns to the caller through the observer callback, so a
//! caller can report progress; no two epochs or updates ever run
//! concurrently. A run, once started, continues to completion or a hard
//! failure; there is no mid-run cancel.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::ValuationError;
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::Optimizer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::marker::PhantomData;

/// Per-epoch progress handed to the observer callback.
#[derive(Clone, Copy, Debug)]
pub struct EpochReport {
    pub epoch: usize,
    pub mean_loss: f64,
}

/// Orchestrates the training loop for a [`TrainableModel`].
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) epochs: usize,
    pub(crate) batch_size: usize,
    pub(crate) shuffle: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<(M, P)>,
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults: `epochs` 25, `batch_size` 32, `shuffle` on, no seed,
/// `verbose` off.
pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    epochs: usize,
    batch_size: usize,
    shuffle: bool,
    seed: Option<u64>,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<(M, P)>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            epochs: 25,
            batch_size: 32,
            shuffle: true,
            seed: None,
            verbose: false,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fixes the shuffling RNG for reproducible runs.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// When on, prints the mean loss after every epoch.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            epochs: self.epochs,
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            seed: self.seed,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    /// Convenience constructor that starts the builder pattern.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = Tensor1D<B>,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Trains the model, returning the fitted model and the per-epoch
    /// mean loss history.
    ///
    /// # Errors
    /// [`ValuationError::InvalidTrainingConfig`] if `epochs == 0`,
    /// `batch_size == 0`, the dataset is empty, or its length is
    /// unknown. All checks run before any computation starts.
    pub fn fit<D>(&self, model: M, dataset: &D) -> Result<(M::Output, Vec<f64>), ValuationError>
    where
        D: Dataset,
    {
        self.fit_observed(model, dataset, |_| {})
    }

    /// Like [`Trainer::fit`], invoking `observer` after every epoch so
    /// the caller can track progress.
    pub fn fit_observed<D>(
        &self,
        mut model: M,
        dataset: &D,
        mut observer: impl FnMut(EpochReport),
    ) -> Result<(M::Output, Vec<f64>), ValuationError>
    where
        D: Dataset,
    {
        let n_total = dataset.len().ok_or_else(|| {
            ValuationError::InvalidTrainingConfig(
                "dataset length must be known for training".to_string(),
            )
        })?;
        if n_total == 0 {
            return Err(ValuationError::InvalidTrainingConfig(
                "training batch is empty".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ValuationError::InvalidTrainingConfig(
                "epochs must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ValuationError::InvalidTrainingConfig(
                "batch size must be positive".to_string(),
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices: Vec<usize> = (0..n_total).collect();
        let mut history = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            if self.shuffle {
                indices.shuffle(&mut rng);
            }

            let mut epoch_loss = 0.0;
            for chunk in indices.chunks(self.batch_size) {
                let (batch_x, batch_y) = dataset
                    .get_indexed::<B>(chunk)
                    .map_err(|e| ValuationError::DataSource(format!("batch load failed: {:?}", e)))?;

                let preds = model.forward(&batch_x);
                epoch_loss += self.loss_fn.loss(&preds, &batch_y).to_f64() * chunk.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let mean_loss = epoch_loss / n_total as f64;
            history.push(mean_loss);
            if self.verbose {
                println!("Epoch {}: loss = {:.6}", epoch, mean_loss);
            }
            observer(EpochReport { epoch, mean_loss });
        }

        Ok((model.into_fitted(), history))
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::dataset::InMemoryDataset;
    use crate::loss::MSELoss;
    use crate::model::mlp::MlpRegression;
    use crate::model::{InferenceModel, Unfitted};
    use crate::optimizer::SGD;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type CpuTrainer = Trainer<
        CpuBackend,
        MSELoss,
        SGD<CpuBackend>,
        MlpRegression<CpuBackend, Unfitted>,
        crate::model::mlp::MlpParams<CpuBackend>,
    >;

    fn toy_dataset() -> InMemoryDataset {
        // y = x, already inside [0, 1]
        let x: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32 / 7.0]).collect();
        let y: Vec<f32> = (0..8).map(|i| i as f32 / 7.0).collect();
        InMemoryDataset::new(x, y).unwrap()
    }

    type CpuBuilder = TrainerBuilder<
        CpuBackend,
        MSELoss,
        SGD<CpuBackend>,
        MlpRegression<CpuBackend, Unfitted>,
        crate::model::mlp::MlpParams<CpuBackend>,
    >;

    #[test]
    fn test_builder_defaults() {
        let builder: CpuBuilder = TrainerBuilder::new(MSELoss, SGD::new(0.01));
        assert_eq!(builder.epochs, 25);
        assert_eq!(builder.batch_size, 32);
        assert!(builder.shuffle);
        assert_eq!(builder.seed, None);
        assert!(!builder.verbose);
    }

    #[test]
    fn test_builder_chaining() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .epochs(50)
            .batch_size(4)
            .shuffle(false)
            .seed(Some(9))
            .verbose(false)
            .build();
        assert_eq!(trainer.epochs, 50);
        assert_eq!(trainer.batch_size, 4);
        assert!(!trainer.shuffle);
        assert_eq!(trainer.seed, Some(9));
    }

    #[test]
    fn test_fit_zero_epochs_rejected() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.1)).epochs(0).build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 4, &mut StdRng::seed_from_u64(1));
        let err = trainer.fit(model, &toy_dataset()).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidTrainingConfig(_)));
    }

    #[test]
    fn test_fit_zero_batch_size_rejected() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .batch_size(0)
            .build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 4, &mut StdRng::seed_from_u64(1));
        let err = trainer.fit(model, &toy_dataset()).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidTrainingConfig(_)));
    }

    #[test]
    fn test_fit_reduces_loss() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.2))
            .epochs(500)
            .batch_size(8)
            .seed(Some(42))
            .build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 8, &mut StdRng::seed_from_u64(42));
        let (_, history) = trainer.fit(model, &toy_dataset()).unwrap();

        assert_eq!(history.len(), 500);
        let first = history.first().unwrap();
        let last = history.last().unwrap();
        assert!(
            last < first,
            "expected loss to drop, first {} last {}",
            first,
            last
        );
        assert!(*last < 0.05, "final loss too high: {}", last);
    }

    #[test]
    fn test_fit_history_length_matches_epochs() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .epochs(7)
            .seed(Some(1))
            .build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 2, &mut StdRng::seed_from_u64(1));
        let (_, history) = trainer.fit(model, &toy_dataset()).unwrap();
        assert_eq!(history.len(), 7);
    }

    #[test]
    fn test_observer_called_per_epoch() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .epochs(5)
            .seed(Some(1))
            .build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 2, &mut StdRng::seed_from_u64(1));

        let mut seen = Vec::new();
        trainer
            .fit_observed(model, &toy_dataset(), |report| seen.push(report.epoch))
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_fit_without_shuffle_is_deterministic() {
        let make = || {
            let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.2))
                .epochs(20)
                .batch_size(4)
                .shuffle(false)
                .build();
            let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 4, &mut StdRng::seed_from_u64(5));
            trainer.fit(model, &toy_dataset()).unwrap()
        };
        let (model_a, history_a) = make();
        let (model_b, history_b) = make();
        assert_eq!(history_a, history_b);
        assert_eq!(
            model_a.extract_params().hidden_weights,
            model_b.extract_params().hidden_weights
        );
    }

    #[test]
    fn test_fitted_model_predicts_after_training() {
        let trainer: CpuTrainer = Trainer::builder(MSELoss, SGD::new(0.2))
            .epochs(800)
            .batch_size(8)
            .seed(Some(3))
            .build();
        let model = MlpRegression::<CpuBackend, Unfitted>::new(1, 8, &mut StdRng::seed_from_u64(3));
        let (fitted, _) = trainer.fit(model, &toy_dataset()).unwrap();

        let pred = fitted
            .predict(&crate::backend::Tensor1D::new(vec![0.5]))
            .to_f64();
        assert!((pred - 0.5).abs() < 0.2, "prediction {} far from 0.5", pred);
    }
}
