//! # valuenet
//!
//! A small feed-forward regression library that predicts a property's
//! market value from numeric and categorical attributes, with strict
//! separation between the training and inference phases.
//!
//! ## Core Design Principles
//!
//! - **Stateful type safety**: models carry their training state in the
//!   type system (`Unfitted` vs `Fitted`), so an untrained network cannot
//!   be asked for predictions at compile time. The workflow-level slot
//!   adds the runtime counterpart: [`pipeline::ValuationPipeline`] answers
//!   `ModelNotTrained` until a run has completed.
//! - **Statistics travel with the model**: min-max normalization is
//!   fitted once per training run and owned by the resulting
//!   [`pipeline::TrainedModel`]. The inference path applies the stored
//!   statistics and has no way to refit them, which rules out the classic
//!   single-sample renormalization bug (`min == max`, zero denominator).
//! - **Backend agnosticism**: an abstract [`backend::Backend`] trait
//!   separates the math from the storage, with a pure-Rust CPU backend by
//!   default and an `ndarray`-backed one behind a feature flag.
//!
//! ## Quick Start
//!
//! ```rust
//! use valuenet::data::{HouseRecord, OceanProximity};
//! use valuenet::pipeline::{TrainingConfig, Valuator};
//!
//! let record = |value: f64, income: f64, proximity| HouseRecord {
//!     longitude: -122.2, latitude: 37.8, housing_median_age: 30.0,
//!     total_rooms: 1500.0, total_bedrooms: 300.0, population: 800.0,
//!     households: 280.0, median_income: income,
//!     median_house_value: value, proximity,
//! };
//! let records = vec![
//!     record(150000.0, 2.5, OceanProximity::Inland),
//!     record(350000.0, 6.0, OceanProximity::NearBay),
//!     record(250000.0, 4.0, OceanProximity::NearOcean),
//! ];
//!
//! let mut pipeline = Valuator::new(TrainingConfig {
//!     epochs: 10,
//!     hidden_units: 8,
//!     seed: Some(1),
//!     ..TrainingConfig::default()
//! });
//! let loss_history = pipeline.run_training(&records).unwrap();
//! assert_eq!(loss_history.len(), 10);
//!
//! // Raw features in the documented order; the last entry is the
//! // proximity code.
//! let value = pipeline
//!     .predict_one(&[-122.2, 37.8, 30.0, 1500.0, 300.0, 800.0, 280.0, 3.0, 2.0])
//!     .unwrap();
//! assert!((150000.0..=350000.0).contains(&value));
//! ```
//!
//! ## Module Structure
//!
//! - `backend` — tensor abstractions and computation primitives
//! - `data` — record validation, source loading, feature encoding
//! - `dataset` — batch access for the training loop
//! - `preprocessing` — global min-max normalization
//! - `loss` — differentiable loss functions
//! - `model` — the regression network with typestate safety
//! - `optimizer` — parameter update rules
//! - `trainer` — mini-batch training loop orchestration
//! - `pipeline` — the end-to-end workflow and the trained-model slot
//! - `serialization` — portable model export and import

pub mod backend;

/// Record validation, source loading and feature encoding.
pub mod data;

/// Dataset abstractions feeding the training loop.
pub mod dataset;

/// Error types.
pub mod error;

/// Differentiable loss functions.
pub mod loss;

/// Models with compile-time training-state safety.
pub mod model;

/// Optimization algorithms.
pub mod optimizer;

/// End-to-end training and prediction workflow.
pub mod pipeline;

/// Global min-max normalization.
pub mod preprocessing;

/// Portable model export and import.
pub mod serialization;

/// Training loop orchestration.
pub mod trainer;

pub use backend::{Backend, Scalar, Tensor1D, Tensor2D};
#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
pub use data::{encode, HouseRecord, HousingRecords, OceanProximity, FEATURE_COUNT};
pub use error::ValuationError;
pub use pipeline::{TrainedModel, TrainingConfig, ValuationPipeline};
pub use preprocessing::{NormalizationStats, Normalizer};
pub use serialization::ModelDocument;
