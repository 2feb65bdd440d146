//! Data preprocessing for the training and inference paths.

pub mod normalize;

pub use normalize::{NormalizationStats, Normalizer};
