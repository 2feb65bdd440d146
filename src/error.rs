//! Error types for the valuation pipeline.

use std::fmt;

/// Error type covering every fatal failure in the pipeline.
///
/// Per-record validation failures during loading are not represented here:
/// a record that fails validation is dropped by the loader and never
/// surfaces as an error.
#[derive(Debug)]
pub enum ValuationError {
    /// The record source is unreachable or not a well-formed JSON array.
    /// Fatal to a training run, never retried.
    DataSource(String),
    /// Training was requested with an unusable configuration or batch
    /// (zero epochs, zero batch size, empty data). Raised before any
    /// computation starts.
    InvalidTrainingConfig(String),
    /// A normalization span has `max == min`, so the scaling denominator
    /// would be zero. Raised at fit time instead of producing NaN.
    DegenerateRange { min: f64, max: f64 },
    /// A prediction was requested before any training run completed.
    ModelNotTrained,
    /// A raw prediction input did not contain exactly the expected number
    /// of well-formed (finite) numeric fields.
    FeatureCountMismatch { expected: usize, got: usize },
    /// Serialization or deserialization of model state failed.
    Serialization(String),
    /// I/O error during file operations.
    Io(String),
}

impl fmt::Display for ValuationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuationError::DataSource(msg) => {
                write!(f, "Data source error: {}", msg)
            }
            ValuationError::InvalidTrainingConfig(msg) => {
                write!(f, "Invalid training configuration: {}", msg)
            }
            ValuationError::DegenerateRange { min, max } => {
                write!(
                    f,
                    "Degenerate normalization range: min = {}, max = {}",
                    min, max
                )
            }
            ValuationError::ModelNotTrained => {
                write!(f, "No trained model is available yet")
            }
            ValuationError::FeatureCountMismatch { expected, got } => {
                write!(
                    f,
                    "Feature count mismatch: expected {} numeric fields, got {}",
                    expected, got
                )
            }
            ValuationError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ValuationError::Io(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValuationError {}

impl From<std::io::Error> for ValuationError {
    fn from(err: std::io::Error) -> Self {
        ValuationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ValuationError {
    fn from(err: serde_json::Error) -> Self {
        ValuationError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for ValuationError {
    fn from(err: bincode::Error) -> Self {
        ValuationError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_data_source() {
        let err = ValuationError::DataSource("connection refused".to_string());
        assert!(err.to_string().contains("Data source error"));
    }

    #[test]
    fn test_display_invalid_training_config() {
        let err = ValuationError::InvalidTrainingConfig("epochs must be positive".to_string());
        assert!(err.to_string().contains("Invalid training configuration"));
    }

    #[test]
    fn test_display_degenerate_range() {
        let err = ValuationError::DegenerateRange { min: 5.0, max: 5.0 };
        let msg = err.to_string();
        assert!(msg.contains("Degenerate normalization range"));
        assert!(msg.contains("5"));
    }

    #[test]
    fn test_display_model_not_trained() {
        let err = ValuationError::ModelNotTrained;
        assert!(err.to_string().contains("No trained model"));
    }

    #[test]
    fn test_display_feature_count_mismatch() {
        let err = ValuationError::FeatureCountMismatch {
            expected: 9,
            got: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 9"));
        assert!(msg.contains("got 8"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ValuationError = io_err.into();
        assert!(matches!(err, ValuationError::Io(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ValuationError = json_err.into();
        assert!(matches!(err, ValuationError::Serialization(_)));
    }

    #[test]
    fn test_is_std_error() {
        let err = ValuationError::ModelNotTrained;
        let _: &dyn std::error::Error = &err;
    }
}
