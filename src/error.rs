//! Error taxonomy for the segmentation engine

use crate::rfm::Feature;
use thiserror::Error;

/// Failures raised by the feature builder, outlier detector and cluster model.
///
/// Every variant is a deterministic function of the input data, so none of
/// them is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    #[error("customer {customer_id} has no transactions")]
    EmptyHistory { customer_id: i64 },

    #[error("need at least {required} profiles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("feature {feature} has zero variance")]
    DegenerateFeature { feature: Feature },

    #[error("customer {customer_id} has a transaction {days_ahead} day(s) after the reference time")]
    TransactionAfterReference { customer_id: i64, days_ahead: i64 },

    #[error("customer {customer_id} has a non-finite {feature} value")]
    InvalidProfile { customer_id: i64, feature: Feature },

    #[error("invalid cluster model: {reason}")]
    InvalidModel { reason: String },
}

/// Orchestrator-level failure wrapping the first underlying [`SegmentError`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("classification failed")]
pub struct ClassificationError {
    #[from]
    source: SegmentError,
}

impl ClassificationError {
    /// The failure that stopped classification
    pub fn cause(&self) -> &SegmentError {
        &self.source
    }
}

pub type SegmentResult<T> = std::result::Result<T, SegmentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_classification_error_exposes_source() {
        let err = ClassificationError::from(SegmentError::EmptyHistory { customer_id: 17850 });

        assert_eq!(
            err.cause(),
            &SegmentError::EmptyHistory { customer_id: 17850 }
        );
        let source = err.source().expect("wrapped error");
        assert_eq!(source.to_string(), "customer 17850 has no transactions");
    }

    #[test]
    fn test_degenerate_feature_message_names_feature() {
        let err = SegmentError::DegenerateFeature {
            feature: Feature::Recency,
        };
        assert_eq!(err.to_string(), "feature recency has zero variance");
    }
}
