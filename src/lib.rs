//! rfmseg: two-tier customer segmentation on RFM (Recency, Frequency, Monetary) features
//!
//! Customers whose Frequency or Monetary value lies above an IQR fence are
//! labelled by ordered threshold rules; everyone else is labelled by the
//! nearest centroid of a K-Means model trained on the regular population.
//! Classification is a pure function of the profile, the thresholds and the
//! model.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod model;
pub mod outlier;
pub mod pipeline;
pub mod rfm;
pub mod rules;
pub mod segment;

// Re-export public items for easier access
pub use artifact::SegmentationArtifact;
pub use cli::Args;
pub use config::SegmentationConfig;
pub use data::load_transactions;
pub use engine::{classify, classify_history, Route, Segmentation, Segmenter};
pub use error::{ClassificationError, SegmentError};
pub use model::{fit, predict, ClusterModel, KMeansParams, ScalerParams};
pub use outlier::{compute_thresholds, is_outlier, OutlierThresholds};
pub use rfm::{build_profile, build_profiles, CustomerProfile, Feature, Transaction};
pub use rules::classify_outlier;
pub use segment::{OutlierSegment, RegularSegment, SegmentLabel};

/// Result type for the application shell (loading, artifacts, CLI)
pub type Result<T> = anyhow::Result<T>;
