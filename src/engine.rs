//! Two-tier segmentation: outlier rules first, cluster model for the rest

use crate::error::ClassificationError;
use crate::model::{self, ClusterModel};
use crate::outlier::{self, OutlierThresholds};
use crate::rfm::{self, CustomerProfile, Transaction};
use crate::rules::{self, DEFAULT_SEVERITY_MULTIPLIER};
use crate::segment::SegmentLabel;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which tier handles a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Outlier,
    Regular,
}

impl Route {
    pub fn of(profile: &CustomerProfile, thresholds: &OutlierThresholds) -> Self {
        if outlier::is_outlier(profile, thresholds) {
            Route::Outlier
        } else {
            Route::Regular
        }
    }
}

/// Result handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segmentation {
    #[serde(rename = "segment_label")]
    pub label: SegmentLabel,
    #[serde(rename = "insight_text")]
    pub insight: &'static str,
}

impl Segmentation {
    fn new(label: SegmentLabel) -> Self {
        Self {
            label,
            insight: label.insight(),
        }
    }
}

/// Classify one profile with the default 3x severity multiplier.
///
/// Outliers go through the rule-based tier, everyone else through the
/// cluster model; never both.
pub fn classify(
    profile: &CustomerProfile,
    thresholds: &OutlierThresholds,
    model: &ClusterModel,
) -> Result<Segmentation, ClassificationError> {
    classify_with(profile, thresholds, model, DEFAULT_SEVERITY_MULTIPLIER)
}

/// Classify one profile with an explicit severity multiplier for the rule tier.
pub fn classify_with(
    profile: &CustomerProfile,
    thresholds: &OutlierThresholds,
    model: &ClusterModel,
    severity_multiplier: f64,
) -> Result<Segmentation, ClassificationError> {
    profile.ensure_finite()?;

    let label = match Route::of(profile, thresholds) {
        Route::Outlier => {
            SegmentLabel::Outlier(rules::classify_outlier_with(profile, thresholds, severity_multiplier))
        }
        Route::Regular => SegmentLabel::Regular(model::predict(profile, model)?),
    };
    Ok(Segmentation::new(label))
}

/// Build a customer's profile from raw history, then classify it.
pub fn classify_history(
    customer_id: i64,
    transactions: &[Transaction],
    reference_time: DateTime<Utc>,
    thresholds: &OutlierThresholds,
    model: &ClusterModel,
) -> Result<Segmentation, ClassificationError> {
    let profile = rfm::build_profile(customer_id, transactions, reference_time)?;
    classify(&profile, thresholds, model)
}

/// Trained state shared read-only by every classification call.
///
/// Build once at startup and pass by reference (or inside an `Arc`).
#[derive(Debug, Clone, PartialEq)]
pub struct Segmenter {
    thresholds: OutlierThresholds,
    model: ClusterModel,
    severity_multiplier: f64,
}

impl Segmenter {
    pub fn new(thresholds: OutlierThresholds, model: ClusterModel) -> Self {
        Self {
            thresholds,
            model,
            severity_multiplier: DEFAULT_SEVERITY_MULTIPLIER,
        }
    }

    pub fn with_severity_multiplier(mut self, multiplier: f64) -> Self {
        self.severity_multiplier = multiplier;
        self
    }

    pub fn thresholds(&self) -> &OutlierThresholds {
        &self.thresholds
    }

    pub fn model(&self) -> &ClusterModel {
        &self.model
    }

    pub fn classify(&self, profile: &CustomerProfile) -> Result<Segmentation, ClassificationError> {
        classify_with(profile, &self.thresholds, &self.model, self.severity_multiplier)
    }

    pub fn classify_history(
        &self,
        customer_id: i64,
        transactions: &[Transaction],
        reference_time: DateTime<Utc>,
    ) -> Result<Segmentation, ClassificationError> {
        let profile = rfm::build_profile(customer_id, transactions, reference_time)?;
        self.classify(&profile)
    }
}
