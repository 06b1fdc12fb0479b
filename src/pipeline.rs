//! Training pipeline: transactions in, thresholds and cluster model out

use crate::artifact::SegmentationArtifact;
use crate::config::SegmentationConfig;
use crate::engine::Segmenter;
use crate::error::SegmentError;
use crate::model::{self, FitReport};
use crate::outlier::{self, OutlierThresholds};
use crate::rfm::{self, CustomerProfile, Transaction};
use crate::segment::SegmentLabel;
use chrono::{DateTime, Utc};

/// Everything a training run produced
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub profiles: Vec<CustomerProfile>,
    /// `None` when the batch was too small for quartiles
    pub thresholds: Option<OutlierThresholds>,
    /// Number of profiles routed to the rule tier
    pub outlier_count: usize,
    pub fit: FitReport,
    /// Label counts over the whole batch, in [`SegmentLabel::ALL`] order
    pub label_counts: Vec<(SegmentLabel, usize)>,
    severity_multiplier: f64,
}

impl TrainingReport {
    pub fn regular_count(&self) -> usize {
        self.profiles.len() - self.outlier_count
    }

    pub fn to_artifact(&self) -> SegmentationArtifact {
        SegmentationArtifact::new(
            self.thresholds,
            self.severity_multiplier,
            self.fit.model.clone(),
        )
    }

    pub fn segmenter(&self) -> Segmenter {
        self.to_artifact().into_segmenter()
    }
}

/// Train on a transaction batch.
///
/// Thresholds come from the whole batch; the cluster model is fit on the
/// profiles that are not outliers. A batch too small for quartiles disables
/// the outlier tier and trains on everyone.
pub fn train(
    transactions: &[Transaction],
    reference_time: DateTime<Utc>,
    config: &SegmentationConfig,
) -> crate::Result<TrainingReport> {
    let profiles = rfm::build_profiles(transactions, reference_time)?;
    log::info!("built {} customer profiles", profiles.len());
    train_on_profiles(profiles, config)
}

/// Train on precomputed profiles.
pub fn train_on_profiles(
    profiles: Vec<CustomerProfile>,
    config: &SegmentationConfig,
) -> crate::Result<TrainingReport> {
    config.validate()?;

    let thresholds = match outlier::compute_thresholds_with(&profiles, config.iqr_multiplier) {
        Ok(thresholds) => {
            log::info!(
                "outlier bounds: frequency > {:.2}, monetary > {:.2}",
                thresholds.frequency_upper_bound,
                thresholds.monetary_upper_bound
            );
            Some(thresholds)
        }
        Err(SegmentError::InsufficientData { required, actual }) => {
            log::warn!(
                "only {actual} profiles (need {required}) for quartiles; treating all customers as regular"
            );
            None
        }
        Err(e) => return Err(e.into()),
    };
    let effective = thresholds.unwrap_or_else(OutlierThresholds::disabled);

    let regulars: Vec<CustomerProfile> = profiles
        .iter()
        .filter(|p| !outlier::is_outlier(p, &effective))
        .cloned()
        .collect();
    let outlier_count = profiles.len() - regulars.len();
    log::info!(
        "{} regular customers, {} outliers",
        regulars.len(),
        outlier_count
    );

    let fit = model::fit_with_report(&regulars, &config.kmeans)?;
    if fit.converged {
        log::debug!("k-means converged after {} iterations", fit.iterations);
    } else {
        log::warn!(
            "k-means hit the iteration cap ({}) before converging",
            fit.iterations
        );
    }

    let mut report = TrainingReport {
        profiles,
        thresholds,
        outlier_count,
        fit,
        label_counts: Vec::new(),
        severity_multiplier: config.severity_multiplier,
    };
    report.label_counts = count_labels(&report.segmenter(), &report.profiles)?;
    Ok(report)
}

fn count_labels(
    segmenter: &Segmenter,
    profiles: &[CustomerProfile],
) -> crate::Result<Vec<(SegmentLabel, usize)>> {
    let mut counts = [0usize; SegmentLabel::ALL.len()];
    for profile in profiles {
        let label = segmenter.classify(profile)?.label;
        if let Some(slot) = SegmentLabel::ALL.iter().position(|l| *l == label) {
            counts[slot] += 1;
        }
    }
    Ok(SegmentLabel::ALL.iter().copied().zip(counts).collect())
}
