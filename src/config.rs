//! Segmentation constants, loadable from a JSON file

use crate::model::KMeansParams;
use crate::outlier::DEFAULT_IQR_MULTIPLIER;
use crate::rules::DEFAULT_SEVERITY_MULTIPLIER;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable constants of the segmentation engine.
///
/// Every field is optional in the JSON form; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Multiplier `k` in the fence `Q3 + k * IQR`
    pub iqr_multiplier: f64,
    /// Multiple of an outlier bound that promotes to a stronger tier
    pub severity_multiplier: f64,
    pub kmeans: KMeansParams,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            severity_multiplier: DEFAULT_SEVERITY_MULTIPLIER,
            kmeans: KMeansParams::default(),
        }
    }
}

impl SegmentationConfig {
    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier >= 0.0) {
            anyhow::bail!("iqr_multiplier must be a non-negative number");
        }
        if !(self.severity_multiplier.is_finite() && self.severity_multiplier >= 1.0) {
            anyhow::bail!("severity_multiplier must be at least 1");
        }
        if self.kmeans.max_iterations == 0 {
            anyhow::bail!("kmeans.max_iterations must be positive");
        }
        if self.kmeans.n_runs == 0 {
            anyhow::bail!("kmeans.n_runs must be positive");
        }
        if !(self.kmeans.tolerance.is_finite() && self.kmeans.tolerance >= 0.0) {
            anyhow::bail!("kmeans.tolerance must be a non-negative number");
        }
        Ok(())
    }
}
