//! JSON artifact holding everything prediction needs: thresholds, rules and model

use crate::engine::Segmenter;
use crate::model::ClusterModel;
use crate::outlier::OutlierThresholds;
use crate::rules::DEFAULT_SEVERITY_MULTIPLIER;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Artifact format revision
pub const ARTIFACT_VERSION: u32 = 1;

/// Serialized output of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationArtifact {
    pub version: u32,
    /// `None` when training had too little data for quartiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<OutlierThresholds>,
    #[serde(default = "default_severity_multiplier")]
    pub severity_multiplier: f64,
    pub model: ClusterModel,
}

fn default_severity_multiplier() -> f64 {
    DEFAULT_SEVERITY_MULTIPLIER
}

impl SegmentationArtifact {
    pub fn new(
        thresholds: Option<OutlierThresholds>,
        severity_multiplier: f64,
        model: ClusterModel,
    ) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            thresholds,
            severity_multiplier,
            model,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate an artifact
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let artifact: Self = serde_json::from_str(json)?;
        if artifact.version != ARTIFACT_VERSION {
            anyhow::bail!(
                "Unsupported artifact version {} (expected {})",
                artifact.version,
                ARTIFACT_VERSION
            );
        }
        artifact.model.validate()?;
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| anyhow::anyhow!("Cannot write {}: {e}", path.display()))
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid artifact {}: {e}", path.display()))
    }

    /// Thresholds to classify with; missing thresholds disable the outlier tier
    pub fn effective_thresholds(&self) -> OutlierThresholds {
        self.thresholds.unwrap_or_else(OutlierThresholds::disabled)
    }

    pub fn into_segmenter(self) -> Segmenter {
        Segmenter::new(self.effective_thresholds(), self.model)
            .with_severity_multiplier(self.severity_multiplier)
    }
}
