//! Command-line interface definitions and argument parsing

use crate::config::SegmentationConfig;
use crate::data::{parse_timestamp, DEFAULT_REFERENCE_DATE};
use crate::rfm::CustomerProfile;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

/// Two-tier RFM customer segmentation: outlier rules plus K-Means
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the transactions CSV file (training mode)
    #[arg(short, long, default_value = "data.csv")]
    pub input: PathBuf,

    /// Model artifact written by training and read by prediction
    #[arg(short, long, default_value = "segmentation_model.json")]
    pub model: PathBuf,

    /// Prediction mode: provide R,F,M values as comma-separated string
    /// Example: --predict "30,10,500.0" for Recency=30, Frequency=10, Monetary=500.0
    #[arg(short, long)]
    pub predict: Option<String>,

    /// Reference date for recency (RFC 3339 or YYYY-MM-DD)
    #[arg(long, default_value = DEFAULT_REFERENCE_DATE)]
    pub reference_date: String,

    /// JSON file with segmentation constants
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum iterations for K-Means algorithm
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Tolerance for K-Means convergence
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Seed for K-Means initialisation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the profile from the predict string
    /// Expected format: "recency,frequency,monetary"
    pub fn parse_rfm_values(&self) -> crate::Result<Option<CustomerProfile>> {
        let Some(ref predict_str) = self.predict else {
            return Ok(None);
        };

        let parts: Vec<&str> = predict_str.split(',').collect();
        if parts.len() != 3 {
            anyhow::bail!("Predict values must be in format 'recency,frequency,monetary'");
        }

        let recency: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid recency value (whole days): {}", parts[0]))?;
        let frequency: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid frequency value (invoice count): {}", parts[1]))?;
        let monetary: f64 = parts[2]
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid monetary value: {}", parts[2]))?;
        if !monetary.is_finite() {
            anyhow::bail!("Invalid monetary value: {}", parts[2]);
        }

        Ok(Some(CustomerProfile::from_rfm(recency, frequency, monetary)))
    }

    pub fn reference_time(&self) -> crate::Result<DateTime<Utc>> {
        parse_timestamp(&self.reference_date)
    }

    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> crate::Result<SegmentationConfig> {
        let mut config = match &self.config {
            Some(path) => SegmentationConfig::load(path)?,
            None => SegmentationConfig::default(),
        };

        if let Some(max_iters) = self.max_iters {
            config.kmeans.max_iterations = max_iters;
        }
        if let Some(tolerance) = self.tolerance {
            config.kmeans.tolerance = tolerance;
        }
        if let Some(seed) = self.seed {
            config.kmeans.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}
