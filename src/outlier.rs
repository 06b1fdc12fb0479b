//! IQR-based outlier thresholds on Frequency and Monetary

use crate::error::{SegmentError, SegmentResult};
use crate::rfm::CustomerProfile;
use serde::{Deserialize, Serialize};

/// Quartiles are meaningless below this population size
pub const MIN_PROFILES: usize = 4;

/// Default Tukey fence multiplier
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Upper fences computed over a reference population.
///
/// Replaced wholesale whenever the reference population changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierThresholds {
    pub frequency_upper_bound: f64,
    pub monetary_upper_bound: f64,
}

impl OutlierThresholds {
    pub fn new(frequency_upper_bound: f64, monetary_upper_bound: f64) -> Self {
        Self {
            frequency_upper_bound,
            monetary_upper_bound,
        }
    }

    /// Thresholds no profile can exceed, routing everyone to the cluster model.
    ///
    /// This is the fallback when [`compute_thresholds`] reports too little data.
    pub fn disabled() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY)
    }

    pub fn is_disabled(&self) -> bool {
        self.frequency_upper_bound == f64::INFINITY && self.monetary_upper_bound == f64::INFINITY
    }
}

/// Compute upper fences `Q3 + 1.5 * IQR` for Frequency and Monetary.
pub fn compute_thresholds(profiles: &[CustomerProfile]) -> SegmentResult<OutlierThresholds> {
    compute_thresholds_with(profiles, DEFAULT_IQR_MULTIPLIER)
}

/// Compute upper fences `Q3 + multiplier * IQR` for Frequency and Monetary.
///
/// Recency does not take part in outlier detection.
pub fn compute_thresholds_with(
    profiles: &[CustomerProfile],
    multiplier: f64,
) -> SegmentResult<OutlierThresholds> {
    if profiles.len() < MIN_PROFILES {
        return Err(SegmentError::InsufficientData {
            required: MIN_PROFILES,
            actual: profiles.len(),
        });
    }
    for profile in profiles {
        profile.ensure_finite()?;
    }

    let frequency: Vec<f64> = profiles.iter().map(|p| p.frequency as f64).collect();
    let monetary: Vec<f64> = profiles.iter().map(|p| p.monetary).collect();

    Ok(OutlierThresholds {
        frequency_upper_bound: upper_fence(frequency, multiplier),
        monetary_upper_bound: upper_fence(monetary, multiplier),
    })
}

/// A profile is an outlier when it dominates on either axis.
pub fn is_outlier(profile: &CustomerProfile, thresholds: &OutlierThresholds) -> bool {
    profile.frequency as f64 > thresholds.frequency_upper_bound
        || profile.monetary > thresholds.monetary_upper_bound
}

fn upper_fence(mut values: Vec<f64>, multiplier: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&values, 0.25);
    let q3 = quantile_sorted(&values, 0.75);
    q3 + multiplier * (q3 - q1)
}

/// Linear interpolation between closest ranks over already-sorted values.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(frequency: u32, monetary: f64) -> CustomerProfile {
        CustomerProfile {
            customer_id: 1,
            recency: 10,
            frequency,
            monetary,
        }
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.25), 1.75);
        assert_eq!(quantile_sorted(&values, 0.5), 2.5);
        assert_eq!(quantile_sorted(&values, 0.75), 3.25);
        assert_eq!(quantile_sorted(&[7.0, 9.0, 11.0, 13.0, 15.0], 0.75), 13.0);
    }

    #[test]
    fn test_compute_thresholds() {
        let profiles = vec![
            profile(1, 100.0),
            profile(2, 200.0),
            profile(3, 300.0),
            profile(4, 400.0),
        ];

        let thresholds = compute_thresholds(&profiles).unwrap();

        // Q1 = 1.75, Q3 = 3.25, IQR = 1.5
        assert_eq!(thresholds.frequency_upper_bound, 3.25 + 1.5 * 1.5);
        // Q1 = 175, Q3 = 325, IQR = 150
        assert_eq!(thresholds.monetary_upper_bound, 325.0 + 1.5 * 150.0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward: Vec<CustomerProfile> =
            (1..=9).map(|i| profile(i, i as f64 * 37.5)).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            compute_thresholds(&forward).unwrap(),
            compute_thresholds(&reversed).unwrap()
        );
    }

    #[test]
    fn test_insufficient_data() {
        let profiles = vec![profile(1, 1.0), profile(2, 2.0), profile(3, 3.0)];

        assert_eq!(
            compute_thresholds(&profiles),
            Err(SegmentError::InsufficientData {
                required: 4,
                actual: 3
            })
        );
        assert!(compute_thresholds(&[]).is_err());
    }

    #[test]
    fn test_custom_multiplier() {
        let profiles: Vec<CustomerProfile> = (1..=4).map(|i| profile(i, i as f64)).collect();

        let thresholds = compute_thresholds_with(&profiles, 3.0).unwrap();

        assert_eq!(thresholds.frequency_upper_bound, 3.25 + 3.0 * 1.5);
    }

    #[test]
    fn test_is_outlier_uses_either_axis() {
        let thresholds = OutlierThresholds::new(11.0, 3799.39);

        assert!(!is_outlier(&profile(11, 3799.39), &thresholds));
        assert!(is_outlier(&profile(12, 10.0), &thresholds));
        assert!(is_outlier(&profile(1, 3800.0), &thresholds));
        assert!(is_outlier(&profile(40, 9000.0), &thresholds));
    }

    #[test]
    fn test_disabled_thresholds_flag_nobody() {
        let thresholds = OutlierThresholds::disabled();

        assert!(thresholds.is_disabled());
        assert!(!is_outlier(&profile(u32::MAX, f64::MAX), &thresholds));
    }
}
