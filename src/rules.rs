//! Rule-based tiering for customers flagged as outliers

use crate::outlier::OutlierThresholds;
use crate::rfm::CustomerProfile;
use crate::segment::OutlierSegment;

/// Default multiple of an upper bound that promotes an outlier to a stronger tier
pub const DEFAULT_SEVERITY_MULTIPLIER: f64 = 3.0;

/// Classify an outlier with the default 3x severity multiplier.
pub fn classify_outlier(profile: &CustomerProfile, thresholds: &OutlierThresholds) -> OutlierSegment {
    classify_outlier_with(profile, thresholds, DEFAULT_SEVERITY_MULTIPLIER)
}

/// Classify an outlier. Rules are evaluated top to bottom, first match wins:
///
/// 1. Monetary >= multiplier * monetary bound  -> Elite-VIP
/// 2. Frequency >= multiplier * frequency bound -> Power-Shopper
/// 3. anything else                             -> High-Spender
///
/// Only meaningful for profiles that [`crate::outlier::is_outlier`] flagged.
pub fn classify_outlier_with(
    profile: &CustomerProfile,
    thresholds: &OutlierThresholds,
    multiplier: f64,
) -> OutlierSegment {
    if profile.monetary >= multiplier * thresholds.monetary_upper_bound {
        OutlierSegment::EliteVip
    } else if profile.frequency as f64 >= multiplier * thresholds.frequency_upper_bound {
        OutlierSegment::PowerShopper
    } else {
        OutlierSegment::HighSpender
    }
}
