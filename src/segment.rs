//! Segment labels and their recommendation text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels assigned by the rule-based tier, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutlierSegment {
    #[serde(rename = "High-Spender")]
    HighSpender,
    #[serde(rename = "Power-Shopper")]
    PowerShopper,
    #[serde(rename = "Elite-VIP")]
    EliteVip,
}

/// Labels assigned by the cluster model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegularSegment {
    Regular,
    Lapsed,
    Occasional,
    Premium,
}

impl RegularSegment {
    pub const ALL: [RegularSegment; 4] = [
        RegularSegment::Regular,
        RegularSegment::Lapsed,
        RegularSegment::Occasional,
        RegularSegment::Premium,
    ];
}

/// The segment of one customer. The two tiers never share a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentLabel {
    Outlier(OutlierSegment),
    Regular(RegularSegment),
}

impl SegmentLabel {
    pub const ALL: [SegmentLabel; 7] = [
        SegmentLabel::Outlier(OutlierSegment::HighSpender),
        SegmentLabel::Outlier(OutlierSegment::PowerShopper),
        SegmentLabel::Outlier(OutlierSegment::EliteVip),
        SegmentLabel::Regular(RegularSegment::Regular),
        SegmentLabel::Regular(RegularSegment::Lapsed),
        SegmentLabel::Regular(RegularSegment::Occasional),
        SegmentLabel::Regular(RegularSegment::Premium),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentLabel::Outlier(OutlierSegment::HighSpender) => "High-Spender",
            SegmentLabel::Outlier(OutlierSegment::PowerShopper) => "Power-Shopper",
            SegmentLabel::Outlier(OutlierSegment::EliteVip) => "Elite-VIP",
            SegmentLabel::Regular(RegularSegment::Regular) => "Regular",
            SegmentLabel::Regular(RegularSegment::Lapsed) => "Lapsed",
            SegmentLabel::Regular(RegularSegment::Occasional) => "Occasional",
            SegmentLabel::Regular(RegularSegment::Premium) => "Premium",
        }
    }

    pub fn is_outlier(&self) -> bool {
        matches!(self, SegmentLabel::Outlier(_))
    }

    /// Static recommendation shown next to the label
    pub fn insight(&self) -> &'static str {
        match self {
            SegmentLabel::Outlier(OutlierSegment::HighSpender) => {
                "Big spender: offer premium products, bundles and personal service to protect basket size."
            }
            SegmentLabel::Outlier(OutlierSegment::PowerShopper) => {
                "Very active buyer: reward purchase frequency with loyalty points and early access."
            }
            SegmentLabel::Outlier(OutlierSegment::EliteVip) => {
                "VIP customer: assign a dedicated account contact and invite to exclusive programs."
            }
            SegmentLabel::Regular(RegularSegment::Regular) => {
                "Steady customer with moderate buying: keep engaged with relevant recommendations."
            }
            SegmentLabel::Regular(RegularSegment::Lapsed) => {
                "Inactive customer: run a win-back campaign with a time-limited incentive."
            }
            SegmentLabel::Regular(RegularSegment::Occasional) => {
                "Infrequent, low-spend buyer: nudge with seasonal promotions to build a habit."
            }
            SegmentLabel::Regular(RegularSegment::Premium) => {
                "Recent, consistent buyer: upsell higher-tier products and encourage referrals."
            }
        }
    }
}

impl From<OutlierSegment> for SegmentLabel {
    fn from(segment: OutlierSegment) -> Self {
        SegmentLabel::Outlier(segment)
    }
}

impl From<RegularSegment> for SegmentLabel {
    fn from(segment: RegularSegment) -> Self {
        SegmentLabel::Regular(segment)
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for OutlierSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SegmentLabel::from(*self).fmt(f)
    }
}

impl fmt::Display for RegularSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SegmentLabel::from(*self).fmt(f)
    }
}
