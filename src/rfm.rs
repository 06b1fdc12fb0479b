//! RFM (Recency, Frequency, Monetary) feature derivation from transactions

use crate::error::{SegmentError, SegmentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single invoice line. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub customer_id: i64,
    pub timestamp: DateTime<Utc>,
    pub invoice_id: String,
    /// Negative for returned items
    pub item_quantity: i64,
    pub unit_price: f64,
}

impl Transaction {
    /// Quantity times unit price; negative for returns
    pub fn line_total(&self) -> f64 {
        self.item_quantity as f64 * self.unit_price
    }
}

/// The three RFM features, in the column order used everywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Recency,
    Frequency,
    Monetary,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Recency, Feature::Frequency, Feature::Monetary];

    /// Column index in a feature vector
    pub fn index(self) -> usize {
        match self {
            Feature::Recency => 0,
            Feature::Frequency => 1,
            Feature::Monetary => 2,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Recency => "recency",
            Feature::Frequency => "frequency",
            Feature::Monetary => "monetary",
        };
        f.pad(name)
    }
}

/// Per-customer RFM summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: i64,
    /// Whole days since the last transaction
    pub recency: u32,
    /// Distinct invoices
    pub frequency: u32,
    /// Net spend, returns included
    pub monetary: f64,
}

impl CustomerProfile {
    /// Profile for an ad-hoc request that has no transaction history behind it
    pub fn from_rfm(recency: u32, frequency: u32, monetary: f64) -> Self {
        Self {
            customer_id: 0,
            recency,
            frequency,
            monetary,
        }
    }

    /// Features as `[recency, frequency, monetary]`
    pub fn features(&self) -> [f64; 3] {
        [self.recency as f64, self.frequency as f64, self.monetary]
    }

    pub(crate) fn ensure_finite(&self) -> SegmentResult<()> {
        if self.monetary.is_finite() {
            Ok(())
        } else {
            Err(SegmentError::InvalidProfile {
                customer_id: self.customer_id,
                feature: Feature::Monetary,
            })
        }
    }
}

/// Build the profile of one customer from a transaction sequence.
///
/// Only transactions carrying `customer_id` are considered. Recency is
/// measured in whole days (truncated) from the last transaction to
/// `reference_time`.
pub fn build_profile(
    customer_id: i64,
    transactions: &[Transaction],
    reference_time: DateTime<Utc>,
) -> SegmentResult<CustomerProfile> {
    let history: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.customer_id == customer_id)
        .collect();
    summarize(customer_id, &history, reference_time)
}

/// Build one profile per distinct customer, ordered by customer id.
pub fn build_profiles(
    transactions: &[Transaction],
    reference_time: DateTime<Utc>,
) -> SegmentResult<Vec<CustomerProfile>> {
    let mut by_customer: BTreeMap<i64, Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions {
        by_customer
            .entry(transaction.customer_id)
            .or_default()
            .push(transaction);
    }

    by_customer
        .into_iter()
        .map(|(customer_id, history)| summarize(customer_id, &history, reference_time))
        .collect()
}

fn summarize(
    customer_id: i64,
    history: &[&Transaction],
    reference_time: DateTime<Utc>,
) -> SegmentResult<CustomerProfile> {
    let last_purchase = history
        .iter()
        .map(|t| t.timestamp)
        .max()
        .ok_or(SegmentError::EmptyHistory { customer_id })?;

    let elapsed = reference_time - last_purchase;
    if elapsed < chrono::Duration::zero() {
        // Round partial days up so a purchase one hour ahead still reports 1
        let ahead = last_purchase - reference_time;
        let days_ahead = ahead.num_days()
            + i64::from(ahead > chrono::Duration::days(ahead.num_days()));
        return Err(SegmentError::TransactionAfterReference {
            customer_id,
            days_ahead,
        });
    }
    let recency = u32::try_from(elapsed.num_days()).unwrap_or(u32::MAX);

    let invoices: HashSet<&str> = history.iter().map(|t| t.invoice_id.as_str()).collect();
    let frequency = u32::try_from(invoices.len()).unwrap_or(u32::MAX);

    let monetary = history.iter().map(|t| t.line_total()).sum();

    Ok(CustomerProfile {
        customer_id,
        recency,
        frequency,
        monetary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2011, 12, day, hour, 0, 0).unwrap()
    }

    fn txn(customer_id: i64, timestamp: DateTime<Utc>, invoice: &str, qty: i64, price: f64) -> Transaction {
        Transaction {
            customer_id,
            timestamp,
            invoice_id: invoice.to_string(),
            item_quantity: qty,
            unit_price: price,
        }
    }

    #[test]
    fn test_build_profile() {
        let transactions = vec![
            txn(17850, at(1, 8), "536365", 6, 2.55),
            txn(17850, at(1, 8), "536365", 6, 3.39),
            txn(17850, at(4, 9), "536366", 6, 1.85),
            txn(13047, at(5, 10), "536367", 8, 2.75),
        ];

        let profile = build_profile(17850, &transactions, at(9, 0)).unwrap();

        assert_eq!(profile.customer_id, 17850);
        // Dec 4 09:00 -> Dec 9 00:00 is 4 days 15 hours
        assert_eq!(profile.recency, 4);
        assert_eq!(profile.frequency, 2);
        assert!((profile.monetary - (15.3 + 20.34 + 11.1)).abs() < 1e-9);
    }

    #[test]
    fn test_returns_reduce_monetary() {
        let transactions = vec![
            txn(1, at(1, 8), "A1", 10, 5.0),
            txn(1, at(2, 8), "C2", -4, 5.0),
        ];

        let profile = build_profile(1, &transactions, at(9, 0)).unwrap();

        assert_eq!(profile.frequency, 2);
        assert_eq!(profile.monetary, 30.0);
    }

    #[test]
    fn test_net_negative_monetary_is_kept() {
        let transactions = vec![txn(1, at(1, 8), "C1", -2, 7.5)];

        let profile = build_profile(1, &transactions, at(9, 0)).unwrap();

        assert_eq!(profile.monetary, -15.0);
    }

    #[test]
    fn test_empty_history() {
        let transactions = vec![txn(2, at(1, 8), "A1", 1, 1.0)];

        assert_eq!(
            build_profile(1, &transactions, at(9, 0)),
            Err(SegmentError::EmptyHistory { customer_id: 1 })
        );
        assert_eq!(
            build_profile(1, &[], at(9, 0)),
            Err(SegmentError::EmptyHistory { customer_id: 1 })
        );
    }

    #[test]
    fn test_same_day_purchase_has_zero_recency() {
        let transactions = vec![txn(1, at(9, 0), "A1", 1, 1.0)];

        let profile = build_profile(1, &transactions, at(9, 23)).unwrap();

        assert_eq!(profile.recency, 0);
    }

    #[test]
    fn test_transaction_after_reference() {
        let transactions = vec![txn(1, at(9, 1), "A1", 1, 1.0)];

        assert_eq!(
            build_profile(1, &transactions, at(9, 0)),
            Err(SegmentError::TransactionAfterReference {
                customer_id: 1,
                days_ahead: 1
            })
        );
    }

    #[test]
    fn test_build_profiles_groups_by_customer() {
        let transactions = vec![
            txn(30, at(1, 8), "A1", 1, 10.0),
            txn(10, at(2, 8), "A2", 2, 10.0),
            txn(30, at(3, 8), "A3", 3, 10.0),
            txn(20, at(4, 8), "A4", 4, 10.0),
        ];

        let profiles = build_profiles(&transactions, at(9, 0)).unwrap();

        let ids: Vec<i64> = profiles.iter().map(|p| p.customer_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(profiles[2].frequency, 2);
        assert_eq!(profiles[2].recency, 5);
        assert_eq!(profiles[2].monetary, 40.0);
    }

    #[test]
    fn test_feature_order() {
        let profile = CustomerProfile::from_rfm(5, 12, 5000.0);
        assert_eq!(profile.features(), [5.0, 12.0, 5000.0]);
        for feature in Feature::ALL {
            assert_eq!(Feature::ALL[feature.index()], feature);
        }
    }
}
