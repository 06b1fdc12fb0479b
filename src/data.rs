//! Transaction loading from Online-Retail style CSV files using Polars

use crate::rfm::Transaction;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::path::Path;

/// Reference date for recency when none is given
pub const DEFAULT_REFERENCE_DATE: &str = "2011-12-09T00:00:00Z";

/// Naive layouts accepted for `InvoiceDate`, tried after RFC 3339
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Load transactions from an Online-Retail style CSV
///
/// # Arguments
/// * `file_path` - CSV with `InvoiceNo, Quantity, InvoiceDate, UnitPrice, CustomerID` (other columns ignored)
///
/// # Returns
/// * One `Transaction` per invoice line that carries a customer id
///
/// Rows without a `CustomerID` are dropped. Negative quantities (returns) are
/// kept so monetary totals stay net of refunds.
pub fn load_transactions(file_path: &Path) -> crate::Result<Vec<Transaction>> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
        .finish()?;
    let total_rows = raw.height();

    let df = raw
        .lazy()
        .filter(col("CustomerID").is_not_null())
        .collect()?;

    let dropped = total_rows - df.height();
    if dropped > 0 {
        log::debug!("dropped {dropped} rows without CustomerID");
    }
    if df.height() == 0 {
        anyhow::bail!("No rows with a CustomerID in {}", file_path.display());
    }

    let transactions = frame_to_transactions(&df)?;
    log::info!(
        "loaded {} transactions from {}",
        transactions.len(),
        file_path.display()
    );
    Ok(transactions)
}

fn frame_to_transactions(df: &DataFrame) -> crate::Result<Vec<Transaction>> {
    let customer_ids = df.column("CustomerID")?.cast(&DataType::Int64)?;
    let invoices = df.column("InvoiceNo")?.cast(&DataType::String)?;
    let dates = df.column("InvoiceDate")?.cast(&DataType::String)?;
    let quantities = df.column("Quantity")?.cast(&DataType::Int64)?;
    let prices = df.column("UnitPrice")?.cast(&DataType::Float64)?;

    let rows = customer_ids
        .i64()?
        .into_iter()
        .zip(invoices.str()?)
        .zip(dates.str()?)
        .zip(quantities.i64()?)
        .zip(prices.f64()?);

    let mut transactions = Vec::with_capacity(df.height());
    for (row, ((((customer_id, invoice), date), quantity), price)) in rows.enumerate() {
        let (Some(customer_id), Some(invoice), Some(date), Some(quantity), Some(price)) =
            (customer_id, invoice, date, quantity, price)
        else {
            anyhow::bail!("Row {} has a missing or malformed field", row + 1);
        };

        transactions.push(Transaction {
            customer_id,
            timestamp: parse_timestamp(date)?,
            invoice_id: invoice.to_string(),
            item_quantity: quantity,
            unit_price: price,
        });
    }

    Ok(transactions)
}

/// Parse an invoice or reference timestamp as UTC.
///
/// Accepts RFC 3339, the naive layouts in [`DATE_TIME_FORMATS`], and a bare
/// `YYYY-MM-DD` date (midnight).
pub fn parse_timestamp(value: &str) -> crate::Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    anyhow::bail!("Unrecognized timestamp: {value}")
}
