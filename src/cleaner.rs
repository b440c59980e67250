use std::collections::HashSet;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::MISSING_SENTINEL;
use crate::error::Result;
use crate::types::{Order, Payment, RawOrder, RawPayment};

/// Stable identity for exact-duplicate detection: a SHA-256 digest over
/// the row's canonical JSON form.
pub fn row_signature<T: Serialize>(row: &T) -> Result<String> {
    let canonical = serde_json::to_string(row)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Removes exact full-row duplicates, keeping the first occurrence and
/// preserving the order of the survivors.
pub fn dedup_rows<T: Serialize>(rows: Vec<T>) -> Result<Vec<T>> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row_signature(&row)?) {
            kept.push(row);
        }
    }
    Ok(kept)
}

fn fill(cell: Option<String>) -> String {
    cell.unwrap_or_else(|| MISSING_SENTINEL.to_string())
}

/// Fills every blank order cell with the sentinel. Row count is
/// unchanged. A blank purchase timestamp has no textual slot to fill
/// and stays unset; period derivation skips such rows later.
pub fn fill_missing_orders(orders: Vec<RawOrder>) -> Vec<Order> {
    orders
        .into_iter()
        .map(|raw| Order {
            order_id: fill(raw.order_id),
            order_status: fill(raw.order_status),
            customer_id: fill(raw.customer_id),
            order_purchase_timestamp: raw.order_purchase_timestamp,
        })
        .collect()
}

/// Drops any payment row with a blank cell in any column.
pub fn drop_missing_payments(payments: Vec<RawPayment>) -> Vec<Payment> {
    let before = payments.len();
    let kept: Vec<Payment> = payments
        .into_iter()
        .filter_map(|raw| {
            match (
                raw.order_id,
                raw.payment_type,
                raw.payment_value,
                raw.payment_installments,
            ) {
                (Some(order_id), Some(payment_type), Some(payment_value), Some(installments)) => {
                    Some(Payment {
                        order_id,
                        payment_type,
                        payment_value,
                        payment_installments: installments,
                    })
                }
                _ => None,
            }
        })
        .collect();
    if kept.len() < before {
        debug!("dropped {} payment rows with blank cells", before - kept.len());
    }
    kept
}

/// Cleans orders: sentinel fill, then exact-duplicate removal.
pub fn clean_orders(orders: Vec<RawOrder>) -> Result<Vec<Order>> {
    dedup_rows(fill_missing_orders(orders))
}

/// Cleans payments: blank-row drop, then exact-duplicate removal.
pub fn clean_payments(payments: Vec<RawPayment>) -> Result<Vec<Payment>> {
    dedup_rows(drop_missing_payments(payments))
}
