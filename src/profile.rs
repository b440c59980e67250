use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::cleaner::row_signature;
use crate::error::Result;
use crate::types::{Customer, RawOrder, RawPayment};

/// Row count, blank cells per column and exact-duplicate count for one
/// table. Purely observational; the cleaner owns the corrections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub table: &'static str,
    pub rows: usize,
    pub missing_cells: Vec<(&'static str, usize)>,
    pub duplicate_rows: usize,
}

impl TableProfile {
    pub fn log(&self) {
        info!(
            table = self.table,
            rows = self.rows,
            duplicates = self.duplicate_rows,
            "table profile"
        );
        for (column, missing) in &self.missing_cells {
            if *missing > 0 {
                info!(table = self.table, column, missing, "blank cells");
            }
        }
    }

    /// Total blank cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.missing_cells.iter().map(|(_, n)| n).sum()
    }
}

fn duplicate_count<T: Serialize>(rows: &[T]) -> Result<usize> {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for row in rows {
        if !seen.insert(row_signature(row)?) {
            duplicates += 1;
        }
    }
    Ok(duplicates)
}

pub fn profile_orders(orders: &[RawOrder]) -> Result<TableProfile> {
    let missing_cells = vec![
        ("order_id", orders.iter().filter(|o| o.order_id.is_none()).count()),
        (
            "order_status",
            orders.iter().filter(|o| o.order_status.is_none()).count(),
        ),
        (
            "customer_id",
            orders.iter().filter(|o| o.customer_id.is_none()).count(),
        ),
        (
            "order_purchase_timestamp",
            orders
                .iter()
                .filter(|o| o.order_purchase_timestamp.is_none())
                .count(),
        ),
    ];
    Ok(TableProfile {
        table: "orders",
        rows: orders.len(),
        missing_cells,
        duplicate_rows: duplicate_count(orders)?,
    })
}

pub fn profile_payments(payments: &[RawPayment]) -> Result<TableProfile> {
    let missing_cells = vec![
        ("order_id", payments.iter().filter(|p| p.order_id.is_none()).count()),
        (
            "payment_type",
            payments.iter().filter(|p| p.payment_type.is_none()).count(),
        ),
        (
            "payment_value",
            payments.iter().filter(|p| p.payment_value.is_none()).count(),
        ),
        (
            "payment_installments",
            payments
                .iter()
                .filter(|p| p.payment_installments.is_none())
                .count(),
        ),
    ];
    Ok(TableProfile {
        table: "payments",
        rows: payments.len(),
        missing_cells,
        duplicate_rows: duplicate_count(payments)?,
    })
}

pub fn profile_customers(customers: &[Customer]) -> Result<TableProfile> {
    let missing_cells = vec![
        (
            "customer_id",
            customers.iter().filter(|c| c.customer_id.is_empty()).count(),
        ),
        (
            "customer_unique_id",
            customers
                .iter()
                .filter(|c| c.customer_unique_id.is_empty())
                .count(),
        ),
        (
            "customer_state",
            customers.iter().filter(|c| c.customer_state.is_empty()).count(),
        ),
    ];
    Ok(TableProfile {
        table: "customers",
        rows: customers.len(),
        missing_cells,
        duplicate_rows: duplicate_count(customers)?,
    })
}
