use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Customer, JoinedRecord, Order, Payment};

/// Intermediate result of the first join stage: one row per
/// (order, payment) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayment {
    pub order_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: Option<chrono::NaiveDateTime>,
    pub customer_id: String,
    pub payment_type: String,
    pub payment_value: f64,
    pub payment_installments: u32,
}

/// Inner join of orders and payments on `order_id`. Output preserves
/// orders order; an order with several payments yields one row per
/// payment, and orders without payments are dropped.
pub fn join_orders_payments(orders: &[Order], payments: &[Payment]) -> Vec<OrderPayment> {
    let mut payments_by_order: HashMap<&str, Vec<&Payment>> = HashMap::new();
    for payment in payments {
        payments_by_order
            .entry(payment.order_id.as_str())
            .or_default()
            .push(payment);
    }

    let mut joined = Vec::new();
    for order in orders {
        let Some(order_payments) = payments_by_order.get(order.order_id.as_str()) else {
            continue;
        };
        for payment in order_payments {
            joined.push(OrderPayment {
                order_id: order.order_id.clone(),
                order_status: order.order_status.clone(),
                order_purchase_timestamp: order.order_purchase_timestamp,
                customer_id: order.customer_id.clone(),
                payment_type: payment.payment_type.clone(),
                payment_value: payment.payment_value,
                payment_installments: payment.payment_installments,
            });
        }
    }
    joined
}

/// Inner join of the order/payment rows with customers on
/// `customer_id`. Rows whose customer is unknown are dropped.
pub fn join_with_customers(
    order_payments: &[OrderPayment],
    customers: &[Customer],
) -> Vec<JoinedRecord> {
    let customers_by_id: HashMap<&str, &Customer> = customers
        .iter()
        .map(|customer| (customer.customer_id.as_str(), customer))
        .collect();

    let mut joined = Vec::new();
    for row in order_payments {
        let Some(customer) = customers_by_id.get(row.customer_id.as_str()) else {
            continue;
        };
        joined.push(JoinedRecord {
            order_id: row.order_id.clone(),
            order_status: row.order_status.clone(),
            order_purchase_timestamp: row.order_purchase_timestamp,
            payment_type: row.payment_type.clone(),
            payment_value: row.payment_value,
            payment_installments: row.payment_installments,
            customer_id: row.customer_id.clone(),
            customer_unique_id: customer.customer_unique_id.clone(),
            customer_state: customer.customer_state.clone(),
        });
    }
    joined
}
