use crate::constants::{CREDIT_CARD, FILTERED_STATE, HIGH_VALUE_THRESHOLD, INVOICED_STATUS};
use crate::types::{Customer, Order, Payment};

// Exploratory views. Each returns a fresh vector and leaves its source
// untouched; none of them feeds the join.

/// Orders sitting at the invoiced status.
pub fn invoiced_orders(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| order.order_status == INVOICED_STATUS)
        .cloned()
        .collect()
}

/// Credit card payments above the high-value threshold.
pub fn high_value_credit_card_payments(payments: &[Payment]) -> Vec<Payment> {
    payments
        .iter()
        .filter(|payment| {
            payment.payment_type == CREDIT_CARD && payment.payment_value > HIGH_VALUE_THRESHOLD
        })
        .cloned()
        .collect()
}

/// Customers registered in the filtered state.
pub fn customers_in_filtered_state(customers: &[Customer]) -> Vec<Customer> {
    customers
        .iter()
        .filter(|customer| customer.customer_state == FILTERED_STATE)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(order_id: &str, status: &str) -> Order {
        Order {
            order_id: order_id.to_string(),
            order_status: status.to_string(),
            customer_id: "c1".to_string(),
            order_purchase_timestamp: None,
        }
    }

    fn payment(payment_type: &str, value: f64) -> Payment {
        Payment {
            order_id: "o1".to_string(),
            payment_type: payment_type.to_string(),
            payment_value: value,
            payment_installments: 1,
        }
    }

    #[test]
    fn invoiced_filter_yields_exactly_the_invoiced_rows() {
        let orders = vec![order("1", "invoiced"), order("2", "shipped")];
        let view = invoiced_orders(&orders);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].order_id, "1");
        // source untouched
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn high_value_filter_requires_both_type_and_threshold() {
        let payments = vec![
            payment("credit_card", 1500.0),
            payment("credit_card", 1000.0),
            payment("boleto", 2000.0),
        ];
        let view = high_value_credit_card_payments(&payments);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].payment_value, 1500.0);
    }

    #[test]
    fn filtered_views_are_pure_subsets() {
        let payments = vec![
            payment("credit_card", 1500.0),
            payment("voucher", 30.0),
            payment("credit_card", 999.9),
        ];
        let view = high_value_credit_card_payments(&payments);
        for row in &view {
            assert!(payments.contains(row));
            assert!(row.payment_type == CREDIT_CARD && row.payment_value > HIGH_VALUE_THRESHOLD);
        }
        for row in payments
            .iter()
            .filter(|p| !view.contains(p))
        {
            assert!(!(row.payment_type == CREDIT_CARD && row.payment_value > HIGH_VALUE_THRESHOLD));
        }
    }

    #[test]
    fn state_filter_matches_exactly() {
        let customers = vec![
            Customer {
                customer_id: "c1".to_string(),
                customer_unique_id: "u1".to_string(),
                customer_state: "SP".to_string(),
            },
            Customer {
                customer_id: "c2".to_string(),
                customer_unique_id: "u2".to_string(),
                customer_state: "RJ".to_string(),
            },
        ];
        let view = customers_in_filtered_state(&customers);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].customer_id, "c1");
    }
}
