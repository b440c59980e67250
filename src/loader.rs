use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::constants;
use crate::error::{InsightError, Result};
use crate::types::{Customer, RawOrder, RawPayment};

/// The three source tables, freshly read and untouched.
#[derive(Debug)]
pub struct SourceTables {
    pub orders: Vec<RawOrder>,
    pub payments: Vec<RawPayment>,
    pub customers: Vec<Customer>,
}

fn read_table<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    if !Path::new(path).exists() {
        return Err(InsightError::MissingInput(path.to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Loads orders, payments and customers from their fixed locations.
/// A missing or malformed file aborts the whole run; there is no retry
/// and no partial load.
pub fn load_source_tables() -> Result<SourceTables> {
    load_tables_from(
        constants::ORDERS_FILE,
        constants::PAYMENTS_FILE,
        constants::CUSTOMERS_FILE,
    )
}

pub fn load_tables_from(
    orders_path: &str,
    payments_path: &str,
    customers_path: &str,
) -> Result<SourceTables> {
    let orders = read_table::<RawOrder>(orders_path)?;
    info!("loaded {} orders from {}", orders.len(), orders_path);

    let payments = read_table::<RawPayment>(payments_path)?;
    info!("loaded {} payments from {}", payments.len(), payments_path);

    let customers = read_table::<Customer>(customers_path)?;
    info!("loaded {} customers from {}", customers.len(), customers_path);

    Ok(SourceTables {
        orders,
        payments,
        customers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn loads_all_three_tables() {
        let dir = tempdir().unwrap();
        let orders = write_fixture(
            dir.path(),
            "orders.csv",
            "order_id,order_status,customer_id,order_purchase_timestamp\n\
             o1,invoiced,c1,2018-01-05 11:00:00\n",
        );
        let payments = write_fixture(
            dir.path(),
            "order_payments.csv",
            "order_id,payment_type,payment_value,payment_installments\n\
             o1,credit_card,120.5,2\n",
        );
        let customers = write_fixture(
            dir.path(),
            "customers.csv",
            "customer_id,customer_unique_id,customer_state\n\
             c1,u1,SP\n",
        );

        let tables = load_tables_from(&orders, &payments, &customers).unwrap();
        assert_eq!(tables.orders.len(), 1);
        assert_eq!(tables.payments.len(), 1);
        assert_eq!(tables.customers.len(), 1);
        assert_eq!(tables.payments[0].payment_value, Some(120.5));
        assert_eq!(tables.customers[0].customer_state, "SP");
    }

    #[test]
    fn blank_cells_load_as_none() {
        let dir = tempdir().unwrap();
        let payments = write_fixture(
            dir.path(),
            "order_payments.csv",
            "order_id,payment_type,payment_value,payment_installments\n\
             o1,,120.5,\n",
        );
        let rows: Vec<RawPayment> = read_table(&payments).unwrap();
        assert_eq!(rows[0].payment_type, None);
        assert_eq!(rows[0].payment_installments, None);
        assert_eq!(rows[0].order_id.as_deref(), Some("o1"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("absent.csv").to_string_lossy().to_string();
        let err = read_table::<RawOrder>(&absent).unwrap_err();
        assert!(matches!(err, InsightError::MissingInput(_)));
    }
}
