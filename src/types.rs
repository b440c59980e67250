use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Orders table row as it arrives from disk, blanks still present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub order_id: Option<String>,
    pub order_status: Option<String>,
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub order_purchase_timestamp: Option<NaiveDateTime>,
}

/// Payments table row as it arrives from disk. Several payments may
/// share an order_id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayment {
    pub order_id: Option<String>,
    pub payment_type: Option<String>,
    pub payment_value: Option<f64>,
    pub payment_installments: Option<u32>,
}

/// Order after cleaning: blank text cells carry the sentinel. A blank
/// purchase timestamp has no textual slot and stays unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub order_status: String,
    pub customer_id: String,
    pub order_purchase_timestamp: Option<NaiveDateTime>,
}

/// Payment after cleaning: rows with any blank cell have been dropped,
/// so every field is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub order_id: String,
    pub payment_type: String,
    pub payment_value: f64,
    pub payment_installments: u32,
}

/// Customers table row. The table ships complete and is used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_state: String,
}

/// One row of the denormalized table: a single payment on a single
/// order, enriched with the paying customer's attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub order_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: Option<NaiveDateTime>,
    pub payment_type: String,
    pub payment_value: f64,
    pub payment_installments: u32,
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_state: String,
}

// A cleaned row is a complete raw row. These conversions let the
// cleaning passes be re-applied to their own output.
impl From<Order> for RawOrder {
    fn from(order: Order) -> Self {
        RawOrder {
            order_id: Some(order.order_id),
            order_status: Some(order.order_status),
            customer_id: Some(order.customer_id),
            order_purchase_timestamp: order.order_purchase_timestamp,
        }
    }
}

impl From<Payment> for RawPayment {
    fn from(payment: Payment) -> Self {
        RawPayment {
            order_id: Some(payment.order_id),
            payment_type: Some(payment.payment_type),
            payment_value: Some(payment.payment_value),
            payment_installments: Some(payment.payment_installments),
        }
    }
}

/// Purchase timestamps arrive as `2017-10-02 10:56:33`; some exports use
/// the RFC 3339 `T` separator, so both forms are accepted. A blank cell
/// deserializes to `None`.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let raw = match raw.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) => s.to_string(),
        };
        for format in FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(&raw, format) {
                return Ok(Some(ts));
            }
        }
        Err(serde::de::Error::custom(format!(
            "unrecognized timestamp `{raw}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn timestamp_accepts_space_and_t_separators() {
        let csv_data = "order_id,order_status,customer_id,order_purchase_timestamp\n\
                        o1,delivered,c1,2017-10-02 10:56:33\n\
                        o2,delivered,c2,2017-10-02T10:56:33\n\
                        o3,delivered,c3,\n";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let orders: Vec<RawOrder> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        let expected = NaiveDate::from_ymd_opt(2017, 10, 2)
            .unwrap()
            .and_hms_opt(10, 56, 33)
            .unwrap();
        assert_eq!(orders[0].order_purchase_timestamp, Some(expected));
        assert_eq!(orders[1].order_purchase_timestamp, Some(expected));
        assert_eq!(orders[2].order_purchase_timestamp, None);
        assert_eq!(orders[0].order_purchase_timestamp.unwrap().hour(), 10);
    }

    #[test]
    fn timestamp_rejects_garbage() {
        let csv_data = "order_id,order_status,customer_id,order_purchase_timestamp\n\
                        o1,delivered,c1,not-a-date\n";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let result: Result<Vec<RawOrder>, _> = reader.deserialize().collect();
        assert!(result.is_err());
    }

    #[test]
    fn cleaned_rows_convert_back_to_complete_raw_rows() {
        let payment = Payment {
            order_id: "o1".to_string(),
            payment_type: "credit_card".to_string(),
            payment_value: 42.5,
            payment_installments: 3,
        };
        let raw = RawPayment::from(payment);
        assert_eq!(raw.order_id.as_deref(), Some("o1"));
        assert_eq!(raw.payment_value, Some(42.5));
    }
}
