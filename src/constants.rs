/// Literal inputs, outputs and thresholds for the analysis run.
/// There is no configuration surface; everything the pipeline reads,
/// writes or compares against is named here.

// Input tables
pub const ORDERS_FILE: &str = "data/orders.csv";
pub const PAYMENTS_FILE: &str = "data/order_payments.csv";
pub const CUSTOMERS_FILE: &str = "data/customers.csv";

// The one persisted artifact: the composite three-panel figure
pub const OVERVIEW_CHART_FILE: &str = "payment_overview.png";

// Sentinel written into blank order cells during cleaning
pub const MISSING_SENTINEL: &str = "N/A";

// Filter predicates for the exploratory views
pub const INVOICED_STATUS: &str = "invoiced";
pub const CREDIT_CARD: &str = "credit_card";
pub const HIGH_VALUE_THRESHOLD: f64 = 1000.0;
pub const FILTERED_STATE: &str = "SP";

// Payment types shown in the box plot. Any other type in the data is
// left out of that chart.
pub const BOX_PLOT_TYPES: [&str; 4] = ["credit_card", "boleto", "voucher", "debit_card"];
pub const BOX_PLOT_LABELS: [&str; 4] = ["Credit Card", "Boleto", "Voucher", "Debit Card"];
