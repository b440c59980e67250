use tracing::{error, info};

use order_insights::logging;
use order_insights::pipeline::AnalysisPipeline;

fn main() {
    // Initialize logging
    logging::init_logging();

    println!("🔎 Running order analytics...");
    match AnalysisPipeline::run() {
        Ok(summary) => {
            info!("analysis finished");
            println!("\n📊 Analysis Summary:");
            println!("   Orders loaded: {}", summary.orders_loaded);
            println!("   Payments loaded: {}", summary.payments_loaded);
            println!("   Customers loaded: {}", summary.customers_loaded);
            println!(
                "   After cleaning: {} orders, {} payments",
                summary.orders_cleaned, summary.payments_cleaned
            );
            println!("   Invoiced orders: {}", summary.invoiced_orders);
            println!(
                "   High-value credit card payments: {}",
                summary.high_value_credit_card_payments
            );
            println!(
                "   Customers in filtered state: {}",
                summary.customers_in_filtered_state
            );
            println!("   Joined rows: {}", summary.joined_rows);
            println!("   Months covered: {}", summary.months_covered);
            println!("   Composite figure: {}", summary.output_file);
        }
        Err(e) => {
            error!("analysis failed: {}", e);
            eprintln!("❌ Analysis failed: {e}");
            std::process::exit(1);
        }
    }
}
