use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{info, instrument};

use crate::aggregate;
use crate::charts::{self, ScatterStyle};
use crate::cleaner;
use crate::constants;
use crate::error::Result;
use crate::filter;
use crate::join;
use crate::loader::{self, SourceTables};
use crate::profile;

/// Result of a complete analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub orders_loaded: usize,
    pub payments_loaded: usize,
    pub customers_loaded: usize,
    pub orders_cleaned: usize,
    pub payments_cleaned: usize,
    pub invoiced_orders: usize,
    pub high_value_credit_card_payments: usize,
    pub customers_in_filtered_state: usize,
    pub joined_rows: usize,
    pub months_covered: usize,
    pub output_file: String,
}

pub struct AnalysisPipeline;

impl AnalysisPipeline {
    /// Runs the whole analysis against the fixed input files.
    pub fn run() -> Result<AnalysisSummary> {
        Self::run_with_inputs(
            constants::ORDERS_FILE,
            constants::PAYMENTS_FILE,
            constants::CUSTOMERS_FILE,
            constants::OVERVIEW_CHART_FILE,
        )
    }

    /// Runs every stage once, strictly in order: load, profile, clean,
    /// filter, join, aggregate, render.
    #[instrument(skip_all)]
    pub fn run_with_inputs(
        orders_path: &str,
        payments_path: &str,
        customers_path: &str,
        chart_path: &str,
    ) -> Result<AnalysisSummary> {
        counter!("insights_pipeline_runs_total").increment(1);
        let t_pipeline = Instant::now();

        // Step 1: load the three source tables
        info!("📥 Loading source tables");
        println!("📥 Loading source tables...");
        let t_load = Instant::now();
        let SourceTables {
            orders,
            payments,
            customers,
        } = loader::load_tables_from(orders_path, payments_path, customers_path)?;
        histogram!("insights_load_duration_seconds").record(t_load.elapsed().as_secs_f64());
        counter!("insights_rows_loaded_total", "table" => "orders").increment(orders.len() as u64);
        counter!("insights_rows_loaded_total", "table" => "payments")
            .increment(payments.len() as u64);
        counter!("insights_rows_loaded_total", "table" => "customers")
            .increment(customers.len() as u64);
        let orders_loaded = orders.len();
        let payments_loaded = payments.len();
        let customers_loaded = customers.len();
        println!(
            "✅ Loaded {} orders, {} payments, {} customers",
            orders_loaded, payments_loaded, customers_loaded
        );

        // Step 2: describe what arrived
        profile::profile_orders(&orders)?.log();
        profile::profile_payments(&payments)?.log();
        profile::profile_customers(&customers)?.log();

        // Step 3: clean orders and payments; customers ship complete
        info!("🧹 Cleaning tables");
        println!("🧹 Cleaning tables...");
        let orders = cleaner::clean_orders(orders)?;
        let payments = cleaner::clean_payments(payments)?;
        counter!("insights_rows_dropped_total", "table" => "orders")
            .increment((orders_loaded - orders.len()) as u64);
        counter!("insights_rows_dropped_total", "table" => "payments")
            .increment((payments_loaded - payments.len()) as u64);
        println!(
            "✅ Cleaned tables: {} orders, {} payments remain",
            orders.len(),
            payments.len()
        );

        // Step 4: exploratory views; logged and counted, never joined
        let invoiced = filter::invoiced_orders(&orders);
        let high_value = filter::high_value_credit_card_payments(&payments);
        let in_state = filter::customers_in_filtered_state(&customers);
        info!(
            invoiced = invoiced.len(),
            high_value_credit_card = high_value.len(),
            in_state = in_state.len(),
            "filtered views"
        );
        println!(
            "🔍 Views: {} invoiced orders, {} high-value credit card payments, {} customers in {}",
            invoiced.len(),
            high_value.len(),
            in_state.len(),
            constants::FILTERED_STATE
        );

        // Step 5: join the three tables into one wide table
        info!("🔗 Joining tables");
        println!("🔗 Joining tables...");
        let order_payments = join::join_orders_payments(&orders, &payments);
        let joined = join::join_with_customers(&order_payments, &customers);
        counter!("insights_joined_rows_total").increment(joined.len() as u64);
        println!("✅ Joined table has {} rows", joined.len());

        // Step 6: aggregate
        let periods = aggregate::derive_periods(&joined);
        let monthly = aggregate::monthly_revenue(&periods);
        let totals = aggregate::customer_totals(&joined);
        let pivot = aggregate::revenue_by_type_and_month(&periods);
        let box_series = aggregate::box_plot_series(&joined);

        // Step 7: render - four charts shown, the composite persisted
        info!("📈 Rendering charts");
        println!("📈 Rendering charts...");
        let t_render = Instant::now();
        charts::show_monthly_revenue(&monthly)?;
        counter!("insights_charts_rendered_total", "chart" => "monthly_revenue").increment(1);
        charts::show_customer_scatter(&totals, ScatterStyle::Plain)?;
        charts::show_customer_scatter(&totals, ScatterStyle::Darkgrid)?;
        counter!("insights_charts_rendered_total", "chart" => "customer_scatter").increment(2);
        charts::show_stacked_revenue(&pivot)?;
        counter!("insights_charts_rendered_total", "chart" => "stacked_revenue").increment(1);
        charts::show_payment_type_boxes(&box_series)?;
        counter!("insights_charts_rendered_total", "chart" => "payment_type_boxes").increment(1);
        let output_file = charts::render_overview_file(chart_path, &box_series, &pivot, &totals)?;
        counter!("insights_charts_rendered_total", "chart" => "overview").increment(1);
        histogram!("insights_render_duration_seconds").record(t_render.elapsed().as_secs_f64());

        histogram!("insights_pipeline_duration_seconds")
            .record(t_pipeline.elapsed().as_secs_f64());

        Ok(AnalysisSummary {
            orders_loaded,
            payments_loaded,
            customers_loaded,
            orders_cleaned: orders.len(),
            payments_cleaned: payments.len(),
            invoiced_orders: invoiced.len(),
            high_value_credit_card_payments: high_value.len(),
            customers_in_filtered_state: in_state.len(),
            joined_rows: joined.len(),
            months_covered: monthly.len(),
            output_file,
        })
    }
}
