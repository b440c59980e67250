use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontTransform, Palette, Palette99};
use tracing::info;

use crate::aggregate::{CustomerTotals, RevenuePivot};
use crate::constants::BOX_PLOT_LABELS;
use crate::error::{InsightError, Result};

/// Size of the throwaway surface standing in for an interactive
/// display. These renders are never persisted.
const DISPLAY_SIZE: (u32, u32) = (800, 600);

/// Size of the persisted composite figure.
const OVERVIEW_SIZE: (u32, u32) = (1000, 1200);

fn chart_err<E: std::fmt::Display>(err: E) -> InsightError {
    InsightError::Chart(err.to_string())
}

fn display_buffer() -> Vec<u8> {
    vec![0u8; (DISPLAY_SIZE.0 * DISPLAY_SIZE.1 * 3) as usize]
}

/// Marker/theme variant for the customer scatter plot. The same data
/// is rendered once per style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatterStyle {
    Plain,
    Darkgrid,
}

/// Monthly revenue as a line with point markers; month labels run
/// rotated along x so long ranges stay legible.
pub fn monthly_revenue_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    monthly: &[(String, f64)],
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_err)?;

    let max_value = monthly
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0f64, f64::max)
        .max(1.0);
    let labels: Vec<&str> = monthly.iter().map(|(month, _)| month.as_str()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Payment Value by Month and Year", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..monthly.len().max(1) as i32, 0f64..max_value * 1.05)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Month and Year")
        .y_desc("Payment Value")
        .x_labels(monthly.len().max(2))
        .x_label_formatter(&|index| {
            labels
                .get(*index as usize)
                .map(|label| label.to_string())
                .unwrap_or_default()
        })
        .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            monthly
                .iter()
                .enumerate()
                .map(|(index, (_, value))| (index as i32, *value)),
            RED.stroke_width(2),
        ))
        .map_err(chart_err)?;
    chart
        .draw_series(
            monthly
                .iter()
                .enumerate()
                .map(|(index, (_, value))| Circle::new((index as i32, *value), 3, RED.filled())),
        )
        .map_err(chart_err)?;
    Ok(())
}

/// Per-customer payment value against summed installments.
pub fn customer_scatter_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    totals: &[CustomerTotals],
    style: ScatterStyle,
) -> Result<()> {
    let background = match style {
        ScatterStyle::Plain => WHITE.to_rgba(),
        // Muted lavender-grey panel with white grid lines
        ScatterStyle::Darkgrid => RGBColor(234, 234, 242).to_rgba(),
    };
    area.fill(&background).map_err(chart_err)?;

    let max_value = totals
        .iter()
        .map(|t| t.payment_value)
        .fold(0.0f64, f64::max)
        .max(1.0);
    let max_installments = totals
        .iter()
        .map(|t| t.payment_installments as f64)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(
            "Payment Value vs Installments by Customer",
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_value * 1.05, 0f64..max_installments * 1.05)
        .map_err(chart_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Payment Value").y_desc("Payment Installments");
    if style == ScatterStyle::Darkgrid {
        mesh.bold_line_style(WHITE.stroke_width(1))
            .light_line_style(&WHITE.mix(0.4));
    }
    mesh.draw().map_err(chart_err)?;

    let color = match style {
        ScatterStyle::Plain => BLUE.to_rgba(),
        ScatterStyle::Darkgrid => RGBColor(76, 114, 176).to_rgba(),
    };
    chart
        .draw_series(
            totals.iter().map(|t| {
                Circle::new((t.payment_value, t.payment_installments as f64), 3, color.filled())
            }),
        )
        .map_err(chart_err)?;
    Ok(())
}

/// Revenue per month, stacked by payment type.
pub fn stacked_revenue_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pivot: &RevenuePivot,
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_err)?;

    let max_total = pivot
        .values
        .iter()
        .map(|row| row.iter().sum::<f64>())
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption("Payment per Payment Type by Month", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..pivot.months.len().max(1) as i32, 0f64..max_total * 1.05)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Month of Payment")
        .y_desc("Payment Value")
        .x_labels(pivot.months.len().max(2))
        .x_label_formatter(&|index| {
            pivot
                .months
                .get(*index as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(chart_err)?;

    let mut cumulative = vec![0.0f64; pivot.months.len()];
    for (type_index, payment_type) in pivot.payment_types.iter().enumerate() {
        let color = Palette99::pick(type_index).to_rgba();
        let mut bars = Vec::with_capacity(pivot.months.len());
        for month_index in 0..pivot.months.len() {
            let base = cumulative[month_index];
            let top = base + pivot.values[month_index][type_index];
            cumulative[month_index] = top;
            if top > base {
                bars.push(Rectangle::new(
                    [(month_index as i32, base), (month_index as i32 + 1, top)],
                    color.filled(),
                ));
            }
        }
        chart
            .draw_series(bars)
            .map_err(chart_err)?
            .label(payment_type.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

/// Payment value distribution per fixed payment type. A type with no
/// rows draws no box, leaving its slot empty.
pub fn payment_type_box_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &[(&'static str, Vec<f64>)],
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_err)?;

    let max_value = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold(0.0f64, |acc, value| acc.max(*value))
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(
            "Box Plot showing Payment Value ranges by Payment Type",
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0i32..series.len().max(1) as i32).into_segmented(),
            0f32..(max_value * 1.05) as f32,
        )
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Payment Type")
        .y_desc("Payment Value")
        .x_label_formatter(&|segment| match segment {
            SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => BOX_PLOT_LABELS
                .get(*index as usize)
                .map(|label| label.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(chart_err)?;

    for (index, (_, values)) in series.iter().enumerate() {
        if values.is_empty() {
            continue;
        }
        let quartiles = Quartiles::new(values);
        chart
            .draw_series(std::iter::once(
                Boxplot::new_vertical(SegmentValue::CenterOf(index as i32), &quartiles)
                    .width(20)
                    .whisker_width(0.5),
            ))
            .map_err(chart_err)?;
    }
    Ok(())
}

// The four exploratory charts render onto a throwaway in-memory
// surface; nothing is written to disk for them.

pub fn show_monthly_revenue(monthly: &[(String, f64)]) -> Result<()> {
    let mut buffer = display_buffer();
    let root = BitMapBackend::with_buffer(&mut buffer, DISPLAY_SIZE).into_drawing_area();
    monthly_revenue_chart(&root, monthly)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

pub fn show_customer_scatter(totals: &[CustomerTotals], style: ScatterStyle) -> Result<()> {
    let mut buffer = display_buffer();
    let root = BitMapBackend::with_buffer(&mut buffer, DISPLAY_SIZE).into_drawing_area();
    customer_scatter_chart(&root, totals, style)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

pub fn show_stacked_revenue(pivot: &RevenuePivot) -> Result<()> {
    let mut buffer = display_buffer();
    let root = BitMapBackend::with_buffer(&mut buffer, DISPLAY_SIZE).into_drawing_area();
    stacked_revenue_chart(&root, pivot)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

pub fn show_payment_type_boxes(series: &[(&'static str, Vec<f64>)]) -> Result<()> {
    let mut buffer = display_buffer();
    let root = BitMapBackend::with_buffer(&mut buffer, DISPLAY_SIZE).into_drawing_area();
    payment_type_box_chart(&root, series)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

/// Renders the composite three-panel figure (box plot, stacked bars,
/// scatter) and writes it to `path`. This is the only persisted chart.
pub fn render_overview_file(
    path: &str,
    box_series: &[(&'static str, Vec<f64>)],
    pivot: &RevenuePivot,
    totals: &[CustomerTotals],
) -> Result<String> {
    let root = BitMapBackend::new(path, OVERVIEW_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let panels = root.split_evenly((3, 1));

    payment_type_box_chart(&panels[0], box_series)?;
    stacked_revenue_chart(&panels[1], pivot)?;
    customer_scatter_chart(&panels[2], totals, ScatterStyle::Plain)?;

    root.present().map_err(chart_err)?;
    info!("saved composite figure to {}", path);
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_totals() -> Vec<CustomerTotals> {
        vec![
            CustomerTotals {
                customer_unique_id: "u1".to_string(),
                payment_value: 120.0,
                payment_installments: 4,
            },
            CustomerTotals {
                customer_unique_id: "u2".to_string(),
                payment_value: 60.0,
                payment_installments: 1,
            },
        ]
    }

    fn sample_pivot() -> RevenuePivot {
        RevenuePivot {
            months: vec!["2018-01".to_string(), "2018-02".to_string()],
            payment_types: vec!["boleto".to_string(), "credit_card".to_string()],
            values: vec![vec![10.0, 100.0], vec![50.0, 0.0]],
        }
    }

    #[test]
    fn display_charts_render_without_persisting() {
        let monthly = vec![("2018-01".to_string(), 100.0), ("2018-02".to_string(), 200.0)];
        show_monthly_revenue(&monthly).unwrap();
        show_customer_scatter(&sample_totals(), ScatterStyle::Plain).unwrap();
        show_customer_scatter(&sample_totals(), ScatterStyle::Darkgrid).unwrap();
        show_stacked_revenue(&sample_pivot()).unwrap();
        show_payment_type_boxes(&[
            ("credit_card", vec![10.0, 20.0, 30.0]),
            ("boleto", vec![15.0]),
            ("voucher", vec![]),
            ("debit_card", vec![5.0, 7.0]),
        ])
        .unwrap();
    }

    #[test]
    fn empty_inputs_draw_empty_axes_not_errors() {
        show_monthly_revenue(&[]).unwrap();
        show_customer_scatter(&[], ScatterStyle::Plain).unwrap();
        show_stacked_revenue(&RevenuePivot {
            months: vec![],
            payment_types: vec![],
            values: vec![],
        })
        .unwrap();
        show_payment_type_boxes(&[]).unwrap();
    }

    #[test]
    fn overview_file_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overview.png");
        let path = path.to_string_lossy().to_string();
        let box_series = [("credit_card", vec![10.0, 40.0]), ("boleto", vec![20.0])];
        let written =
            render_overview_file(&path, &box_series, &sample_pivot(), &sample_totals()).unwrap();
        assert_eq!(written, path);
        assert!(std::path::Path::new(&path).exists());
    }
}
