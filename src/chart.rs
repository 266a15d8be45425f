use serde::{Deserialize, Serialize};

use crate::aggregate::{Metric, TopProducts};

pub const TICK_ANGLE_DEGREES: i32 = -45;
pub const TICK_FONT_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Renderer-independent description of a vertical bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub tick_angle: i32,
    pub tick_font_size: u32,
    pub show_values: bool,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Value-axis extent, always including zero.
    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .bars
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), bar| {
                (lo.min(bar.value), hi.max(bar.value))
            });
        if min == max { (min, min + 1.0) } else { (min, max) }
    }
}

pub fn create_sales_bar_chart(top: &TopProducts, title: &str) -> Option<BarChart> {
    build_bar_chart(top, title, true)
}

pub fn create_profit_bar_chart(top: &TopProducts, title: &str) -> Option<BarChart> {
    build_bar_chart(top, title, false)
}

/// Builds the chart for `top`, or `None` when there is nothing to plot.
pub fn build_bar_chart(top: &TopProducts, title: &str, show_values: bool) -> Option<BarChart> {
    if top.is_empty() {
        return None;
    }
    Some(BarChart {
        title: title.to_string(),
        x_title: top.product_column.clone(),
        y_title: top.metric_column.clone(),
        tick_angle: TICK_ANGLE_DEGREES,
        tick_font_size: TICK_FONT_SIZE,
        show_values,
        bars: top
            .rows
            .iter()
            .map(|row| Bar {
                label: row.product.clone(),
                value: row.value,
            })
            .collect(),
    })
}

pub fn chart_for(top: &TopProducts, title: &str) -> Option<BarChart> {
    match top.metric {
        Metric::Sales => create_sales_bar_chart(top, title),
        Metric::Profit => create_profit_bar_chart(top, title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ProductTotal;

    fn top(metric: Metric, rows: &[(&str, f64)]) -> TopProducts {
        TopProducts {
            metric,
            product_column: "Product Name".to_string(),
            metric_column: match metric {
                Metric::Sales => "Sales".to_string(),
                Metric::Profit => "Profit".to_string(),
            },
            companion_column: "Quantity".to_string(),
            rows: rows
                .iter()
                .map(|(product, value)| ProductTotal {
                    product: product.to_string(),
                    value: *value,
                    companion: 0.0,
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn empty_input_yields_no_chart() {
        assert!(create_sales_bar_chart(&top(Metric::Sales, &[]), "t").is_none());
        assert!(create_profit_bar_chart(&top(Metric::Profit, &[]), "t").is_none());
    }

    #[test]
    fn sales_chart_labels_bars_with_values() {
        let chart = create_sales_bar_chart(&top(Metric::Sales, &[("B", 20.0), ("A", 15.0)]), "Top")
            .expect("chart");
        assert_eq!(chart.title, "Top");
        assert_eq!(chart.x_title, "Product Name");
        assert_eq!(chart.y_title, "Sales");
        assert_eq!(chart.tick_angle, -45);
        assert!(chart.show_values);
        assert_eq!(chart.bars[0].label, "B");
        assert_eq!(chart.bars.len(), 2);
    }

    #[test]
    fn profit_chart_omits_value_labels() {
        let chart = chart_for(&top(Metric::Profit, &[("A", -2.0)]), "Top").expect("chart");
        assert!(!chart.show_values);
        assert_eq!(chart.y_title, "Profit");
        assert_eq!(chart.value_range(), (-2.0, 0.0));
    }

    #[test]
    fn category_axis_uses_product_column_name() {
        let mut data = top(Metric::Sales, &[("Mesa", 3.0)]);
        data.product_column = "Producto".to_string();
        let chart = chart_for(&data, "Top").expect("chart");
        assert_eq!(chart.x_title, "Producto");
    }

    #[test]
    fn value_range_never_collapses() {
        let chart = chart_for(&top(Metric::Sales, &[("A", 0.0)]), "Top").expect("chart");
        assert_eq!(chart.value_range(), (0.0, 1.0));
    }
}
