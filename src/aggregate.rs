//! Group-by-product aggregation with top-N truncation.
//!
//! Both variants sum the target metric together with one companion column
//! (Quantity for sales, Sales for profit), keyed by product name. Groups are
//! kept in ascending name order and the descending sort is stable, so equal
//! totals rank alphabetically.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{config::ColumnNames, data::SalesTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Sales,
    Profit,
}

impl Metric {
    pub fn column<'a>(&self, columns: &'a ColumnNames) -> &'a str {
        match self {
            Metric::Sales => &columns.sales,
            Metric::Profit => &columns.profit,
        }
    }

    pub fn companion<'a>(&self, columns: &'a ColumnNames) -> &'a str {
        match self {
            Metric::Sales => &columns.quantity,
            Metric::Profit => &columns.sales,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product: String,
    pub value: f64,
    pub companion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProducts {
    pub metric: Metric,
    pub product_column: String,
    pub metric_column: String,
    pub companion_column: String,
    pub rows: Vec<ProductTotal>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl TopProducts {
    fn empty(metric: Metric, columns: &ColumnNames) -> Self {
        Self {
            metric,
            product_column: columns.product.clone(),
            metric_column: metric.column(columns).to_string(),
            companion_column: metric.companion(columns).to_string(),
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        vec![
            self.product_column.clone(),
            self.metric_column.clone(),
            self.companion_column.clone(),
        ]
    }
}

pub fn top_products_by_sales(
    table: &SalesTable,
    columns: &ColumnNames,
    n: usize,
) -> Result<TopProducts> {
    top_products(table, columns, Metric::Sales, n)
}

pub fn top_products_by_profit(
    table: &SalesTable,
    columns: &ColumnNames,
    n: usize,
) -> Result<TopProducts> {
    top_products(table, columns, Metric::Profit, n)
}

/// Sums `metric` per product and returns the `n` largest totals, descending.
///
/// A missing metric column is not an error: the result is empty and carries a
/// warning. A missing companion column sums as zero.
pub fn top_products(
    table: &SalesTable,
    columns: &ColumnNames,
    metric: Metric,
    n: usize,
) -> Result<TopProducts> {
    let mut result = TopProducts::empty(metric, columns);
    let Some(metric_idx) = table.column_index(&result.metric_column) else {
        let message = format!(
            "La columna '{}' no se encuentra en el archivo de datos.",
            result.metric_column
        );
        warn!("{message}");
        result.warnings.push(message);
        return Ok(result);
    };
    let product_idx = table
        .column_index(&result.product_column)
        .ok_or_else(|| anyhow!("Column '{}' not found for grouping", result.product_column))?;
    let companion_idx = table.column_index(&result.companion_column);
    if companion_idx.is_none() {
        debug!(
            "Companion column '{}' missing; totals default to 0",
            result.companion_column
        );
    }

    let mut groups: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for row in table.rows() {
        let product = &row[product_idx];
        if product.is_empty() {
            continue;
        }
        let entry = groups.entry(product.as_key()).or_insert((0.0, 0.0));
        entry.0 += row[metric_idx].to_numeric();
        if let Some(idx) = companion_idx {
            entry.1 += row[idx].to_numeric();
        }
    }
    debug!(
        "Grouped {} row(s) into {} product(s) by '{}'",
        table.len(),
        groups.len(),
        result.metric_column
    );

    let mut totals = groups
        .into_iter()
        .map(|(product, (value, companion))| ProductTotal {
            product,
            value,
            companion,
        })
        .collect::<Vec<_>>();
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals.truncate(n);
    result.rows = totals;
    Ok(result)
}
