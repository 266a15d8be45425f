use anyhow::{Result, anyhow};
use itertools::Itertools;
use log::{debug, warn};

use crate::{config::ColumnNames, data::SalesTable};

pub const ALL_REGIONS: &str = "Todas";
pub const ALL_STATES: &str = "Todos";
pub const STATE_UNAVAILABLE: &str = "No Disponible";

/// A dropdown choice: either the "all" sentinel or one concrete category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Only(String),
}

impl Selection {
    /// Interprets a raw user choice; `None`, `sentinel` and `all` select everything.
    pub fn parse(raw: Option<&str>, sentinel: &str) -> Self {
        match raw.map(str::trim) {
            None => Selection::All,
            Some(value)
                if value.is_empty()
                    || value.eq_ignore_ascii_case(sentinel)
                    || value.eq_ignore_ascii_case("all") =>
            {
                Selection::All
            }
            Some(value) => Selection::Only(value.to_string()),
        }
    }

    pub fn label(&self, sentinel: &str) -> String {
        match self {
            Selection::All => sentinel.to_string(),
            Selection::Only(value) => value.clone(),
        }
    }
}

/// Keeps rows whose `column` equals the selection; `Selection::All` keeps every row.
pub fn filter_by(table: &SalesTable, column: &str, selection: &Selection) -> Result<SalesTable> {
    let Selection::Only(wanted) = selection else {
        return Ok(table.clone());
    };
    let index = table
        .column_index(column)
        .ok_or_else(|| anyhow!("Column '{column}' not found for filter"))?;
    Ok(table.retain_rows(|row| row[index].as_key() == *wanted))
}

/// Distinct non-empty values of `column` in first-appearance order.
pub fn distinct_values(table: &SalesTable, column: &str) -> Vec<String> {
    let Some(index) = table.column_index(column) else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .map(|row| &row[index])
        .filter(|value| !value.is_empty())
        .map(|value| value.as_key())
        .unique()
        .collect()
}

pub fn region_options(table: &SalesTable, columns: &ColumnNames) -> Vec<String> {
    std::iter::once(ALL_REGIONS.to_string())
        .chain(distinct_values(table, &columns.region))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateFilter {
    Available(Vec<String>),
    Unavailable,
}

/// State choices for an already region-filtered table.
///
/// The state dimension is unavailable when the column is missing or holds no
/// values for the current rows.
pub fn state_filter(table: &SalesTable, columns: &ColumnNames) -> StateFilter {
    if !table.has_column(&columns.state) {
        return StateFilter::Unavailable;
    }
    let states = distinct_values(table, &columns.state);
    if states.is_empty() {
        return StateFilter::Unavailable;
    }
    StateFilter::Available(
        std::iter::once(ALL_STATES.to_string())
            .chain(states)
            .collect(),
    )
}

#[derive(Debug, Clone)]
pub struct FilteredView {
    pub table: SalesTable,
    pub region_label: String,
    pub state_label: String,
    pub state_filter: StateFilter,
}

/// Applies the region selection, then the state selection when the state
/// dimension is available for the remaining rows.
pub fn apply_selection(
    table: &SalesTable,
    columns: &ColumnNames,
    region: &Selection,
    state: &Selection,
) -> Result<FilteredView> {
    let by_region = filter_by(table, &columns.region, region)?;
    debug!(
        "Region '{}' kept {} of {} row(s)",
        region.label(ALL_REGIONS),
        by_region.len(),
        table.len()
    );

    let state_filter = state_filter(&by_region, columns);
    let (filtered, state_label) = match &state_filter {
        StateFilter::Available(_) => {
            let by_state = filter_by(&by_region, &columns.state, state)?;
            debug!(
                "State '{}' kept {} of {} row(s)",
                state.label(ALL_STATES),
                by_state.len(),
                by_region.len()
            );
            (by_state, state.label(ALL_STATES))
        }
        StateFilter::Unavailable => {
            if let Selection::Only(value) = state {
                warn!("State filter '{value}' ignored: no state data for the current selection");
            }
            (by_region, STATE_UNAVAILABLE.to_string())
        }
    };

    Ok(FilteredView {
        table: filtered,
        region_label: region.label(ALL_REGIONS),
        state_label,
        state_filter,
    })
}
