use anyhow::Result;
use log::info;

use crate::{
    cli::OptionsArgs,
    config::ColumnNames,
    dashboard,
    data::SalesTable,
    filter::{self, ALL_REGIONS, STATE_UNAVAILABLE, Selection, StateFilter},
    table,
};

/// Prints the region choices and, for the chosen region, the state choices.
pub fn execute(args: &OptionsArgs) -> Result<()> {
    let (config, source) = dashboard::load_source(&args.source, None)?;
    let region = Selection::parse(args.region.as_deref(), ALL_REGIONS);
    let rows = option_rows(&source, &config.columns, &region)?;
    let headers = vec!["filtro".to_string(), "opción".to_string()];
    table::print_table(&headers, &rows);
    info!(
        "Listed {} filter option(s) for region '{}'",
        rows.len(),
        region.label(ALL_REGIONS)
    );
    Ok(())
}

pub fn option_rows(
    source: &SalesTable,
    columns: &ColumnNames,
    region: &Selection,
) -> Result<Vec<Vec<String>>> {
    let mut rows = filter::region_options(source, columns)
        .into_iter()
        .map(|value| vec!["Región".to_string(), value])
        .collect::<Vec<_>>();
    let by_region = filter::filter_by(source, &columns.region, region)?;
    match filter::state_filter(&by_region, columns) {
        StateFilter::Available(states) => {
            rows.extend(states.into_iter().map(|value| vec!["Estado".to_string(), value]));
        }
        StateFilter::Unavailable => {
            rows.push(vec!["Estado".to_string(), STATE_UNAVAILABLE.to_string()]);
        }
    }
    Ok(rows)
}
