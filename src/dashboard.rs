//! Report orchestration: load, filter, aggregate, chart, render.
//!
//! [`build_dashboard`] is the pure part of the pipeline and produces a
//! [`Dashboard`] value; [`execute`] wires it to the command line, printing the
//! text or JSON rendering and optionally writing SVG charts.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::{
    aggregate::{self, Metric, TopProducts},
    chart::{self, BarChart},
    cli::{OutputFormat, ReportArgs, SourceArgs},
    config::{ColumnNames, DashboardConfig},
    data::{SalesTable, format_number},
    filter::{self, ALL_REGIONS, ALL_STATES, Selection, StateFilter},
    io_utils,
    loader::{self, LoadOptions},
    printable_delimiter, render, table,
};

pub const PAGE_TITLE: &str = "Análisis de Ventas y Ganancias de Productos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Info(String),
    Warning(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub heading: String,
    pub top: TopProducts,
    pub chart: Option<BarChart>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub subheader: String,
    pub region: String,
    pub state: String,
    pub region_options: Vec<String>,
    pub state_options: Vec<String>,
    pub rows_selected: usize,
    pub sections: Vec<Section>,
}

/// Runs the filter, aggregation and chart stages over an already loaded table.
pub fn build_dashboard(
    table: &SalesTable,
    columns: &ColumnNames,
    region: &Selection,
    state: &Selection,
    top_n: usize,
) -> Result<Dashboard> {
    let region_options = filter::region_options(table, columns);
    let view = filter::apply_selection(table, columns, region, state)?;
    let state_options = match &view.state_filter {
        StateFilter::Available(options) => options.clone(),
        StateFilter::Unavailable => Vec::new(),
    };

    let sections = [Metric::Sales, Metric::Profit]
        .into_iter()
        .map(|metric| build_section(&view.table, columns, metric, top_n))
        .collect::<Result<Vec<_>>>()?;

    Ok(Dashboard {
        title: PAGE_TITLE.to_string(),
        subheader: format!(
            "Análisis de Ventas y Ganancias para: {} - {}",
            view.region_label, view.state_label
        ),
        region: view.region_label,
        state: view.state_label,
        region_options,
        state_options,
        rows_selected: view.table.len(),
        sections,
    })
}

fn build_section(
    table: &SalesTable,
    columns: &ColumnNames,
    metric: Metric,
    top_n: usize,
) -> Result<Section> {
    let (heading, metric_name) = match metric {
        Metric::Sales => (format!("Top {top_n} Productos por Ventas"), "ventas"),
        Metric::Profit => (format!("Top {top_n} Productos por Ganancias"), "ganancias"),
    };
    let top = aggregate::top_products(table, columns, metric, top_n)
        .with_context(|| format!("Aggregating top products by {metric:?}"))?;

    let mut notices = top
        .warnings
        .iter()
        .cloned()
        .map(Notice::Warning)
        .collect::<Vec<_>>();
    let chart = chart::chart_for(&top, &heading);
    if chart.is_none() {
        notices.push(Notice::Info(format!(
            "No hay datos suficientes para mostrar los productos principales por {metric_name}."
        )));
    }
    Ok(Section {
        heading,
        top,
        chart,
        notices,
    })
}

pub fn render_dashboard_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&dashboard.title);
    output.push('\n');
    output.push_str(&"=".repeat(dashboard.title.chars().count()));
    output.push_str("\n\n");
    output.push_str(&format!(
        "Filtros: Región = {} | Estado = {}\n",
        dashboard.region, dashboard.state
    ));
    output.push_str(&dashboard.subheader);
    output.push('\n');

    for section in &dashboard.sections {
        output.push('\n');
        output.push_str(&section.heading);
        output.push('\n');
        output.push_str(&"-".repeat(section.heading.chars().count()));
        output.push('\n');
        for notice in &section.notices {
            match notice {
                Notice::Info(message) => output.push_str(&format!("info: {message}\n")),
                Notice::Warning(message) => output.push_str(&format!("warning: {message}\n")),
            }
        }
        if let Some(chart) = &section.chart {
            output.push_str(&render::render_text(chart));
            output.push('\n');
            let rows = section
                .top
                .rows
                .iter()
                .map(|row| {
                    vec![
                        row.product.clone(),
                        format_number(row.value),
                        format_number(row.companion),
                    ]
                })
                .collect::<Vec<_>>();
            output.push_str(&table::render_table(&section.top.headers(), &rows));
        }
    }
    output
}

pub fn render_dashboard_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("Serializing dashboard to JSON")
}

/// Writes one SVG per section that has a chart, returning the written paths.
pub fn write_svg_charts(dashboard: &Dashboard, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Creating chart directory {dir:?}"))?;
    let mut written = Vec::new();
    for section in &dashboard.sections {
        let Some(chart) = &section.chart else {
            continue;
        };
        let file_name = match section.top.metric {
            Metric::Sales => "top_sales.svg",
            Metric::Profit => "top_profit.svg",
        };
        let path = dir.join(file_name);
        render::write_svg(chart, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Resolves configuration for `source` and loads its table through the process cache.
pub(crate) fn load_source(
    source: &SourceArgs,
    top: Option<usize>,
) -> Result<(DashboardConfig, Arc<SalesTable>)> {
    let config = DashboardConfig::resolve(source.config.as_deref())?.with_overrides(
        source.input.as_deref(),
        source.sheet.as_deref(),
        top,
    );
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&config.input, source.delimiter);
    if io_utils::detect_format(&config.input) == Some(io_utils::InputFormat::Delimited) {
        info!(
            "Loading '{}' with delimiter '{}'",
            config.input.display(),
            printable_delimiter(delimiter)
        );
    } else {
        info!("Loading '{}'", config.input.display());
    }
    let options = LoadOptions {
        sheet: config.sheet.as_deref(),
        delimiter: source.delimiter,
        encoding,
    };
    let table = loader::load_cached(&config.input, &options)?;
    Ok((config, table))
}

pub fn execute(args: &ReportArgs) -> Result<()> {
    let (config, table) = load_source(&args.source, args.top)?;
    let region = Selection::parse(args.region.as_deref(), ALL_REGIONS);
    let state = Selection::parse(args.state.as_deref(), ALL_STATES);
    debug!("Selection: region={region:?} state={state:?} top={}", config.top);

    let dashboard = build_dashboard(&table, &config.columns, &region, &state, config.top)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_dashboard_text(&dashboard)),
        OutputFormat::Json => println!("{}", render_dashboard_json(&dashboard)?),
    }
    if let Some(dir) = &args.svg_dir {
        let written = write_svg_charts(&dashboard, dir)?;
        info!("Wrote {} chart(s) to {:?}", written.len(), dir);
    }
    info!(
        "Report for {} - {} covered {} row(s)",
        dashboard.region, dashboard.state, dashboard.rows_selected
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn sample() -> SalesTable {
        let headers = ["Product Name", "Region", "State", "Sales", "Quantity", "Profit"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows = [
            ("Desk", "West", "California", "300", "1", "30"),
            ("Chair", "West", "Oregon", "150", "2", "-10"),
            ("Lamp", "East", "New York", "40", "4", "12"),
        ]
        .iter()
        .map(|(p, r, s, sa, q, pr)| {
            [p, r, s, sa, q, pr]
                .iter()
                .map(|v| Value::from(**v))
                .collect::<Vec<_>>()
        })
        .collect();
        SalesTable::new(headers, rows)
    }

    #[test]
    fn dashboard_for_all_regions_has_two_charts() {
        let dashboard = build_dashboard(
            &sample(),
            &ColumnNames::default(),
            &Selection::All,
            &Selection::All,
            5,
        )
        .expect("dashboard");
        assert_eq!(
            dashboard.subheader,
            "Análisis de Ventas y Ganancias para: Todas - Todos"
        );
        assert_eq!(dashboard.region_options, vec!["Todas", "West", "East"]);
        assert_eq!(dashboard.sections.len(), 2);
        assert!(dashboard.sections.iter().all(|s| s.chart.is_some()));
        assert_eq!(dashboard.sections[1].top.rows[0].product, "Desk");
    }

    #[test]
    fn unmatched_region_reports_no_data() {
        let dashboard = build_dashboard(
            &sample(),
            &ColumnNames::default(),
            &Selection::Only("South".to_string()),
            &Selection::All,
            5,
        )
        .expect("dashboard");
        assert_eq!(dashboard.state, "No Disponible");
        assert_eq!(dashboard.rows_selected, 0);
        for section in &dashboard.sections {
            assert!(section.chart.is_none());
            assert!(matches!(section.notices.as_slice(), [Notice::Info(_)]));
        }
        let text = render_dashboard_text(&dashboard);
        assert!(text.contains("info: No hay datos suficientes"));
    }

    #[test]
    fn missing_profit_column_warns_only_in_profit_section() {
        let table = SalesTable::new(
            vec!["Product Name".to_string(), "Region".to_string(), "Sales".to_string()],
            vec![vec![Value::from("Desk"), Value::from("West"), Value::from("3")]],
        );
        let dashboard = build_dashboard(
            &table,
            &ColumnNames::default(),
            &Selection::All,
            &Selection::All,
            5,
        )
        .expect("dashboard");
        assert!(dashboard.sections[0].chart.is_some());
        assert!(dashboard.sections[0].notices.is_empty());
        assert!(matches!(
            dashboard.sections[1].notices.as_slice(),
            [Notice::Warning(_), Notice::Info(_)]
        ));
    }

    #[test]
    fn json_rendering_tags_notices() {
        let dashboard = build_dashboard(
            &sample(),
            &ColumnNames::default(),
            &Selection::Only("South".to_string()),
            &Selection::All,
            5,
        )
        .expect("dashboard");
        let json: serde_json::Value =
            serde_json::from_str(&render_dashboard_json(&dashboard).expect("json")).expect("parse");
        assert_eq!(json["sections"][0]["notices"][0]["level"], "info");
        assert!(json["sections"][0]["chart"].is_null());
    }

    #[test]
    fn headings_follow_top_n() {
        let dashboard = build_dashboard(
            &sample(),
            &ColumnNames::default(),
            &Selection::All,
            &Selection::All,
            2,
        )
        .expect("dashboard");
        assert_eq!(dashboard.sections[0].heading, "Top 2 Productos por Ventas");
        assert_eq!(dashboard.sections[0].top.rows.len(), 2);
    }
}
