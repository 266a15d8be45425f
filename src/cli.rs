use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Top products by sales and profit, per region and state", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the top-N products by sales and by profit for a region/state selection
    Report(ReportArgs),
    /// List the region and state choices available for filtering
    Options(OptionsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Sales spreadsheet (.xlsx, .xls, .ods) or delimited file (.csv, .tsv); defaults to SalidaVentas.xlsx
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Worksheet to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// YAML file with input, sheet, top and column-name settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Region to analyse ("Todas" for every region)
    #[arg(short = 'r', long)]
    pub region: Option<String>,
    /// State to analyse ("Todos" for every state)
    #[arg(short = 's', long)]
    pub state: Option<String>,
    /// Number of products per ranking
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
    /// Output format for the report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Directory to write top_sales.svg and top_profit.svg into
    #[arg(long = "svg-dir")]
    pub svg_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Region whose states should be listed
    #[arg(short = 'r', long)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
