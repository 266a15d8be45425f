//! Reads the sales spreadsheet into a [`SalesTable`].
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) go through `calamine`
//! and use the first worksheet unless a sheet name is given; delimited text
//! goes through the `csv` reader. The first row is always the header row.
//! [`load_cached`] memoizes tables per source so the file is read once per
//! process.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};
use thiserror::Error;

use crate::{
    data::{SalesTable, Value},
    io_utils::{self, InputFormat},
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "El archivo '{}' no se encontró. Asegúrate de que está en la misma carpeta que la aplicación.",
        path.display()
    )]
    NotFound { path: PathBuf },
    #[error("Formato de archivo no soportado para '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("Error al cargar los datos: {detail}")]
    Read { path: PathBuf, detail: String },
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    pub sheet: Option<&'a str>,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    sheet: Option<String>,
    delimiter: Option<u8>,
    encoding: &'static str,
}

type TableCache = Mutex<HashMap<CacheKey, Arc<SalesTable>>>;

static TABLE_CACHE: OnceLock<TableCache> = OnceLock::new();

fn cache() -> &'static TableCache {
    TABLE_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Loads `path` once per process; later calls with the same source share the table.
///
/// stdin (`-`) is never cached because it cannot be read twice.
pub fn load_cached(path: &Path, options: &LoadOptions<'_>) -> Result<Arc<SalesTable>, LoadError> {
    if io_utils::is_dash(path) {
        return load_table(path, options).map(Arc::new);
    }
    let key = CacheKey {
        path: path.to_path_buf(),
        sheet: options.sheet.map(str::to_string),
        delimiter: options.delimiter,
        encoding: options.encoding.name(),
    };
    if let Some(table) = cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        debug!("Reusing cached table for {path:?}");
        return Ok(Arc::clone(table));
    }
    let table = Arc::new(load_table(path, options)?);
    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::clone(&table));
    Ok(table)
}

pub fn load_table(path: &Path, options: &LoadOptions<'_>) -> Result<SalesTable, LoadError> {
    if !io_utils::is_dash(path) && !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let format = io_utils::detect_format(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let loaded = match format {
        InputFormat::Workbook => read_workbook(path, options.sheet),
        InputFormat::Delimited => read_delimited(path, options),
    };
    let table = loaded.map_err(|err| LoadError::Read {
        path: path.to_path_buf(),
        detail: format!("{err:#}"),
    })?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.len(),
        table.headers().len(),
        path
    );
    Ok(table)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<SalesTable> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook {path:?} has no worksheets"))?,
    };
    debug!("Reading worksheet '{sheet_name}' from {path:?}");
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading worksheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_value(cell).as_key()).collect())
        .unwrap_or_default();
    let data = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Value::is_empty))
        .collect();
    Ok(SalesTable::new(headers, data))
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) => Value::from(s.as_str()),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::Text(other.to_string()),
    }
}

fn read_delimited(path: &Path, options: &LoadOptions<'_>) -> Result<SalesTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
        .with_context(|| format!("Opening input file {path:?}"))?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, options.encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        let row = decoded
            .iter()
            .map(|field| Value::from(field.as_str()))
            .collect::<Vec<_>>();
        if row.iter().all(Value::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(SalesTable::new(headers, rows))
}
