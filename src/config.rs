//! Dashboard configuration: built-in defaults, optional YAML file, CLI overrides.
//!
//! Resolution order is defaults, then the `--config` file, then explicit
//! command-line flags. The YAML layout mirrors [`DashboardConfig`]:
//!
//! ```yaml
//! input: ventas.xlsx
//! sheet: Orders
//! top: 10
//! columns:
//!   product: Producto
//!   profit: Ganancia
//! ```

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT: &str = "SalidaVentas.xlsx";
pub const DEFAULT_TOP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub product: String,
    pub region: String,
    pub state: String,
    pub sales: String,
    pub quantity: String,
    pub profit: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            product: "Product Name".to_string(),
            region: "Region".to_string(),
            state: "State".to_string(),
            sales: "Sales".to_string(),
            quantity: "Quantity".to_string(),
            profit: "Profit".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub sheet: Option<String>,
    pub top: usize,
    pub columns: ColumnNames,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            sheet: None,
            top: DEFAULT_TOP,
            columns: ColumnNames::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config: DashboardConfig =
            serde_yaml::from_reader(reader).context("Parsing dashboard config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(input).context("Parsing dashboard config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_overrides(
        mut self,
        input: Option<&Path>,
        sheet: Option<&str>,
        top: Option<usize>,
    ) -> Self {
        if let Some(input) = input {
            self.input = input.to_path_buf();
        }
        if let Some(sheet) = sheet {
            self.sheet = Some(sheet.to_string());
        }
        if let Some(top) = top {
            self.top = top;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        let columns = &self.columns;
        for (key, value) in [
            ("product", &columns.product),
            ("region", &columns.region),
            ("state", &columns.state),
            ("sales", &columns.sales),
            ("quantity", &columns.quantity),
            ("profit", &columns.profit),
        ] {
            ensure!(
                !value.trim().is_empty(),
                "Column name for '{key}' must not be empty"
            );
        }
        Ok(())
    }
}
