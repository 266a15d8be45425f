use std::fmt;

use serde::{Deserialize, Serialize};

/// A single loosely typed cell as read from the source spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Exact text of the cell, used wherever cells are compared or grouped.
    ///
    /// Numbers keep their full precision here; [`Value::as_display`] rounds.
    pub fn as_key(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
        }
    }

    /// Coerces the cell into a number; anything that does not parse counts as zero.
    pub fn to_numeric(&self) -> f64 {
        match self {
            Value::Empty => 0.0,
            Value::Number(n) if n.is_finite() => *n,
            Value::Number(_) => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => coerce_numeric(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Value::Empty
        } else {
            Value::Text(value.to_string())
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

pub fn coerce_numeric(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// An in-memory transaction table: one header row plus data rows of equal width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SalesTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|header| header.trim() == name.trim())
            })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns a new table holding the rows accepted by `keep`; `self` is left untouched.
    pub fn retain_rows<F>(&self, mut keep: F) -> SalesTable
    where
        F: FnMut(&[Value]) -> bool,
    {
        SalesTable {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_numeric_maps_invalid_values_to_zero() {
        assert_eq!(Value::from("12.5").to_numeric(), 12.5);
        assert_eq!(Value::from(" 7 ").to_numeric(), 7.0);
        assert_eq!(Value::from("n/a").to_numeric(), 0.0);
        assert_eq!(Value::from("1,234").to_numeric(), 0.0);
        assert_eq!(Value::Empty.to_numeric(), 0.0);
        assert_eq!(Value::Number(f64::NAN).to_numeric(), 0.0);
        assert_eq!(Value::Bool(true).to_numeric(), 1.0);
    }

    #[test]
    fn display_drops_trailing_zero_fraction() {
        assert_eq!(Value::Number(15.0).as_display(), "15");
        assert_eq!(Value::Number(2.346).as_display(), "2.35");
        assert_eq!(Value::from("West").as_display(), "West");
    }

    #[test]
    fn key_keeps_full_precision() {
        assert_eq!(Value::Number(1.234).as_key(), "1.234");
        assert_ne!(Value::Number(1.234).as_key(), Value::Number(1.231).as_key());
        assert_eq!(Value::Number(3.0).as_key(), "3");
        assert_eq!(Value::from("West").as_key(), "West");
        assert_eq!(Value::Empty.as_key(), "");
    }

    #[test]
    fn new_pads_short_rows() {
        let table = SalesTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::from("x")]],
        );
        assert_eq!(table.rows()[0], vec![Value::from("x"), Value::Empty]);
    }

    #[test]
    fn retain_rows_leaves_source_intact() {
        let table = SalesTable::new(
            vec!["Region".to_string()],
            vec![vec![Value::from("East")], vec![Value::from("West")]],
        );
        let narrowed = table.retain_rows(|row| row[0].as_key() == "East");
        assert_eq!(narrowed.len(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn column_index_tolerates_padded_headers() {
        let table = SalesTable::new(vec![" Sales ".to_string()], Vec::new());
        assert_eq!(table.column_index("Sales"), Some(0));
        assert!(!table.has_column("Profit"));
    }
}
