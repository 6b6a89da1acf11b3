//! Tabular exports.
//!
//! A [`Table`] is format neutral; a [`TableWriter`] turns it into bytes.

pub mod columns;
pub mod csv;
pub mod xlsx;

pub use self::csv::CsvWriter;
pub use self::xlsx::XlsxWriter;
pub use columns::{HeaderStyle, StudentColumn, student_table};

use crate::error::{ReportError, Result};
use crate::format::DocumentFormat;

/// Widest sheet Excel accepts.
pub const MAX_COLUMNS: usize = 16_384;

/// Rejects column lists wider than [`MAX_COLUMNS`].
pub fn check_column_count(count: usize) -> Result<()> {
    if count > MAX_COLUMNS {
        return Err(ReportError::TooManyColumns {
            count,
            max: MAX_COLUMNS,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    /// Rendered with two decimals
    Decimal(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Plain text rendering, as written to CSV.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Decimal(v) => format!("{v:.2}"),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    /// Spreadsheet column width in characters
    pub width: f64,
}

impl Column {
    pub fn new(title: impl Into<String>, width: f64) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

pub trait TableWriter {
    fn format(&self) -> DocumentFormat;

    fn write(&self, table: &Table) -> Result<Vec<u8>>;
}
