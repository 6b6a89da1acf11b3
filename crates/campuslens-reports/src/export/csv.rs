use super::{Cell, Table, TableWriter};
use crate::error::{ReportError, Result};
use crate::format::DocumentFormat;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl TableWriter for CsvWriter {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Csv
    }

    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = ::csv::WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(table.columns.iter().map(|c| c.title.as_str()))?;
        for row in &table.rows {
            writer.write_record(row.iter().map(Cell::display))?;
        }
        writer.flush()?;

        writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}
