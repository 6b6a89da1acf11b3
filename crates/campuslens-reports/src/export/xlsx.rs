use rust_xlsxwriter::{Color, Format, Workbook};

use super::{Cell, MAX_COLUMNS, Table, TableWriter, check_column_count};
use crate::error::{ReportError, Result};
use crate::format::DocumentFormat;

const HEADER_FILL: u32 = 0xE0E0E0;

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ReportError::TooManyColumns {
        count: col + 1,
        max: MAX_COLUMNS,
    })
}

/// Single-sheet workbook with a bold, shaded header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl TableWriter for XlsxWriter {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Xlsx
    }

    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        check_column_count(table.columns.len())?;

        let mut workbook = Workbook::new();
        let header = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_FILL));
        let decimal = Format::new().set_num_format("0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.sheet_name.as_str())?;

        for (col, column) in table.columns.iter().enumerate() {
            let col = column_index(col)?;
            worksheet.set_column_width(col, column.width)?;
            worksheet.write_string_with_format(0, col, column.title.as_str(), &header)?;
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = column_index(col)?;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(row_num, col, s.as_str())?;
                    }
                    Cell::Integer(n) => {
                        worksheet.write_number(row_num, col, *n as f64)?;
                    }
                    Cell::Decimal(v) => {
                        worksheet.write_number_with_format(row_num, col, *v, &decimal)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}
