//! Spreadsheet export.
//!
//! Layout: the title merged across every column on row 1, the header on
//! row 3, one row per employee after that.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::info;

use crate::metrics::CalculatedEmployee;
use crate::report::{Cell, Report};

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 2;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("there are no employees to export")]
    NoEmployees,

    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Options of one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions<'a> {
    pub title: &'a str,
    pub sheet_name: &'a str,
}

/// Write `employees` as a single-sheet workbook at `path`.
///
/// Nothing is written when there are no employees.
pub fn write_xlsx(
    employees: &[CalculatedEmployee<'_>],
    options: &ExportOptions<'_>,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let report = Report::build(employees);
    if report.is_empty() {
        return Err(ExportError::NoEmployees);
    }

    let mut workbook = build_workbook(&report, options)?;
    workbook.save(path.as_ref())?;

    info!(
        path = %path.as_ref().display(),
        employees = report.rows.len(),
        "spreadsheet exported"
    );
    Ok(())
}

fn build_workbook(report: &Report, options: &ExportOptions<'_>) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(options.sheet_name)?;
    fill_sheet(worksheet, report, options.title)?;
    Ok(workbook)
}

fn fill_sheet(worksheet: &mut Worksheet, report: &Report, title: &str) -> Result<(), XlsxError> {
    let title_format = Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Center);
    let header_format = Format::new().set_bold();

    let last_col = (report.headers.len() - 1) as u16;
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, title, &title_format)?;

    for (col, header) in report.headers.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, header, &header_format)?;
    }

    for (offset, row) in report.rows.iter().enumerate() {
        let row_num = HEADER_ROW + 1 + offset as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => worksheet.write_string(row_num, col as u16, text)?,
                Cell::Number(days) => worksheet.write_number(row_num, col as u16, days.to_float())?,
            };
        }
    }

    for (col, width) in report.column_widths().into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(())
}
