//! XLSX Export functionality

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::{column_headers, rows_to_export};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Money, PaymentMethod};
use crate::reports::ReconciliationReport;

const AMOUNT_FORMAT: &str = "#,##0.00";

impl From<XlsxError> for BackofficeError {
    fn from(err: XlsxError) -> Self {
        BackofficeError::Export(err.to_string())
    }
}

fn write_amount(
    sheet: &mut Worksheet,
    format: &Format,
    row: u32,
    col: u16,
    amount: Money,
) -> Result<(), XlsxError> {
    sheet.write_number_with_format(row, col, amount.as_f64(), format)?;
    Ok(())
}

fn build_workbook(report: &ReconciliationReport) -> BackofficeResult<Workbook> {
    let rows = rows_to_export(report)?;

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format(AMOUNT_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(report.kind.title())?;

    for (col, header) in column_headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    worksheet.set_column_width(0, 16)?;
    worksheet.set_freeze_panes(1, 1)?;

    for (i, report_row) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, report_row.kind.to_string())?;

        let mut col: u16 = 1;
        for method in PaymentMethod::ALL {
            write_amount(worksheet, &amount_format, row, col, report_row.inflow[method])?;
            write_amount(worksheet, &amount_format, row, col + 1, report_row.outflow[method])?;
            write_amount(worksheet, &amount_format, row, col + 2, report_row.net[method])?;
            col += 3;
        }
        write_amount(worksheet, &amount_format, row, col, report_row.total)?;
    }

    Ok(workbook)
}

/// Export the report's rows to an .xlsx file at `path`
///
/// Nothing is written when the report has no exportable rows.
pub fn export_xlsx(report: &ReconciliationReport, path: &Path) -> BackofficeResult<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    Ok(())
}

/// Render the workbook in memory
pub fn write_xlsx_buffer(report: &ReconciliationReport) -> BackofficeResult<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}
