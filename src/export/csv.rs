//! CSV Export functionality

use std::io::Write;

use super::{column_headers, rows_to_export};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::PaymentMethod;
use crate::reports::ReconciliationReport;

fn export_err(e: impl std::fmt::Display) -> BackofficeError {
    BackofficeError::Export(e.to_string())
}

/// Export the report's rows to CSV
///
/// Amounts are plain decimals without currency symbols.
pub fn export_csv<W: Write>(report: &ReconciliationReport, writer: W) -> BackofficeResult<()> {
    let rows = rows_to_export(report)?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(column_headers()).map_err(export_err)?;

    for row in rows {
        let mut record = vec![row.kind.to_string()];
        for method in PaymentMethod::ALL {
            record.push(row.inflow[method].to_string());
            record.push(row.outflow[method].to_string());
            record.push(row.net[method].to_string());
        }
        record.push(row.total.to_string());
        csv.write_record(&record).map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}
