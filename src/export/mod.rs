//! Export module for backoffice-cli
//!
//! Writes reconciliation rows to spreadsheet files:
//! - XLSX: the format the office hands to the accountant
//! - CSV: for anything else that reads plain text
//!
//! File names come from the report kind and the displayed date range.
//! Summary rows (Total, Average) are never exported, and an empty report is
//! refused instead of producing an empty file.

pub mod csv;
pub mod xlsx;

pub use self::csv::export_csv;
pub use self::xlsx::{export_xlsx, write_xlsx_buffer};

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{DateRange, PaymentMethod, ReportKind};
use crate::reports::{ReconciliationReport, ReportRow};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// File name for an export, e.g. `office_merged_01-03-2024_to_31-03-2024.xlsx`
pub fn export_file_name(kind: ReportKind, range: DateRange, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        kind.file_prefix(),
        range.label(),
        format.extension()
    )
}

/// Column headers shared by every export format
pub fn column_headers() -> Vec<String> {
    let mut headers = vec!["Date".to_string()];
    for method in PaymentMethod::ALL {
        headers.push(format!("{} In", method));
        headers.push(format!("{} Out", method));
        headers.push(format!("{} Net", method));
    }
    headers.push("Total".to_string());
    headers
}

/// Rows to export, or an error when there are none
fn rows_to_export(report: &ReconciliationReport) -> BackofficeResult<Vec<&ReportRow>> {
    let rows = report.export_rows();
    if rows.is_empty() {
        return Err(BackofficeError::nothing_to_export());
    }
    Ok(rows)
}

/// Export a report into `dir` using the derived file name
///
/// Returns the path written.
pub fn export_report(
    report: &ReconciliationReport,
    format: ExportFormat,
    dir: &Path,
) -> BackofficeResult<PathBuf> {
    // Refuse before touching the filesystem
    rows_to_export(report)?;

    std::fs::create_dir_all(dir).map_err(|e| {
        BackofficeError::Export(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    let path = dir.join(export_file_name(report.kind, report.range, format));

    match format {
        ExportFormat::Xlsx => export_xlsx(report, &path)?,
        ExportFormat::Csv => {
            let file = std::fs::File::create(&path).map_err(|e| {
                BackofficeError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            export_csv(report, std::io::BufWriter::new(file))?;
        }
    }

    info!(path = %path.display(), rows = report.export_rows().len(), "report exported");
    Ok(path)
}
