//! Report display formatting
//!
//! Renders reconciliation reports as terminal grids and the payment-mode
//! breakdown as a proportional bar list.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::models::{Money, PaymentMethod};
use crate::reports::{MethodBreakdown, ReconciliationReport, ReportRow};

/// Width of a 100% bar in the breakdown
const BAR_WIDTH: usize = 30;

fn amount(m: Money, symbol: &str) -> String {
    m.format_with_symbol(symbol)
}

fn header(report: &ReconciliationReport) -> String {
    let mut output = format!("{}: {}\n", report.kind.title(), report.range);
    if report.is_degraded() {
        let names: Vec<&str> = report.degraded.iter().map(|d| d.label()).collect();
        output.push_str(&format!(
            "WARNING: partial data, {} could not be loaded and count as zero\n",
            names.join(", ")
        ));
    }
    output
}

/// Format the report for terminal display
///
/// The compact grid shows net per method. With `detailed` each method gets
/// In, Out and Net columns.
pub fn format_reconciliation(report: &ReconciliationReport, symbol: &str, detailed: bool) -> String {
    let mut output = header(report);

    if report.is_empty() {
        output.push_str("No transactions in this period.\n");
        return output;
    }

    let mut builder = Builder::default();

    let mut columns = vec!["Date".to_string()];
    for method in PaymentMethod::ALL {
        if detailed {
            columns.push(format!("{} In", method));
            columns.push(format!("{} Out", method));
            columns.push(format!("{} Net", method));
        } else {
            columns.push(method.to_string());
        }
    }
    columns.push("Total".to_string());
    builder.push_record(columns);

    for row in report.display_rows() {
        builder.push_record(row_cells(row, symbol, detailed));
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.modify(Columns::new(1..), Alignment::right());

    output.push_str(&table.to_string());
    output.push('\n');

    if report.pending.entries > 0 {
        output.push_str(&format!(
            "\nStaff advances: given {}, received {}, outstanding {}\n",
            amount(report.pending.given, symbol),
            amount(report.pending.received, symbol),
            amount(report.pending.outstanding(), symbol),
        ));
    }

    output
}

fn row_cells(row: &ReportRow, symbol: &str, detailed: bool) -> Vec<String> {
    let mut cells = vec![row.kind.to_string()];
    for method in PaymentMethod::ALL {
        if detailed {
            cells.push(amount(row.inflow[method], symbol));
            cells.push(amount(row.outflow[method], symbol));
        }
        cells.push(amount(row.net[method], symbol));
    }
    cells.push(amount(row.total, symbol));
    cells
}

/// Format the payment-mode breakdown with proportional bars
pub fn format_breakdown(report: &ReconciliationReport, breakdown: &MethodBreakdown, symbol: &str) -> String {
    let mut output = header(report);
    output.push_str(&format!("Period total: {}\n\n", amount(breakdown.total, symbol)));

    for share in breakdown.ranked() {
        let filled = ((share.percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        output.push_str(&format!(
            "{:<5} {:>14} {:>7.1}%  {}\n",
            share.method.label(),
            amount(share.amount, symbol),
            share.percentage,
            "#".repeat(filled)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarDate, DateRange, Domain, ReportKind, TransactionRecord};
    use crate::reports::ReportOptions;

    fn sample_report() -> ReconciliationReport {
        let day = CalendarDate::from_ymd(2024, 3, 15).unwrap();
        let records = vec![
            TransactionRecord::inflow(Domain::Restaurant, day, PaymentMethod::Cash, Money::from_units(750)),
            TransactionRecord::inflow(Domain::GuestHouse, day, PaymentMethod::Card, Money::from_units(250)),
            TransactionRecord::outflow(Domain::Office, day, PaymentMethod::Cash, Money::from_units(50))
                .with_category("Pending"),
        ];
        ReconciliationReport::generate(
            ReportKind::Merged,
            DateRange::single(day),
            &records,
            &ReportOptions::default(),
        )
    }

    #[test]
    fn test_compact_grid() {
        let text = format_reconciliation(&sample_report(), "₹", false);
        assert!(text.starts_with("Office Merged Reconciliation: 15-03-2024 to 15-03-2024"));
        assert!(text.contains("15-03-2024"));
        assert!(text.contains("₹700.00"));
        assert!(text.contains("Total"));
        assert!(text.contains("Average"));
        assert!(!text.contains("Cash In"));
        assert!(text.contains("outstanding ₹50.00"));
    }

    #[test]
    fn test_detailed_grid_has_legs() {
        let text = format_reconciliation(&sample_report(), "₹", true);
        assert!(text.contains("Cash In"));
        assert!(text.contains("Cash Out"));
        assert!(text.contains("₹750.00"));
    }

    #[test]
    fn test_degraded_warning() {
        let mut report = sample_report();
        report.degraded = vec![Domain::Office];
        let text = format_reconciliation(&report, "₹", false);
        assert!(text.contains("WARNING: partial data, Office could not be loaded"));
    }

    #[test]
    fn test_empty_report_message() {
        let day = CalendarDate::from_ymd(2024, 3, 15).unwrap();
        let report = ReconciliationReport::generate(
            ReportKind::Office,
            DateRange::single(day),
            &Vec::<TransactionRecord>::new(),
            &ReportOptions::default(),
        );
        let text = format_reconciliation(&report, "₹", false);
        assert!(text.contains("No transactions in this period."));
    }

    #[test]
    fn test_breakdown_bars() {
        let report = sample_report();
        let breakdown = MethodBreakdown::from_report(&report);
        let text = format_breakdown(&report, &breakdown, "₹");

        assert!(text.contains("Period total: ₹950.00"));
        let cash_line = text.lines().find(|l| l.starts_with("Cash")).unwrap();
        assert!(cash_line.contains("73.7%"));
        assert!(cash_line.ends_with(&"#".repeat(22)));
    }
}
