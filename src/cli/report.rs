//! CLI commands for reports
//!
//! `reconcile` and `breakdown` load a period from the backend (or a saved
//! snapshot directory), build the reconciliation report and print it.
//! `snapshot` saves the backend's records to disk for offline use.

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::config::{BackofficePaths, Settings};
use crate::display::{format_breakdown, format_reconciliation};
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::{export_report, ExportFormat};
use crate::fetch::{ApiClient, FetchError, LoadOutcome, LoadedPeriod, RecordSource, ReconciliationLoader};
use crate::models::{CalendarDate, DateRange, Domain, ReportKind, TransactionRecord};
use crate::reports::{MethodBreakdown, ReconciliationReport, ReportOptions};
use crate::storage::FileSource;

/// Which dashboard and period to load
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Dashboard to report on
    #[arg(short, long, value_enum, default_value = "merged")]
    pub kind: ReportKind,

    /// Start date (DD-MM-YYYY or YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (DD-MM-YYYY or YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Read records from a snapshot directory instead of the backend
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Include the opening balance row for this run
    #[arg(long, conflicts_with = "no_opening")]
    pub opening: bool,

    /// Leave out the opening balance row for this run
    #[arg(long)]
    pub no_opening: bool,
}

/// Arguments of the `reconcile` command
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Show In, Out and Net columns per payment method
    #[arg(short, long)]
    pub detailed: bool,

    /// Export the rows to a file
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Directory for exported files (defaults to the exports directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments of the `snapshot` command
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Start date (DD-MM-YYYY or YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (DD-MM-YYYY or YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Directory to write the domain files into
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,
}

/// Where records come from for one run
pub enum DataSource {
    Api(ApiClient),
    Files(FileSource),
}

impl DataSource {
    /// Snapshot directory when given, otherwise the configured backend
    pub fn select(settings: &Settings, source_dir: Option<PathBuf>) -> BackofficeResult<Self> {
        match source_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(BackofficeError::Validation(format!(
                        "Snapshot directory not found: {}",
                        dir.display()
                    )));
                }
                Ok(DataSource::Files(FileSource::new(dir)))
            }
            None => Ok(DataSource::Api(ApiClient::new(&settings.api)?)),
        }
    }
}

impl RecordSource for DataSource {
    async fn fetch(
        &self,
        domain: Domain,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        match self {
            DataSource::Api(client) => client.fetch(domain, range).await,
            DataSource::Files(files) => files.fetch(domain, range).await,
        }
    }
}

fn parse_date(label: &str, text: &str) -> BackofficeResult<CalendarDate> {
    CalendarDate::parse(text).map_err(|e| {
        BackofficeError::Validation(format!("Invalid {} date '{}': {}", label, text, e))
    })
}

/// Resolve the range for a run
///
/// A missing end falls back to the remembered range, then to today. A
/// missing start does the same.
pub fn resolve_range(
    remembered: Option<DateRange>,
    start: Option<&str>,
    end: Option<&str>,
) -> BackofficeResult<DateRange> {
    let today = CalendarDate::today();
    let start = match start {
        Some(text) => parse_date("start", text)?,
        None => remembered.map(|r| r.start()).unwrap_or(today),
    };
    let end = match end {
        Some(text) => parse_date("end", text)?,
        None => remembered.map(|r| r.end()).unwrap_or(today),
    };
    DateRange::new(start, end)
}

fn report_options(settings: &Settings, period: &PeriodArgs) -> ReportOptions {
    let mut options = ReportOptions::from_settings(settings, period.kind);
    if period.opening {
        options.opening = Some(settings.dashboard(period.kind).opening_balances);
    } else if period.no_opening {
        options.opening = None;
    }
    options
}

async fn load_period<S: RecordSource>(
    loader: &ReconciliationLoader<S>,
    kind: ReportKind,
    range: DateRange,
) -> BackofficeResult<LoadedPeriod> {
    match loader.load(kind, range).await {
        LoadOutcome::Current(period) => Ok(period),
        LoadOutcome::Superseded { generation, latest } => Err(BackofficeError::Validation(
            format!("Load {} was superseded by load {}", generation, latest),
        )),
    }
}

/// Load the period and build its report, remembering the range used
async fn build_report(
    paths: &BackofficePaths,
    settings: &mut Settings,
    period: &PeriodArgs,
) -> BackofficeResult<ReconciliationReport> {
    let range = resolve_range(
        settings.dashboard(period.kind).last_range,
        period.start.as_deref(),
        period.end.as_deref(),
    )?;

    let source = DataSource::select(settings, period.source_dir.clone())?;
    let loader = ReconciliationLoader::new(source);
    let loaded = load_period(&loader, period.kind, range).await?;

    let report = ReconciliationReport::from_period(&loaded, &report_options(settings, period));

    settings.remember_range(period.kind, range);
    settings.save(paths)?;

    Ok(report)
}

/// Handle the `reconcile` command
pub async fn handle_reconcile_command(
    paths: &BackofficePaths,
    settings: &mut Settings,
    args: ReconcileArgs,
) -> BackofficeResult<()> {
    let report = build_report(paths, settings, &args.period).await?;

    println!(
        "{}",
        format_reconciliation(&report, &settings.currency_symbol, args.detailed)
    );

    if let Some(format) = args.export {
        let dir = args.output.unwrap_or_else(|| paths.export_dir());
        let path = export_report(&report, format, &dir)?;
        println!("Report exported to: {}", path.display());
    }

    Ok(())
}

/// Handle the `breakdown` command
pub async fn handle_breakdown_command(
    paths: &BackofficePaths,
    settings: &mut Settings,
    period: PeriodArgs,
) -> BackofficeResult<()> {
    let report = build_report(paths, settings, &period).await?;
    let breakdown = MethodBreakdown::from_report(&report);

    println!(
        "{}",
        format_breakdown(&report, &breakdown, &settings.currency_symbol)
    );

    Ok(())
}

/// Handle the `snapshot` command
///
/// Domains that fail to load are skipped; whatever loaded is still written.
pub async fn handle_snapshot_command(
    settings: &Settings,
    args: SnapshotArgs,
) -> BackofficeResult<()> {
    let range = resolve_range(None, args.start.as_deref(), args.end.as_deref())?;
    let loader = ReconciliationLoader::new(ApiClient::new(&settings.api)?);
    let loaded = load_period(&loader, ReportKind::Merged, range).await?;

    let target = FileSource::new(args.dir);
    let failed = loaded.failed_domains();

    for domain in Domain::ALL {
        if failed.contains(&domain) {
            continue;
        }
        let records = loaded.records(domain);
        target.write_domain(domain, records)?;
        info!(%domain, records = records.len(), "snapshot written");
        println!(
            "{:<12} {:>6} records -> {}",
            domain.label(),
            records.len(),
            target.domain_file(domain).display()
        );
    }

    for failure in &loaded.failures {
        warn!(domain = %failure.domain, error = %failure.error, "snapshot skipped domain");
        println!("{:<12} skipped: {}", failure.domain.label(), failure.error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod};
    use tempfile::TempDir;

    fn day(d: u32) -> CalendarDate {
        CalendarDate::from_ymd(2024, 3, d).unwrap()
    }

    fn period(kind: ReportKind) -> PeriodArgs {
        PeriodArgs {
            kind,
            start: None,
            end: None,
            source_dir: None,
            opening: false,
            no_opening: false,
        }
    }

    #[test]
    fn test_resolve_range_explicit() {
        let range = resolve_range(None, Some("01-03-2024"), Some("2024-03-31")).unwrap();
        assert_eq!(range.start(), day(1));
        assert_eq!(range.end(), day(31));
    }

    #[test]
    fn test_resolve_range_falls_back_to_remembered() {
        let remembered = DateRange::new(day(5), day(9)).unwrap();
        let range = resolve_range(Some(remembered), None, Some("12-03-2024")).unwrap();
        assert_eq!(range.start(), day(5));
        assert_eq!(range.end(), day(12));
    }

    #[test]
    fn test_resolve_range_rejects_inverted() {
        let err = resolve_range(None, Some("20-03-2024"), Some("10-03-2024")).unwrap_err();
        assert!(err.is_validation());
        let err = resolve_range(None, Some("not a date"), Some("10-03-2024")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_opening_flags_override_dashboard() {
        let mut settings = Settings::default();
        settings
            .dashboard_mut(ReportKind::Office)
            .opening_balances
            .set(PaymentMethod::Cash, Money::from_units(40));

        let mut args = period(ReportKind::Office);
        assert!(report_options(&settings, &args).opening.is_none());

        args.opening = true;
        let options = report_options(&settings, &args);
        assert_eq!(options.opening.map(|b| b.cash), Some(Money::from_units(40)));

        settings.dashboard_mut(ReportKind::Office).opening_balance_enabled = true;
        args.opening = false;
        args.no_opening = true;
        assert!(report_options(&settings, &args).opening.is_none());
    }

    #[test]
    fn test_missing_snapshot_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = DataSource::select(&Settings::default(), Some(missing));
        assert!(matches!(result, Err(BackofficeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_build_report_remembers_range() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().join("data"));
        let snapshot = FileSource::new(temp_dir.path().join("snap"));
        snapshot
            .write_domain(
                Domain::Restaurant,
                &[TransactionRecord::inflow(
                    Domain::Restaurant,
                    day(15),
                    PaymentMethod::Pp,
                    Money::from_units(60),
                )],
            )
            .unwrap();

        let mut settings = Settings::default();
        let mut args = period(ReportKind::Restaurant);
        args.start = Some("15-03-2024".into());
        args.end = Some("15-03-2024".into());
        args.source_dir = Some(snapshot.dir().to_path_buf());

        let report = build_report(&paths, &mut settings, &args).await.unwrap();
        assert_eq!(report.grand_total(), Money::from_units(60));

        let saved = Settings::load_or_create(&paths).unwrap();
        assert_eq!(
            saved.dashboard(ReportKind::Restaurant).last_range,
            Some(DateRange::single(day(15)))
        );
    }
}
