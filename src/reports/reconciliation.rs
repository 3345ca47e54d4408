//! Payment Reconciliation Report
//!
//! Merges guest-house, restaurant and office money movements into one row per
//! calendar day with inflow, outflow and net per payment method. An optional
//! opening balance row is counted once; a totals row and an average row close
//! the report.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut};

use tracing::debug;

use super::rules::InclusionRules;
use crate::config::Settings;
use crate::fetch::LoadedPeriod;
use crate::models::{
    CalendarDate, DateRange, Direction, Domain, Money, OpeningBalances, PaymentMethod, ReportKind,
    TransactionRecord,
};

/// One amount per payment method, in `PaymentMethod::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodAmounts([Money; 5]);

impl MethodAmounts {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_array(amounts: [Money; 5]) -> Self {
        Self(amounts)
    }

    /// Sum over all methods
    pub fn total(&self) -> Money {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaymentMethod, Money)> + '_ {
        PaymentMethod::ALL.iter().map(move |m| (*m, self[*m]))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Money::is_zero)
    }

    fn div_rounded(&self, divisor: i64) -> Self {
        Self(self.0.map(|m| m.div_rounded(divisor)))
    }
}

impl Index<PaymentMethod> for MethodAmounts {
    type Output = Money;

    fn index(&self, method: PaymentMethod) -> &Money {
        &self.0[method.index()]
    }
}

impl IndexMut<PaymentMethod> for MethodAmounts {
    fn index_mut(&mut self, method: PaymentMethod) -> &mut Money {
        &mut self.0[method.index()]
    }
}

impl Add for MethodAmounts {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for MethodAmounts {
    fn add_assign(&mut self, other: Self) {
        for method in PaymentMethod::ALL {
            self[method] += other[method];
        }
    }
}

impl From<&OpeningBalances> for MethodAmounts {
    fn from(balances: &OpeningBalances) -> Self {
        Self(balances.as_array())
    }
}

/// What a row stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowKind {
    /// Synthetic row carrying the configured opening balances
    Opening,
    Day(CalendarDate),
    Total,
    Average,
}

impl RowKind {
    /// Total and Average rows summarise other rows and are never exported
    pub fn is_summary(&self) -> bool {
        matches!(self, RowKind::Total | RowKind::Average)
    }

    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            RowKind::Day(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Opening => write!(f, "Opening Balance"),
            RowKind::Day(date) => write!(f, "{}", date),
            RowKind::Total => write!(f, "Total"),
            RowKind::Average => write!(f, "Average"),
        }
    }
}

/// One reconciliation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub kind: RowKind,
    pub inflow: MethodAmounts,
    pub outflow: MethodAmounts,
    /// `inflow - outflow` per method, or the balance itself on the opening row
    pub net: MethodAmounts,
    /// Sum of `net` over all methods
    pub total: Money,
}

impl ReportRow {
    fn new(kind: RowKind, inflow: MethodAmounts, outflow: MethodAmounts, net: MethodAmounts) -> Self {
        Self {
            kind,
            inflow,
            outflow,
            net,
            total: net.total(),
        }
    }

    fn day(date: CalendarDate, inflow: MethodAmounts, outflow: MethodAmounts) -> Self {
        let mut net = MethodAmounts::zero();
        for method in PaymentMethod::ALL {
            net[method] = inflow[method] - outflow[method];
        }
        Self::new(RowKind::Day(date), inflow, outflow, net)
    }

    fn opening(balances: &OpeningBalances) -> Self {
        Self::new(
            RowKind::Opening,
            MethodAmounts::zero(),
            MethodAmounts::zero(),
            balances.into(),
        )
    }
}

/// Staff advances booked under the office pending category
///
/// Money handed to staff (aapvana) and received back (levana); the
/// difference is what staff still owe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingLedger {
    pub given: Money,
    pub received: Money,
    pub entries: usize,
}

impl PendingLedger {
    pub fn outstanding(&self) -> Money {
        self.given - self.received
    }
}

/// Knobs that shape a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Opening balances to prepend, when enabled for the dashboard
    pub opening: Option<OpeningBalances>,
    pub show_average: bool,
    pub rules: InclusionRules,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            opening: None,
            show_average: true,
            rules: InclusionRules::default(),
        }
    }
}

impl ReportOptions {
    /// Options for a dashboard as configured in the settings
    pub fn from_settings(settings: &Settings, kind: ReportKind) -> Self {
        let prefs = settings.dashboard(kind);
        Self {
            opening: prefs
                .opening_balance_enabled
                .then_some(prefs.opening_balances),
            show_average: settings.show_average_row,
            rules: settings.inclusion.clone(),
        }
    }

    pub fn with_opening(mut self, balances: OpeningBalances) -> Self {
        self.opening = Some(balances);
        self
    }
}

/// Payment Reconciliation Report
#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    pub kind: ReportKind,
    pub range: DateRange,
    /// Opening row (if enabled) followed by one row per date, ascending
    pub rows: Vec<ReportRow>,
    /// Sum of every row in `rows`; absent when `rows` is empty
    pub totals: Option<ReportRow>,
    /// Per-day average of the dated rows; absent without dated rows
    pub average: Option<ReportRow>,
    pub pending: PendingLedger,
    /// Domains that failed to load; their contribution is zero
    pub degraded: Vec<Domain>,
}

impl ReconciliationReport {
    /// Build the report from records of any number of domains
    pub fn generate<'a, I>(
        kind: ReportKind,
        range: DateRange,
        records: I,
        options: &ReportOptions,
    ) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut days: BTreeMap<CalendarDate, (MethodAmounts, MethodAmounts)> = BTreeMap::new();
        let mut pending = PendingLedger::default();
        let mut seen = 0usize;

        for record in records {
            if !range.contains(record.date) {
                continue;
            }
            seen += 1;

            // Every observed date gets a row, even if nothing on it counts
            let (inflow, outflow) = days.entry(record.date).or_default();

            if options.rules.is_pending(record) {
                pending.entries += 1;
                match record.direction {
                    Direction::Out => pending.given += record.amount,
                    Direction::In => pending.received += record.amount,
                }
            }

            if !options.rules.counts(record) {
                continue;
            }

            match record.direction {
                Direction::In => inflow[record.payment_method] += record.amount,
                Direction::Out => outflow[record.payment_method] += record.amount,
            }
        }

        let day_count = days.len();
        let mut rows = Vec::with_capacity(day_count + 1);
        if let Some(balances) = &options.opening {
            rows.push(ReportRow::opening(balances));
        }
        rows.extend(
            days.into_iter()
                .map(|(date, (inflow, outflow))| ReportRow::day(date, inflow, outflow)),
        );

        let totals = (!rows.is_empty()).then(|| Self::sum_rows(RowKind::Total, &rows));

        let average = if options.show_average && day_count > 0 {
            let dated: Vec<ReportRow> = rows
                .iter()
                .filter(|r| matches!(r.kind, RowKind::Day(_)))
                .cloned()
                .collect();
            let sum = Self::sum_rows(RowKind::Average, &dated);
            let n = day_count as i64;
            Some(ReportRow::new(
                RowKind::Average,
                sum.inflow.div_rounded(n),
                sum.outflow.div_rounded(n),
                sum.net.div_rounded(n),
            ))
        } else {
            None
        };

        debug!(%kind, records = seen, days = day_count, "reconciliation generated");

        Self {
            kind,
            range,
            rows,
            totals,
            average,
            pending,
            degraded: Vec::new(),
        }
    }

    /// Build the report for a loaded period, carrying its failures along
    pub fn from_period(period: &LoadedPeriod, options: &ReportOptions) -> Self {
        let mut report = Self::generate(period.kind, period.range, period.all_records(), options);
        report.degraded = period.failed_domains();
        report
    }

    fn sum_rows(kind: RowKind, rows: &[ReportRow]) -> ReportRow {
        let mut inflow = MethodAmounts::zero();
        let mut outflow = MethodAmounts::zero();
        let mut net = MethodAmounts::zero();
        for row in rows {
            inflow += row.inflow;
            outflow += row.outflow;
            net += row.net;
        }
        ReportRow::new(kind, inflow, outflow, net)
    }

    /// Dated rows only
    pub fn day_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| matches!(r.kind, RowKind::Day(_)))
    }

    /// Every row in display order: opening, days, total, average
    pub fn display_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows
            .iter()
            .chain(self.totals.iter())
            .chain(self.average.iter())
    }

    /// Rows that go into an export; never Total or Average
    pub fn export_rows(&self) -> Vec<&ReportRow> {
        self.display_rows().filter(|r| !r.kind.is_summary()).collect()
    }

    /// Grand total for the period (opening included once)
    pub fn grand_total(&self) -> Money {
        self.totals.as_ref().map(|t| t.total).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn day(d: u32) -> CalendarDate {
        CalendarDate::from_ymd(2024, 3, d).unwrap()
    }

    fn march() -> DateRange {
        DateRange::new(day(1), day(31)).unwrap()
    }

    fn inflow(domain: Domain, d: u32, method: PaymentMethod, units: i64) -> TransactionRecord {
        TransactionRecord::inflow(domain, day(d), method, Money::from_units(units))
    }

    fn outflow(domain: Domain, d: u32, method: PaymentMethod, units: i64) -> TransactionRecord {
        TransactionRecord::outflow(domain, day(d), method, Money::from_units(units))
    }

    fn generate(records: &[TransactionRecord], options: &ReportOptions) -> ReconciliationReport {
        ReconciliationReport::generate(ReportKind::Merged, march(), records, options)
    }

    #[test]
    fn test_example_scenario() {
        let records = vec![
            inflow(Domain::GuestHouse, 15, PaymentMethod::Cash, 500),
            inflow(Domain::GuestHouse, 15, PaymentMethod::Cash, 300),
            inflow(Domain::Restaurant, 15, PaymentMethod::Cash, 200),
            inflow(Domain::Office, 15, PaymentMethod::Cash, 100),
            outflow(Domain::Office, 15, PaymentMethod::Cash, 50),
        ];

        let report = generate(&records, &ReportOptions::default());

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.kind, RowKind::Day(day(15)));
        assert_eq!(row.inflow[PaymentMethod::Cash], Money::from_units(1100));
        assert_eq!(row.outflow[PaymentMethod::Cash], Money::from_units(50));
        assert_eq!(row.net[PaymentMethod::Cash], Money::from_units(1050));
        assert_eq!(row.total, Money::from_units(1050));
        assert_eq!(report.grand_total(), Money::from_units(1050));
    }

    #[test]
    fn test_date_union_is_sorted_and_unique() {
        let records = vec![
            inflow(Domain::Office, 20, PaymentMethod::Cash, 1),
            inflow(Domain::GuestHouse, 3, PaymentMethod::Card, 1),
            inflow(Domain::Restaurant, 20, PaymentMethod::Pp, 1),
            inflow(Domain::Restaurant, 7, PaymentMethod::Pps, 1),
            inflow(Domain::GuestHouse, 7, PaymentMethod::Cash, 1).with_settled(false),
        ];

        let report = generate(&records, &ReportOptions::default());

        let expected: Vec<CalendarDate> = records
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let dates: Vec<CalendarDate> = report.day_rows().filter_map(|r| r.kind.date()).collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_mixed_date_formats_collapse_to_one_row() {
        let raw = ["15-03-2024", "2024-03-15", "03-15-2024"];
        let records: Vec<TransactionRecord> = raw
            .iter()
            .map(|d| {
                TransactionRecord::inflow(
                    Domain::Restaurant,
                    CalendarDate::parse(d).unwrap(),
                    PaymentMethod::Cash,
                    Money::from_units(10),
                )
            })
            .collect();

        let report = generate(&records, &ReportOptions::default());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].net[PaymentMethod::Cash], Money::from_units(30));
    }

    #[test]
    fn test_net_identity_and_zero_fill() {
        let records = vec![
            inflow(Domain::Restaurant, 1, PaymentMethod::Pp, 70),
            outflow(Domain::Office, 1, PaymentMethod::Pp, 20),
            outflow(Domain::Office, 2, PaymentMethod::Cash, 40),
            inflow(Domain::GuestHouse, 2, PaymentMethod::Card, 90),
        ];

        let report = generate(&records, &ReportOptions::default());

        for row in report.display_rows().filter(|r| r.kind != RowKind::Average) {
            for method in PaymentMethod::ALL {
                assert_eq!(row.net[method], row.inflow[method] - row.outflow[method]);
            }
            assert_eq!(row.total, row.net.total());
        }
        let first = &report.rows[0];
        assert_eq!(first.net[PaymentMethod::Ppc], Money::zero());
        // Outflow-only day stays negative
        assert_eq!(report.rows[1].net[PaymentMethod::Cash], Money::from_units(-40));
    }

    #[test]
    fn test_card_outflow_has_no_leg() {
        let records = vec![
            inflow(Domain::GuestHouse, 5, PaymentMethod::Card, 100),
            outflow(Domain::Office, 5, PaymentMethod::Card, 30),
        ];

        let report = generate(&records, &ReportOptions::default());
        assert_eq!(report.rows[0].outflow[PaymentMethod::Card], Money::zero());
        assert_eq!(report.rows[0].net[PaymentMethod::Card], Money::from_units(100));
    }

    #[test]
    fn test_empty_input_gives_no_rows() {
        let report = generate(&[], &ReportOptions::default());
        assert!(report.is_empty());
        assert!(report.totals.is_none());
        assert!(report.average.is_none());
        assert!(report.export_rows().is_empty());
    }

    #[test]
    fn test_empty_input_with_opening_gives_single_row() {
        let mut balances = OpeningBalances::default();
        balances.set(PaymentMethod::Cash, Money::from_units(1000));
        balances.set(PaymentMethod::Pp, Money::from_units(250));
        let options = ReportOptions::default().with_opening(balances);

        let report = generate(&[], &options);

        assert_eq!(report.rows.len(), 1);
        let opening = &report.rows[0];
        assert_eq!(opening.kind, RowKind::Opening);
        assert_eq!(opening.net[PaymentMethod::Cash], Money::from_units(1000));
        assert!(opening.inflow.is_zero());
        assert!(opening.outflow.is_zero());
        assert_eq!(opening.total, Money::from_units(1250));
        assert!(report.average.is_none());
    }

    #[test]
    fn test_totals_count_opening_once() {
        let mut balances = OpeningBalances::default();
        balances.set(PaymentMethod::Cash, Money::from_units(1000));
        let options = ReportOptions::default().with_opening(balances);

        let records = vec![
            inflow(Domain::Restaurant, 1, PaymentMethod::Cash, 100),
            inflow(Domain::Restaurant, 2, PaymentMethod::Cash, 200),
            outflow(Domain::Office, 3, PaymentMethod::Cash, 50),
        ];
        let report = generate(&records, &options);
        let totals = report.totals.as_ref().unwrap();

        for method in PaymentMethod::ALL {
            let day_sum: Money = report.day_rows().map(|r| r.net[method]).sum();
            assert_eq!(totals.net[method], day_sum + balances.get(method));
        }
        assert_eq!(totals.net[PaymentMethod::Cash], Money::from_units(1250));
        assert_eq!(totals.inflow[PaymentMethod::Cash], Money::from_units(300));
        assert_eq!(report.grand_total(), Money::from_units(1250));
    }

    #[test]
    fn test_average_ignores_opening_row() {
        let mut balances = OpeningBalances::default();
        balances.set(PaymentMethod::Cash, Money::from_units(900));
        let options = ReportOptions::default().with_opening(balances);

        let records = vec![
            inflow(Domain::Restaurant, 1, PaymentMethod::Cash, 100),
            inflow(Domain::Restaurant, 2, PaymentMethod::Cash, 200),
        ];
        let report = generate(&records, &options);
        let average = report.average.as_ref().unwrap();

        assert_eq!(average.net[PaymentMethod::Cash], Money::from_units(150));
        assert_eq!(average.total, Money::from_units(150));
    }

    #[test]
    fn test_average_can_be_disabled() {
        let options = ReportOptions {
            show_average: false,
            ..Default::default()
        };
        let records = vec![inflow(Domain::Restaurant, 1, PaymentMethod::Cash, 100)];
        assert!(generate(&records, &options).average.is_none());
    }

    #[test]
    fn test_export_rows_exclude_summaries() {
        let options = ReportOptions::default().with_opening(OpeningBalances::default());
        let records = vec![
            inflow(Domain::Restaurant, 1, PaymentMethod::Cash, 100),
            inflow(Domain::Office, 2, PaymentMethod::Pps, 10),
        ];
        let report = generate(&records, &options);

        assert_eq!(report.display_rows().count(), 5);
        let exported = report.export_rows();
        assert_eq!(exported.len(), 3);
        assert!(exported.iter().all(|r| !r.kind.is_summary()));
    }

    #[test]
    fn test_pending_ledger_and_inflow_exclusion() {
        let records = vec![
            outflow(Domain::Office, 4, PaymentMethod::Cash, 500).with_category("Pending"),
            inflow(Domain::Office, 9, PaymentMethod::Cash, 200).with_category("Pending"),
            inflow(Domain::Office, 9, PaymentMethod::Cash, 75).with_category("Rent"),
        ];
        let report = generate(&records, &ReportOptions::default());

        assert_eq!(report.pending.given, Money::from_units(500));
        assert_eq!(report.pending.received, Money::from_units(200));
        assert_eq!(report.pending.outstanding(), Money::from_units(300));
        assert_eq!(report.pending.entries, 2);
        // Advance handed out is real cash leaving; repayment is not inflow
        assert_eq!(report.rows[0].net[PaymentMethod::Cash], Money::from_units(-500));
        assert_eq!(report.rows[1].inflow[PaymentMethod::Cash], Money::from_units(75));
    }

    #[test]
    fn test_unsettled_entry_date_still_appears() {
        let records = vec![inflow(Domain::GuestHouse, 12, PaymentMethod::Cash, 400).with_settled(false)];
        let report = generate(&records, &ReportOptions::default());

        assert_eq!(report.rows.len(), 1);
        assert!(report.rows[0].net.is_zero());
    }

    #[test]
    fn test_records_outside_range_ignored() {
        let range = DateRange::new(day(10), day(11)).unwrap();
        let records = vec![
            inflow(Domain::Restaurant, 9, PaymentMethod::Cash, 100),
            inflow(Domain::Restaurant, 10, PaymentMethod::Cash, 100),
        ];
        let report = ReconciliationReport::generate(
            ReportKind::Restaurant,
            range,
            &records,
            &ReportOptions::default(),
        );
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = Settings::default();
        assert_eq!(
            ReportOptions::from_settings(&settings, ReportKind::Merged).opening,
            None
        );

        let prefs = settings.dashboard_mut(ReportKind::Merged);
        prefs.opening_balance_enabled = true;
        prefs.opening_balances.set(PaymentMethod::Card, Money::from_units(7));
        settings.show_average_row = false;

        let options = ReportOptions::from_settings(&settings, ReportKind::Merged);
        assert_eq!(
            options.opening.map(|b| b.card),
            Some(Money::from_units(7))
        );
        assert!(!options.show_average);
        assert_eq!(
            ReportOptions::from_settings(&settings, ReportKind::Office).opening,
            None
        );
    }
}
