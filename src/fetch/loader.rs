//! Concurrent loading of every domain a report needs
//!
//! All domain fetches for one request run together and are joined before
//! anything is aggregated. Each request takes a generation number; when a
//! newer request was started while this one was in flight, the older result
//! is dropped instead of overwriting newer data.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use super::{FetchError, RecordSource};
use crate::models::{DateRange, Domain, ReportKind, TransactionRecord};

/// A domain that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFailure {
    pub domain: Domain,
    pub error: FetchError,
}

/// Records of one completed, current request
#[derive(Debug, Clone)]
pub struct LoadedPeriod {
    pub kind: ReportKind,
    pub range: DateRange,
    pub generation: u64,
    records: BTreeMap<Domain, Vec<TransactionRecord>>,
    /// Domains whose fetch failed; they contribute nothing
    pub failures: Vec<DomainFailure>,
}

impl LoadedPeriod {
    /// Assemble a period from already fetched records
    pub fn from_records(
        kind: ReportKind,
        range: DateRange,
        records: BTreeMap<Domain, Vec<TransactionRecord>>,
    ) -> Self {
        Self {
            kind,
            range,
            generation: 0,
            records,
            failures: Vec::new(),
        }
    }

    /// Records for one domain; empty when the domain failed or wasn't needed
    pub fn records(&self, domain: Domain) -> &[TransactionRecord] {
        self.records.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every record across all domains
    pub fn all_records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.values().flatten()
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// True when at least one domain failed and the numbers are partial
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed_domains(&self) -> Vec<Domain> {
        self.failures.iter().map(|f| f.domain).collect()
    }
}

/// Result of one load request
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The newest request; safe to aggregate and display
    Current(LoadedPeriod),
    /// A newer request was started while this one was in flight
    Superseded { generation: u64, latest: u64 },
}

impl LoadOutcome {
    pub fn into_current(self) -> Option<LoadedPeriod> {
        match self {
            LoadOutcome::Current(period) => Some(period),
            LoadOutcome::Superseded { .. } => None,
        }
    }
}

/// Fetches the domains of a report and guards against stale results
pub struct ReconciliationLoader<S> {
    source: S,
    generation: AtomicU64,
}

impl<S: RecordSource> ReconciliationLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Generation of the most recently started request
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Load every domain `kind` needs for `range`
    ///
    /// Domains are fetched concurrently. A failed domain is reset to empty
    /// and listed in `failures`; it never fails the whole load.
    pub async fn load(&self, kind: ReportKind, range: DateRange) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let wanted = kind.domains();
        debug!(generation, %kind, %range, "starting load");

        let (guest_house, restaurant, office) = tokio::join!(
            self.fetch_if_wanted(wanted, Domain::GuestHouse, range),
            self.fetch_if_wanted(wanted, Domain::Restaurant, range),
            self.fetch_if_wanted(wanted, Domain::Office, range),
        );

        let latest = self.latest_generation();
        if latest != generation {
            info!(generation, latest, "discarding superseded load");
            return LoadOutcome::Superseded { generation, latest };
        }

        let mut records = BTreeMap::new();
        let mut failures = Vec::new();

        for (domain, result) in [
            (Domain::GuestHouse, guest_house),
            (Domain::Restaurant, restaurant),
            (Domain::Office, office),
        ] {
            match result {
                None => {}
                Some(Ok(fetched)) => {
                    records.insert(domain, fetched);
                }
                Some(Err(error)) => {
                    warn!(%domain, %error, "domain unavailable, counting it as zero");
                    records.insert(domain, Vec::new());
                    failures.push(DomainFailure { domain, error });
                }
            }
        }

        let period = LoadedPeriod {
            kind,
            range,
            generation,
            records,
            failures,
        };
        info!(
            generation,
            records = period.record_count(),
            degraded = period.is_degraded(),
            "load complete"
        );

        LoadOutcome::Current(period)
    }

    async fn fetch_if_wanted(
        &self,
        wanted: &[Domain],
        domain: Domain,
        range: DateRange,
    ) -> Option<Result<Vec<TransactionRecord>, FetchError>> {
        if !wanted.contains(&domain) {
            return None;
        }
        Some(
            self.source
                .fetch(domain, range)
                .await
                .map(|records| {
                    records
                        .into_iter()
                        .filter(|r| range.contains(r.date))
                        .collect()
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarDate, Money, PaymentMethod};
    use std::sync::Mutex;
    use std::time::Duration;

    fn day(d: u32) -> CalendarDate {
        CalendarDate::from_ymd(2024, 3, d).unwrap()
    }

    /// In-memory source with optional per-domain failures and delays
    #[derive(Default)]
    struct StubSource {
        failing: Vec<Domain>,
        /// Delay applied to requests whose range starts on this day
        slow_start: Option<(CalendarDate, Duration)>,
        calls: Mutex<Vec<Domain>>,
    }

    impl RecordSource for StubSource {
        async fn fetch(
            &self,
            domain: Domain,
            range: DateRange,
        ) -> Result<Vec<TransactionRecord>, FetchError> {
            self.calls.lock().unwrap().push(domain);
            if let Some((start, delay)) = self.slow_start {
                if range.start() == start {
                    tokio::time::sleep(delay).await;
                }
            }
            if self.failing.contains(&domain) {
                return Err(FetchError::Transport("connection refused".into()));
            }
            Ok(vec![
                TransactionRecord::inflow(domain, range.start(), PaymentMethod::Cash, Money::from_units(100)),
                // Outside every test range; must be filtered out
                TransactionRecord::inflow(domain, day(28), PaymentMethod::Cash, Money::from_units(1)),
            ])
        }
    }

    #[tokio::test]
    async fn test_merged_load_fetches_all_domains() {
        let loader = ReconciliationLoader::new(StubSource::default());
        let range = DateRange::single(day(15));

        let period = loader
            .load(ReportKind::Merged, range)
            .await
            .into_current()
            .unwrap();

        assert_eq!(period.generation, 1);
        assert_eq!(period.record_count(), 3);
        assert!(!period.is_degraded());
        assert_eq!(loader.source().calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_single_domain_report_fetches_one_domain() {
        let loader = ReconciliationLoader::new(StubSource::default());

        let period = loader
            .load(ReportKind::Office, DateRange::single(day(15)))
            .await
            .into_current()
            .unwrap();

        assert_eq!(*loader.source().calls.lock().unwrap(), vec![Domain::Office]);
        assert_eq!(period.records(Domain::Office).len(), 1);
        assert!(period.records(Domain::GuestHouse).is_empty());
    }

    #[tokio::test]
    async fn test_failed_domain_is_zeroed_and_marked() {
        let source = StubSource {
            failing: vec![Domain::Restaurant],
            ..Default::default()
        };
        let loader = ReconciliationLoader::new(source);

        let period = loader
            .load(ReportKind::Merged, DateRange::single(day(15)))
            .await
            .into_current()
            .unwrap();

        assert!(period.is_degraded());
        assert_eq!(period.failed_domains(), vec![Domain::Restaurant]);
        assert!(period.records(Domain::Restaurant).is_empty());
        assert_eq!(period.record_count(), 2);
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let source = StubSource {
            slow_start: Some((day(1), Duration::from_millis(200))),
            ..Default::default()
        };
        let loader = ReconciliationLoader::new(source);

        let slow = loader.load(ReportKind::Merged, DateRange::single(day(1)));
        let fast = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            loader.load(ReportKind::Merged, DateRange::single(day(2))).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(matches!(
            slow,
            LoadOutcome::Superseded {
                generation: 1,
                latest: 2
            }
        ));
        let current = fast.into_current().unwrap();
        assert_eq!(current.range.start(), day(2));
        assert_eq!(current.generation, 2);
    }
}
