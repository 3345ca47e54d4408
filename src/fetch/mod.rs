//! Date-range fetching of domain records
//!
//! A `RecordSource` returns the records of one domain for a closed date
//! range. `ApiClient` talks to the REST backend; `storage::FileSource` reads
//! the same JSON from disk. `ReconciliationLoader` fetches every domain a
//! report needs concurrently and discards results that were superseded by a
//! newer request.

pub mod client;
pub mod loader;

pub use client::{normalize_base_url, ApiClient};
pub use loader::{DomainFailure, LoadOutcome, LoadedPeriod, ReconciliationLoader};

use std::future::Future;

use thiserror::Error;
use tracing::warn;

use crate::models::{DateRange, Domain, RawRecord, TransactionRecord};

/// Why a domain fetch failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Anything that can produce the records of one domain for a date range
pub trait RecordSource {
    fn fetch(
        &self,
        domain: Domain,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, FetchError>>;
}

impl<S: RecordSource> RecordSource for &S {
    fn fetch(
        &self,
        domain: Domain,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, FetchError>> {
        (**self).fetch(domain, range)
    }
}

/// Convert wire records, dropping the ones that can't be used
///
/// A rejected row is logged and skipped; it never fails the whole fetch.
pub fn convert_records(domain: Domain, raw: Vec<RawRecord>) -> Vec<TransactionRecord> {
    let total = raw.len();
    let records: Vec<TransactionRecord> = raw
        .into_iter()
        .filter_map(|r| match TransactionRecord::from_raw(domain, r) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%domain, error = %e, "skipping unusable record");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            %domain,
            kept = records.len(),
            dropped = total - records.len(),
            "some records were rejected"
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_records_drops_bad_rows() {
        let raw: Vec<RawRecord> = serde_json::from_value(json!([
            { "date": "15-03-2024", "amount": 100, "paymentMethod": "cash" },
            { "date": "someday", "amount": 100, "paymentMethod": "cash" },
            { "date": "15-03-2024", "amount": 100, "paymentMethod": "cheque" }
        ]))
        .unwrap();

        let records = convert_records(Domain::Restaurant, raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].domain, Domain::Restaurant);
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            status: 401,
            message: "Session expired, log in again".into(),
        };
        assert_eq!(err.to_string(), "Session expired, log in again");
    }
}
