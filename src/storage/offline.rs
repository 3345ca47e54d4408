//! Offline record source
//!
//! A directory holding one JSON array per domain (`guest-house.json`,
//! `restaurant.json`, `office.json`) in the same shape the backend returns.
//! Used to reconcile from a saved snapshot when the backend is unreachable.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::file_io::{read_json_required, write_json_atomic};
use crate::error::BackofficeResult;
use crate::fetch::{convert_records, FetchError, RecordSource};
use crate::models::{DateRange, Domain, RawRecord, TransactionRecord};

/// Reads domain records from JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a domain's records
    pub fn domain_file(&self, domain: Domain) -> PathBuf {
        self.dir.join(format!("{}.json", domain.file_stem()))
    }

    /// Save records of one domain in backend shape
    pub fn write_domain(&self, domain: Domain, records: &[TransactionRecord]) -> BackofficeResult<()> {
        let raw: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
        write_json_atomic(self.domain_file(domain), &raw)
    }
}

impl RecordSource for FileSource {
    async fn fetch(
        &self,
        domain: Domain,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        let path = self.domain_file(domain);
        debug!(%domain, path = %path.display(), "reading offline records");

        let raw: Vec<RawRecord> =
            read_json_required(&path).map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(convert_records(domain, raw)
            .into_iter()
            .filter(|r| range.contains(r.date))
            .collect())
    }
}
