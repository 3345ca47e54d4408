//! REST backend client.
//!
//! Every domain lives under `{base}/api/{segment}/{start}/{end}` with dates in
//! `DD-MM-YYYY`. Authentication rides on the session cookie issued by the
//! backend's login page; this client only forwards it.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{convert_records, FetchError, RecordSource};
use crate::config::ApiSettings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{DateRange, Domain, RawRecord, TransactionRecord};

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the backend URL:
/// - ensure a scheme is present (https, or http for localhost)
/// - strip trailing slashes
/// - strip a trailing `/api` segment
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a user-facing message.
fn friendly_error(url: &str, err: &reqwest::Error) -> FetchError {
    let message = if err.is_connect() {
        format!("Cannot reach backend at {url}")
    } else if err.is_timeout() {
        format!("Connection to {url} timed out")
    } else if err.is_builder() {
        format!("Invalid backend URL: {url}")
    } else {
        format!("Network error communicating with {url}: {err}")
    };
    FetchError::Transport(message)
}

/// Convert an HTTP status code into a user-facing message.
fn status_error(status: StatusCode) -> FetchError {
    let message = match status.as_u16() {
        401 => "Session expired, log in again".to_string(),
        403 => "Not allowed to view these records".to_string(),
        404 => "Backend endpoint not found".to_string(),
        s if s >= 500 => format!("Backend server error (HTTP {s})"),
        s => format!("Unexpected response from backend (HTTP {s})"),
    };
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Pull the record array out of a response body
///
/// Most routes answer with a bare array; a few wrap it in `data` or
/// `records`. `null` means nothing was recorded.
fn extract_records(body: Value) -> Result<Vec<RawRecord>, FetchError> {
    let array = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("data")
            .or_else(|| map.remove("records"))
            .ok_or_else(|| FetchError::Decode("expected an array of records".into()))?,
        _ => return Err(FetchError::Decode("expected an array of records".into())),
    };

    serde_json::from_value(array).map_err(|e| FetchError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated client for the back-office REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    session_cookie: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Build a client from the API settings
    pub fn new(settings: &ApiSettings) -> BackofficeResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| BackofficeError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: normalize_base_url(&settings.base_url),
            session_cookie: settings
                .session_cookie
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for one domain and range
    pub fn endpoint(&self, domain: Domain, range: DateRange) -> String {
        format!(
            "{}/api/{}/{}/{}",
            self.base_url,
            domain.endpoint(),
            range.start(),
            range.end()
        )
    }

    async fn fetch_raw(&self, domain: Domain, range: DateRange) -> Result<Value, FetchError> {
        let url = self.endpoint(domain, range);
        debug!(%domain, %url, "fetching records");

        let mut req = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(cookie) = &self.session_cookie {
            req = req.header(COOKIE, cookie);
        }

        let started = Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;
        let status = resp.status();

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<Value>(&body_text)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .or_else(|| json.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                }) {
                Some(message) => FetchError::Status {
                    status: status.as_u16(),
                    message: format!("{message} (HTTP {})", status.as_u16()),
                },
                None => status_error(status),
            };
            warn!(%domain, status = status.as_u16(), error = %err, "fetch failed");
            return Err(err);
        }

        let body_text = resp
            .text()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        info!(
            %domain,
            latency_ms = started.elapsed().as_millis() as u64,
            bytes = body_text.len(),
            "records fetched"
        );

        if body_text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body_text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl RecordSource for ApiClient {
    async fn fetch(
        &self,
        domain: Domain,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        let body = self.fetch_raw(domain, range).await?;
        let raw = extract_records(body)?;
        Ok(convert_records(domain, raw))
    }
}
