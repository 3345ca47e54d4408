//! User settings for backoffice-cli
//!
//! Holds the backend connection, per-dashboard opening balances and toggles,
//! and the remembered date range of each dashboard. Settings are loaded once
//! at startup and handed to whatever needs them; nothing reads them globally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::BackofficePaths;
use crate::error::BackofficeError;
use crate::models::{DateRange, OpeningBalances, ReportKind};
use crate::reports::InclusionRules;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session cookie sent with every request (`name=value`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Preferences remembered per dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPrefs {
    /// Whether the opening balance row is shown and counted
    #[serde(default)]
    pub opening_balance_enabled: bool,

    #[serde(default)]
    pub opening_balances: OpeningBalances,

    /// Range shown the last time this dashboard was opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_range: Option<DateRange>,
}

/// User settings for backoffice-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub api: ApiSettings,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Domain-specific inclusion rules for the aggregator
    #[serde(default)]
    pub inclusion: InclusionRules,

    /// Whether reports carry a per-day average row
    #[serde(default = "default_true")]
    pub show_average_row: bool,

    #[serde(default)]
    pub dashboards: BTreeMap<ReportKind, DashboardPrefs>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api: ApiSettings::default(),
            currency_symbol: default_currency(),
            inclusion: InclusionRules::default(),
            show_average_row: true,
            dashboards: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BackofficePaths) -> Result<Self, BackofficeError> {
        read_json(paths.settings_file()).map_err(|e| {
            BackofficeError::Config(format!("Failed to load settings: {}", e))
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackofficePaths) -> Result<(), BackofficeError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Preferences for a dashboard, defaults if never set
    pub fn dashboard(&self, kind: ReportKind) -> DashboardPrefs {
        self.dashboards.get(&kind).cloned().unwrap_or_default()
    }

    /// Mutable preferences for a dashboard, created on first use
    pub fn dashboard_mut(&mut self, kind: ReportKind) -> &mut DashboardPrefs {
        self.dashboards.entry(kind).or_default()
    }

    /// Remember the range a dashboard was last shown with
    pub fn remember_range(&mut self, kind: ReportKind, range: DateRange) {
        self.dashboard_mut(kind).last_range = Some(range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarDate, Money, PaymentMethod};
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.currency_symbol, "₹");
        assert!(settings.show_average_row);
        assert!(settings.inclusion.guest_house_settled_only);
        assert!(settings.dashboards.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.api.base_url = "https://books.example.com".into();
        let prefs = settings.dashboard_mut(ReportKind::Merged);
        prefs.opening_balance_enabled = true;
        prefs
            .opening_balances
            .set(PaymentMethod::Cash, Money::from_units(5000));
        let range = DateRange::single(CalendarDate::from_ymd(2024, 3, 15).unwrap());
        settings.remember_range(ReportKind::Merged, range);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.api.base_url, "https://books.example.com");
        let prefs = loaded.dashboard(ReportKind::Merged);
        assert!(prefs.opening_balance_enabled);
        assert_eq!(prefs.opening_balances.cash, Money::from_units(5000));
        assert_eq!(prefs.last_range, Some(range));
        assert_eq!(loaded.dashboard(ReportKind::Office), DashboardPrefs::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"api": {"base_url": "http://10.0.0.2"}}"#).unwrap();
        assert_eq!(settings.api.base_url, "http://10.0.0.2");
        assert_eq!(settings.api.timeout_secs, 30);
        assert!(settings.show_average_row);
    }
}
