//! CLI commands for configuration

use clap::Subcommand;

use crate::config::{BackofficePaths, Settings};
use crate::error::{BackofficeError, BackofficeResult};
use crate::fetch::normalize_base_url;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration and paths
    Show,

    /// Point the CLI at a backend
    SetApi {
        /// Backend base URL, e.g. https://office.example.com
        url: String,

        /// Session cookie sent with every request (name=value)
        #[arg(long)]
        cookie: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Forget the stored session cookie
    Logout,

    /// Set the currency symbol used in terminal output
    SetCurrency { symbol: String },

    /// Show or hide the per-day average row
    AverageRow {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

/// Handle configuration commands
pub fn handle_config_command(
    paths: &BackofficePaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> BackofficeResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("{}", format_config(paths, settings));
            return Ok(());
        }
        ConfigCommands::SetApi {
            url,
            cookie,
            timeout,
        } => {
            if url.trim().is_empty() {
                return Err(BackofficeError::Validation(
                    "Backend URL cannot be empty".into(),
                ));
            }
            settings.api.base_url = normalize_base_url(&url);
            if let Some(cookie) = cookie {
                settings.api.session_cookie = Some(cookie);
            }
            if let Some(timeout) = timeout {
                settings.api.timeout_secs = timeout.max(1);
            }
            println!("Backend set to: {}", settings.api.base_url);
        }
        ConfigCommands::Logout => {
            settings.api.session_cookie = None;
            println!("Session cookie removed");
        }
        ConfigCommands::SetCurrency { symbol } => {
            settings.currency_symbol = symbol.trim().to_string();
            println!("Currency symbol set to: {}", settings.currency_symbol);
        }
        ConfigCommands::AverageRow { enabled } => {
            settings.show_average_row = enabled;
            println!(
                "Average row {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }

    settings.save(paths)
}

fn format_config(paths: &BackofficePaths, settings: &Settings) -> String {
    let mut lines = vec![
        "Backoffice Configuration".to_string(),
        "========================".to_string(),
        format!("Data directory:   {}", paths.base_dir().display()),
        format!("Settings file:    {}", paths.settings_file().display()),
        format!("Log directory:    {}", paths.log_dir().display()),
        format!("Export directory: {}", paths.export_dir().display()),
        String::new(),
        "Backend:".to_string(),
        format!("  URL:            {}", settings.api.base_url),
        format!(
            "  Session cookie: {}",
            if settings.api.session_cookie.is_some() {
                "set"
            } else {
                "not set"
            }
        ),
        format!("  Timeout:        {}s", settings.api.timeout_secs),
        String::new(),
        "Reports:".to_string(),
        format!("  Currency symbol:        {}", settings.currency_symbol),
        format!("  Average row:            {}", settings.show_average_row),
        format!(
            "  Settled guest house only: {}",
            settings.inclusion.guest_house_settled_only
        ),
        format!(
            "  Office pending category:  {}",
            settings.inclusion.office_pending_category
        ),
    ];

    for (kind, prefs) in &settings.dashboards {
        lines.push(String::new());
        lines.push(format!("{}:", kind.title()));
        lines.push(format!(
            "  Opening balance: {} ({})",
            prefs.opening_balances.total().format_with_symbol(&settings.currency_symbol),
            if prefs.opening_balance_enabled {
                "enabled"
            } else {
                "disabled"
            }
        ));
        if let Some(range) = prefs.last_range {
            lines.push(format!("  Last range:      {}", range));
        }
    }

    lines.join("\n")
}
