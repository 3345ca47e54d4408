//! CLI commands for opening balances
//!
//! Opening balances are kept per dashboard and only count when enabled.

use clap::Subcommand;

use crate::config::{BackofficePaths, Settings};
use crate::error::BackofficeResult;
use crate::models::{OpeningBalances, PaymentMethod, ReportKind};

/// Opening balance subcommands
#[derive(Subcommand, Debug)]
pub enum OpeningCommands {
    /// Show the opening balances of a dashboard
    Show {
        #[arg(short, long, value_enum, default_value = "merged")]
        kind: ReportKind,
    },

    /// Set the opening balance of one payment method
    Set {
        /// Payment method (cash, card, pp, ppc, pps)
        method: PaymentMethod,

        /// Amount, e.g. 1500 or 1,500.50; anything non-numeric is stored as zero
        #[arg(allow_hyphen_values = true)]
        amount: String,

        #[arg(short, long, value_enum, default_value = "merged")]
        kind: ReportKind,
    },

    /// Include the opening balance row in reports
    Enable {
        #[arg(short, long, value_enum, default_value = "merged")]
        kind: ReportKind,
    },

    /// Leave the opening balance row out of reports
    Disable {
        #[arg(short, long, value_enum, default_value = "merged")]
        kind: ReportKind,
    },

    /// Reset every opening balance of a dashboard to zero
    Clear {
        #[arg(short, long, value_enum, default_value = "merged")]
        kind: ReportKind,
    },
}

/// Handle opening balance commands
pub fn handle_opening_command(
    paths: &BackofficePaths,
    settings: &mut Settings,
    cmd: OpeningCommands,
) -> BackofficeResult<()> {
    match cmd {
        OpeningCommands::Show { kind } => {
            println!("{}", format_opening(settings, kind));
            return Ok(());
        }
        OpeningCommands::Set {
            method,
            amount,
            kind,
        } => {
            let stored = settings
                .dashboard_mut(kind)
                .opening_balances
                .set_from_input(method, &amount);
            println!(
                "Opening balance for {} ({}) set to {}",
                method,
                kind.title(),
                stored.format_with_symbol(&settings.currency_symbol)
            );
        }
        OpeningCommands::Enable { kind } => {
            settings.dashboard_mut(kind).opening_balance_enabled = true;
            println!("Opening balance row enabled for {}", kind.title());
        }
        OpeningCommands::Disable { kind } => {
            settings.dashboard_mut(kind).opening_balance_enabled = false;
            println!("Opening balance row disabled for {}", kind.title());
        }
        OpeningCommands::Clear { kind } => {
            settings.dashboard_mut(kind).opening_balances = OpeningBalances::default();
            println!("Opening balances cleared for {}", kind.title());
        }
    }

    settings.save(paths)
}

fn format_opening(settings: &Settings, kind: ReportKind) -> String {
    let prefs = settings.dashboard(kind);
    let symbol = &settings.currency_symbol;

    let mut output = format!(
        "Opening balances: {} ({})\n",
        kind.title(),
        if prefs.opening_balance_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    for method in PaymentMethod::ALL {
        output.push_str(&format!(
            "  {:<6} {:>14}\n",
            method.label(),
            prefs.opening_balances.get(method).format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "  {:<6} {:>14}",
        "Total",
        prefs.opening_balances.total().format_with_symbol(symbol)
    ));
    output
}
