//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report and fetch layers.

pub mod config;
pub mod opening;
pub mod report;

pub use config::{handle_config_command, ConfigCommands};
pub use opening::{handle_opening_command, OpeningCommands};
pub use report::{
    handle_breakdown_command, handle_reconcile_command, handle_snapshot_command, PeriodArgs,
    ReconcileArgs, SnapshotArgs,
};
