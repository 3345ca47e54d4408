use anyhow::Result;
use clap::{Parser, Subcommand};

use backoffice_cli::cli::{
    handle_breakdown_command, handle_config_command, handle_opening_command,
    handle_reconcile_command, handle_snapshot_command, ConfigCommands, OpeningCommands,
    PeriodArgs, ReconcileArgs, SnapshotArgs,
};
use backoffice_cli::config::{logging, BackofficePaths, Settings};

#[derive(Parser)]
#[command(
    name = "backoffice",
    author = "Kaylee Beyene",
    version,
    about = "Payment reconciliation for the guest house, restaurant and office",
    long_about = "backoffice merges guest-house, restaurant and office money movements \
                  into one daily reconciliation per payment method, fetched by date \
                  range from the back-office API, and exports it for the accountant."
)]
struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the payment reconciliation for a date range
    #[command(alias = "rec")]
    Reconcile(ReconcileArgs),

    /// Show each payment method's share of the period total
    Breakdown(PeriodArgs),

    /// Save the backend's records for a range to a directory
    Snapshot(SnapshotArgs),

    /// Opening balance commands
    #[command(subcommand)]
    Opening(OpeningCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Create the data directories and default settings
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths, logging and settings
    let paths = BackofficePaths::new()?;
    let _log_guard = logging::init(&paths, cli.verbose);
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Reconcile(args)) => {
            handle_reconcile_command(&paths, &mut settings, args).await?;
        }
        Some(Commands::Breakdown(period)) => {
            handle_breakdown_command(&paths, &mut settings, period).await?;
        }
        Some(Commands::Snapshot(args)) => {
            handle_snapshot_command(&settings, args).await?;
        }
        Some(Commands::Opening(cmd)) => {
            handle_opening_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Config(cmd)) => {
            handle_config_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing backoffice at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Backend: {}", settings.api.base_url);
            println!("Run 'backoffice config set-api <url> --cookie <name=value>' to change it.");
        }
        None => {
            println!("backoffice - Payment reconciliation");
            println!();
            println!("Run 'backoffice --help' for usage information.");
            println!("Run 'backoffice reconcile' to see today's reconciliation.");
        }
    }

    Ok(())
}
