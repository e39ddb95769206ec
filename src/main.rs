//! parceltrack: a personal package-tracking CLI.
//!
//! Records orders placed on e-commerce platforms, attaches shipped packages
//! to them, and lets the user query and manually update delivery status.
//! Everything lives in one local SQLite file; each invocation opens it,
//! runs a single command, and exits.

mod cli;
mod commands;
mod data;
mod error;
mod prompt;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{AppConfig, Cli, Commands};
use data::Storage;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(cli.db_path);

    match cli.command {
        Commands::Version => {
            println!("parceltrack v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Init => {
            let storage = open_storage(&config)?;
            storage.init_schema()?;
            println!("Database initialized at {}", config.db_path.display());
        }
        Commands::AddOrder => {
            let mut storage = open_storage(&config)?;
            let input = prompt::collect_add_order()?;
            let tracking_note = input
                .tracking
                .as_ref()
                .map(|t| format!("{} via {}", t.tracking_number, t.carrier));
            let order_id = commands::add_order(&mut storage, input)?;
            println!("Order added successfully (ID: {order_id})");
            if let Some(note) = tracking_note {
                println!("  Package tracking: {note}");
            }
        }
        Commands::List(args) => {
            let filter = args.to_filter()?;
            let storage = open_storage(&config)?;
            let orders = commands::list_orders(&storage, &filter)?;
            print!("{}", ui::render_order_table(&orders, &filter));
        }
        Commands::Show { order_id } => {
            let storage = open_storage(&config)?;
            let order = commands::show_order(&storage, order_id)?;
            print!("{}", ui::render_order_detail(&order));
        }
        Commands::AddTracking { order_id } => {
            let storage = open_storage(&config)?;
            // Resolve the order before prompting so a bad id fails fast
            let order = commands::show_order(&storage, order_id)?;
            let tracking = prompt::collect_tracking()?;
            let package_id = commands::add_tracking(&storage, order.id, &tracking)?;
            println!(
                "Tracking added to order {} (package ID: {package_id}): {} via {}",
                order.id, tracking.tracking_number, tracking.carrier
            );
        }
        Commands::UpdateStatus { order_id } => {
            let storage = open_storage(&config)?;
            let order = commands::show_order(&storage, order_id)?;
            let input = prompt::collect_update_status(&order)?;
            let status = input.status;
            commands::update_status(&storage, order_id, input)?;
            println!("Status updated to {status}");
        }
    }

    Ok(())
}

/// Open the configured database, creating its parent directory on demand
fn open_storage(config: &AppConfig) -> Result<Storage> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Storage::open(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))
}
