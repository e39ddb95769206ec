//! Command-line interface definitions for parceltrack.
//!
//! Subcommands map one-to-one onto the command layer:
//! - `parceltrack init`
//! - `parceltrack add-order`
//! - `parceltrack list --active --platform etsy`
//! - `parceltrack show 1`
//! - `parceltrack add-tracking 1`
//! - `parceltrack update-status 1`
//! - `parceltrack version`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::OrderFilter;
use crate::error::Result;

/// Environment variable overriding the database location
pub const DB_ENV_VAR: &str = "PARCELTRACK_DB";

/// Track your orders and packages in one place.
#[derive(Parser, Debug)]
#[command(name = "parceltrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database file.
    /// Defaults to $PARCELTRACK_DB, then ~/.parceltrack/orders.db
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database schema (safe to run again)
    Init,

    /// Add a new order interactively
    AddOrder,

    /// List orders in a table
    List(ListArgs),

    /// Show one order with its packages
    Show {
        /// Order id to display
        order_id: i64,
    },

    /// Attach a tracking number to an existing order
    AddTracking {
        /// Order id to attach the package to
        order_id: i64,
    },

    /// Update the status of an order or one of its packages
    UpdateStatus {
        /// Order id to update
        order_id: i64,
    },

    /// Print version information
    Version,
}

/// Filter flags for `list`, combined with logical AND
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Show only active (non-delivered, non-cancelled) orders
    #[arg(long)]
    pub active: bool,

    /// Show only delivered orders
    #[arg(long)]
    pub delivered: bool,

    /// Filter by status (pending/shipped/in_transit/...)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by platform (shop.app/etsy/amazon/generic)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Show only orders with at least one package
    #[arg(long, conflicts_with = "no_tracking")]
    pub has_tracking: bool,

    /// Show only orders without tracking
    #[arg(long)]
    pub no_tracking: bool,
}

impl ListArgs {
    /// Validate the flag values and build a storage filter.
    /// Unknown status/platform strings are rejected with the listed choices.
    pub fn to_filter(&self) -> Result<OrderFilter> {
        Ok(OrderFilter {
            status: self.status.as_deref().map(|s| s.parse()).transpose()?,
            platform: self.platform.as_deref().map(|p| p.parse()).transpose()?,
            has_tracking: if self.has_tracking {
                Some(true)
            } else if self.no_tracking {
                Some(false)
            } else {
                None
            },
            active: self.active,
            delivered: self.delivered,
        })
    }
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Resolve the database path: explicit flag, then $PARCELTRACK_DB,
    /// then ~/.parceltrack/orders.db
    pub fn resolve(db_path: Option<PathBuf>) -> Self {
        let db_path = db_path.unwrap_or_else(|| {
            if let Ok(path) = std::env::var(DB_ENV_VAR) {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".parceltrack")
                    .join("orders.db")
            }
        });
        AppConfig { db_path }
    }
}
