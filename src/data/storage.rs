//! SQLite storage layer for the order and package tables.
//!
//! Schema (created by `init_schema`, idempotent):
//! - `orders`: id, platform, order_number, description, status, created_at, updated_at
//! - `packages`: id, order_id (FK), tracking_number (unique), carrier, status,
//!   last_location, delivered_at, created_at, updated_at
//!
//! Timestamps are stored as RFC 3339 TEXT. Multi-row writes run inside a
//! transaction so a failed insert never leaves partial state. Concurrent
//! invocations against the same file rely on SQLite's own locking.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::models::{NewOrder, NewTracking, Order, Package, Platform, Status};
use crate::error::{Error, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT NOT NULL,
    order_number TEXT,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    tracking_number TEXT NOT NULL UNIQUE,
    carrier TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    last_location TEXT,
    delivered_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Filters for listing orders, combined with logical AND
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<Status>,
    pub platform: Option<Platform>,
    /// `Some(true)` keeps orders with at least one package,
    /// `Some(false)` keeps orders with none
    pub has_tracking: Option<bool>,
    /// Exclude delivered and cancelled orders
    pub active: bool,
    /// Keep only delivered orders
    pub delivered: bool,
}

impl OrderFilter {
    /// True when no filter is set (list everything)
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.platform.is_none()
            && self.has_tracking.is_none()
            && !self.active
            && !self.delivered
    }
}

/// Storage handle owning one SQLite connection.
///
/// Constructed from an explicit path so tests can point each case at its
/// own temporary database. Dropped at the end of every invocation, which
/// closes the connection and releases the file.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (creating if absent) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Storage { conn })
    }

    /// Create the schema. Safe to call on an already-initialized database.
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert an order and, when tracking is supplied, its initial package,
    /// atomically. Both rows start with status `pending`. Returns the new
    /// order id.
    pub fn add_order(&mut self, order: &NewOrder, tracking: Option<&NewTracking>) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO orders (platform, order_number, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                order.platform.as_str(),
                order.order_number,
                order.description,
                Status::Pending.as_str(),
                now
            ],
        )?;
        let order_id = tx.last_insert_rowid();
        if let Some(tracking) = tracking {
            insert_package(&tx, order_id, tracking, &now)?;
        }
        tx.commit()?;
        Ok(order_id)
    }

    /// Attach a new package with status `pending` to an existing order.
    /// Returns the new package id.
    pub fn add_package(&self, order_id: i64, tracking: &NewTracking) -> Result<i64> {
        if !self.order_exists(order_id)? {
            return Err(Error::OrderNotFound(order_id));
        }
        let now = Utc::now().to_rfc3339();
        insert_package(&self.conn, order_id, tracking, &now)
    }

    /// Fetch one order by id, including its packages
    pub fn get_order(&self, id: i64) -> Result<Order> {
        let mut order = self
            .conn
            .query_row(
                "SELECT id, platform, order_number, description, status, created_at, updated_at
                 FROM orders WHERE id = ?1",
                [id],
                order_from_row,
            )
            .optional()?
            .ok_or(Error::OrderNotFound(id))?;
        order.packages = self.packages_for(id)?;
        Ok(order)
    }

    /// List orders matching `filter`, ordered by id ascending
    pub fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let mut sql = String::from(
            "SELECT id, platform, order_number, description, status, created_at, updated_at
             FROM orders",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(status.to_string());
        }
        if let Some(platform) = filter.platform {
            clauses.push("platform = ?");
            params.push(platform.to_string());
        }
        if filter.delivered {
            clauses.push("status = ?");
            params.push(Status::Delivered.to_string());
        }
        if filter.active {
            clauses.push("status NOT IN (?, ?)");
            params.push(Status::Delivered.to_string());
            params.push(Status::Cancelled.to_string());
        }
        match filter.has_tracking {
            Some(true) => {
                clauses.push("EXISTS (SELECT 1 FROM packages WHERE packages.order_id = orders.id)")
            }
            Some(false) => clauses
                .push("NOT EXISTS (SELECT 1 FROM packages WHERE packages.order_id = orders.id)"),
            None => {}
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), order_from_row)?;
        let mut orders = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        for order in &mut orders {
            order.packages = self.packages_for(order.id)?;
        }
        Ok(orders)
    }

    /// Set an order's status
    pub fn set_order_status(&self, id: i64, status: Status) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, id],
        )?;
        if changed == 0 {
            return Err(Error::OrderNotFound(id));
        }
        Ok(())
    }

    /// Set a package's status. `delivered_at` replaces the stored value
    /// (pass `None` to clear it); `last_location` overwrites only when
    /// supplied.
    pub fn set_package_status(
        &self,
        id: i64,
        status: Status,
        delivered_at: Option<DateTime<Utc>>,
        last_location: Option<&str>,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let delivered_at = delivered_at.map(|dt| dt.to_rfc3339());
        let changed = self.conn.execute(
            "UPDATE packages
             SET status = ?1,
                 delivered_at = ?2,
                 last_location = COALESCE(?3, last_location),
                 updated_at = ?4
             WHERE id = ?5",
            params![status.as_str(), delivered_at, last_location, now, id],
        )?;
        if changed == 0 {
            return Err(Error::PackageNotFound(id));
        }
        Ok(())
    }

    fn order_exists(&self, id: i64) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM orders WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn packages_for(&self, order_id: i64) -> Result<Vec<Package>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, order_id, tracking_number, carrier, status, last_location,
                    delivered_at, created_at, updated_at
             FROM packages WHERE order_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([order_id], package_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }
}

fn insert_package(conn: &Connection, order_id: i64, tracking: &NewTracking, now: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO packages (order_id, tracking_number, carrier, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            order_id,
            tracking.tracking_number,
            tracking.carrier.as_str(),
            Status::Pending.as_str(),
            now
        ],
    )
    .map_err(|err| map_tracking_insert_err(err, &tracking.tracking_number))?;
    Ok(conn.last_insert_rowid())
}

/// Report a violated tracking-number uniqueness constraint as a validation
/// error instead of a raw SQLite failure
fn map_tracking_insert_err(err: rusqlite::Error, tracking_number: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(code, Some(msg)) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("tracking_number")
        {
            return Error::Validation(format!(
                "tracking number already exists: {tracking_number}"
            ));
        }
    }
    Error::Storage(err)
}

fn order_from_row(row: &Row) -> rusqlite::Result<Order> {
    let platform: String = row.get(1)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    Ok(Order {
        id: row.get(0)?,
        platform: parse_column(1, &platform)?,
        order_number: row.get(2)?,
        description: row.get(3)?,
        status: parse_column(4, &status)?,
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
        packages: Vec::new(),
    })
}

fn package_from_row(row: &Row) -> rusqlite::Result<Package> {
    let carrier: String = row.get(3)?;
    let status: String = row.get(4)?;
    let delivered_at: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(Package {
        id: row.get(0)?,
        order_id: row.get(1)?,
        tracking_number: row.get(2)?,
        carrier: parse_column(3, &carrier)?,
        status: parse_column(4, &status)?,
        last_location: row.get(5)?,
        delivered_at: match delivered_at {
            Some(value) => Some(parse_timestamp(6, &value)?),
            None => None,
        },
        created_at: parse_timestamp(7, &created_at)?,
        updated_at: parse_timestamp(8, &updated_at)?,
    })
}

/// Parse a stored enum column, mapping unknown values to a conversion error
fn parse_column<T: FromStr<Err = Error>>(idx: usize, value: &str) -> rusqlite::Result<T> {
    value
        .parse()
        .map_err(|err: Error| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Parse a stored RFC 3339 timestamp column
fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}
