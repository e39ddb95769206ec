//! Error types shared by the storage and command layers.
//!
//! Every user-facing failure falls into one of three kinds: validation
//! (bad enum value, malformed timestamp, duplicate tracking number),
//! not-found (unknown order or package id), or storage (SQLite failure).
//! All of them are printed as a single line on stderr and exit code 1.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before it reached the database
    #[error("{0}")]
    Validation(String),

    #[error("order {0} not found")]
    OrderNotFound(i64),

    #[error("package {0} not found")]
    PackageNotFound(i64),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
