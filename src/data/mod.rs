//! Data layer: order/package models and the SQLite-backed store.

mod models;
mod storage;

pub use models::{Carrier, NewOrder, NewTracking, Order, Package, Platform, Status};
pub use storage::{OrderFilter, Storage};
