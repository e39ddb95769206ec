//! Command layer: each command validates collected input, runs one or more
//! storage operations, and hands results back for presentation.
//!
//! Prompt collection lives in `prompt`; these functions take plain input
//! structs so tests can drive them against a temporary database without a
//! terminal.

use chrono::{DateTime, Utc};

use crate::data::{NewOrder, NewTracking, Order, OrderFilter, Status, Storage};
use crate::error::Result;

/// Collected input for add-order
#[derive(Debug, Clone)]
pub struct AddOrderInput {
    pub order: NewOrder,
    pub tracking: Option<NewTracking>,
}

/// Which row update-status targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTarget {
    Order,
    Package(i64),
}

/// Collected input for update-status
#[derive(Debug, Clone)]
pub struct UpdateStatusInput {
    pub target: StatusTarget,
    pub status: Status,
    /// Explicit delivery timestamp; defaults to now when the new status is
    /// `delivered` and none was supplied
    pub delivered_at: Option<DateTime<Utc>>,
    pub last_location: Option<String>,
}

/// Create an order, plus its initial package when tracking was supplied.
/// Returns the new order id.
pub fn add_order(storage: &mut Storage, input: AddOrderInput) -> Result<i64> {
    storage.add_order(&input.order, input.tracking.as_ref())
}

/// List orders matching the filter, id ascending
pub fn list_orders(storage: &Storage, filter: &OrderFilter) -> Result<Vec<Order>> {
    storage.list_orders(filter)
}

/// Fetch one order with its packages
pub fn show_order(storage: &Storage, order_id: i64) -> Result<Order> {
    storage.get_order(order_id)
}

/// Attach a pending package to an existing order. Returns the package id.
pub fn add_tracking(storage: &Storage, order_id: i64, tracking: &NewTracking) -> Result<i64> {
    storage.add_package(order_id, tracking)
}

/// Apply a status change to the order itself or to one of its packages.
///
/// Package targets: `delivered` records a delivery timestamp (supplied or
/// now); `in_transit`/`out_for_delivery` may record a location; any other
/// status clears the delivery timestamp and leaves the location untouched.
/// Order rows carry neither field, so order targets update status only.
pub fn update_status(storage: &Storage, order_id: i64, input: UpdateStatusInput) -> Result<()> {
    match input.target {
        StatusTarget::Order => storage.set_order_status(order_id, input.status),
        StatusTarget::Package(package_id) => {
            let delivered_at = if input.status == Status::Delivered {
                Some(input.delivered_at.unwrap_or_else(Utc::now))
            } else {
                None
            };
            let last_location = match input.status {
                Status::InTransit | Status::OutForDelivery => input.last_location.as_deref(),
                _ => None,
            };
            storage.set_package_status(package_id, input.status, delivered_at, last_location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Carrier, Platform};
    use crate::error::Error;
    use tempfile::TempDir;

    fn test_storage() -> (Storage, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("orders.db")).unwrap();
        storage.init_schema().unwrap();
        (storage, dir)
    }

    fn add_order_input(tracking: Option<NewTracking>) -> AddOrderInput {
        AddOrderInput {
            order: NewOrder {
                platform: Platform::Etsy,
                order_number: None,
                description: "Handmade ornament".to_string(),
            },
            tracking,
        }
    }

    #[test]
    fn test_full_workflow() {
        let (mut storage, _dir) = test_storage();

        // Add an order without tracking
        let order_id = add_order(&mut storage, add_order_input(None)).unwrap();

        // It lists as pending
        let orders = list_orders(&storage, &OrderFilter::default()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, Status::Pending);

        // Attach tracking later
        let package_id = add_tracking(
            &storage,
            order_id,
            &NewTracking {
                tracking_number: "1Z999".to_string(),
                carrier: Carrier::Ups,
            },
        )
        .unwrap();

        let order = show_order(&storage, order_id).unwrap();
        assert_eq!(order.packages.len(), 1);
        assert_eq!(order.packages[0].id, package_id);
        assert_eq!(order.packages[0].status, Status::Pending);

        // Move the package through transit with a location
        update_status(
            &storage,
            order_id,
            UpdateStatusInput {
                target: StatusTarget::Package(package_id),
                status: Status::InTransit,
                delivered_at: None,
                last_location: Some("Memphis, TN".to_string()),
            },
        )
        .unwrap();

        // Deliver with the defaulted timestamp
        update_status(
            &storage,
            order_id,
            UpdateStatusInput {
                target: StatusTarget::Package(package_id),
                status: Status::Delivered,
                delivered_at: None,
                last_location: None,
            },
        )
        .unwrap();

        let order = show_order(&storage, order_id).unwrap();
        let package = &order.packages[0];
        assert_eq!(package.status, Status::Delivered);
        assert!(package.delivered_at.is_some());
        assert_eq!(package.last_location.as_deref(), Some("Memphis, TN"));
        // The order's own status is untouched until updated separately
        assert_eq!(order.status, Status::Pending);

        update_status(
            &storage,
            order_id,
            UpdateStatusInput {
                target: StatusTarget::Order,
                status: Status::Delivered,
                delivered_at: None,
                last_location: None,
            },
        )
        .unwrap();
        let delivered = list_orders(
            &storage,
            &OrderFilter {
                delivered: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].id, order_id);
    }

    #[test]
    fn test_add_order_with_tracking_round_trip() {
        let (mut storage, _dir) = test_storage();
        let order_id = add_order(
            &mut storage,
            add_order_input(Some(NewTracking {
                tracking_number: "9400111899562410001234".to_string(),
                carrier: Carrier::Usps,
            })),
        )
        .unwrap();

        let order = show_order(&storage, order_id).unwrap();
        assert_eq!(order.packages.len(), 1);
        assert_eq!(order.packages[0].tracking_number, "9400111899562410001234");
        assert_eq!(order.packages[0].carrier, Carrier::Usps);
        assert_eq!(order.packages[0].status, Status::Pending);
    }

    #[test]
    fn test_explicit_delivery_timestamp_wins() {
        let (mut storage, _dir) = test_storage();
        let order_id = add_order(
            &mut storage,
            add_order_input(Some(NewTracking {
                tracking_number: "1Z999".to_string(),
                carrier: Carrier::Ups,
            })),
        )
        .unwrap();
        let package_id = show_order(&storage, order_id).unwrap().packages[0].id;

        let explicit: DateTime<Utc> = "2026-12-24T17:30:00Z".parse().unwrap();
        update_status(
            &storage,
            order_id,
            UpdateStatusInput {
                target: StatusTarget::Package(package_id),
                status: Status::Delivered,
                delivered_at: Some(explicit),
                last_location: None,
            },
        )
        .unwrap();

        let package = &show_order(&storage, order_id).unwrap().packages[0];
        assert_eq!(package.delivered_at, Some(explicit));
    }

    #[test]
    fn test_non_delivered_status_never_sets_timestamp() {
        let (mut storage, _dir) = test_storage();
        let order_id = add_order(
            &mut storage,
            add_order_input(Some(NewTracking {
                tracking_number: "1Z999".to_string(),
                carrier: Carrier::Ups,
            })),
        )
        .unwrap();
        let package_id = show_order(&storage, order_id).unwrap().packages[0].id;

        for status in Status::ALL {
            if status == Status::Delivered {
                continue;
            }
            update_status(
                &storage,
                order_id,
                UpdateStatusInput {
                    target: StatusTarget::Package(package_id),
                    status,
                    delivered_at: None,
                    last_location: None,
                },
            )
            .unwrap();
            let package = &show_order(&storage, order_id).unwrap().packages[0];
            assert!(package.delivered_at.is_none(), "status {status}");
        }
    }

    #[test]
    fn test_not_found_paths_do_not_mutate() {
        let (storage, _dir) = test_storage();

        assert!(matches!(
            show_order(&storage, 99),
            Err(Error::OrderNotFound(99))
        ));
        assert!(matches!(
            add_tracking(
                &storage,
                99,
                &NewTracking {
                    tracking_number: "1Z999".to_string(),
                    carrier: Carrier::Ups,
                }
            ),
            Err(Error::OrderNotFound(99))
        ));
        assert!(matches!(
            update_status(
                &storage,
                99,
                UpdateStatusInput {
                    target: StatusTarget::Order,
                    status: Status::Shipped,
                    delivered_at: None,
                    last_location: None,
                }
            ),
            Err(Error::OrderNotFound(99))
        ));

        let orders = list_orders(&storage, &OrderFilter::default()).unwrap();
        assert!(orders.is_empty());
    }
}
