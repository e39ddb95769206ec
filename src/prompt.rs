//! Interactive prompt flows built on dialoguer.
//!
//! Prompts collect raw input and validate it at the boundary (closed enums,
//! RFC 3339 timestamps); the resulting input structs are handed to the
//! command layer unchanged.

use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::commands::{AddOrderInput, StatusTarget, UpdateStatusInput};
use crate::data::{Carrier, NewOrder, NewTracking, Order, Platform, Status};
use crate::error::{Error, Result};

/// Collect platform, optional order number, description, and optional
/// tracking details for a new order
pub fn collect_add_order() -> Result<AddOrderInput> {
    let theme = ColorfulTheme::default();

    let platform: String = Input::with_theme(&theme)
        .with_prompt("Platform (shop.app/etsy/amazon/generic)")
        .interact_text()?;
    let platform: Platform = platform.parse()?;

    let order_number: String = Input::with_theme(&theme)
        .with_prompt("Order number (optional, press Enter to skip)")
        .allow_empty(true)
        .interact_text()?;
    let order_number = (!order_number.is_empty()).then_some(order_number);

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .interact_text()?;

    let tracking = if Confirm::with_theme(&theme)
        .with_prompt("Has tracking number?")
        .default(false)
        .interact()?
    {
        Some(collect_tracking_with(&theme)?)
    } else {
        None
    };

    Ok(AddOrderInput {
        order: NewOrder {
            platform,
            order_number,
            description,
        },
        tracking,
    })
}

/// Collect tracking number and carrier for a new package
pub fn collect_tracking() -> Result<NewTracking> {
    collect_tracking_with(&ColorfulTheme::default())
}

fn collect_tracking_with(theme: &ColorfulTheme) -> Result<NewTracking> {
    let tracking_number: String = Input::with_theme(theme)
        .with_prompt("Tracking number")
        .interact_text()?;

    let carrier: String = Input::with_theme(theme)
        .with_prompt("Carrier (fedex/ups/usps/amazon_logistics)")
        .interact_text()?;
    let carrier: Carrier = carrier.parse()?;

    Ok(NewTracking {
        tracking_number,
        carrier,
    })
}

/// Collect the update-status target, the new status, and the conditional
/// delivery timestamp or location for `order`
pub fn collect_update_status(order: &Order) -> Result<UpdateStatusInput> {
    let theme = ColorfulTheme::default();

    let mut items = vec![format!("order #{} status", order.id)];
    for package in &order.packages {
        items.push(format!(
            "package #{} ({} via {})",
            package.id, package.tracking_number, package.carrier
        ));
    }
    let choice = Select::with_theme(&theme)
        .with_prompt("Update which status?")
        .items(&items)
        .default(0)
        .interact()?;
    let target = if choice == 0 {
        StatusTarget::Order
    } else {
        StatusTarget::Package(order.packages[choice - 1].id)
    };

    let labels: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
    let selected = Select::with_theme(&theme)
        .with_prompt("New status")
        .items(&labels)
        .default(0)
        .interact()?;
    let status = Status::ALL[selected];

    let mut delivered_at = None;
    let mut last_location = None;

    // Delivery timestamp and location only exist on package rows
    if matches!(target, StatusTarget::Package(_)) {
        match status {
            Status::Delivered => {
                let raw: String = Input::with_theme(&theme)
                    .with_prompt("Delivered at (RFC 3339, press Enter for now)")
                    .allow_empty(true)
                    .interact_text()?;
                if !raw.is_empty() {
                    delivered_at = Some(parse_delivery_timestamp(&raw)?);
                }
            }
            Status::InTransit | Status::OutForDelivery => {
                let raw: String = Input::with_theme(&theme)
                    .with_prompt("Last known location (press Enter to skip)")
                    .allow_empty(true)
                    .interact_text()?;
                if !raw.is_empty() {
                    last_location = Some(raw);
                }
            }
            _ => {}
        }
    }

    Ok(UpdateStatusInput {
        target,
        status,
        delivered_at,
        last_location,
    })
}

fn parse_delivery_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| Error::Validation(format!("invalid timestamp: {raw} ({err})")))
}
