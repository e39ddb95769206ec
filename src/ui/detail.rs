//! Detail rendering for `show`: one order plus its nested packages.

use std::fmt::Write;

use crate::data::{Order, Package};

use super::format::{format_datetime, format_optional};

pub fn render_order_detail(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order #{}", order.id);
    let _ = writeln!(out, "  Platform:     {}", order.platform);
    let _ = writeln!(
        out,
        "  Order number: {}",
        format_optional(order.order_number.as_deref())
    );
    let _ = writeln!(out, "  Description:  {}", order.description);
    let _ = writeln!(out, "  Status:       {}", order.status);
    let _ = writeln!(out, "  Created:      {}", format_datetime(&order.created_at));
    let _ = writeln!(out, "  Updated:      {}", format_datetime(&order.updated_at));

    if order.packages.is_empty() {
        let _ = writeln!(out, "\nNo tracking information available");
    } else {
        for package in &order.packages {
            render_package(&mut out, package);
        }
    }
    out
}

fn render_package(out: &mut String, package: &Package) {
    let _ = writeln!(out, "\nPackage #{}", package.id);
    let _ = writeln!(out, "  Tracking:      {}", package.tracking_number);
    let _ = writeln!(out, "  Carrier:       {}", package.carrier);
    let _ = writeln!(out, "  Status:        {}", package.status);
    let _ = writeln!(
        out,
        "  Last location: {}",
        format_optional(package.last_location.as_deref())
    );
    let delivered = package
        .delivered_at
        .as_ref()
        .map(format_datetime)
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  Delivered at:  {delivered}");
}
