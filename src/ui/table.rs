//! Tabular rendering for `list`.

use std::fmt::Write;

use crate::data::{Order, OrderFilter, Status};

use super::format::truncate;

const DESCRIPTION_WIDTH: usize = 30;

/// Render orders as a fixed-width table with a totals footer.
/// Empty results get an explicit message instead of a bare header.
pub fn render_order_table(orders: &[Order], filter: &OrderFilter) -> String {
    if orders.is_empty() {
        return if filter.is_empty() {
            "No orders found. Add one with 'parceltrack add-order'.\n".to_string()
        } else {
            "No orders match the specified filters.\n".to_string()
        };
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<12} {:<width$} {:<16} {}",
        "ID",
        "PLATFORM",
        "DESCRIPTION",
        "STATUS",
        "TRACKING",
        width = DESCRIPTION_WIDTH
    );
    let _ = writeln!(out, "{}", "-".repeat(6 + 12 + DESCRIPTION_WIDTH + 16 + 8 + 4));

    for order in orders {
        let tracking = if order.packages.is_empty() { "no" } else { "yes" };
        let _ = writeln!(
            out,
            "{:<6} {:<12} {:<width$} {:<16} {}",
            order.id,
            order.platform.as_str(),
            truncate(&order.description, DESCRIPTION_WIDTH),
            order.status.as_str(),
            tracking,
            width = DESCRIPTION_WIDTH
        );
    }

    let _ = writeln!(out, "\nTotal orders: {}", orders.len());
    let counts: Vec<String> = Status::ALL
        .iter()
        .filter_map(|status| {
            let count = orders.iter().filter(|o| o.status == *status).count();
            (count > 0).then(|| format!("{status}: {count}"))
        })
        .collect();
    if !counts.is_empty() {
        let _ = writeln!(out, "{}", counts.join(" | "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Platform, Status};
    use chrono::Utc;

    fn order(id: i64, status: Status) -> Order {
        Order {
            id,
            platform: Platform::Etsy,
            order_number: None,
            description: format!("order {id}"),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            packages: Vec::new(),
        }
    }

    #[test]
    fn test_empty_table_messages() {
        let unfiltered = render_order_table(&[], &OrderFilter::default());
        assert!(unfiltered.contains("No orders found"));

        let filtered = render_order_table(
            &[],
            &OrderFilter {
                active: true,
                ..Default::default()
            },
        );
        assert!(filtered.contains("No orders match the specified filters"));
    }

    #[test]
    fn test_table_rows_and_footer() {
        let orders = vec![order(1, Status::Pending), order(2, Status::Delivered)];
        let out = render_order_table(&orders, &OrderFilter::default());
        assert!(out.contains("order 1"));
        assert!(out.contains("pending"));
        assert!(out.contains("delivered"));
        assert!(out.contains("Total orders: 2"));
        assert!(out.contains("pending: 1 | delivered: 1"));
    }

    #[test]
    fn test_long_description_is_truncated() {
        let mut o = order(1, Status::Pending);
        o.description = "x".repeat(100);
        let out = render_order_table(&[o], &OrderFilter::default());
        assert!(!out.contains(&"x".repeat(100)));
        assert!(out.contains("..."));
    }
}
