//! Presentation layer: pure formatting of query results.

mod detail;
mod format;
mod table;

pub use detail::render_order_detail;
pub use table::render_order_table;
