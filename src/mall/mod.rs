//! Points-mall backend: order polling, user ledgers and audit questions

mod client;
mod html;
mod order;

pub use client::{MallClient, OrderSource};
pub use html::strip_html;
pub use order::{LedgerEntry, Order, PointRecord, format_order_for_audit};
