//! Ready-made grouping keys for orders.
//!
//! Each returns `None` when the order lacks the key, which keeps the order
//! out of that grouping pass.

use crate::filter::parse_timestamp;
use crate::Order;

fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn courier_name(order: &Order) -> Option<String> {
    order.courier_name.as_deref().and_then(present)
}

pub fn courier_id(order: &Order) -> Option<String> {
    order.courier_id.as_deref().and_then(present)
}

/// Courier identity: the courier id when present, otherwise the name.
///
/// Ids and names are kept in separate key spaces so a courier named like
/// another courier's id never merges with it.
pub fn courier(order: &Order) -> Option<String> {
    courier_id(order)
        .map(|id| format!("id:{id}"))
        .or_else(|| courier_name(order).map(|name| format!("name:{name}")))
}

pub fn restaurant_id(order: &Order) -> Option<String> {
    order.restaurant_id.as_deref().and_then(present)
}

pub fn status(order: &Order) -> Option<String> {
    present(&order.status)
}

/// Calendar day (`YYYY-MM-DD`, UTC) of the order's timestamp.
pub fn day(order: &Order) -> Option<String> {
    parse_timestamp(&order.created_at).map(|instant| instant.format("%Y-%m-%d").to_string())
}
