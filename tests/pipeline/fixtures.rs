//! Order fixtures shared by the pipeline tests.

use orderview::Order;
use serde_json::json;

pub const COURIERS: &[&str] = &["Ama", "Kojo", "Esi"];
pub const STATUSES: &[&str] = &["Pending", "Delivered", "Cancelled"];

/// `count` orders cycling through couriers, statuses and days.
pub fn orders(count: usize) -> Vec<Order> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "id": format!("o-{}", i),
                "orderNumber": format!("ORD-{:04}", i),
                "customerName": format!("Customer {}", i),
                "customerPhone": format!("02440000{:02}", i),
                "courierName": COURIERS[i % COURIERS.len()],
                "courierId": format!("u-{}", i % COURIERS.len()),
                "restaurantId": format!("r-{}", i % 2),
                "status": STATUSES[i % STATUSES.len()],
                "createdAt": format!("2024-05-{:02}T12:00:00Z", 1 + i % 7),
                "totalPrice": 20.0 + i as f64,
                "deliveryPrice": format!("{}.50", i % 5),
                "items": [{ "name": "Jollof", "quantity": 1 + i % 3, "price": 15 }]
            }))
            .expect("fixture order")
        })
        .collect()
}

pub fn order(id: &str, courier: Option<&str>, delivery: serde_json::Value) -> Order {
    serde_json::from_value(json!({
        "id": id,
        "orderNumber": format!("ORD-{}", id),
        "courierName": courier,
        "deliveryPrice": delivery,
        "status": "Delivered",
        "createdAt": "2024-05-01T10:00:00Z",
    }))
    .expect("fixture order")
}
