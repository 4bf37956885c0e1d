//! Named record schemas for the dashboard's collections.
//!
//! JSON uses camelCase keys. Unknown keys are ignored; amounts and
//! identifiers go through the tolerant helpers in [`crate::coerce`].

use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::Record;

/// A customer order as returned by the orders endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[record(id)]
    #[serde(deserialize_with = "coerce::flexible_id")]
    pub id: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub order_number: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub customer_name: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub customer_phone: String,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub courier_id: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub courier_name: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub courier_phone: Option<String>,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub restaurant_id: Option<String>,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub restaurant_name: Option<String>,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub branch_id: Option<String>,
    #[record(category)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub status: String,
    #[record(timestamp)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub delivery_price: f64,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub delivery_distance: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Line items rendered as `"2x Jollof Rice"` strings.
    pub fn item_labels(&self) -> Vec<String> {
        self.items.iter().map(OrderItem::label).collect()
    }

    /// Sum of `price * quantity` over the line items.
    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// One line of an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub price: f64,
}

impl OrderItem {
    pub fn label(&self) -> String {
        format!("{}x {}", self.quantity, self.name)
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "restaurants")]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(deserialize_with = "coerce::flexible_id")]
    pub id: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub name: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub phone: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub address: Option<String>,
    #[record(category)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub status: Option<String>,
    #[record(timestamp)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "branches")]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(deserialize_with = "coerce::flexible_id")]
    pub id: String,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub restaurant_id: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub name: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub address: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub phone: Option<String>,
    #[record(timestamp)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub created_at: Option<String>,
}

/// A dashboard user: admins, restaurant staff and couriers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "users")]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "coerce::flexible_id")]
    pub id: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub name: String,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub phone: Option<String>,
    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub email: Option<String>,
    #[record(category)]
    #[serde(default, deserialize_with = "coerce::text")]
    pub role: String,
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub image_url: Option<String>,
    #[record(timestamp)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    pub created_at: Option<String>,
}
