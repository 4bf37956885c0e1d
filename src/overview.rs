//! Analytics overview - summary cards and leaderboards built from the
//! grouping stage.

use std::collections::HashMap;

use serde::Serialize;

use crate::group::{keys, Direction, Grouping, Metric};
use crate::{Order, User};

/// Revenue accumulated on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRevenue {
    pub day: String,
    pub orders: usize,
    pub revenue: f64,
}

/// Figures shown on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub delivery_revenue: f64,
    /// `0.0` when there are no orders.
    pub average_order_value: f64,
    /// `(status, count)`, most frequent first.
    pub status_breakdown: Vec<(String, usize)>,
    /// Ascending by day; orders without a parsable timestamp are left out.
    pub revenue_by_day: Vec<DayRevenue>,
}

impl Overview {
    pub fn compute<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let orders: Vec<&Order> = orders.into_iter().collect();
        let total_orders = orders.len();
        let total_revenue: f64 = orders.iter().map(|o| o.total_price).sum();
        let delivery_revenue: f64 = orders.iter().map(|o| o.delivery_price).sum();
        let average_order_value = if total_orders == 0 {
            0.0
        } else {
            total_revenue / total_orders as f64
        };

        let status_breakdown = Grouping::by(keys::status)
            .sort_by(Metric::Count, Direction::Descending)
            .run(orders.iter().copied())
            .into_iter()
            .map(|g| (g.key, g.count))
            .collect();

        let mut revenue_by_day: Vec<DayRevenue> = Grouping::by(keys::day)
            .sum("revenue", |o: &Order| o.total_price)
            .run(orders.iter().copied())
            .into_iter()
            .map(|g| DayRevenue {
                revenue: g.sum("revenue"),
                orders: g.count,
                day: g.key,
            })
            .collect();
        revenue_by_day.sort_by(|a, b| a.day.cmp(&b.day));

        Self {
            total_orders,
            total_revenue,
            delivery_revenue,
            average_order_value,
            status_breakdown,
            revenue_by_day,
        }
    }
}

/// Top restaurants by revenue: `(restaurant id, display name, orders, revenue)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantStanding {
    pub restaurant_id: String,
    pub name: Option<String>,
    pub orders: usize,
    pub revenue: f64,
}

pub fn restaurant_leaderboard<'a, I>(orders: I) -> Vec<RestaurantStanding>
where
    I: IntoIterator<Item = &'a Order>,
{
    Grouping::by(keys::restaurant_id)
        .sum("revenue", |o: &Order| o.total_price)
        .run(orders)
        .into_iter()
        .map(|g| RestaurantStanding {
            name: g
                .members
                .iter()
                .find_map(|o| o.restaurant_name.clone()),
            orders: g.count,
            revenue: g.sum("revenue"),
            restaurant_id: g.key,
        })
        .collect()
}

/// One courier's row on the courier board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierStanding {
    pub courier_name: String,
    pub courier_id: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub deliveries: usize,
    pub delivery_revenue: f64,
    pub distance: f64,
}

/// Group orders by courier and attach each courier's picture.
///
/// Couriers are told apart by `Order::courier_id`; orders without one fall
/// back to grouping by name. The picture is resolved by joining the id to
/// `User::id`. Couriers without an id, or whose id has no user, get no
/// picture; names and phone numbers are never used as join keys.
pub fn courier_board<'a, I>(orders: I, users: &[User]) -> Vec<CourierStanding>
where
    I: IntoIterator<Item = &'a Order>,
{
    let images: HashMap<&str, &str> = users
        .iter()
        .filter_map(|u| u.image_url.as_deref().map(|url| (u.id.as_str(), url)))
        .collect();

    Grouping::by(keys::courier)
        .sum("delivery", |o: &Order| o.delivery_price)
        .sum("distance", |o: &Order| o.delivery_distance)
        .run(orders)
        .into_iter()
        .filter_map(|g| {
            let courier_id = g.members.iter().find_map(|o| keys::courier_id(o));
            let courier_name = g
                .members
                .iter()
                .find_map(|o| keys::courier_name(o))
                .or_else(|| courier_id.clone())?;
            let phone = g.members.iter().find_map(|o| o.courier_phone.clone());
            let image_url = courier_id
                .as_deref()
                .and_then(|id| images.get(id))
                .map(|url| url.to_string());
            Some(CourierStanding {
                deliveries: g.count,
                delivery_revenue: g.sum("delivery"),
                distance: g.sum("distance"),
                courier_name,
                courier_id,
                phone,
                image_url,
            })
        })
        .collect()
}
