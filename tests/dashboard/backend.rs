//! In-memory stand-in for the dashboard API.
//!
//! Fetch requests are queued and resolved explicitly, so tests control the
//! order in which responses land.

use std::collections::{HashMap, VecDeque};

use orderview::{FetchRequest, Order, Scope, ScopedResponse};
use serde_json::json;

#[derive(Default)]
pub struct Backend {
    branches: HashMap<Scope, Vec<Order>>,
    in_flight: VecDeque<FetchRequest>,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, branch: &str, count: usize) -> Self {
        self.branches
            .insert(Scope::new(branch), branch_orders(branch, count));
        self
    }

    pub fn records(&self, branch: &str) -> Vec<Order> {
        self.branches
            .get(&Scope::new(branch))
            .cloned()
            .unwrap_or_default()
    }

    pub fn request(&mut self, request: FetchRequest) {
        assert_eq!(request.collection, "orders");
        self.in_flight.push_back(request);
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Resolve the oldest outstanding request.
    pub fn resolve_oldest(&mut self) -> ScopedResponse<Order> {
        let request = self.in_flight.pop_front().expect("no fetch in flight");
        self.respond(&request)
    }

    /// Resolve the newest outstanding request.
    pub fn resolve_newest(&mut self) -> ScopedResponse<Order> {
        let request = self.in_flight.pop_back().expect("no fetch in flight");
        self.respond(&request)
    }

    fn respond(&self, request: &FetchRequest) -> ScopedResponse<Order> {
        let records = self.branches.get(&request.scope).cloned().unwrap_or_default();
        request.respond(records)
    }
}

pub fn branch_orders(branch: &str, count: usize) -> Vec<Order> {
    let statuses = ["Pending", "Delivered"];
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "id": format!("{branch}-{i}"),
                "orderNumber": format!("{}-{:03}", branch.to_uppercase(), i),
                "customerName": if i % 4 == 0 { "Kofi Mensah" } else { "Abena Owusu" },
                "courierName": if i % 2 == 0 { "Ama" } else { "Yaw" },
                "status": statuses[i % statuses.len()],
                "createdAt": format!("2024-06-{:02}T09:00:00Z", 1 + i % 10),
                "deliveryPrice": 5,
                "totalPrice": 30 + i,
            }))
            .expect("branch order")
        })
        .collect()
}
