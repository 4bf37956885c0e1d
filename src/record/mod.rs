//! Records - typed business entities flowing through the pipeline.
//!
//! Every collection the dashboard fetches has a named schema implementing
//! [`Record`]. The schema is validated once, at the fetch boundary, so the
//! filter, grouping and export stages can rely on field presence and types.
//!
//! ## Example
//!
//! ```ignore
//! use orderview::Record;
//!
//! #[derive(Clone, Serialize, Deserialize, Record)]
//! #[record(collection = "orders")]
//! struct Order {
//!     #[record(id)]
//!     pub id: String,
//!     #[record(search)]
//!     pub customer_name: String,
//!     #[record(category)]
//!     pub status: String,
//!     #[record(timestamp)]
//!     pub created_at: String,
//! }
//! ```

mod schema;

use serde::{de::DeserializeOwned, Serialize};

pub use schema::{Branch, Order, OrderItem, Restaurant, User};

/// Trait for types that can be held by a `RecordStore` and filtered.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this record was fetched from (e.g., "orders", "users").
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this record.
    fn id(&self) -> &str;

    /// String-valued fields matched by free-text search, in a fixed order.
    /// Absent optional fields are skipped.
    fn search_fields(&self) -> Vec<&str>;

    /// The field compared by the categorical (status) predicate.
    fn category(&self) -> Option<&str>;

    /// Raw timestamp text used by the date-range predicate.
    fn timestamp(&self) -> Option<&str>;
}

/// Text view of a field, used by `#[derive(Record)]`.
pub trait SearchText {
    fn search_text(&self) -> Option<&str>;
}

impl SearchText for String {
    fn search_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl SearchText for Option<String> {
    fn search_text(&self) -> Option<&str> {
        self.as_deref()
    }
}
