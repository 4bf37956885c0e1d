//! orderview - derived-state pipeline for restaurant order dashboards.
//!
//! Fetched records flow through a fixed set of pure stages:
//!
//! ```text
//! RecordStore -> filter --+--> group     (summary cards, leaderboards)
//!                         +--> paginate  (table display)
//!                         +--> export    (CSV of the filtered view)
//! ```
//!
//! [`Dashboard`] folds UI events and settled fetches into that state, and the
//! optional `http` feature provides the bearer-authenticated fetch
//! collaborator.

extern crate self as orderview;

pub mod auth;
pub mod coerce;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod group;
pub mod overview;
pub mod paginate;
pub mod record;
pub mod source;
pub mod store;

pub use auth::{AuthContext, AuthError};
pub use config::{ConfigError, PipelineConfig};
pub use dashboard::{Action, Dashboard, DashboardError, Effect, FetchRequest};
pub use export::{
    orders_exporter, Cell, CsvExporter, DirectorySink, Download, DownloadSink, ExportError,
    CSV_MIME_TYPE,
};
pub use filter::{DateRange, FilterCriteria, StatusFilter};
pub use group::{Direction, Group, Grouping, Metric, Totals};
pub use overview::{courier_board, restaurant_leaderboard, CourierStanding, Overview};
pub use paginate::{clamp_page, paginate, Page, DEFAULT_PAGE_SIZE};
pub use record::{Branch, Order, OrderItem, Record, Restaurant, User};
pub use source::{decode_collection, Decoded, SourceError};
pub use store::{ApplyOutcome, RecordStore, Scope, ScopedResponse, StoreChange};

#[cfg(feature = "http")]
pub use source::HttpSource;

// Re-export the derive macro under the trait's name
pub use orderview_macros::Record;
