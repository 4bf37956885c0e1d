//! Exporter - serialize the filtered view to CSV for download.
//!
//! Columns are an explicit, ordered list of named projections. Projections
//! return a [`Cell`], and every formatting rule (two-decimal currency, date
//! rendering, list joining) lives in [`Cell::render`] rather than at call
//! sites.
//!
//! ## Example
//!
//! ```ignore
//! use orderview::export::{Cell, CsvExporter};
//!
//! let exporter = CsvExporter::new()
//!     .column("Order Number", |o: &Order| Cell::text(&o.order_number))
//!     .column("Total", |o: &Order| Cell::Currency(o.total_price));
//!
//! let download = exporter.download("orders.csv", &filtered);
//! ```

mod download;

use std::fmt;

use crate::filter::parse_timestamp;
use crate::Order;

pub use download::{DirectorySink, Download, DownloadSink, ExportError, CSV_MIME_TYPE};

/// Separator used when a list field is flattened into one cell.
pub const LIST_SEPARATOR: &str = "; ";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A projected value, formatted at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Fixed two decimals.
    Currency(f64),
    /// Fixed two decimals (distances, rates).
    Number(f64),
    Integer(i64),
    /// Raw timestamp; rendered as `YYYY-MM-DD HH:MM` (UTC) when parsable,
    /// verbatim otherwise.
    Date(String),
    /// Joined with [`LIST_SEPARATOR`].
    List(Vec<String>),
    Empty,
}

impl Cell {
    pub fn text(value: impl AsRef<str>) -> Self {
        Cell::Text(value.as_ref().to_string())
    }

    /// `Empty` for `None`.
    pub fn optional(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, |v| Cell::text(v))
    }

    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Currency(v) | Cell::Number(v) => two_decimals(*v),
            Cell::Integer(n) => n.to_string(),
            Cell::Date(raw) => parse_timestamp(raw)
                .map(|instant| instant.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| raw.clone()),
            Cell::List(items) => items.join(LIST_SEPARATOR),
            Cell::Empty => String::new(),
        }
    }
}

fn two_decimals(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    let formatted = format!("{:.2}", value);
    // "-0.00" reads as a negative amount
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Quote a field per CSV rules when it contains a delimiter, quote or line
/// break; internal quotes are doubled.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

type Projection<R> = Box<dyn Fn(&R) -> Cell + Send + Sync>;

struct Column<R> {
    header: String,
    project: Projection<R>,
}

/// Ordered set of named column projections over `R`.
pub struct CsvExporter<R> {
    columns: Vec<Column<R>>,
}

impl<R> Default for CsvExporter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> CsvExporter<R> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a column. Columns render in declaration order.
    pub fn column<F>(mut self, header: impl Into<String>, project: F) -> Self
    where
        F: Fn(&R) -> Cell + Send + Sync + 'static,
    {
        self.columns.push(Column {
            header: header.into(),
            project: Box::new(project),
        });
        self
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    fn write_row(out: &mut String, fields: impl Iterator<Item = String>) {
        let mut first = true;
        for field in fields {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(&escape_field(&field));
        }
        out.push('\n');
    }

    /// Header row, then one row per record, `\n`-terminated.
    pub fn to_csv<'a, I>(&self, records: I) -> String
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut out = String::new();
        Self::write_row(&mut out, self.columns.iter().map(|c| c.header.clone()));
        for record in records {
            Self::write_row(
                &mut out,
                self.columns.iter().map(|c| (c.project)(record).render()),
            );
        }
        out
    }

    /// Build the download triple for `records`.
    pub fn download<'a, I>(&self, filename: impl Into<String>, records: I) -> Download
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        Download::csv(filename, self.to_csv(records))
    }
}

impl<R> fmt::Debug for CsvExporter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvExporter")
            .field("headers", &self.headers())
            .finish()
    }
}

/// The order table export.
pub fn orders_exporter() -> CsvExporter<Order> {
    CsvExporter::new()
        .column("Order Number", |o: &Order| Cell::text(&o.order_number))
        .column("Date", |o: &Order| Cell::Date(o.created_at.clone()))
        .column("Customer", |o: &Order| Cell::text(&o.customer_name))
        .column("Phone", |o: &Order| Cell::text(&o.customer_phone))
        .column("Courier", |o: &Order| Cell::optional(o.courier_name.as_deref()))
        .column("Restaurant", |o: &Order| {
            Cell::optional(o.restaurant_name.as_deref())
        })
        .column("Status", |o: &Order| Cell::text(&o.status))
        .column("Items", |o: &Order| Cell::List(o.item_labels()))
        .column("Delivery Price", |o: &Order| Cell::Currency(o.delivery_price))
        .column("Total", |o: &Order| Cell::Currency(o.total_price))
}
