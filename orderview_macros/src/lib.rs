mod record;

use proc_macro::TokenStream;

/// Derive macro for implementing the `Record` trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "orders")]
/// struct Order {
///     #[record(id)]
///     pub id: String,
///     #[record(search)]
///     pub customer_name: String,
///     #[record(search)]
///     pub courier_name: Option<String>,
///     #[record(category)]
///     pub status: String,
///     #[record(timestamp)]
///     pub created_at: String,
/// }
/// ```
///
/// - `#[record(collection = "...")]` sets the collection origin tag.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[record(id)]` marks the field used as the unique identifier.
///   If omitted, defaults to a field named `id`.
/// - `#[record(search)]` adds a `String` or `Option<String>` field to the
///   text-search field list, in declaration order.
/// - `#[record(category)]` marks the field compared by the status filter.
/// - `#[record(timestamp)]` marks the raw timestamp used by date-range filters.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
