//! Fetch boundary - turning API responses into validated record batches.
//!
//! [`decode_collection`] is where loosely-typed JSON becomes a named schema.
//! Elements that fail the schema are dropped and counted so a single bad row
//! cannot blank the whole view. With the `http` feature, [`HttpSource`]
//! performs the bearer-authenticated GET and tags the result with the scope
//! it was requested for.

#[cfg(feature = "http")]
mod http;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::auth::AuthError;
use crate::Record;

#[cfg(feature = "http")]
pub use http::HttpSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape for {collection}: {detail}")]
    Shape {
        collection: &'static str,
        detail: String,
    },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[cfg(feature = "http")]
    #[error("invalid request url {url}: {reason}")]
    Url { url: String, reason: String },

    #[cfg(feature = "http")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A decoded batch plus the number of elements that failed the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub records: Vec<R>,
    pub rejected: usize,
}

/// Decode a response body into records of `R`.
///
/// Accepts a bare JSON array or a `{"data": [...]}` envelope.
pub fn decode_collection<R: Record>(body: &[u8]) -> Result<Decoded<R>, SourceError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_value(value)
}

/// Same as [`decode_collection`] for an already-parsed value.
pub fn decode_value<R: Record>(value: Value) -> Result<Decoded<R>, SourceError> {
    let elements = match value {
        Value::Array(elements) => elements,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(elements)) => elements,
            _ => {
                return Err(SourceError::Shape {
                    collection: R::COLLECTION,
                    detail: "object without a `data` array".to_string(),
                })
            }
        },
        other => {
            return Err(SourceError::Shape {
                collection: R::COLLECTION,
                detail: format!("expected array, got {}", kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(elements.len());
    let mut rejected = 0;
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<R>(element) {
            Ok(record) => records.push(record),
            Err(e) => {
                rejected += 1;
                warn!(
                    collection = R::COLLECTION,
                    index,
                    error = %e,
                    "dropping record that failed schema validation"
                );
            }
        }
    }

    Ok(Decoded { records, rejected })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
