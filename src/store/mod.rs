//! Record Store - the last successfully fetched collection for one scope.
//!
//! The store is replace-only: a fetch result swaps the whole collection, it
//! is never patched in place. Responses are tagged with the scope and the
//! session they were requested in. A response whose scope no longer matches
//! the active selection, or that was requested before the last [`reset`],
//! is discarded rather than applied.
//!
//! [`reset`]: RecordStore::reset
//!
//! ## Example
//!
//! ```ignore
//! use orderview::{Order, RecordStore, Scope, ScopedResponse};
//!
//! let mut store = RecordStore::<Order>::new();
//! store.select_scope(Scope::new("branch-B"));
//!
//! // A slow response for the previous branch lands late and is dropped.
//! let outcome = store.apply(ScopedResponse::new("branch-A", orders_a));
//! assert!(outcome.is_discarded());
//! ```

mod listeners;

use std::fmt;

use tracing::{debug, warn};

use crate::Record;

pub use listeners::Listeners;

/// The logical partition fetched data belongs to (e.g., the selected branch).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope(String);

impl Scope {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Scope {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A fetch result tagged with the scope and session it was requested in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedResponse<R> {
    pub scope: Scope,
    /// [`RecordStore::session`] at the time the fetch was issued.
    pub session: u64,
    pub records: Vec<R>,
}

impl<R> ScopedResponse<R> {
    /// A response for the initial session.
    pub fn new(scope: impl Into<Scope>, records: Vec<R>) -> Self {
        Self {
            scope: scope.into(),
            session: 0,
            records,
        }
    }

    pub fn with_session(mut self, session: u64) -> Self {
        self.session = session;
        self
    }
}

/// Notification sent to dependents after the held collection is swapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub collection: &'static str,
    pub scope: Option<Scope>,
    pub revision: u64,
    pub len: usize,
}

/// Result of offering a scoped response to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The collection was replaced; carries the new revision.
    Applied { revision: u64 },
    /// The response belonged to a scope that is no longer selected.
    DiscardedStale {
        expected: Option<Scope>,
        received: Scope,
    },
    /// The response was requested before the store was last reset.
    DiscardedSession { expected: u64, received: u64 },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }

    pub fn is_discarded(&self) -> bool {
        matches!(
            self,
            ApplyOutcome::DiscardedStale { .. } | ApplyOutcome::DiscardedSession { .. }
        )
    }
}

/// Holds the last settled collection of `R` for the active scope.
///
/// Single owner, no interior locking: writes come from fetch completion,
/// reads from the pipeline stages, both on the same event loop.
#[derive(Debug)]
pub struct RecordStore<R> {
    records: Vec<R>,
    scope: Option<Scope>,
    revision: u64,
    session: u64,
    listeners: Listeners<StoreChange>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    /// Create an empty store with no scope selected.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            scope: None,
            revision: 0,
            session: 0,
            listeners: Listeners::new(),
        }
    }

    /// Create an empty store with `scope` already selected.
    pub fn scoped(scope: impl Into<Scope>) -> Self {
        let mut store = Self::new();
        store.scope = Some(scope.into());
        store
    }

    /// The held collection. Empty before the first successful fetch.
    pub fn current(&self) -> &[R] {
        &self.records
    }

    /// The active scope, if one has been selected.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Number of replacements so far. Dependents can compare revisions to
    /// tell whether their derived data is stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Session counter, bumped by every [`reset`](Self::reset). Fetches
    /// carry it so responses from an earlier session can be told apart.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Register a dependent to be told a recompute is due.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&StoreChange) + Send + Sync + 'static,
    {
        self.listeners.on(listener);
    }

    /// Atomically swap the held collection.
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records = records;
        self.revision += 1;

        let change = StoreChange {
            collection: R::COLLECTION,
            scope: self.scope.clone(),
            revision: self.revision,
            len: self.records.len(),
        };
        debug!(
            collection = change.collection,
            revision = change.revision,
            len = change.len,
            "record store replaced"
        );
        self.listeners.emit(&change);
    }

    /// Select the active scope.
    ///
    /// Switching to a different scope empties the held collection so that
    /// data fetched for the previous scope is never shown under the new
    /// selection. Re-selecting the current scope is a no-op.
    pub fn select_scope(&mut self, scope: impl Into<Scope>) -> bool {
        let scope = scope.into();
        if self.scope.as_ref() == Some(&scope) {
            return false;
        }
        self.scope = Some(scope);
        self.replace_all(Vec::new());
        true
    }

    /// Drop the active scope and the held collection and start a new
    /// session (e.g., on login or logout). Responses to fetches issued
    /// before the reset are discarded even if their scope is selected again.
    pub fn reset(&mut self) {
        self.session += 1;
        self.scope = None;
        self.replace_all(Vec::new());
    }

    /// Apply a scoped fetch response.
    ///
    /// Only a response tagged with the current session and the active scope
    /// replaces the collection; among those, the last one applied wins.
    pub fn apply(&mut self, response: ScopedResponse<R>) -> ApplyOutcome {
        if response.session != self.session {
            warn!(
                collection = R::COLLECTION,
                expected = self.session,
                received = response.session,
                scope = response.scope.as_str(),
                "discarding response from an earlier session"
            );
            return ApplyOutcome::DiscardedSession {
                expected: self.session,
                received: response.session,
            };
        }

        if self.scope.as_ref() != Some(&response.scope) {
            warn!(
                collection = R::COLLECTION,
                expected = ?self.scope.as_ref().map(Scope::as_str),
                received = response.scope.as_str(),
                "discarding stale response"
            );
            return ApplyOutcome::DiscardedStale {
                expected: self.scope.clone(),
                received: response.scope,
            };
        }

        self.replace_all(response.records);
        ApplyOutcome::Applied {
            revision: self.revision,
        }
    }
}
