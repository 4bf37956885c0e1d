//! Dashboard - UI events as explicit actions folded into state.
//!
//! Every user input and every settled fetch becomes an [`Action`] passed to
//! [`Dashboard::dispatch`]. The dashboard owns the auth context, the record
//! store and the filter inputs; derived data (filtered rows, the current
//! page) is recomputed from them on demand and never cached.
//!
//! ## Example
//!
//! ```ignore
//! use orderview::dashboard::{Action, Dashboard, Effect};
//!
//! let mut dashboard = Dashboard::<Order>::new(PipelineConfig::default().page_size);
//! dashboard.dispatch(Action::Login { token })?;
//!
//! if let Effect::Fetch(request) = dashboard.dispatch(Action::SelectScope("branch-7".into()))? {
//!     let response = source.fetch_request::<Order>(dashboard.auth(), &request).await?;
//!     dashboard.dispatch(Action::FetchSucceeded(response))?;
//! }
//!
//! dashboard.dispatch(Action::SetQuery("kofi".into()))?;
//! let page = dashboard.page();
//! ```

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{AuthContext, AuthError};
use crate::export::{CsvExporter, Download};
use crate::filter::{self, DateRange, FilterCriteria, StatusFilter};
use crate::paginate::{self, Page};
use crate::store::{ApplyOutcome, RecordStore, Scope, ScopedResponse};
use crate::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("no scope selected")]
    NoScope,
}

/// A user input or a settled fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<R> {
    Login { token: String },
    Logout,
    SelectScope(Scope),
    /// Re-fetch the selected scope.
    Refresh,
    FetchSucceeded(ScopedResponse<R>),
    FetchFailed { scope: Scope, reason: String },
    SetQuery(String),
    SetStatus(StatusFilter),
    SetDateRange(DateRange),
    ClearFilters,
    GoToPage(usize),
}

/// Work for the I/O collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub scope: Scope,
    pub collection: &'static str,
    /// Session the request was issued in; echoed back on the response.
    pub session: u64,
}

impl FetchRequest {
    /// Tag fetched records as the answer to this request.
    pub fn respond<R>(&self, records: Vec<R>) -> ScopedResponse<R> {
        ScopedResponse::new(self.scope.clone(), records).with_session(self.session)
    }
}

/// What a dispatch asks the host to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start a fetch and dispatch its result back.
    Fetch(FetchRequest),
    /// A fetch result replaced the store.
    Applied { revision: u64 },
    /// A fetch result arrived for a scope that is no longer selected.
    Discarded { received: Scope },
}

/// Owner of the pipeline state for one collection view.
#[derive(Debug)]
pub struct Dashboard<R> {
    auth: AuthContext,
    store: RecordStore<R>,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    pending: Option<Scope>,
}

impl<R: Record> Dashboard<R> {
    /// `page_size` is fixed for the dashboard's lifetime; zero is taken as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            auth: AuthContext::new(),
            store: RecordStore::new(),
            criteria: FilterCriteria::new(),
            page: 1,
            page_size: page_size.max(1),
            pending: None,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Mutable store access, e.g. to subscribe recompute listeners.
    pub fn store_mut(&mut self) -> &mut RecordStore<R> {
        &mut self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// True while a fetch for the selected scope is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some() && self.pending.as_ref() == self.store.scope()
    }

    /// Fold one action into the state.
    pub fn dispatch(&mut self, action: Action<R>) -> Result<Effect, DashboardError> {
        match action {
            Action::Login { token } => {
                self.auth.login(token)?;
                self.end_session();
                info!(session = self.store.session(), "signed in");
                Ok(Effect::None)
            }
            Action::Logout => {
                self.auth.logout();
                self.end_session();
                info!("signed out");
                Ok(Effect::None)
            }
            Action::SelectScope(scope) => {
                self.require_auth()?;
                if self.store.select_scope(scope.clone()) {
                    info!(collection = R::COLLECTION, %scope, "scope selected");
                    self.page = 1;
                }
                Ok(self.request_fetch(scope))
            }
            Action::Refresh => {
                self.require_auth()?;
                let scope = self.store.scope().cloned().ok_or(DashboardError::NoScope)?;
                Ok(self.request_fetch(scope))
            }
            Action::FetchSucceeded(response) => {
                let received = response.scope.clone();
                match self.store.apply(response) {
                    ApplyOutcome::Applied { revision } => {
                        if self.pending.as_ref() == Some(&received) {
                            self.pending = None;
                        }
                        self.clamp_page();
                        Ok(Effect::Applied { revision })
                    }
                    ApplyOutcome::DiscardedStale { .. } | ApplyOutcome::DiscardedSession { .. } => {
                        Ok(Effect::Discarded { received })
                    }
                }
            }
            Action::FetchFailed { scope, reason } => {
                warn!(collection = R::COLLECTION, %scope, %reason, "fetch failed, keeping previous records");
                if self.pending.as_ref() == Some(&scope) {
                    self.pending = None;
                }
                Ok(Effect::None)
            }
            Action::SetQuery(query) => {
                self.criteria.query = query;
                self.clamp_page();
                Ok(Effect::None)
            }
            Action::SetStatus(status) => {
                self.criteria.status = status;
                self.clamp_page();
                Ok(Effect::None)
            }
            Action::SetDateRange(range) => {
                self.criteria.date_range = range;
                self.clamp_page();
                Ok(Effect::None)
            }
            Action::ClearFilters => {
                self.criteria = FilterCriteria::new();
                self.clamp_page();
                Ok(Effect::None)
            }
            Action::GoToPage(page) => {
                self.page = paginate::clamp_page(page, self.total_pages());
                Ok(Effect::None)
            }
        }
    }

    fn require_auth(&self) -> Result<(), DashboardError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(DashboardError::Unauthorized(AuthError::SignedOut))
        }
    }

    /// Drop everything tied to the previous credential. In-flight fetches
    /// from that session are discarded when they land.
    fn end_session(&mut self) {
        self.store.reset();
        self.criteria = FilterCriteria::new();
        self.page = 1;
        self.pending = None;
    }

    fn request_fetch(&mut self, scope: Scope) -> Effect {
        self.pending = Some(scope.clone());
        Effect::Fetch(FetchRequest {
            scope,
            collection: R::COLLECTION,
            session: self.store.session(),
        })
    }

    fn clamp_page(&mut self) {
        self.page = paginate::clamp_page(self.page, self.total_pages());
    }

    /// Records matching the current criteria, in store order.
    pub fn filtered(&self) -> Vec<&R> {
        filter::apply(self.store.current(), &self.criteria)
    }

    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.filtered().len(), self.page_size)
    }

    /// The current page of filtered records.
    pub fn page(&self) -> Page<&R> {
        paginate::paginate(&self.filtered(), self.page, self.page_size)
    }

    /// Export the whole filtered view, not just the visible page.
    pub fn export(&self, exporter: &CsvExporter<R>, filename: impl Into<String>) -> Download {
        exporter.download(filename, self.filtered())
    }
}
