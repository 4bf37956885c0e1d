//! HTTP fetch collaborator (requires the `http` feature).
//!
//! ## Example
//!
//! ```ignore
//! use orderview::{AuthContext, HttpSource, Order, PipelineConfig, Scope};
//!
//! let source = HttpSource::new(&PipelineConfig::from_env()?)?;
//! let auth = AuthContext::with_token(token)?;
//! let response = source.fetch::<Order>(&auth, &Scope::new("branch-7")).await?;
//! dashboard.dispatch(Action::FetchSucceeded(response))?;
//! ```

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use tracing::{debug, warn};

use super::{decode_collection, SourceError};
use crate::auth::AuthContext;
use crate::config::PipelineConfig;
use crate::dashboard::FetchRequest;
use crate::store::{Scope, ScopedResponse};
use crate::Record;

/// Bearer-authenticated JSON client for the dashboard API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    path_template: String,
}

impl HttpSource {
    pub fn new(config: &PipelineConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured client (shared connection pool, custom TLS).
    pub fn with_client(client: reqwest::Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            path_template: config.path_template.clone(),
        }
    }

    /// URL for fetching `R` within `scope`.
    ///
    /// The template's path part is split into segments and its query part
    /// into `key=value` pairs; placeholders are substituted before each piece
    /// is appended, so scope keys are encoded as a single segment or value.
    pub fn endpoint<R: Record>(&self, scope: &Scope) -> Result<Url, SourceError> {
        let invalid = |reason: String| SourceError::Url {
            url: self.base_url.clone(),
            reason,
        };
        let fill = |part: &str| {
            part.replace("{collection}", R::COLLECTION)
                .replace("{scope}", scope.as_str())
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        let (path, query) = self
            .path_template
            .split_once('?')
            .unwrap_or((self.path_template.as_str(), ""));

        url.path_segments_mut()
            .map_err(|_| invalid("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()).map(fill));

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                pairs.append_pair(&fill(key), &fill(value));
            }
        }

        Ok(url)
    }

    /// Fetch the full collection of `R` for `scope`.
    ///
    /// The response is tagged with `scope` so the store can drop it if the
    /// selection has moved on by the time it lands.
    pub async fn fetch<R: Record>(
        &self,
        auth: &AuthContext,
        scope: &Scope,
    ) -> Result<ScopedResponse<R>, SourceError> {
        let bearer = auth.bearer()?;
        let url = self.endpoint::<R>(scope)?;
        debug!(collection = R::COLLECTION, %scope, %url, "fetching collection");

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, bearer)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(collection = R::COLLECTION, %scope, status = status.as_u16(), "fetch rejected");
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let decoded = decode_collection::<R>(&body)?;
        debug!(
            collection = R::COLLECTION,
            %scope,
            records = decoded.records.len(),
            rejected = decoded.rejected,
            "fetch complete"
        );

        Ok(ScopedResponse::new(scope.clone(), decoded.records))
    }

    /// Carry out a dashboard [`FetchRequest`], tagging the response with the
    /// request's session.
    pub async fn fetch_request<R: Record>(
        &self,
        auth: &AuthContext,
        request: &FetchRequest,
    ) -> Result<ScopedResponse<R>, SourceError> {
        let response = self.fetch::<R>(auth, &request.scope).await?;
        Ok(response.with_session(request.session))
    }
}
