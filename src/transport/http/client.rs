//! HTTP implementation of the inventory service contract.
//!
//! Every call except authentication carries `Authorization: Bearer <token>`.
//! Non-success statuses are classified per operation (see
//! [`InventoryError::from_status`]); network and decode failures become
//! [`InventoryError::Transport`].

use crate::domain::filter::FilterCriteria;
use crate::domain::session::{AuthMode, Credentials, Session};
use crate::domain::sweet::{Sweet, SweetDraft, SweetId, SweetPatch};
use crate::error::{InventoryError, Operation, Result};
use crate::transport::http::types::{AuthResponse, RestockRequest, SearchParams};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use std::num::NonZeroU32;
use tracing::{debug, info, warn};

/// The operations the shop needs from the inventory service.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials, mode: AuthMode) -> Result<Session>;

    async fn list_all(&self, session: &Session) -> Result<Vec<Sweet>>;

    /// Server-side filtering; the shop view filters locally, this is for
    /// callers that want the service to do it.
    async fn search(&self, session: &Session, criteria: &FilterCriteria) -> Result<Vec<Sweet>>;

    async fn create(&self, session: &Session, draft: &SweetDraft) -> Result<()>;

    async fn update(&self, session: &Session, id: SweetId, patch: &SweetPatch) -> Result<()>;

    async fn delete(&self, session: &Session, id: SweetId) -> Result<()>;

    async fn purchase(&self, session: &Session, id: SweetId) -> Result<()>;

    async fn restock(&self, session: &Session, id: SweetId, quantity: NonZeroU32) -> Result<()>;
}

/// `reqwest`-backed [`InventoryApi`]. Cloning is cheap and clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl InventoryClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request` and turns a non-success status into the error `op`
    /// assigns to it.
    async fn send(op: Operation, request: RequestBuilder) -> Result<Response> {
        let resp = request.send().await.map_err(|e| {
            warn!(?op, error = %e, "inventory request failed in transport");
            InventoryError::from(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            debug!(?op, %status, "inventory request succeeded");
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let err = InventoryError::from_status(op, status, body);
        warn!(?op, %status, error = %err, "inventory request rejected");
        Err(err)
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    async fn authenticate(&self, credentials: &Credentials, mode: AuthMode) -> Result<Session> {
        let request = self.http.post(self.url(mode.path())).json(credentials);
        let resp = Self::send(Operation::Authenticate, request).await?;
        let auth: AuthResponse = resp.json().await?;
        info!(username = %auth.username, ?mode, "authenticated");
        Ok(auth.into())
    }

    async fn list_all(&self, session: &Session) -> Result<Vec<Sweet>> {
        let request = self.http.get(self.url("/sweets")).bearer_auth(&session.token);
        let resp = Self::send(Operation::List, request).await?;
        let sweets: Vec<Sweet> = resp.json().await?;
        debug!(count = sweets.len(), "listed sweets");
        Ok(sweets)
    }

    async fn search(&self, session: &Session, criteria: &FilterCriteria) -> Result<Vec<Sweet>> {
        let params = SearchParams::from(criteria);
        let request = self
            .http
            .get(self.url("/sweets/search"))
            .bearer_auth(&session.token)
            .query(&params);
        let resp = Self::send(Operation::Search, request).await?;
        Ok(resp.json().await?)
    }

    async fn create(&self, session: &Session, draft: &SweetDraft) -> Result<()> {
        let request = self
            .http
            .post(self.url("/sweets"))
            .bearer_auth(&session.token)
            .json(draft);
        Self::send(Operation::Create, request).await?;
        info!(name = %draft.name, "created sweet");
        Ok(())
    }

    async fn update(&self, session: &Session, id: SweetId, patch: &SweetPatch) -> Result<()> {
        let request = self
            .http
            .put(self.url(&format!("/sweets/{id}")))
            .bearer_auth(&session.token)
            .json(patch);
        Self::send(Operation::Update, request).await?;
        info!(%id, "updated sweet");
        Ok(())
    }

    async fn delete(&self, session: &Session, id: SweetId) -> Result<()> {
        let request = self
            .http
            .delete(self.url(&format!("/sweets/{id}")))
            .bearer_auth(&session.token);
        Self::send(Operation::Delete, request).await?;
        info!(%id, "deleted sweet");
        Ok(())
    }

    async fn purchase(&self, session: &Session, id: SweetId) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("/sweets/{id}/purchase")))
            .bearer_auth(&session.token);
        Self::send(Operation::Purchase, request).await?;
        info!(%id, "purchased sweet");
        Ok(())
    }

    async fn restock(&self, session: &Session, id: SweetId, quantity: NonZeroU32) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("/sweets/{id}/restock")))
            .bearer_auth(&session.token)
            .json(&RestockRequest { quantity });
        Self::send(Operation::Restock, request).await?;
        info!(%id, quantity = quantity.get(), "restocked sweet");
        Ok(())
    }
}
