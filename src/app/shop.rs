//! The shop state manager.
//!
//! `Shop` owns the single instances of the client-side state and is the only
//! thing that mutates them:
//! 1.  The signed-in `Session` (persisted through the `SessionStore`).
//! 2.  The `InventoryCache`, replaced wholesale by a full listing after
//!     authentication and after every successful mutation.
//! 3.  The `FilterCriteria` and the visible subset derived from them.
//! 4.  The `EditSession` of the create/edit form.
//! 5.  The `NotificationChannel` reporting each action's outcome.
//!
//! Every action method recovers its own failures: it emits a notification
//! and reports an [`Outcome`] instead of returning an error. No lock is held
//! across a remote call, so filtering and form edits stay responsive while a
//! call is in flight and concurrent actions are allowed to race; the refresh
//! that follows each one always reflects the service's latest state.

use crate::app::messages;
use crate::app::notifier::{Notification, NotificationChannel};
use crate::domain::cache::InventoryCache;
use crate::domain::edit::{EditSession, FormField, FormTarget};
use crate::domain::filter::{filter, FilterCriteria};
use crate::domain::session::{AuthMode, Credentials, Session};
use crate::domain::sweet::{Sweet, SweetId};
use crate::error::InventoryError;
use crate::infra::config::ClientConfig;
use crate::storage::{KeyValueStorage, SessionStore};
use crate::transport::http::InventoryApi;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// How an action ended. The notification has already been emitted.
#[derive(Debug)]
pub enum Outcome {
    Done,
    /// Nothing to do (no open form, cancelled input, no persisted session).
    Skipped,
    Failed(InventoryError),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&InventoryError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Read-only view model for the presentation layer.
#[derive(Debug, Clone)]
pub struct ShopSnapshot {
    pub username: Option<String>,
    pub visible: Vec<Sweet>,
    pub total: usize,
    pub criteria: FilterCriteria,
    pub edit: EditSession,
    pub notification: Option<Notification>,
}

pub struct Shop<A, S> {
    api: A,
    sessions: Mutex<SessionStore<S>>,
    session: RwLock<Option<Session>>,
    cache: RwLock<InventoryCache>,
    criteria: RwLock<FilterCriteria>,
    edit: Mutex<EditSession>,
    notifier: NotificationChannel,
    logout_on_unauthorized: bool,
}

impl<A, S> Shop<A, S>
where
    A: InventoryApi,
    S: KeyValueStorage,
{
    pub fn new(api: A, sessions: SessionStore<S>) -> Self {
        Self {
            api,
            sessions: Mutex::new(sessions),
            session: RwLock::new(None),
            cache: RwLock::new(InventoryCache::new()),
            criteria: RwLock::new(FilterCriteria::default()),
            edit: Mutex::new(EditSession::Inactive),
            notifier: NotificationChannel::default(),
            logout_on_unauthorized: false,
        }
    }

    pub fn with_config(api: A, sessions: SessionStore<S>, config: &ClientConfig) -> Self {
        Self::new(api, sessions)
            .with_notification_ttl(config.notification_ttl)
            .with_logout_on_unauthorized(config.logout_on_unauthorized)
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notifier = NotificationChannel::new(ttl);
        self
    }

    /// When set, an `Unauthorized` rejection on a routine call signs the user
    /// out instead of only failing the action.
    pub fn with_logout_on_unauthorized(mut self, enabled: bool) -> Self {
        self.logout_on_unauthorized = enabled;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // --- Session ---

    /// Picks up a persisted session (if any) and performs the initial load.
    pub async fn restore(&self) -> Outcome {
        let loaded = self.sessions.lock().await.load();
        let session = match loaded {
            Ok(Some(session)) => session,
            Ok(None) => return Outcome::Skipped,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable persisted session");
                return Outcome::Skipped;
            }
        };

        info!(username = %session.username, "restored session");
        *self.session.write().await = Some(session.clone());

        if let Err(err) = self.reload(&session).await {
            return self.fail(messages::LOAD_FAILED, err).await;
        }
        Outcome::Done
    }

    /// Signs in or registers, persists the session and loads the inventory.
    pub async fn authenticate(&self, credentials: &Credentials, mode: AuthMode) -> Outcome {
        let session = match self.api.authenticate(credentials, mode).await {
            Ok(session) => session,
            Err(err) => return self.fail(messages::AUTH_FAILED, err).await,
        };

        if let Err(e) = self.sessions.lock().await.save(&session) {
            warn!(error = %e, "failed to persist session; it will not survive a restart");
        }
        *self.session.write().await = Some(session.clone());

        match self.reload(&session).await {
            Ok(()) => self.notifier.emit(messages::welcome(&session.username)).await,
            Err(err) => {
                warn!(error = %err, "initial inventory load failed");
                self.handle_unauthorized(&err).await;
                self.notifier.emit(messages::LOAD_FAILED).await;
            }
        }
        Outcome::Done
    }

    /// Drops the session everywhere and empties the inventory.
    pub async fn logout(&self) -> Outcome {
        self.end_session().await;
        self.notifier.emit(messages::LOGGED_OUT).await;
        Outcome::Done
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    // --- Inventory and filtering ---

    /// Re-fetches the full listing.
    pub async fn refresh(&self) -> Outcome {
        let session = match self.require_session().await {
            Ok(session) => session,
            Err(err) => return self.fail(messages::LOAD_FAILED, err).await,
        };
        match self.reload(&session).await {
            Ok(()) => Outcome::Done,
            Err(err) => self.fail(messages::LOAD_FAILED, err).await,
        }
    }

    /// Everything in the cache, in service order.
    pub async fn sweets(&self) -> Vec<Sweet> {
        self.cache.read().await.items().to_vec()
    }

    /// The cache filtered by the current criteria.
    pub async fn visible(&self) -> Vec<Sweet> {
        let criteria = self.criteria.read().await.clone();
        let cache = self.cache.read().await;
        filter(cache.items(), &criteria)
    }

    pub async fn criteria(&self) -> FilterCriteria {
        self.criteria.read().await.clone()
    }

    pub async fn set_criteria(&self, criteria: FilterCriteria) {
        *self.criteria.write().await = criteria;
    }

    /// Applies `change` to the current criteria, e.g. on a single keystroke.
    pub async fn update_criteria<F>(&self, change: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        change(&mut *self.criteria.write().await);
    }

    // --- Create/edit form ---

    pub async fn edit_session(&self) -> EditSession {
        self.edit.lock().await.clone()
    }

    pub async fn begin_create(&self) -> bool {
        self.edit.lock().await.begin_create()
    }

    /// Opens the edit form for a cached sweet. Returns false if `id` is not in
    /// the cache.
    pub async fn begin_edit(&self, id: SweetId) -> bool {
        let target = self.cache.read().await.get(id).cloned();
        match target {
            Some(sweet) => {
                self.edit.lock().await.begin_edit(&sweet);
                true
            }
            None => false,
        }
    }

    pub async fn set_field(&self, field: FormField, value: impl Into<String>) -> bool {
        self.edit.lock().await.set_field(field, value)
    }

    pub async fn cancel_edit(&self) {
        self.edit.lock().await.close();
    }

    /// Sends the open form as a create or an update. The form closes only on
    /// success; on failure it keeps its state and staged values for a retry.
    pub async fn submit_form(&self) -> Outcome {
        let form = self.edit.lock().await.clone();
        let (target, staged) = match &form {
            EditSession::Inactive => return Outcome::Skipped,
            EditSession::Creating(staged) => (FormTarget::New, staged),
            EditSession::Editing { id, staged } => (FormTarget::Existing(*id), staged),
        };
        let (ok_message, failed_message) = match target {
            FormTarget::New => (messages::ADD_OK, messages::ADD_FAILED),
            FormTarget::Existing(_) => (messages::UPDATE_OK, messages::UPDATE_FAILED),
        };

        let session = match self.require_session().await {
            Ok(session) => session,
            Err(err) => return self.fail(failed_message, err).await,
        };

        let result = match target {
            FormTarget::New => match staged.to_draft() {
                Ok(draft) => self.api.create(&session, &draft).await,
                Err(err) => Err(err),
            },
            FormTarget::Existing(id) => match staged.to_patch() {
                Ok(patch) => self.api.update(&session, id, &patch).await,
                Err(err) => Err(err),
            },
        };

        if let Err(err) = result {
            return self.fail(failed_message, err).await;
        }

        {
            // The user may have opened another form while this one was in flight.
            let mut edit = self.edit.lock().await;
            if edit.target() == Some(target) {
                edit.close();
            }
        }
        self.after_mutation(&session, ok_message).await
    }

    // --- Direct actions ---

    /// Deletes a sweet. The service decides whether the user may.
    pub async fn delete(&self, id: SweetId) -> Outcome {
        let session = match self.require_session().await {
            Ok(session) => session,
            Err(err) => return self.fail(messages::DELETE_FAILED, err).await,
        };
        match self.api.delete(&session, id).await {
            Ok(()) => self.after_mutation(&session, messages::DELETE_OK).await,
            Err(err) => self.fail(messages::DELETE_FAILED, err).await,
        }
    }

    /// Buys one unit. Stock is checked by the service, not against the
    /// possibly stale cache.
    pub async fn purchase(&self, id: SweetId) -> Outcome {
        let session = match self.require_session().await {
            Ok(session) => session,
            Err(err) => return self.fail(messages::PURCHASE_FAILED, err).await,
        };
        match self.api.purchase(&session, id).await {
            Ok(()) => self.after_mutation(&session, messages::PURCHASE_OK).await,
            Err(err) => self.fail(messages::PURCHASE_FAILED, err).await,
        }
    }

    /// Restocks from the raw quantity input. Blank input cancels silently.
    pub async fn restock(&self, id: SweetId, quantity_input: &str) -> Outcome {
        let input = quantity_input.trim();
        if input.is_empty() {
            return Outcome::Skipped;
        }
        match input.parse::<u32>().ok().and_then(NonZeroU32::new) {
            Some(quantity) => self.restock_by(id, quantity).await,
            None => {
                let err = InventoryError::ValidationRejected(format!(
                    "restock quantity '{input}' is not a positive whole number"
                ));
                self.fail(messages::RESTOCK_INVALID, err).await
            }
        }
    }

    pub async fn restock_by(&self, id: SweetId, quantity: NonZeroU32) -> Outcome {
        let session = match self.require_session().await {
            Ok(session) => session,
            Err(err) => return self.fail(messages::RESTOCK_FAILED, err).await,
        };
        match self.api.restock(&session, id, quantity).await {
            Ok(()) => self.after_mutation(&session, messages::RESTOCK_OK).await,
            Err(err) => self.fail(messages::RESTOCK_FAILED, err).await,
        }
    }

    // --- Notification and view ---

    pub async fn notification(&self) -> Option<Notification> {
        self.notifier.current().await
    }

    pub async fn snapshot(&self) -> ShopSnapshot {
        let username = self.session.read().await.as_ref().map(|s| s.username.clone());
        let criteria = self.criteria.read().await.clone();
        let (visible, total) = {
            let cache = self.cache.read().await;
            (filter(cache.items(), &criteria), cache.len())
        };
        ShopSnapshot {
            username,
            visible,
            total,
            criteria,
            edit: self.edit.lock().await.clone(),
            notification: self.notifier.current().await,
        }
    }

    // --- Internals ---

    async fn require_session(&self) -> Result<Session, InventoryError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(InventoryError::NotAuthenticated)
    }

    /// Full listing into the cache. A listing that comes back after the
    /// session it was fetched for has ended is discarded.
    async fn reload(&self, session: &Session) -> Result<(), InventoryError> {
        let items = self.api.list_all(session).await?;

        if self.session.read().await.as_ref() != Some(session) {
            debug!("discarding listing fetched for a session that has since ended");
            return Ok(());
        }

        let dropped = self.cache.write().await.replace(items);
        if dropped > 0 {
            warn!(dropped, "listing contained duplicate sweet ids");
        }
        Ok(())
    }

    async fn after_mutation(&self, session: &Session, ok_message: &str) -> Outcome {
        match self.reload(session).await {
            Ok(()) => self.notifier.emit(ok_message).await,
            Err(err) => {
                warn!(error = %err, "refresh after mutation failed");
                self.handle_unauthorized(&err).await;
                self.notifier.emit(messages::LOAD_FAILED).await;
            }
        }
        Outcome::Done
    }

    async fn fail(&self, message: &str, err: InventoryError) -> Outcome {
        warn!(error = %err, %message, "action failed");
        self.handle_unauthorized(&err).await;
        self.notifier.emit(message).await;
        Outcome::Failed(err)
    }

    async fn handle_unauthorized(&self, err: &InventoryError) {
        if self.logout_on_unauthorized && err.is_unauthorized() {
            info!("session rejected by the service; signing out");
            self.end_session().await;
        }
    }

    async fn end_session(&self) {
        if let Err(e) = self.sessions.lock().await.clear() {
            warn!(error = %e, "failed to remove persisted session");
        }
        *self.session.write().await = None;
        self.cache.write().await.clear();
        self.edit.lock().await.close();
        info!("session ended");
    }
}
