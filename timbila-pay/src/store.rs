//! In-memory checkout session registry
//!
//! Sessions are single-owner and never persisted; the registry only maps
//! ids to live sessions so HTTP requests can find their flow again.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::checkout::CheckoutSession;
use crate::error::{PayError, Result};

/// Shared registry of in-flight checkout sessions
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, CheckoutSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created session
    pub async fn insert(&self, session: CheckoutSession) {
        self.inner.write().await.insert(session.id, session);
    }

    /// Snapshot of a session by id
    pub async fn get(&self, id: Uuid) -> Result<CheckoutSession> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Run a transition against a session in place.
    ///
    /// The closure's error is returned as-is with the session left in
    /// whatever state the transition defined (transitions never mutate on
    /// error).
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CheckoutSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(session)
    }

    /// Discard a session (cancel, or cleanup after completion)
    pub async fn remove(&self, id: Uuid) -> Result<CheckoutSession> {
        self.inner
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> PayError {
    PayError::Common(timbila_common::Error::NotFound(format!(
        "Checkout session {}",
        id
    )))
}
