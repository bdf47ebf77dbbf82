//! Session context for the admin view
//!
//! Created when the admin view mounts and dropped when it unmounts. While
//! mounted it listens to the provider's session-change stream, so a sign-out
//! or expiry elsewhere is picked up on the next [`SessionContext::poll_changes`].

use crate::core::auth::{INVALID_CREDENTIALS, Session, SessionProvider};
use crate::core::events::{EventEnvelope, SessionEvent};
use anyhow::{Result, bail};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub struct SessionContext {
    provider: Arc<dyn SessionProvider>,
    session: Option<Session>,
    receiver: Option<broadcast::Receiver<EventEnvelope>>,
}

impl SessionContext {
    /// Subscribe to session changes, then check the given token
    pub async fn mount(provider: Arc<dyn SessionProvider>, token: Option<&str>) -> Result<Self> {
        let receiver = provider.subscribe();
        let session = match token {
            Some(token) => provider.session(token).await?,
            None => None,
        };

        Ok(Self {
            provider,
            session,
            receiver: Some(receiver),
        })
    }

    /// Stop listening for session changes
    pub fn unmount(&mut self) {
        self.receiver = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.is_expired(Utc::now()))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.email.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Apply pending notifications and return them
    ///
    /// Only events about this context's own session change its state.
    pub fn poll_changes(&mut self) -> Vec<SessionEvent> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(envelope) => events.push(envelope.event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session notifications dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        for event in &events {
            let ours = self
                .session
                .as_ref()
                .is_some_and(|s| s.id == event.session_id());
            if ours && !event.is_active() {
                tracing::debug!(action = event.action(), "Admin session ended");
                self.session = None;
            }
        }

        events
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&Session> {
        let Some(session) = self.provider.sign_in(email, password).await? else {
            bail!(INVALID_CREDENTIALS);
        };
        Ok(self.session.insert(session))
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            self.provider.sign_out(&session.token).await?;
        }
        Ok(())
    }
}
