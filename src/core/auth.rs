//! Admin authentication
//!
//! Sessions are owned by an external auth collaborator behind
//! [`SessionProvider`]. Handlers resolve the request's bearer token into an
//! [`AuthContext`] and check it against an [`AuthPolicy`].

use crate::core::error::RequestError;
use crate::core::events::EventEnvelope;
use anyhow::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Cookie consulted when no `Authorization` header is present
pub const SESSION_COOKIE: &str = "session_token";

/// Message returned for a failed sign-in
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// An admin session issued by the auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Signed-in administrator
    Admin { session_id: Uuid, email: String },

    /// No valid session
    Anonymous,
}

impl AuthContext {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => AuthContext::Admin {
                session_id: session.id,
                email: session.email,
            },
            None => AuthContext::Anonymous,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            AuthContext::Admin { email, .. } => Some(email),
            AuthContext::Anonymous => None,
        }
    }
}

/// Authorization policy for an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No session required
    Public,

    /// Any signed-in admin
    Authenticated,
}

impl AuthPolicy {
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => context.is_admin(),
        }
    }

    /// Like [`check`](Self::check) but yields the 401 error on failure
    pub fn enforce(&self, context: &AuthContext) -> Result<(), RequestError> {
        if self.check(context) {
            Ok(())
        } else {
            Err(RequestError::unauthorized())
        }
    }
}

/// Auth collaborator contract
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Look up a live session by token; expired or unknown tokens yield `None`
    async fn session(&self, token: &str) -> Result<Option<Session>>;

    /// Exchange credentials for a session; wrong credentials yield `None`
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Session>>;

    /// End a session; unknown tokens are ignored
    async fn sign_out(&self, token: &str) -> Result<()>;

    /// Session-change notifications from now on
    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope>;
}

/// Read the session token from `Authorization: Bearer` or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(|c| c.trim())
                .find_map(|c| c.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Resolve the caller's context from request headers
pub async fn resolve_context(
    provider: &dyn SessionProvider,
    headers: &HeaderMap,
) -> Result<AuthContext> {
    let Some(token) = extract_token(headers) else {
        return Ok(AuthContext::Anonymous);
    };
    let session = provider.session(&token).await?;
    Ok(AuthContext::from_session(session))
}
