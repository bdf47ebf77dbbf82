//! HTTP client for the portal API

use crate::client::form::{FormError, RegistrationForm};
use crate::core::model::ModerationTarget;
use crate::core::validation::Violation;
use crate::moderation::updater::{ModerationError, StatusUpdater};
use crate::registration::handlers::{
    RegistrationCreated, StatusUpdateRequest, StatusUpdateResponse,
};
use crate::registration::query::RegistrationListing;
use crate::server::exposure::rest::session::{SessionStatus, SignInRequest, SignInResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Shown when a failed submission carries no usable message
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The form failed validation; nothing was sent
    #[error("{0}")]
    Invalid(#[from] Violation),

    #[error(transparent)]
    Form(#[from] FormError),

    /// The server answered with a non-success status
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the registration and admin endpoints
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Reuse an existing session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::NotSignedIn)
    }

    /// Validate and submit a registration
    ///
    /// An invalid form is reported without any request being made.
    pub async fn submit(&self, form: &RegistrationForm) -> Result<RegistrationCreated, ClientError> {
        let payload = form.encode()?;
        let response = self
            .http
            .post(self.url("/api/register"))
            .multipart(payload.into_form()?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response, REGISTRATION_FAILED).await);
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_registrations(&self) -> Result<RegistrationListing, ClientError> {
        let response = self
            .http
            .get(self.url("/api/register"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response, "Failed to fetch registrations").await);
        }
        Ok(response.json().await?)
    }

    /// Sign in and keep the session token for later calls
    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/sign-in"))
            .json(&SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response, "Sign in failed").await);
        }
        let signed_in: SignInResponse = response.json().await?;
        self.token = Some(signed_in.token.clone());
        Ok(signed_in)
    }

    /// Drop the session; a client without a token has nothing to do
    pub async fn sign_out(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.url("/api/auth/sign-out"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response, "Sign out failed").await);
        }
        Ok(())
    }

    pub async fn session(&self) -> Result<SessionStatus, ClientError> {
        let mut request = self.http.get(self.url("/api/auth/session"));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(rejection(response, "Session check failed").await);
        }
        Ok(response.json().await?)
    }

    pub async fn update_status(
        &self,
        id: &Uuid,
        target: ModerationTarget,
    ) -> Result<StatusUpdateResponse, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/api/register/{}", id)))
            .bearer_auth(self.bearer()?)
            .json(&StatusUpdateRequest {
                status: target.into(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response, "Failed to update status").await);
        }
        Ok(response.json().await?)
    }
}

/// Read the server's `error` message, falling back to `fallback`
async fn rejection(response: reqwest::Response, fallback: &str) -> ClientError {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    ClientError::Rejected { status, message }
}

#[async_trait]
impl StatusUpdater for PortalClient {
    async fn update_status(
        &self,
        id: &Uuid,
        target: ModerationTarget,
    ) -> Result<(), ModerationError> {
        match PortalClient::update_status(self, id, target).await {
            Ok(_) => Ok(()),
            Err(ClientError::Rejected { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(ModerationError::NotFound { id: *id })
            }
            Err(ClientError::Rejected { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                Err(ModerationError::Unauthorized)
            }
            Err(ClientError::NotSignedIn) => Err(ModerationError::Unauthorized),
            Err(e) => Err(ModerationError::UpdateFailed {
                message: e.to_string(),
            }),
        }
    }
}
