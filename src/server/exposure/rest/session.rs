//! Admin session endpoints in front of the auth collaborator

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::core::auth::{
    AuthContext, INVALID_CREDENTIALS, SESSION_COOKIE, extract_token, resolve_context,
};
use crate::core::error::{FieldValidationError, PortalError, RequestError, ValidationError};
use crate::server::host::PortalHost;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn field_errors(errors: &validator::ValidationErrors) -> ValidationError {
    let mut fields: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldValidationError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    ValidationError::FieldErrors(fields)
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(host): State<Arc<PortalHost>>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PortalError> {
    let Json(request) = body.map_err(|rejection| ValidationError::InvalidJson {
        message: rejection.body_text(),
    })?;
    request.validate().map_err(|e| field_errors(&e))?;

    let session = host
        .sessions
        .sign_in(&request.email, &request.password)
        .await
        .map_err(|e| PortalError::Internal(e.to_string()))?;

    let Some(session) = session else {
        tracing::warn!(email = %request.email, "Rejected admin sign-in");
        return Err(RequestError::Unauthorized {
            message: INVALID_CREDENTIALS.to_string(),
        }
        .into());
    };

    tracing::info!(email = %session.email, session_id = %session.id, "Admin signed in");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session.token
    );
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            token: session.token,
            email: session.email,
            expires_at: session.expires_at,
        }),
    ))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(host): State<Arc<PortalHost>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, PortalError> {
    if let Some(token) = extract_token(&headers) {
        host.sessions
            .sign_out(&token)
            .await
            .map_err(|e| PortalError::Internal(e.to_string()))?;
    }

    let expired = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)]))
}

/// GET /api/auth/session
pub async fn session(
    State(host): State<Arc<PortalHost>>,
    headers: HeaderMap,
) -> Result<Json<SessionStatus>, PortalError> {
    let context = resolve_context(host.sessions.as_ref(), &headers)
        .await
        .map_err(|e| PortalError::Internal(e.to_string()))?;

    Ok(Json(match context {
        AuthContext::Admin { email, .. } => SessionStatus {
            authenticated: true,
            email: Some(email),
        },
        AuthContext::Anonymous => SessionStatus {
            authenticated: false,
            email: None,
        },
    }))
}
