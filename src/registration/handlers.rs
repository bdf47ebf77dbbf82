//! HTTP handlers for registration endpoints

use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::{AuthContext, AuthPolicy, SessionProvider, resolve_context};
use crate::core::error::{PortalError, RequestError, ValidationError};
use crate::core::model::{ModerationTarget, RegistrationStatus};
use crate::moderation::updater::apply_transition;
use crate::registration::intake::{IntakeSubmission, UploadedFile};
use crate::registration::query::{RegistrationListing, load_registrations};
use crate::server::host::PortalHost;

/// Multipart part names, in the order they are reported when missing
pub const TEAM_NAME_PART: &str = "teamName";
pub const IGL_NAME_PART: &str = "iglName";
pub const IGL_PHONE_PART: &str = "iglPhone";
pub const PLAYERS_PART: &str = "players";
pub const PAYMENT_SCREENSHOT_PART: &str = "paymentScreenshot";

/// Response for a persisted registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCreated {
    pub success: bool,
    pub message: String,
    pub team_id: Uuid,
}

/// Request body for a status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: RegistrationStatus,
}

/// Response for a status change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub id: Uuid,
    pub status: RegistrationStatus,
    pub payment_verified: bool,
}

/// Parts collected from the multipart body, any of which may be absent
#[derive(Debug, Default)]
struct IntakeParts {
    team_name: Option<String>,
    igl_name: Option<String>,
    igl_phone: Option<String>,
    players: Option<String>,
    payment_screenshot: Option<UploadedFile>,
}

impl IntakeParts {
    async fn read(mut multipart: Multipart) -> Result<Self, RequestError> {
        let mut parts = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                TEAM_NAME_PART => parts.team_name = Some(field.text().await.map_err(multipart_error)?),
                IGL_NAME_PART => parts.igl_name = Some(field.text().await.map_err(multipart_error)?),
                IGL_PHONE_PART => parts.igl_phone = Some(field.text().await.map_err(multipart_error)?),
                PLAYERS_PART => parts.players = Some(field.text().await.map_err(multipart_error)?),
                PAYMENT_SCREENSHOT_PART => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    parts.payment_screenshot = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                other => tracing::debug!(part = other, "Ignoring unknown multipart part"),
            }
        }

        Ok(parts)
    }

    /// Empty text parts count as missing
    fn into_submission(self) -> Result<IntakeSubmission, RequestError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        let team_name = present(self.team_name);
        let igl_name = present(self.igl_name);
        let igl_phone = present(self.igl_phone);
        let players = present(self.players);

        match (team_name, igl_name, igl_phone, players, self.payment_screenshot) {
            (Some(team_name), Some(igl_name), Some(igl_phone), Some(players), Some(file)) => {
                Ok(IntakeSubmission {
                    team_name,
                    igl_name,
                    igl_phone,
                    players,
                    payment_screenshot: file,
                })
            }
            (team_name, igl_name, igl_phone, players, file) => {
                let fields = [
                    (TEAM_NAME_PART, team_name.is_none()),
                    (IGL_NAME_PART, igl_name.is_none()),
                    (IGL_PHONE_PART, igl_phone.is_none()),
                    (PLAYERS_PART, players.is_none()),
                    (PAYMENT_SCREENSHOT_PART, file.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name.to_string())
                .collect();
                Err(RequestError::MissingFields { fields })
            }
        }
    }
}

fn multipart_error(err: MultipartError) -> RequestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RequestError::PayloadTooLarge {
            message: err.body_text(),
        }
    } else {
        RequestError::InvalidMultipart {
            message: err.body_text(),
        }
    }
}

async fn authorize(
    sessions: &dyn SessionProvider,
    headers: &HeaderMap,
) -> Result<AuthContext, PortalError> {
    let context = resolve_context(sessions, headers)
        .await
        .map_err(|e| PortalError::Internal(e.to_string()))?;
    AuthPolicy::Authenticated.enforce(&context)?;
    Ok(context)
}

/// POST /api/register
pub async fn register(
    State(host): State<Arc<PortalHost>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RegistrationCreated>, PortalError> {
    let multipart = multipart.map_err(|rejection| RequestError::InvalidMultipart {
        message: rejection.body_text(),
    })?;

    let submission = IntakeParts::read(multipart).await?.into_submission().map_err(|e| {
        tracing::warn!(error = ?e, "Registration rejected");
        e
    })?;

    match host.intake.register(submission).await {
        Ok(receipt) => Ok(Json(RegistrationCreated {
            success: true,
            message: "Registration submitted successfully".to_string(),
            team_id: receipt.team_id,
        })),
        Err(PortalError::Intake(e)) => {
            tracing::error!(stage = %e.stage, error = %e.message, "Registration error");
            Err(PortalError::Intake(e))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration rejected");
            Err(e)
        }
    }
}

/// GET /api/register
pub async fn list_registrations(
    State(host): State<Arc<PortalHost>>,
    headers: HeaderMap,
) -> Result<Json<RegistrationListing>, PortalError> {
    if let Err(e) = authorize(host.sessions.as_ref(), &headers).await {
        tracing::warn!(error = %e, "Unauthorized registration query");
        return Err(e);
    }

    let listing = load_registrations(host.team_store.as_ref()).await?;
    Ok(Json(listing))
}

/// PATCH /api/register/{id}
pub async fn update_registration_status(
    State(host): State<Arc<PortalHost>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, PortalError> {
    let context = authorize(host.sessions.as_ref(), &headers).await?;

    let id = Uuid::parse_str(&id).map_err(|_| ValidationError::InvalidUuid { value: id.clone() })?;
    let Json(request) = body.map_err(|rejection| ValidationError::InvalidJson {
        message: rejection.body_text(),
    })?;
    let target = ModerationTarget::try_from(request.status)?;

    let team = apply_transition(host.team_store.as_ref(), &id, target).await?;
    tracing::info!(
        team_id = %team.id,
        status = %team.status,
        admin = context.email().unwrap_or_default(),
        "Moderation decision recorded"
    );

    Ok(Json(StatusUpdateResponse {
        id: team.id,
        status: team.status,
        payment_verified: team.payment_verified,
    }))
}
