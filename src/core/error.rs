//! Typed error handling for the registration portal
//!
//! Handlers never leak raw `anyhow::Error` values to callers. Every failure is
//! translated into a [`PortalError`] which knows its HTTP status, a stable
//! error code and how to render itself as a JSON body.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: the submitted data is well-formed but not acceptable
//! - [`RequestError`]: the request itself is incomplete or unauthenticated
//! - [`IntakeError`]: a downstream stage of the registration intake failed
//! - [`StorageError`]: the persistence collaborator failed outside of intake
//! - [`ConfigError`]: configuration could not be loaded or is inconsistent
//!
//! # Example
//!
//! ```rust,ignore
//! match intake.register(request).await {
//!     Ok(team_id) => println!("created {team_id}"),
//!     Err(PortalError::Intake(IntakeError { stage, .. })) => {
//!         eprintln!("intake aborted during {stage}");
//!     }
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```

use crate::core::validation::Violation;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the portal
#[derive(Debug)]
pub enum PortalError {
    /// Input validation errors
    Validation(ValidationError),

    /// Missing parts, malformed bodies, missing session
    Request(RequestError),

    /// A registration intake stage failed
    Intake(IntakeError),

    /// Persistence errors outside of intake
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::Validation(e) => write!(f, "{}", e),
            PortalError::Request(e) => write!(f, "{}", e),
            PortalError::Intake(e) => write!(f, "{}", e),
            PortalError::Storage(e) => write!(f, "{}", e),
            PortalError::Config(e) => write!(f, "{}", e),
            PortalError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortalError::Validation(e) => Some(e),
            PortalError::Request(e) => Some(e),
            PortalError::Intake(e) => Some(e),
            PortalError::Storage(e) => Some(e),
            PortalError::Config(e) => Some(e),
            PortalError::Internal(_) => None,
        }
    }
}

/// Error body returned by every failing endpoint
///
/// The `error` key carries the human-readable message; front ends display it
/// verbatim.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PortalError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Request(e) => e.status_code(),
            PortalError::Intake(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Storage(e) => e.status_code(),
            PortalError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Validation(_) => "VALIDATION_ERROR",
            PortalError::Request(e) => e.error_code(),
            PortalError::Intake(e) => e.stage.error_code(),
            PortalError::Storage(e) => e.error_code(),
            PortalError::Config(_) => "CONFIG_ERROR",
            PortalError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PortalError::Request(RequestError::MissingFields { fields }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            PortalError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            PortalError::Intake(IntakeError { stage, .. }) => {
                Some(serde_json::json!({ "stage": stage.as_str() }))
            }
            PortalError::Storage(StorageError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id.to_string() }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// The registration form failed one of its checks
    Submission(Violation),

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON body
    InvalidJson { message: String },

    /// Invalid UUID format
    InvalidUuid { value: String },

    /// Moderation target that no transition may reach
    InvalidTransition { target: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Submission(violation) => write!(f, "{}", violation),
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            ValidationError::InvalidUuid { value } => write!(f, "Invalid UUID format: {}", value),
            ValidationError::InvalidTransition { target } => {
                write!(f, "Status cannot be changed to '{}'", target)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for PortalError {
    fn from(err: ValidationError) -> Self {
        PortalError::Validation(err)
    }
}

impl From<Violation> for PortalError {
    fn from(violation: Violation) -> Self {
        PortalError::Validation(ValidationError::Submission(violation))
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the shape or credentials of a request
#[derive(Debug)]
pub enum RequestError {
    /// One or more multipart parts were absent or empty
    MissingFields { fields: Vec<String> },

    /// The multipart stream could not be read
    InvalidMultipart { message: String },

    /// The body exceeded the configured limit
    PayloadTooLarge { message: String },

    /// No valid admin session
    Unauthorized { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingFields { .. } => write!(f, "Missing required fields"),
            RequestError::InvalidMultipart { message } => {
                write!(f, "Invalid multipart body: {}", message)
            }
            RequestError::PayloadTooLarge { message } => {
                write!(f, "Payload too large: {}", message)
            }
            RequestError::Unauthorized { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidMultipart { .. } => StatusCode::BAD_REQUEST,
            RequestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingFields { .. } => "MISSING_FIELDS",
            RequestError::InvalidMultipart { .. } => "INVALID_MULTIPART",
            RequestError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }

    /// The canonical unauthorized error for protected endpoints
    pub fn unauthorized() -> Self {
        RequestError::Unauthorized {
            message: "Unauthorized".to_string(),
        }
    }
}

impl From<RequestError> for PortalError {
    fn from(err: RequestError) -> Self {
        PortalError::Request(err)
    }
}

// =============================================================================
// Intake Errors
// =============================================================================

/// The step of the registration intake that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    /// Decoding the `players` part as JSON
    ParsePlayers,
    /// Storing the payment screenshot
    Upload,
    /// Inserting the team row
    TeamInsert,
    /// Inserting the roster rows
    PlayerInsert,
}

impl IntakeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStage::ParsePlayers => "parse_players",
            IntakeStage::Upload => "upload",
            IntakeStage::TeamInsert => "team_insert",
            IntakeStage::PlayerInsert => "player_insert",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            IntakeStage::ParsePlayers => "PLAYERS_PARSE_FAILED",
            IntakeStage::Upload => "UPLOAD_FAILED",
            IntakeStage::TeamInsert => "TEAM_INSERT_FAILED",
            IntakeStage::PlayerInsert => "PLAYER_INSERT_FAILED",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            IntakeStage::ParsePlayers => "parse player roster",
            IntakeStage::Upload => "upload payment screenshot",
            IntakeStage::TeamInsert => "save team",
            IntakeStage::PlayerInsert => "save players",
        }
    }
}

impl fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed intake stage and the collaborator's message
#[derive(Debug)]
pub struct IntakeError {
    pub stage: IntakeStage,
    pub message: String,
}

impl IntakeError {
    pub fn new(stage: IntakeStage, err: impl fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to {}: {}", self.stage.describe(), self.message)
    }
}

impl std::error::Error for IntakeError {}

impl From<IntakeError> for PortalError {
    fn from(err: IntakeError) -> Self {
        PortalError::Intake(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the persistence collaborator
#[derive(Debug)]
pub enum StorageError {
    /// Loading registrations failed
    QueryError { message: String },

    /// Updating a registration failed
    UpdateError { message: String },

    /// No registration with this id
    NotFound { id: Uuid },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { message } => write!(f, "{}", message),
            StorageError::UpdateError { message } => {
                write!(f, "Failed to update status: {}", message)
            }
            StorageError::NotFound { id } => write!(f, "Registration '{}' not found", id),
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::QueryError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StorageError::UpdateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::UpdateError { .. } => "STORAGE_UPDATE_ERROR",
            StorageError::NotFound { .. } => "REGISTRATION_NOT_FOUND",
        }
    }
}

impl From<StorageError> for PortalError {
    fn from(err: StorageError) -> Self {
        PortalError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PortalError {
    fn from(err: ConfigError) -> Self {
        PortalError::Config(err)
    }
}
