//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::model::REGISTRATION_FEE;
use serde::{Deserialize, Serialize};

/// Largest payment screenshot accepted: 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Players on a default roster
pub const DEFAULT_ROSTER_SIZE: usize = 4;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "127.0.0.1:3000")
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Blob storage settings for payment screenshots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket holding the screenshots
    pub bucket: String,

    /// Base URL under which the bucket is publicly readable
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "screenshots".to_string(),
            public_base_url: "http://127.0.0.1:3000/storage/v1/object/public".to_string(),
        }
    }
}

/// Registration rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Fee per team recorded at intake
    pub fee: u32,

    /// Platform cut applied by the revenue calculator (0.05 = 5%)
    pub platform_fee_rate: f64,

    /// Largest accepted payment screenshot, in bytes
    pub max_upload_bytes: usize,

    /// Players per roster on the public form, and the most intake accepts
    pub roster_size: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            fee: REGISTRATION_FEE,
            platform_fee_rate: 0.05,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            roster_size: DEFAULT_ROSTER_SIZE,
        }
    }
}

/// Seed admin account for the in-memory session provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

/// Admin authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accounts allowed to sign in
    pub admins: Vec<AdminAccount>,

    /// Session lifetime in minutes
    pub session_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            session_ttl_minutes: 24 * 60,
        }
    }
}

/// Complete portal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub registration: RegistrationConfig,
    pub auth: AuthConfig,
}

impl PortalConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Check values the portal cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registration = &self.registration;

        if registration.fee == 0 {
            return Err(invalid("registration.fee", "0", "fee must be positive"));
        }
        if !(0.0..1.0).contains(&registration.platform_fee_rate) {
            return Err(invalid(
                "registration.platform_fee_rate",
                &registration.platform_fee_rate.to_string(),
                "rate must be in [0, 1)",
            ));
        }
        if registration.max_upload_bytes == 0 {
            return Err(invalid(
                "registration.max_upload_bytes",
                "0",
                "upload limit must be positive",
            ));
        }
        if registration.roster_size == 0 {
            return Err(invalid(
                "registration.roster_size",
                "0",
                "a roster needs at least one player",
            ));
        }
        if self.auth.session_ttl_minutes <= 0 {
            return Err(invalid(
                "auth.session_ttl_minutes",
                &self.auth.session_ttl_minutes.to_string(),
                "session lifetime must be positive",
            ));
        }
        Ok(())
    }

    /// Create a default configuration for local development and tests
    pub fn default_config() -> Self {
        Self {
            auth: AuthConfig {
                admins: vec![AdminAccount {
                    email: "admin@example.com".to_string(),
                    password: "change-me".to_string(),
                }],
                ..AuthConfig::default()
            },
            ..Self::default()
        }
    }
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
