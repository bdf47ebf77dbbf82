//! # Tourney Portal
//!
//! Registration intake and moderation for a single tournament.
//!
//! ## Features
//!
//! - **Intake**: `POST /api/register` takes a multipart roster with a payment
//!   screenshot, stores the image, and persists the team and its players
//! - **Admin listing**: `GET /api/register` returns every registration with
//!   status counts, for signed-in admins only
//! - **Moderation**: approve or reject through a single transition that keeps
//!   `paymentVerified` tied to the status
//! - **Revenue**: gross, platform fee, and net for any approved-team count
//! - **Client**: form state with entry-time sanitizing, a multipart encoder,
//!   and an HTTP client for the admin surface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tourney::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(PortalConfig::default_config())
//!         .with_in_memory_backends()
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod moderation;
pub mod registration;
pub mod revenue;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, Session, SessionProvider},
        error::PortalError,
        events::{EventBus, SessionEvent},
        model::{
            ModerationTarget, Player, REGISTRATION_FEE, RegistrationRecord, RegistrationStatus,
            StatusPatch,
        },
        service::{BlobStore, TeamStore},
        validation::{Candidate, Violation, validate_candidate},
    };

    // === Registration & moderation ===
    pub use crate::moderation::{
        ModerationController, ModerationError, RegistrationFilter, RegistrationStats,
        StatusFilter, StatusUpdater, StoreStatusUpdater,
    };
    pub use crate::registration::{IntakeService, RegistrationListing};
    pub use crate::revenue::{RevenueBreakdown, RevenueCalculator};

    // === Client ===
    pub use crate::client::{
        ClientError, PaymentProof, PortalClient, RegistrationForm, SessionContext,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryBlobStore, InMemorySessionProvider, InMemoryTeamStore};

    // === Config ===
    pub use crate::config::PortalConfig;

    // === Server ===
    pub use crate::server::{PortalHost, RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
