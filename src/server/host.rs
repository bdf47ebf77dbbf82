//! Server host for transport-agnostic API exposure
//!
//! `PortalHost` holds the configuration and every collaborator the portal
//! talks to. Exposures (currently only REST) build their routers from it.

use crate::config::PortalConfig;
use crate::core::auth::SessionProvider;
use crate::core::service::{BlobStore, TeamStore};
use crate::registration::intake::IntakeService;
use crate::revenue::RevenueCalculator;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all portal state
///
/// # Example
///
/// ```rust,ignore
/// let host = PortalHost::from_builder_components(config, team_store, blob_store, sessions)?;
/// let app = RestExposure::build_router(Arc::new(host), vec![])?;
/// ```
pub struct PortalHost {
    /// Validated configuration
    pub config: Arc<PortalConfig>,

    /// Persistence collaborator for teams and rosters
    pub team_store: Arc<dyn TeamStore>,

    /// Blob storage collaborator for payment screenshots
    pub blob_store: Arc<dyn BlobStore>,

    /// Auth collaborator
    pub sessions: Arc<dyn SessionProvider>,

    /// Intake pipeline wired to the stores above
    pub intake: IntakeService,
}

impl PortalHost {
    /// Build the host from builder components
    ///
    /// Fails when the configuration does not validate.
    pub fn from_builder_components(
        config: PortalConfig,
        team_store: Arc<dyn TeamStore>,
        blob_store: Arc<dyn BlobStore>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let intake = IntakeService::new(
            team_store.clone(),
            blob_store.clone(),
            config.registration.fee,
        )
        .with_max_players(config.registration.roster_size);

        Ok(Self {
            config: Arc::new(config),
            team_store,
            blob_store,
            sessions,
            intake,
        })
    }

    /// Body limit for the registration endpoint
    ///
    /// The screenshot limit plus room for the text parts and multipart framing.
    pub fn registration_body_limit(&self) -> usize {
        self.config.registration.max_upload_bytes + MULTIPART_ENVELOPE_BYTES
    }

    /// Revenue calculator for the configured fee and platform cut
    pub fn revenue_calculator(&self) -> RevenueCalculator {
        RevenueCalculator::new(
            self.config.registration.fee,
            self.config.registration.platform_fee_rate,
        )
    }
}

/// Allowance for non-file parts of a registration request
pub const MULTIPART_ENVELOPE_BYTES: usize = 64 * 1024;
