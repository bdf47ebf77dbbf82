//! ServerBuilder for fluent API to build the portal's HTTP server

use super::exposure::RestExposure;
use super::host::PortalHost;
use crate::config::PortalConfig;
use crate::core::auth::SessionProvider;
use crate::core::service::{BlobStore, TeamStore};
use crate::storage::{InMemoryBlobStore, InMemorySessionProvider, InMemoryTeamStore};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the portal server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(PortalConfig::default_config())
///     .with_in_memory_backends()
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: PortalConfig,
    team_store: Option<Arc<dyn TeamStore>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    session_provider: Option<Arc<dyn SessionProvider>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: PortalConfig::default(),
            team_store: None,
            blob_store: None,
            session_provider: None,
            custom_routes: Vec::new(),
        }
    }

    /// Replace the configuration
    ///
    /// Call before [`with_in_memory_backends`](Self::with_in_memory_backends),
    /// which reads the storage and admin settings.
    pub fn with_config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the team store (required)
    pub fn with_team_store(mut self, store: impl TeamStore + 'static) -> Self {
        self.team_store = Some(Arc::new(store));
        self
    }

    /// Set the blob store (required)
    pub fn with_blob_store(mut self, store: impl BlobStore + 'static) -> Self {
        self.blob_store = Some(Arc::new(store));
        self
    }

    /// Set the session provider (required)
    pub fn with_session_provider(mut self, provider: impl SessionProvider + 'static) -> Self {
        self.session_provider = Some(Arc::new(provider));
        self
    }

    /// Fill every collaborator not yet set with its in-memory implementation
    pub fn with_in_memory_backends(mut self) -> Self {
        if self.team_store.is_none() {
            self.team_store = Some(Arc::new(InMemoryTeamStore::new()));
        }
        if self.blob_store.is_none() {
            self.blob_store = Some(Arc::new(InMemoryBlobStore::new(
                self.config.storage.bucket.clone(),
                self.config.storage.public_base_url.clone(),
            )));
        }
        if self.session_provider.is_none() {
            self.session_provider = Some(Arc::new(InMemorySessionProvider::new(
                &self.config.auth.admins,
                chrono::Duration::minutes(self.config.auth.session_ttl_minutes),
            )));
        }
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn build_host(mut self) -> Result<PortalHost> {
        let team_store = self
            .team_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("TeamStore is required. Call .with_team_store()"))?;
        let blob_store = self
            .blob_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("BlobStore is required. Call .with_blob_store()"))?;
        let sessions = self.session_provider.take().ok_or_else(|| {
            anyhow::anyhow!("SessionProvider is required. Call .with_session_provider()")
        })?;

        PortalHost::from_builder_components(self.config, team_store, blob_store, sessions)
    }

    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Constructor tests ────────────────────────────────────────────────

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::new();
        assert!(builder.team_store.is_none());
        assert!(builder.blob_store.is_none());
        assert!(builder.session_provider.is_none());
        assert!(builder.custom_routes.is_empty());
    }

    #[test]
    fn test_default_is_same_as_new() {
        let builder = ServerBuilder::default();
        assert!(builder.team_store.is_none());
        assert!(builder.custom_routes.is_empty());
    }

    // ── Collaborators ────────────────────────────────────────────────────

    #[test]
    fn test_in_memory_backends_fill_gaps() {
        let builder = ServerBuilder::new()
            .with_team_store(InMemoryTeamStore::new())
            .with_in_memory_backends();
        assert!(builder.team_store.is_some());
        assert!(builder.blob_store.is_some());
        assert!(builder.session_provider.is_some());
    }

    #[test]
    fn test_build_host_without_team_store_fails() {
        let result = ServerBuilder::new()
            .with_blob_store(InMemoryBlobStore::new("b", "https://cdn.test"))
            .with_session_provider(InMemorySessionProvider::new(&[], chrono::Duration::hours(1)))
            .build_host();
        let err = result.err().expect("should fail");
        assert!(err.to_string().contains("TeamStore is required"));
    }

    #[test]
    fn test_build_host_rejects_invalid_config() {
        let mut config = PortalConfig::default_config();
        config.registration.roster_size = 0;
        let result = ServerBuilder::new()
            .with_config(config)
            .with_in_memory_backends()
            .build_host();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_reaches_host() {
        let mut config = PortalConfig::default_config();
        config.registration.fee = 300;
        let host = ServerBuilder::new()
            .with_config(config)
            .with_in_memory_backends()
            .build_host()
            .expect("should build host");
        assert_eq!(host.intake.fee(), 300);
    }

    // ── with_custom_routes ───────────────────────────────────────────────

    #[test]
    fn test_with_custom_routes_appends_router() {
        let builder = ServerBuilder::new()
            .with_custom_routes(Router::new())
            .with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 2);
    }

    // ── build (REST router) ──────────────────────────────────────────────

    #[test]
    fn test_build_produces_router() {
        use axum::routing::get;

        let custom = Router::new().route("/custom", get(|| async { "ok" }));
        let router = ServerBuilder::new()
            .with_config(PortalConfig::default_config())
            .with_in_memory_backends()
            .with_custom_routes(custom)
            .build()
            .expect("build should produce a Router");

        let _ = router;
    }

    #[test]
    fn test_build_without_backends_fails() {
        assert!(ServerBuilder::new().build().is_err());
    }
}
