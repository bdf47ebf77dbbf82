//! Status transitions against the persistence collaborator

use crate::core::error::{PortalError, StorageError};
use crate::core::model::{ModerationTarget, StatusPatch, TeamRow};
use crate::core::service::TeamStore;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Why a moderation action did not take effect
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Registration not found: {id}")]
    NotFound { id: Uuid },

    #[error("Failed to update status")]
    UpdateFailed { message: String },

    #[error("Unauthorized")]
    Unauthorized,
}

/// Something that can move a registration to a decided status
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    async fn update_status(&self, id: &Uuid, target: ModerationTarget)
    -> Result<(), ModerationError>;
}

/// The single transition function: status and `payment_verified` change together
pub async fn apply_transition(
    store: &dyn TeamStore,
    id: &Uuid,
    target: ModerationTarget,
) -> Result<TeamRow, PortalError> {
    let patch = StatusPatch::for_target(target);
    let updated = store.update_status(id, patch).await.map_err(|e| {
        PortalError::Storage(StorageError::UpdateError {
            message: e.to_string(),
        })
    })?;

    let team = updated.ok_or(PortalError::Storage(StorageError::NotFound { id: *id }))?;
    tracing::info!(team_id = %team.id, status = %team.status, "Registration status updated");
    Ok(team)
}

/// Updates straight through a [`TeamStore`]
#[derive(Clone)]
pub struct StoreStatusUpdater {
    store: Arc<dyn TeamStore>,
}

impl StoreStatusUpdater {
    pub fn new(store: Arc<dyn TeamStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StatusUpdater for StoreStatusUpdater {
    async fn update_status(
        &self,
        id: &Uuid,
        target: ModerationTarget,
    ) -> Result<(), ModerationError> {
        match apply_transition(self.store.as_ref(), id, target).await {
            Ok(_) => Ok(()),
            Err(PortalError::Storage(StorageError::NotFound { id })) => {
                Err(ModerationError::NotFound { id })
            }
            Err(e) => Err(ModerationError::UpdateFailed {
                message: e.to_string(),
            }),
        }
    }
}
