//! Registration listing for the admin view

use crate::core::error::{PortalError, StorageError};
use crate::core::model::RegistrationRecord;
use crate::core::service::TeamStore;
use crate::moderation::stats::RegistrationCounts;
use serde::{Deserialize, Serialize};

/// Every registration plus counts computed from that same list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationListing {
    pub registrations: Vec<RegistrationRecord>,
    #[serde(flatten)]
    pub counts: RegistrationCounts,
}

impl RegistrationListing {
    /// Sorts newest first, ties broken by id, then counts
    pub fn from_records(mut registrations: Vec<RegistrationRecord>) -> Self {
        registrations.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let counts = RegistrationCounts::tally(&registrations);
        Self {
            registrations,
            counts,
        }
    }
}

/// Load all teams with their rosters, reshaped for admin clients
pub async fn load_registrations(store: &dyn TeamStore) -> Result<RegistrationListing, PortalError> {
    let rows = store.list_with_players().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load registrations");
        StorageError::QueryError {
            message: e.to_string(),
        }
    })?;

    Ok(RegistrationListing::from_records(
        rows.into_iter().map(RegistrationRecord::from).collect(),
    ))
}
