//! Collaborator traits for persistence and blob storage
//!
//! The portal never talks to a concrete database or bucket; it only sees
//! these narrow interfaces. None of the calls participate in a transaction.

use crate::core::model::{NewPlayerRow, NewTeamRow, StatusPatch, TeamRow, TeamWithPlayers};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence collaborator for teams and their rosters
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Insert a team and return the stored row (id and timestamp assigned)
    async fn insert_team(&self, row: NewTeamRow) -> Result<TeamRow>;

    /// Insert roster rows in the given order
    async fn insert_players(&self, rows: Vec<NewPlayerRow>) -> Result<()>;

    /// Load every team joined with its players
    async fn list_with_players(&self) -> Result<Vec<TeamWithPlayers>>;

    /// Apply a status transition by id
    ///
    /// Returns `None` when no team has this id.
    async fn update_status(&self, id: &Uuid, patch: StatusPatch) -> Result<Option<TeamRow>>;
}

/// Blob storage collaborator for payment screenshots
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a bucket-relative path
    async fn upload(&self, path: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<()>;

    /// Durable public URL for a stored path
    fn public_url(&self, path: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The traits stay object safe: the host keeps them behind `Arc<dyn _>`
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn TeamStore, _: &dyn BlobStore) {}

    #[test]
    fn test_traits_compile() {}
}
