//! Registration intake
//!
//! An intake runs strictly in sequence and stops at the first failing step:
//!
//! ```text
//! parse players ─▶ validate ─▶ upload screenshot ─▶ insert team ─▶ insert players
//! ```
//!
//! There is no rollback. A failure after the upload leaves the stored image
//! behind, and a failure after the team insert leaves a team with no roster.
//! Identical submissions are not deduplicated.

use crate::config::DEFAULT_ROSTER_SIZE;
use crate::core::error::{IntakeError, IntakeStage, PortalError, ValidationError};
use crate::core::model::{NewPlayerRow, NewTeamRow, Player, RegistrationStatus, TeamRow};
use crate::core::service::{BlobStore, TeamStore};
use crate::core::validation::{Candidate, Violation, validate_candidate};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::sync::Arc;
use uuid::Uuid;

const STORAGE_TOKEN_LEN: usize = 16;

/// The uploaded payment screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The five parts of a registration request, all present
#[derive(Debug, Clone)]
pub struct IntakeSubmission {
    pub team_name: String,
    pub igl_name: String,
    pub igl_phone: String,
    /// JSON array of `{name, uid}`, as transmitted
    pub players: String,
    pub payment_screenshot: UploadedFile,
}

/// Outcome of a fully persisted registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub team_id: Uuid,
    pub payment_screenshot_url: String,
}

/// Bucket-relative key for an upload: `public/<token>.<ext>`
///
/// The extension is whatever follows the last `.` of the file name; a name
/// without a dot is used whole.
pub fn storage_path(file_name: &str, token: &str) -> String {
    let ext = file_name.rsplit('.').next().unwrap_or_default();
    format!("public/{}.{}", token, ext)
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STORAGE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Persists registrations through the storage collaborators
#[derive(Clone)]
pub struct IntakeService {
    team_store: Arc<dyn TeamStore>,
    blob_store: Arc<dyn BlobStore>,
    fee: u32,
    max_players: usize,
}

impl IntakeService {
    pub fn new(team_store: Arc<dyn TeamStore>, blob_store: Arc<dyn BlobStore>, fee: u32) -> Self {
        Self {
            team_store,
            blob_store,
            fee,
            max_players: DEFAULT_ROSTER_SIZE,
        }
    }

    /// Cap the roster length accepted per team
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub async fn register(&self, submission: IntakeSubmission) -> Result<IntakeReceipt, PortalError> {
        let players: Vec<Player> = serde_json::from_str(&submission.players)
            .map_err(|e| IntakeError::new(IntakeStage::ParsePlayers, e))?;

        validate_candidate(&Candidate {
            team_name: &submission.team_name,
            igl_name: &submission.igl_name,
            igl_phone: &submission.igl_phone,
            players: &players,
            has_payment_proof: true,
        })
        .map_err(ValidationError::Submission)?;
        if players.len() > self.max_players {
            return Err(Violation::TooManyPlayers(self.max_players).into());
        }

        let file = submission.payment_screenshot;
        let path = storage_path(&file.file_name, &random_token());
        self.blob_store
            .upload(&path, file.content_type.as_deref(), file.bytes)
            .await
            .map_err(|e| IntakeError::new(IntakeStage::Upload, e))?;
        let payment_screenshot_url = self.blob_store.public_url(&path);

        let team: TeamRow = self
            .team_store
            .insert_team(NewTeamRow {
                team_name: submission.team_name,
                igl_name: submission.igl_name,
                igl_phone: submission.igl_phone,
                payment_screenshot_url: payment_screenshot_url.clone(),
                status: RegistrationStatus::Pending,
                payment_amount: self.fee,
            })
            .await
            .map_err(|e| IntakeError::new(IntakeStage::TeamInsert, e))?;

        let rows = players
            .into_iter()
            .map(|p| NewPlayerRow {
                team_id: team.id,
                name: p.name,
                uid: p.uid,
            })
            .collect();
        self.team_store
            .insert_players(rows)
            .await
            .map_err(|e| IntakeError::new(IntakeStage::PlayerInsert, e))?;

        tracing::info!(team_id = %team.id, team_name = %team.team_name, "Registration created");

        Ok(IntakeReceipt {
            team_id: team.id,
            payment_screenshot_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryBlobStore, InMemoryTeamStore};

    fn submission(players: &str) -> IntakeSubmission {
        IntakeSubmission {
            team_name: "Team Phoenix".to_string(),
            igl_name: "Asha".to_string(),
            igl_phone: "9812345678".to_string(),
            players: players.to_string(),
            payment_screenshot: UploadedFile {
                file_name: "receipt.final.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            },
        }
    }

    const FOUR_PLAYERS: &str = r#"[{"name":"Asha","uid":"1001"},{"name":"Bikash","uid":"1002"},{"name":"Chandra","uid":"1003"},{"name":"Deepa","uid":"1004"}]"#;

    fn service() -> (IntakeService, Arc<InMemoryTeamStore>, Arc<InMemoryBlobStore>) {
        let teams = Arc::new(InMemoryTeamStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new("screenshots", "https://cdn.test"));
        (
            IntakeService::new(teams.clone(), blobs.clone(), 250),
            teams,
            blobs,
        )
    }

    #[test]
    fn test_storage_path_keeps_last_extension() {
        assert_eq!(storage_path("receipt.final.png", "abc"), "public/abc.png");
        assert_eq!(storage_path("photo.JPG", "xyz"), "public/xyz.JPG");
        assert_eq!(storage_path("noext", "t"), "public/t.noext");
    }

    #[test]
    fn test_random_token_is_alphanumeric() {
        let token = random_token();
        assert_eq!(token.len(), STORAGE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_register_persists_everything() {
        let (service, teams, blobs) = service();
        let receipt = service.register(submission(FOUR_PLAYERS)).await.unwrap();

        assert!(
            receipt
                .payment_screenshot_url
                .starts_with("https://cdn.test/screenshots/public/")
        );
        assert!(receipt.payment_screenshot_url.ends_with(".png"));
        assert_eq!(blobs.object_count().unwrap(), 1);

        let listed = teams.list_with_players().await.unwrap();
        assert_eq!(listed.len(), 1);
        let team = &listed[0];
        assert_eq!(team.team.id, receipt.team_id);
        assert_eq!(team.team.status, RegistrationStatus::Pending);
        assert_eq!(team.team.payment_amount, 250);
        assert!(!team.team.payment_verified);
        let names: Vec<_> = team.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Bikash", "Chandra", "Deepa"]);
    }

    #[tokio::test]
    async fn test_malformed_players_fails_before_upload() {
        let (service, teams, blobs) = service();
        let err = service.register(submission("[{oops")).await.unwrap_err();

        assert_eq!(err.error_code(), "PLAYERS_PARSE_FAILED");
        assert_eq!(blobs.object_count().unwrap(), 0);
        assert_eq!(teams.team_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_phone_is_rejected() {
        let (service, teams, _) = service();
        let mut bad = submission(FOUR_PLAYERS);
        bad.igl_phone = "98123".to_string();

        let err = service.register(bad).await.unwrap_err();
        assert_eq!(err.to_string(), "Valid 10-digit WhatsApp number is required");
        assert_eq!(teams.team_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_roster_fails_before_upload() {
        let (service, teams, blobs) = service();
        let err = service.register(submission("[]")).await.unwrap_err();

        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "At least one player is required");
        assert_eq!(blobs.object_count().unwrap(), 0);
        assert_eq!(teams.team_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_roster_longer_than_limit_is_rejected() {
        let teams = Arc::new(InMemoryTeamStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new("screenshots", "https://cdn.test"));
        let service = IntakeService::new(teams.clone(), blobs.clone(), 250).with_max_players(3);
        assert_eq!(service.max_players(), 3);

        let err = service.register(submission(FOUR_PLAYERS)).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "A team can have at most 3 players");
        assert_eq!(blobs.object_count().unwrap(), 0);
        assert_eq!(teams.team_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicates_are_accepted() {
        let (service, teams, _) = service();
        let first = service.register(submission(FOUR_PLAYERS)).await.unwrap();
        let second = service.register(submission(FOUR_PLAYERS)).await.unwrap();

        assert_ne!(first.team_id, second.team_id);
        assert_eq!(teams.team_count().unwrap(), 2);
    }
}
