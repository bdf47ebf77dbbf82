//! Shared helpers for driving the portal over HTTP
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod portal_harness;
//! use portal_harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};
use uuid::Uuid;

use tourney::config::{AdminAccount, PortalConfig};
use tourney::core::model::{NewPlayerRow, NewTeamRow, StatusPatch, TeamRow, TeamWithPlayers};
use tourney::core::service::{BlobStore, TeamStore};
use tourney::server::ServerBuilder;
use tourney::storage::{InMemoryBlobStore, InMemoryTeamStore};

pub const ADMIN_EMAIL: &str = "organizer@lan.test";
pub const ADMIN_PASSWORD: &str = "bracket-2024";

/// PNG signature plus filler; intake never decodes the image
pub const SCREENSHOT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-receipt";

// ---------------------------------------------------------------------------
// Portal under test
// ---------------------------------------------------------------------------

/// A running test server plus handles on its in-memory collaborators
pub struct TestPortal {
    pub server: TestServer,
    pub teams: InMemoryTeamStore,
    pub blobs: InMemoryBlobStore,
}

pub fn test_config() -> PortalConfig {
    let mut config = PortalConfig::default();
    config.auth.admins = vec![AdminAccount {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }];
    config
}

pub fn test_blob_store(config: &PortalConfig) -> InMemoryBlobStore {
    InMemoryBlobStore::new(
        config.storage.bucket.clone(),
        config.storage.public_base_url.clone(),
    )
}

pub fn create_portal() -> TestPortal {
    create_portal_with_config(test_config())
}

pub fn create_portal_with_config(config: PortalConfig) -> TestPortal {
    let teams = InMemoryTeamStore::new();
    let blobs = test_blob_store(&config);

    let app = ServerBuilder::new()
        .with_config(config)
        .with_team_store(teams.clone())
        .with_blob_store(blobs.clone())
        .with_in_memory_backends()
        .build()
        .expect("Failed to build app");

    TestPortal {
        server: TestServer::new(app).expect("Failed to create test server"),
        teams,
        blobs,
    }
}

/// Server over arbitrary collaborators, for failure injection
pub fn create_server_with(
    team_store: impl TeamStore + 'static,
    blob_store: impl BlobStore + 'static,
) -> TestServer {
    let app = ServerBuilder::new()
        .with_config(test_config())
        .with_team_store(team_store)
        .with_blob_store(blob_store)
        .with_in_memory_backends()
        .build()
        .expect("Failed to build app");

    TestServer::new(app).expect("Failed to create test server")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub fn roster_json() -> String {
    json!([
        { "name": "Asha", "uid": "5123001" },
        { "name": "Ravi", "uid": "5123002" },
        { "name": "Kiran", "uid": "5123003" },
        { "name": "Meera", "uid": "5123004" }
    ])
    .to_string()
}

pub fn screenshot_part(file_name: &str) -> Part {
    Part::bytes(SCREENSHOT_BYTES.to_vec())
        .file_name(file_name)
        .mime_type("image/png")
}

/// The canonical valid submission
pub fn phoenix_form() -> MultipartForm {
    registration_form("Team Phoenix", "Asha", "9812345678", &roster_json())
}

pub fn registration_form(team: &str, igl: &str, phone: &str, players: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("teamName", team.to_string())
        .add_text("iglName", igl.to_string())
        .add_text("iglPhone", phone.to_string())
        .add_text("players", players.to_string())
        .add_part("paymentScreenshot", screenshot_part("receipt.png"))
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value"),
    )
}

/// Sign in as the configured admin and return the session token
pub async fn sign_in(server: &TestServer) -> String {
    let response = server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("sign-in returns a token")
        .to_string()
}

/// Submit the canonical registration and return its id
pub async fn register_phoenix(server: &TestServer) -> Uuid {
    let response = server.post("/api/register").multipart(phoenix_form()).await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["teamId"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("registration returns a teamId")
}

pub async fn list_registrations(server: &TestServer, token: &str) -> Value {
    let (name, value) = bearer(token);
    let response = server.get("/api/register").add_header(name, value).await;
    response.assert_status_ok();
    response.json()
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

/// Which team store call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    TeamInsert,
    PlayerInsert,
    List,
    Update,
}

/// Team store that delegates to memory except for one failing call
#[derive(Clone)]
pub struct FlakyTeamStore {
    pub inner: InMemoryTeamStore,
    pub fail_on: FailOn,
}

impl FlakyTeamStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: InMemoryTeamStore::new(),
            fail_on,
        }
    }

    fn check(&self, call: FailOn) -> Result<()> {
        if self.fail_on == call {
            Err(anyhow!("connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TeamStore for FlakyTeamStore {
    async fn insert_team(&self, row: NewTeamRow) -> Result<TeamRow> {
        self.check(FailOn::TeamInsert)?;
        self.inner.insert_team(row).await
    }

    async fn insert_players(&self, rows: Vec<NewPlayerRow>) -> Result<()> {
        self.check(FailOn::PlayerInsert)?;
        self.inner.insert_players(rows).await
    }

    async fn list_with_players(&self) -> Result<Vec<TeamWithPlayers>> {
        self.check(FailOn::List)?;
        self.inner.list_with_players().await
    }

    async fn update_status(&self, id: &Uuid, patch: StatusPatch) -> Result<Option<TeamRow>> {
        self.check(FailOn::Update)?;
        self.inner.update_status(id, patch).await
    }
}

/// Bucket that refuses every upload
#[derive(Clone, Default)]
pub struct RefusingBlobStore;

#[async_trait]
impl BlobStore for RefusingBlobStore {
    async fn upload(&self, _: &str, _: Option<&str>, _: Vec<u8>) -> Result<()> {
        Err(anyhow!("bucket quota exceeded"))
    }

    fn public_url(&self, path: &str) -> String {
        format!("http://storage.invalid/{}", path)
    }
}
