//! In-memory collaborators for testing and development

use crate::config::AdminAccount;
use crate::core::auth::{Session, SessionProvider};
use crate::core::events::{EventBus, EventEnvelope, SessionEvent};
use crate::core::model::{
    NewPlayerRow, NewTeamRow, PlayerRow, StatusPatch, TeamRow, TeamWithPlayers,
};
use crate::core::service::{BlobStore, TeamStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

/// In-memory team store
///
/// Players are kept in one insertion-ordered list, so a team's roster comes
/// back in the order it was submitted. Nothing here is transactional: a team
/// written without players stays written.
#[derive(Clone, Default)]
pub struct InMemoryTeamStore {
    teams: Arc<RwLock<HashMap<Uuid, TeamRow>>>,
    players: Arc<RwLock<Vec<PlayerRow>>>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored teams
    pub fn team_count(&self) -> Result<usize> {
        let teams = self
            .teams
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(teams.len())
    }

    /// Number of stored player rows across all teams
    pub fn player_count(&self) -> Result<usize> {
        let players = self
            .players
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(players.len())
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn insert_team(&self, row: NewTeamRow) -> Result<TeamRow> {
        let team = TeamRow {
            id: Uuid::new_v4(),
            team_name: row.team_name,
            igl_name: row.igl_name,
            igl_phone: row.igl_phone,
            payment_screenshot_url: row.payment_screenshot_url,
            status: row.status,
            payment_amount: row.payment_amount,
            payment_verified: false,
            created_at: Utc::now(),
        };

        let mut teams = self
            .teams
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        teams.insert(team.id, team.clone());

        Ok(team)
    }

    async fn insert_players(&self, rows: Vec<NewPlayerRow>) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        players.extend(rows.into_iter().map(|row| PlayerRow {
            id: Uuid::new_v4(),
            team_id: row.team_id,
            name: row.name,
            uid: row.uid,
        }));

        Ok(())
    }

    async fn list_with_players(&self) -> Result<Vec<TeamWithPlayers>> {
        let teams = self
            .teams
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let players = self
            .players
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(teams
            .values()
            .map(|team| TeamWithPlayers {
                team: team.clone(),
                players: players
                    .iter()
                    .filter(|p| p.team_id == team.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn update_status(&self, id: &Uuid, patch: StatusPatch) -> Result<Option<TeamRow>> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(teams.get_mut(id).map(|team| {
            team.apply(&patch);
            team.clone()
        }))
    }
}

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// In-memory bucket
#[derive(Clone)]
pub struct InMemoryBlobStore {
    bucket: String,
    public_base_url: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryBlobStore {
    pub fn new(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, path: &str) -> Result<Option<StoredObject>> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(objects.get(path).cloned())
    }

    pub fn object_count(&self) -> Result<usize> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(objects.len())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, path: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if objects.contains_key(path) {
            return Err(anyhow!("The resource already exists: {}", path));
        }

        objects.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            path
        )
    }
}

/// In-memory session provider seeded with admin accounts
///
/// Sessions are keyed by token. Expired sessions are dropped on lookup and
/// on every sign-in, and announced as [`SessionEvent::Expired`].
#[derive(Clone)]
pub struct InMemorySessionProvider {
    admins: Arc<HashMap<String, String>>,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    event_bus: EventBus,
}

impl InMemorySessionProvider {
    pub fn new(admins: &[AdminAccount], ttl: Duration) -> Self {
        Self {
            admins: Arc::new(
                admins
                    .iter()
                    .map(|a| (a.email.clone(), a.password.clone()))
                    .collect(),
            ),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            event_bus: EventBus::default(),
        }
    }

    /// The bus session changes are published on
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Number of sessions held, expired ones included until purged
    pub fn session_count(&self) -> Result<usize> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(sessions.len())
    }
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn session(&self, token: &str) -> Result<Option<Session>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(session) = sessions.get(token) else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            let session_id = session.id;
            sessions.remove(token);
            self.event_bus.publish(SessionEvent::Expired { session_id });
            return Ok(None);
        }

        Ok(Some(session.clone()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Session>> {
        let known = self
            .admins
            .get(email)
            .is_some_and(|expected| expected == password);
        if !known {
            return Ok(None);
        }

        let session = Session {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            expires_at: Utc::now() + self.ttl,
        };

        let purged = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            let now = Utc::now();
            let purged: Vec<Uuid> = sessions
                .values()
                .filter(|s| s.is_expired(now))
                .map(|s| s.id)
                .collect();
            sessions.retain(|_, s| !s.is_expired(now));
            sessions.insert(session.token.clone(), session.clone());
            purged
        };

        for session_id in purged {
            self.event_bus.publish(SessionEvent::Expired { session_id });
        }
        self.event_bus.publish(SessionEvent::SignedIn {
            session_id: session.id,
            email: session.email.clone(),
        });

        Ok(Some(session))
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        let removed = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            sessions.remove(token)
        };

        if let Some(session) = removed {
            self.event_bus.publish(SessionEvent::SignedOut {
                session_id: session.id,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.event_bus.subscribe()
    }
}
