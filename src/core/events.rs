//! Session-change notifications
//!
//! The session provider publishes sign-in / sign-out / expiry events on an
//! [`EventBus`]; an admin view subscribes for as long as it is mounted.
//!
//! ```text
//! sign_in / sign_out ──▶ EventBus::publish() ──▶ broadcast channel ──▶ SessionContext
//! ```
//!
//! Registration data is never pushed through this bus; the admin list is
//! refreshed by pulling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A change to an admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session was created with valid credentials
    SignedIn { session_id: Uuid, email: String },
    /// A session was ended explicitly
    SignedOut { session_id: Uuid },
    /// A session was found past its expiry and dropped
    Expired { session_id: Uuid },
}

impl SessionEvent {
    /// The session this event concerns
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::SignedIn { session_id, .. }
            | SessionEvent::SignedOut { session_id }
            | SessionEvent::Expired { session_id } => *session_id,
        }
    }

    /// Whether the session is usable after this event
    pub fn is_active(&self) -> bool {
        matches!(self, SessionEvent::SignedIn { .. })
    }

    pub fn action(&self) -> &str {
        match self {
            SessionEvent::SignedIn { .. } => "signed_in",
            SessionEvent::SignedOut { .. } => "signed_out",
            SessionEvent::Expired { .. } => "expired",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: SessionEvent,
}

impl EventEnvelope {
    pub fn new(event: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers that fall more than `capacity` events behind get a
    /// `Lagged` error on their next receive.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails; with no subscribers the event is dropped. Returns the
    /// number of receivers that will see it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
