//! Core module containing the domain model, errors and collaborator traits

pub mod auth;
pub mod error;
pub mod events;
pub mod model;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, Session, SessionProvider};
pub use error::PortalError;
pub use events::{EventBus, EventEnvelope, SessionEvent};
pub use model::{
    ModerationTarget, Player, REGISTRATION_FEE, RegistrationRecord, RegistrationStatus,
    StatusPatch, TeamRow, TeamWithPlayers,
};
pub use service::{BlobStore, TeamStore};
pub use validation::{Candidate, Violation};
