//! Admin moderation: filtering, statistics, and status transitions

pub mod controller;
pub mod filter;
pub mod stats;
pub mod updater;

pub use controller::ModerationController;
pub use filter::{RegistrationFilter, StatusFilter};
pub use stats::{RegistrationCounts, RegistrationStats};
pub use updater::{ModerationError, StatusUpdater, StoreStatusUpdater, apply_transition};
