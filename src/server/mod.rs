//! Server module for building the portal's HTTP server
//!
//! `ServerBuilder` wires the collaborators into a `PortalHost` and hands it to
//! the REST exposure, which registers:
//! - registration intake, listing, and status routes
//! - admin session routes
//! - health routes

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::PortalHost;
