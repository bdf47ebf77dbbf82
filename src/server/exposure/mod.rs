//! API exposure modules
//!
//! Each exposure consumes a `PortalHost` and produces a Router for its protocol.

pub mod rest;

pub use rest::RestExposure;
