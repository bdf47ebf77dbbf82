//! Storage collaborators

pub mod in_memory;

pub use in_memory::{InMemoryBlobStore, InMemorySessionProvider, InMemoryTeamStore};
