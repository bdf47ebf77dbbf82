//! Registration intake and listing

pub mod handlers;
pub mod intake;
pub mod query;

pub use handlers::{RegistrationCreated, StatusUpdateRequest, StatusUpdateResponse};
pub use intake::{IntakeReceipt, IntakeService, IntakeSubmission, UploadedFile, storage_path};
pub use query::{RegistrationListing, load_registrations};
