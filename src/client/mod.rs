//! Client side of the portal: the public form and the admin API client

pub mod encoder;
pub mod form;
pub mod http;
pub mod session;

pub use encoder::{PartBody, SubmissionPart, SubmissionPayload};
pub use form::{FormError, PaymentProof, RegistrationForm};
pub use http::{ClientError, PortalClient};
pub use session::SessionContext;
