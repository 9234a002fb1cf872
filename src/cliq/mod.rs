//! Zoho Cliq notification delivery.
//!
//! Credentials are validated up front, a token is fetched per delivery, and
//! each delivery posts a message followed by an optional file upload.

pub mod credentials;
pub mod delivery;
pub mod error;
pub mod message;
pub mod reporter;
pub mod screenshot;
pub mod token;

pub use credentials::Credentials;
pub use delivery::{
    Attachment, CliqEndpoints, DeliveryExecutor, DeliveryOutcome, DeliveryState, DeliveryTarget,
};
pub use error::{CredentialsError, DeliveryError, NotifyError, RequestError, TokenError};
pub use message::{classify, compose, ComposeOptions, MessageKind, MessagePayload};
pub use reporter::CliqReporter;
pub use screenshot::ScreenshotUploader;
pub use token::{BearerToken, TokenProvider};
