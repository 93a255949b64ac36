//! Error types for relcheck.
//!
//! The crate provides two error types:
//! - [`Error`]: A failure to get an answer (network, auth, malformed request, etc.)
//! - [`AccessDenied`]: An answer that was not a grant
//!
//! ## Key Invariant
//!
//! `Client::check()` never returns `Err`. A failed dispatch is the
//! [`CheckOutcome::Failed`](crate::CheckOutcome::Failed) outcome, which is never
//! reported as a denial. Only `require()` converts a non-grant into an error
//! (`AccessDenied`).
//!
//! ```rust,ignore
//! // check_request() - every answer, including a failure, is an outcome
//! let outcome = client.check_request(request.clone()).await;
//!
//! // require() - anything but Granted is Err(AccessDenied)
//! outcome.require(&request)?;
//! ```

mod access_denied;
mod core;
mod kind;

pub use access_denied::{AccessDenied, DenialReason};
pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for relcheck operations.
pub type Result<T> = std::result::Result<T, Error>;
