//! Core types for relcheck.
//!
//! - [`ObjectReference`] / [`SubjectReference`]: who and what a check is about
//! - [`CheckRequest`]: one authorization question
//! - [`Permissionship`]: the service's answer, including codes it may add later
//! - [`CheckOutcome`]: the caller-visible result of a check

mod object;
mod outcome;
mod permissionship;
mod request;

pub use object::{ObjectReference, ParseError, SubjectReference};
pub use outcome::{classify, CheckOutcome, OutcomeKind};
pub use permissionship::Permissionship;
pub use request::CheckRequest;
