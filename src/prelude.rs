//! Prelude module for convenient imports.
//!
//! ```rust
//! use relcheck::prelude::*;
//! ```

pub use crate::{
    auth::PresharedKey,
    client::{Client, ClientBuilder},
    config::TlsConfig,
    error::{AccessDenied, DenialReason, Error, ErrorKind},
    transport::{CheckTransport, Transport},
    types::{
        classify, CheckOutcome, CheckRequest, ObjectReference, OutcomeKind, Permissionship,
        SubjectReference,
    },
};
