//! # relcheck
//!
//! Permission checks against a relationship-based access-control service
//! speaking the SpiceDB v1 API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relcheck::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), relcheck::Error> {
//!     let client = Client::builder()
//!         .endpoint("http://localhost:50051")
//!         .credentials(PresharedKey::from_env("SPICEDB_TOKEN")?)
//!         .insecure()
//!         .build()?;
//!
//!     let outcome = client
//!         .check(
//!             ObjectReference::new("task", "task-001"),
//!             "view",
//!             ObjectReference::new("user", "user-001"),
//!         )
//!         .await;
//!     println!("{outcome}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Argument Order**: `check(resource, permission, subject)`, the wire order of the API
//! - **Five Outcomes**: `Granted`, `Denied`, `Indeterminate`, `Unrecognized(code)`, `Failed(error)`
//! - **Failure ≠ Denial**: an unreachable service is `Failed`, never `Denied`
//! - **No `Err` from checks**: every check yields exactly one [`CheckOutcome`]
//!
//! ## Features
//!
//! - `grpc` (default): gRPC transport via tonic
//! - `rest` (default): HTTP gateway transport via reqwest
//! - `rustls` (default): Use rustls for the HTTP transport's TLS
//! - `native-tls`: Use native TLS for the HTTP transport

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Transport layer
pub mod transport;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

mod user_agent;

// Re-export main types at crate root for convenience
pub use auth::PresharedKey;
pub use client::{Client, ClientBuilder};
pub use config::TlsConfig;
pub use error::{AccessDenied, DenialReason, Error, ErrorKind, Result};
pub use transport::{CheckTransport, Transport};
pub use types::{
    classify, CheckOutcome, CheckRequest, ObjectReference, OutcomeKind, ParseError,
    Permissionship, SubjectReference,
};
