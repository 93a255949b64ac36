//! Integration tests for relcheck.
//!
//! These tests run against a live SpiceDB with both the gRPC API and the
//! HTTP gateway enabled, for example:
//!
//! ```bash
//! docker run --rm -p 50051:50051 -p 8443:8443 authzed/spicedb serve \
//!     --grpc-preshared-key somerandomkeyhere --http-enabled
//! ```
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --features integration-tests --test integration -- --test-threads=1
//! ```
//!
//! # Environment Variables
//!
//! - `SPICEDB_ENDPOINT`: gRPC endpoint (default: `http://localhost:50051`)
//! - `SPICEDB_HTTP_ENDPOINT`: HTTP gateway (default: `http://localhost:8443`)
//! - `SPICEDB_TOKEN`: preshared key (default: `somerandomkeyhere`)

mod check_tests;
mod common;
