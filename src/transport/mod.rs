//! Dispatching checks to the authorization service.
//!
//! Everything the client needs from the service is one capability,
//! [`CheckTransport::dispatch_check`]. This module provides:
//!
//! - [`GrpcTransport`] (feature `grpc`, default): the native gRPC API via tonic
//! - [`RestTransport`] (feature `rest`, default): the HTTP/JSON gateway via reqwest
//! - [`CallbackAdapter`]: wraps a callback-style client in a single-fire bridge
//!
//! For tests, see [`MockTransport`](crate::testing::MockTransport).
//!
//! ## Transport Selection
//!
//! ```rust
//! use relcheck::Transport;
//!
//! let grpc = Transport::Grpc;   // default
//! let http = Transport::Http;   // through the HTTP gateway
//! assert_ne!(grpc, http);
//! ```

mod callback;
mod traits;

#[cfg(feature = "grpc")]
mod grpc;

#[cfg(feature = "grpc")]
mod proto;

#[cfg(feature = "rest")]
mod rest;

pub use callback::{pending_check, CallbackAdapter, CallbackTransport, CheckCallback, PendingCheck};
pub use traits::{CheckTransport, Transport, TransportStats};
pub(crate) use traits::StatsRecorder;

#[cfg(feature = "grpc")]
pub use grpc::{GrpcTransport, GrpcTransportBuilder};

#[cfg(feature = "rest")]
pub use rest::{RestTransport, RestTransportBuilder};
